use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use lc_anim::{Command, Frame, FrameSink, PlaybackState, Ticker};
use lc_app::{
    AppError, AppResult, CsvUnits, Session, SimConfig, TrajectoryService, export_frame_csv,
    export_trajectory_csv, get_trajectory_summary, load_yaml,
};
use lc_core::{CircuitParams, Mode, timing};

#[derive(Parser)]
#[command(name = "lc-cli")]
#[command(about = "LC oscillator viewer - charge and current of an ideal LC tank", long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Values applied on top of the config file (or the defaults).
#[derive(Args)]
struct Overrides {
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Solution mode
    #[arg(long, global = true, value_enum)]
    mode: Option<ModeArg>,
    /// Inductance exponent, L = 10^x H
    #[arg(long, global = true, allow_hyphen_values = true)]
    log10_l: Option<f64>,
    /// Capacitance exponent, C = 10^x F
    #[arg(long, global = true, allow_hyphen_values = true)]
    log10_c: Option<f64>,
    /// Initial charge in coulomb
    #[arg(long, global = true, allow_hyphen_values = true)]
    q0: Option<f64>,
    /// Initial current in ampere
    #[arg(long, global = true, allow_hyphen_values = true)]
    i0: Option<f64>,
    /// Normalized end time
    #[arg(long, global = true)]
    tau_end: Option<f64>,
    /// Minimum number of samples
    #[arg(long, global = true)]
    samples: Option<usize>,
    /// Animation speed factor (0.05 - 1.0)
    #[arg(long, global = true)]
    speed: Option<f64>,
    /// Log wall-clock timings
    #[arg(long, global = true)]
    timing: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Analytical,
    Numerical,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Analytical => Mode::Analytical,
            ModeArg::Numerical => Mode::Numerical,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the trajectory and print a summary
    Summary,
    /// Print the visible window ending at a cut
    Frame {
        /// Window end in normalized time
        #[arg(long)]
        cut: f64,
    },
    /// Export samples as CSV
    Export {
        /// Export only the window ending at this cut
        #[arg(long)]
        cut: Option<f64>,
        /// Write physical time and current instead of normalized values
        #[arg(long)]
        physical: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play the animation headless, one line per frame
    ///
    /// Reads play, pause, reset, seek <tau> and quit from stdin.
    Animate {
        /// Number of ticks to run
        #[arg(long, default_value_t = 200)]
        ticks: usize,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.overrides.timing {
        timing::enable_timing();
    }
    let config = build_config(&cli.overrides)?;
    let service = TrajectoryService::from_config(&config);
    let mut session = Session::new(service, &config);

    match cli.command {
        Commands::Summary => cmd_summary(&mut session),
        Commands::Frame { cut } => cmd_frame(&mut session, cut),
        Commands::Export {
            cut,
            physical,
            output,
        } => cmd_export(&mut session, cut, physical, output.as_deref()),
        Commands::Animate { ticks } => cmd_animate(&mut session, &config, ticks),
    }
}

fn build_config(overrides: &Overrides) -> AppResult<SimConfig> {
    let mut config = match &overrides.config {
        Some(path) => load_yaml(path)?,
        None => SimConfig::default(),
    };

    if let Some(mode) = overrides.mode {
        config.mode = mode.into();
    }
    if overrides.log10_l.is_some() || overrides.log10_c.is_some() {
        let current = config.circuit;
        let log10_l = overrides.log10_l.unwrap_or(current.inductance_h.log10());
        let log10_c = overrides.log10_c.unwrap_or(current.capacitance_f.log10());
        config.circuit = CircuitParams {
            q0_c: current.q0_c,
            i0_a: current.i0_a,
            ..CircuitParams::from_log10(log10_l, log10_c)
        };
    }
    if let Some(q0) = overrides.q0 {
        config.circuit.q0_c = q0;
    }
    if let Some(i0) = overrides.i0 {
        config.circuit.i0_a = i0;
    }
    if let Some(tau_end) = overrides.tau_end {
        config.domain.tau_end = tau_end;
    }
    if let Some(samples) = overrides.samples {
        config.domain.samples = samples;
    }
    if let Some(speed) = overrides.speed {
        config.animation.speed = speed;
    }

    config.validate()?;
    Ok(config)
}

fn cmd_summary(session: &mut Session) -> AppResult<()> {
    let params = *session.params();
    println!(
        "Computing {} trajectory (L = {:e} H, C = {:e} F)",
        session.mode().label(),
        params.inductance_h,
        params.capacitance_f
    );

    let trajectory = session.trajectory()?;
    let summary = get_trajectory_summary(&trajectory)?;

    println!("\nTrajectory Summary:");
    println!("  Mode: {}", summary.mode.label());
    println!("  ω: {:.6e} rad/s", summary.omega_rad_s);
    if let Some(period_s) = summary.period_s {
        println!("  Period: {:.6e} s", period_s);
    }
    println!("  Samples: {}", summary.sample_count);
    println!(
        "  τ range: {:.3} - {:.3}",
        summary.tau_range.0, summary.tau_range.1
    );
    println!("  Max amplitude: {:.6}", summary.max_amplitude);
    println!("  Energy drift: {:.3e}", summary.energy_drift);
    Ok(())
}

fn cmd_frame(session: &mut Session, cut: f64) -> AppResult<()> {
    session.trajectory()?;
    let frame = session
        .frame_at(cut)
        .ok_or_else(|| AppError::InvalidInput("No trajectory loaded".to_string()))?;

    println!(
        "Window [{:.3}, {:.3}]: {} samples",
        frame.tau_min,
        frame.tau_max,
        frame.len()
    );
    if let (Some(first), Some(last)) = (frame.samples().next(), frame.samples().last()) {
        println!(
            "  first: τ = {:.4}, q = {:+.6}, i = {:+.6}",
            first.tau, first.q, first.i
        );
        println!(
            "  last:  τ = {:.4}, q = {:+.6}, i = {:+.6}",
            last.tau, last.q, last.i
        );
    }
    Ok(())
}

fn cmd_export(
    session: &mut Session,
    cut: Option<f64>,
    physical: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let trajectory = session.trajectory()?;
    let units = if physical {
        CsvUnits::Physical
    } else {
        CsvUnits::Normalized
    };

    let mut buf = Vec::new();
    let rows = match cut {
        Some(cut) => {
            let frame = session
                .frame_at(cut)
                .ok_or_else(|| AppError::InvalidInput("No trajectory loaded".to_string()))?;
            export_frame_csv(&frame, trajectory.omega_rad_s(), &mut buf, units)?
        }
        None => export_trajectory_csv(&trajectory, &mut buf, units)?,
    };

    if let Some(path) = output {
        std::fs::write(path, &buf)?;
        println!("✓ Exported {} samples to {}", rows, path.display());
    } else {
        io::stdout().write_all(&buf)?;
    }
    Ok(())
}

struct PrintSink {
    printed: usize,
}

impl FrameSink for PrintSink {
    fn render(&mut self, frame: &Frame<'_>) {
        self.printed += 1;
        match frame.samples().last() {
            Some(s) => println!(
                "{:>6}  τ = {:>9.3}  samples = {:>5}  q = {:+.4}  i = {:+.4}",
                self.printed,
                frame.tau_max,
                frame.len(),
                s.q,
                s.i
            ),
            None => println!("{:>6}  τ = {:>9.3}  (empty)", self.printed, frame.tau_max),
        }
    }
}

/// Forward stdin lines as playback commands until EOF or `quit`.
fn spawn_stdin_commands() -> Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let mut words = line.split_whitespace();
            let command = match words.next() {
                Some("play" | "p") => Command::Play,
                Some("pause" | "s") => Command::Pause,
                Some("reset" | "r") => Command::Reset,
                Some("seek") => match words.next().and_then(|w| w.parse().ok()) {
                    Some(tau) => Command::Seek(tau),
                    None => {
                        eprintln!("usage: seek <tau>");
                        continue;
                    }
                },
                Some("quit" | "q") => {
                    let _ = tx.send(Command::Pause);
                    break;
                }
                Some(other) => {
                    eprintln!("unknown command: {other}");
                    continue;
                }
                None => continue,
            };
            if tx.send(command).is_err() {
                break;
            }
        }
    });
    rx
}

fn cmd_animate(session: &mut Session, config: &SimConfig, ticks: usize) -> AppResult<()> {
    session.trajectory()?;
    session.on_play();

    let commands = spawn_stdin_commands();
    let mut ticker = Ticker::new(
        Duration::from_millis(config.animation.tick_interval_ms),
        config.animation.burst_ticks,
    );
    let mut sink = PrintSink { printed: 0 };
    let mut remaining = ticks;
    ticker.restart(Instant::now());

    while remaining > 0 {
        if session.state() == PlaybackState::Paused {
            // Wait for the next command; a closed input ends the run.
            match commands.recv_timeout(Duration::from_secs(3600)) {
                Ok(command) => {
                    session.apply(command);
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
            ticker.restart(Instant::now());
            continue;
        }

        thread::sleep(ticker.until_next(Instant::now()));
        let due = ticker.due(Instant::now()).min(remaining);
        let outcome = session.run_burst(&commands, &mut sink, due);
        remaining -= outcome.ticks;
    }

    println!(
        "✓ {} frames, play-head at τ = {:.3}",
        sink.printed,
        session.position()
    );
    Ok(())
}
