//! Play-head position and playback state.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// Position on the normalized time axis; persists across frame requests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayheadState {
    pub position: f64,
    pub playing: bool,
}

impl PlayheadState {
    pub fn state(&self) -> PlaybackState {
        if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// Move forward by `step`, restarting at 0 once past `tau_end`.
    ///
    /// Returns true when the position wrapped.
    pub fn advance(&mut self, step: f64, tau_end: f64) -> bool {
        self.position += step;
        if self.position > tau_end {
            self.position = 0.0;
            true
        } else {
            false
        }
    }

    pub fn seek(&mut self, position: f64, tau_end: f64) {
        self.position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, tau_end.max(0.0))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_paused_at_zero() {
        let head = PlayheadState::default();
        assert_eq!(head.position, 0.0);
        assert_eq!(head.state(), PlaybackState::Paused);
    }

    #[test]
    fn landing_on_end_does_not_wrap() {
        let mut head = PlayheadState::default();
        for _ in 0..4 {
            assert!(!head.advance(0.25, 1.0));
        }
        assert_eq!(head.position, 1.0);
        assert!(head.advance(0.25, 1.0));
        assert_eq!(head.position, 0.0);
    }

    #[test]
    fn seek_clamps() {
        let mut head = PlayheadState::default();
        head.seek(-3.0, 10.0);
        assert_eq!(head.position, 0.0);
        head.seek(42.0, 10.0);
        assert_eq!(head.position, 10.0);
        head.seek(f64::NAN, 10.0);
        assert_eq!(head.position, 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn position_cycles_with_period_k(n in 0usize..500) {
            // step and τ_end exact in binary: k = ⌊1.0 / 0.25⌋ + 1 = 5
            let mut head = PlayheadState::default();
            for _ in 0..n {
                head.advance(0.25, 1.0);
            }
            prop_assert_eq!(head.position, (n % 5) as f64 * 0.25);
        }

        #[test]
        fn position_never_exceeds_end(steps in 1usize..300, step in 0.01f64..2.0, tau_end in 0.0f64..10.0) {
            let mut head = PlayheadState::default();
            for _ in 0..steps {
                head.advance(step, tau_end);
                prop_assert!(head.position >= 0.0 && head.position <= tau_end);
            }
        }
    }
}
