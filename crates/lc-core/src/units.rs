// lc-core/src/units.rs

use uom::si::f64::{
    AngularVelocity as UomAngularVelocity, Capacitance as UomCapacitance,
    Inductance as UomInductance,
};

// Public canonical unit types (SI, f64)
pub type AngularVelocity = UomAngularVelocity;
pub type Capacitance = UomCapacitance;
pub type Inductance = UomInductance;

#[inline]
pub fn henry(v: f64) -> Inductance {
    use uom::si::inductance::henry;
    Inductance::new::<henry>(v)
}

#[inline]
pub fn farad(v: f64) -> Capacitance {
    use uom::si::capacitance::farad;
    Capacitance::new::<farad>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

/// Resonant angular frequency `1/sqrt(LC)` of an ideal LC tank.
///
/// No validation: non-positive inputs produce NaN or infinity, callers check.
pub fn resonant_omega(l: Inductance, c: Capacitance) -> AngularVelocity {
    use uom::si::capacitance::farad;
    use uom::si::inductance::henry;
    let lc = l.get::<henry>() * c.get::<farad>();
    rad_per_s(1.0 / lc.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::angular_velocity::radian_per_second;

    #[test]
    fn constructors_smoke() {
        let _l = henry(1e-4);
        let _c = farad(1e-9);
        let _w = rad_per_s(1.0);
    }

    #[test]
    fn resonant_omega_matches_closed_form() {
        let w = resonant_omega(henry(1e-4), farad(1e-9)).get::<radian_per_second>();
        let expected = 1.0 / (1e-13_f64).sqrt();
        assert!((w - expected).abs() / expected < 1e-12);
        assert!((w - 3.162e6).abs() < 1e3);
    }
}
