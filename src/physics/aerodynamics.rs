use nalgebra::Vector2;

// Mach breakpoints of the drag policy. Kept exact: preset ranges are
// calibrated against them.
const TRANSONIC_START: f64 = 0.8;
const SUPERSONIC_START: f64 = 1.2;
const HYPERSONIC_START: f64 = 5.0;

/// Mach-corrected drag coefficient.
///
/// - below Mach 0.8: `base_cd`
/// - 0.8..1.2: quadratic transonic rise up to 1.5x
/// - 1.2..5: linear supersonic decay from 1.2x
/// - 5 and above: 0.7x
///
/// The policy is continuous at Mach 0.8 only; it steps down by 0.3x at
/// Mach 1.2 and by 0.12x at Mach 5.
pub fn effective_cd(base_cd: f64, mach: f64) -> f64 {
    if mach < TRANSONIC_START {
        base_cd
    } else if mach < SUPERSONIC_START {
        let frac = (mach - TRANSONIC_START) / (SUPERSONIC_START - TRANSONIC_START);
        base_cd * (1.0 + 0.5 * frac * frac)
    } else if mach < HYPERSONIC_START {
        base_cd * (1.2 - 0.1 * (mach - SUPERSONIC_START))
    } else {
        base_cd * 0.7
    }
}

/// Largest multiple of the base coefficient the policy ever returns
/// (transonic peak just below Mach 1.2).
pub const MAX_CD_FACTOR: f64 = 1.5;

/// Quadratic drag acceleration opposing velocity.
///
/// `k` is the full per-unit-speed-squared factor (e.g. `0.5·ρ·Cd·A/m`), so the
/// magnitude is `k·v²`. Zero when the body is at rest or `k` is not positive.
pub fn drag_accel(vel: &Vector2<f64>, k: f64) -> Vector2<f64> {
    let speed = vel.norm();
    if speed > 1e-10 && k > 0.0 {
        -vel * (k * speed)
    } else {
        Vector2::zeros()
    }
}
