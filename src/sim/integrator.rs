use crate::dynamics::state::{Deriv, State};

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta integrator
// ---------------------------------------------------------------------------

/// Real-axis stability bound of classical RK4: a decay rate `lambda` is
/// integrated without blowing up only while `lambda * dt` stays below this.
pub const RK4_STABILITY_LIMIT: f64 = 2.785;

/// Single RK4 step: advance state by dt.
///
/// Pure in `(state, dt, f)`: the sub-step states are scratch values and
/// nothing they carry (the separation flag included) is committed here.
pub fn rk4_step<F>(state: &State, dt: f64, f: F) -> State
where
    F: Fn(&State) -> Deriv,
{
    let k1 = f(state);
    let k2 = f(&state.apply(&k1, dt * 0.5));
    let k3 = f(&state.apply(&k2, dt * 0.5));
    let k4 = f(&state.apply(&k3, dt));

    State {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
        mass: (state.mass + (k1.dmass + 2.0 * k2.dmass + 2.0 * k3.dmass + k4.dmass) * (dt / 6.0))
            .max(0.0),
        separated: state.separated,
    }
}
