use crate::dynamics::state::G0;
use crate::physics::gravity;

// ---------------------------------------------------------------------------
// International Standard Atmosphere (sea level to 84 km)
// ---------------------------------------------------------------------------

pub const R_AIR: f64 = 287.05;   // specific gas constant for dry air, J/(kg·K)
pub const GAMMA: f64 = 1.4;      // ratio of specific heats

pub const T0: f64 = 288.15;      // sea-level temperature, K
pub const P0: f64 = 101_325.0;   // sea-level pressure, Pa
pub const RHO0: f64 = 1.225;     // sea-level density, kg/m^3
pub const LAPSE: f64 = 0.0065;   // tropospheric lapse rate, K/m

const TROPOPAUSE: f64 = 11_000.0;
const STRATO_1: f64 = 20_000.0;
const STRATO_2: f64 = 32_000.0;
const MESOPAUSE: f64 = 84_000.0;

const T_TROPOPAUSE: f64 = 216.65;
const STRATO_LAPSE: f64 = 0.001;         // K/m, warming
const MESO_SCALE_HEIGHT: f64 = 8_500.0;  // m
const T_THERMOSPHERE: f64 = 186.87;      // K, only feeds sound speed above 84 km

/// Atmospheric properties at a given geometric altitude.
#[derive(Debug, Clone, Copy)]
pub struct Atmo {
    pub density: f64,      // kg/m^3
    pub pressure: f64,     // Pa
    pub temperature: f64,  // K
    pub sound_speed: f64,  // m/s
    pub gravity: f64,      // m/s^2, inverse-square
}

/// ISA model with four bands and a vacuum cap.
///
/// Negative altitudes are clamped to the reference surface. Each band starts
/// from the pressure its lower neighbour reaches at the shared boundary, so
/// density is continuous at 11, 20 and 32 km. At 84 km the residual density
/// (~3e-5 kg/m^3) drops to zero.
pub fn isa(altitude_m: f64) -> Atmo {
    let h = altitude_m.max(0.0);

    let (temperature, pressure) = if h < TROPOPAUSE {
        // Troposphere: lapse -6.5 K/km
        gradient_layer(h, 0.0, T0, -LAPSE, P0)
    } else if h < STRATO_1 {
        // Lower stratosphere: isothermal 216.65 K
        isothermal_layer(h, TROPOPAUSE, T_TROPOPAUSE, p_tropopause())
    } else if h < STRATO_2 {
        // Upper stratosphere: +1.0 K/km
        gradient_layer(h, STRATO_1, T_TROPOPAUSE, STRATO_LAPSE, p_strato_1())
    } else if h < MESOPAUSE {
        // Mesosphere: fixed scale height at the 32 km temperature
        let (t32, p32) = strato_2_base();
        (t32, p32 * (-(h - STRATO_2) / MESO_SCALE_HEIGHT).exp())
    } else {
        (T_THERMOSPHERE, 0.0)
    };

    let density = if temperature > 0.0 {
        (pressure / (R_AIR * temperature)).max(0.0)
    } else {
        0.0
    };

    Atmo {
        density,
        pressure,
        temperature,
        sound_speed: (GAMMA * R_AIR * temperature).sqrt(),
        gravity: gravity::local_gravity(h),
    }
}

pub fn density(altitude_m: f64) -> f64 {
    isa(altitude_m).density
}

pub fn temperature(altitude_m: f64) -> f64 {
    isa(altitude_m).temperature
}

pub fn speed_of_sound(altitude_m: f64) -> f64 {
    isa(altitude_m).sound_speed
}

// ---------------------------------------------------------------------------
// Layer helpers
// ---------------------------------------------------------------------------

/// Gradient layer: T = T_base + lapse * (h - h_base)
fn gradient_layer(h: f64, h_base: f64, t_base: f64, lapse: f64, p_base: f64) -> (f64, f64) {
    let t = t_base + lapse * (h - h_base);
    let p = p_base * (t / t_base).powf(-G0 / (lapse * R_AIR));
    (t, p)
}

/// Isothermal layer: T = const, pressure decays exponentially
fn isothermal_layer(h: f64, h_base: f64, t: f64, p_base: f64) -> (f64, f64) {
    let p = p_base * ((-G0 / (R_AIR * t)) * (h - h_base)).exp();
    (t, p)
}

fn p_tropopause() -> f64 {
    gradient_layer(TROPOPAUSE, 0.0, T0, -LAPSE, P0).1
}

fn p_strato_1() -> f64 {
    isothermal_layer(STRATO_1, TROPOPAUSE, T_TROPOPAUSE, p_tropopause()).1
}

fn strato_2_base() -> (f64, f64) {
    gradient_layer(STRATO_2, STRATO_1, T_TROPOPAUSE, STRATO_LAPSE, p_strato_1())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
