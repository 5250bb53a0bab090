//! Mass-to-charge conversions between charge states

/// Mass of a proton in Da — the default charge carrier
pub const PROTON_MASS: f64 = 1.007_276_466_88;

/// Convert an m/z value between charge states.
///
/// Charge 0 is the neutral mass and charge 1 is the `[M+H]⁺`-style singly
/// protonated ion, so going from 0 to 1 adds a carrier rather than dividing.
/// Negative charges are out of scope and yield 0.
pub fn convolute_mz(mz: f64, current_charge: i32, desired_charge: i32, carrier_mass: f64) -> f64 {
    if current_charge < 0 || desired_charge < 0 {
        return 0.0;
    }
    let neutral = if current_charge == 0 {
        mz
    } else {
        (mz - carrier_mass) * current_charge as f64
    };
    if desired_charge == 0 {
        neutral
    } else {
        neutral / desired_charge as f64 + carrier_mass
    }
}
