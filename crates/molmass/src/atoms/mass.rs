//! Rounding masses to match their propagated uncertainty

/// Format a mass as `mass ± stddev`, rounding the standard deviation to one
/// significant digit and the mass to the matching decimal place. A zero (or
/// non-finite) standard deviation formats the mass alone.
pub fn format_mass_std_dev(mass: f64, std_dev: f64) -> String {
    if std_dev <= 0.0 || !std_dev.is_finite() || !mass.is_finite() {
        return format!("{mass}");
    }

    let (rounded_std_dev, exponent) = round_to_one_digit(std_dev);
    let decimals = (-exponent).max(0) as usize;
    if exponent > 0 {
        let scale = 10f64.powi(exponent);
        let rounded_mass = (mass / scale).round() * scale;
        format!("{rounded_mass:.0} ± {rounded_std_dev:.0}")
    } else {
        format!("{mass:.decimals$} ± {rounded_std_dev:.decimals$}")
    }
}

/// Round to one significant digit, returning the result and the power of ten
/// of that digit. Rounding up can carry into the next power (0.96 → 1).
fn round_to_one_digit(value: f64) -> (f64, i32) {
    let mut exponent = value.abs().log10().floor() as i32;
    let mut rounded = (value / 10f64.powi(exponent)).round();
    if rounded >= 10.0 {
        exponent += 1;
        rounded = 1.0;
    }
    (rounded * 10f64.powi(exponent), exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_uncertainty_formats_plain() {
        assert_eq!(format_mass_std_dev(18.02, 0.0), "18.02");
    }

    #[test]
    fn uncertainty_sets_the_decimal_place() {
        assert_eq!(format_mass_std_dev(18.01528, 0.00031), "18.0153 ± 0.0003");
        assert_eq!(format_mass_std_dev(180.15588, 0.0081), "180.156 ± 0.008");
        assert_eq!(format_mass_std_dev(342.29648, 0.014), "342.30 ± 0.01");
    }

    #[test]
    fn rounding_up_carries_to_the_next_place() {
        // 0.096 rounds to 0.1, not 0.10
        assert_eq!(format_mass_std_dev(100.04, 0.096), "100.0 ± 0.1");
        // 9.6 rounds all the way up to 10, pushing the mass to the tens place
        assert_eq!(format_mass_std_dev(1234.5, 9.6), "1230 ± 10");
    }

    #[test]
    fn large_uncertainties_round_the_integer_part() {
        assert_eq!(format_mass_std_dev(1234.5, 32.0), "1230 ± 30");
    }
}
