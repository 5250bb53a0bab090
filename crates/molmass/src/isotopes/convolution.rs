//! Convolution of per-element isotope distributions into one whole-molecule
//! spectrum
//!
//! Distributions are independent, so the molecular spectrum is their
//! convolution: nominal masses add, probabilities multiply. Each bin carries
//! its abundance-weighted exact mass, so the mass-defect correction falls out
//! of the bookkeeping — a bin's reported mass is the mean exact mass of every
//! combination that landed in it, not the integer nominal mass.

use super::combinatorics::{Bin, Distribution};

/// Convolve two distributions. The result spans
/// `a.min + b.min ..= a.max + b.max` and conserves total probability: its
/// abundance sum is the product of the inputs' sums.
pub(crate) fn convolve(a: &Distribution, b: &Distribution) -> Distribution {
    if a.bins.is_empty() {
        return b.clone();
    }
    if b.bins.is_empty() {
        return a.clone();
    }

    let mut out = Distribution {
        min_nominal: a.min_nominal + b.min_nominal,
        bins: vec![Bin::default(); a.bins.len() + b.bins.len() - 1],
    };
    for (i, a_bin) in a.bins.iter().enumerate() {
        if a_bin.abundance == 0.0 {
            continue;
        }
        let a_mass = a_bin.mean_mass();
        for (j, b_bin) in b.bins.iter().enumerate() {
            if b_bin.abundance == 0.0 {
                continue;
            }
            let abundance = a_bin.abundance * b_bin.abundance;
            let out_bin = &mut out.bins[i + j];
            out_bin.abundance += abundance;
            out_bin.weighted_mass += abundance * (a_mass + b_bin.mean_mass());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_tools::assert_close;

    fn two_peak(min: i64, mass_a: f64, p_a: f64, mass_b: f64) -> Distribution {
        Distribution {
            min_nominal: min,
            bins: vec![
                Bin {
                    abundance: p_a,
                    weighted_mass: p_a * mass_a,
                },
                Bin {
                    abundance: 1.0 - p_a,
                    weighted_mass: (1.0 - p_a) * mass_b,
                },
            ],
        }
    }

    #[test]
    fn convolution_conserves_probability() {
        let a = two_peak(12, 12.0, 0.9893, 13.003355);
        let b = two_peak(35, 34.968853, 0.7578, 36.965903);
        let out = convolve(&a, &b);
        assert_close!(
            out.total_abundance(),
            a.total_abundance() * b.total_abundance(),
            1e-12
        );
    }

    #[test]
    fn masses_add_and_probabilities_multiply() {
        let a = two_peak(12, 12.0, 0.9893, 13.003355);
        let b = two_peak(35, 34.968853, 0.7578, 36.965903);
        let out = convolve(&a, &b);
        assert_eq!(out.min_nominal, 47);
        assert_eq!(out.bins.len(), 3);
        assert_close!(out.bins[0].abundance, 0.9893 * 0.7578, 1e-12);
        assert_close!(out.bins[0].mean_mass(), 12.0 + 34.968853, 1e-9);
        // The middle bin mixes two combinations
        assert_close!(
            out.bins[1].abundance,
            0.9893 * 0.2422 + 0.0107 * 0.7578,
            1e-12
        );
    }

    #[test]
    fn identity_with_a_certain_distribution() {
        let a = two_peak(12, 12.0, 0.9893, 13.003355);
        let certain = Distribution::certain(4, 4.028);
        let out = convolve(&a, &certain);
        assert_eq!(out.min_nominal, 16);
        assert_eq!(out.bins.len(), 2);
        assert_close!(out.bins[0].mean_mass(), 12.0 + 4.028, 1e-9);
        assert_close!(out.bins[0].abundance, 0.9893, 1e-12);
    }

    #[test]
    fn empty_distributions_are_identities() {
        let a = two_peak(12, 12.0, 0.9893, 13.003355);
        let out = convolve(&a, &Distribution::default());
        assert_eq!(out, a);
    }
}
