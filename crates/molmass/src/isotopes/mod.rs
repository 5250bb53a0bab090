//! Whole-molecule isotopic-abundance spectra
//!
//! Built in three steps: per-element stars-and-bars enumeration of isotope
//! combinations ([`combinatorics`]), convolution of the per-element
//! distributions into one molecular distribution ([`convolution`]), and
//! normalization / m/z conversion here.

mod combinatorics;
mod convolution;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use miette::Diagnostic;
use thiserror::Error;

use crate::{
    AtomicDatabase, ElementComposition, MolmassError, Result, atoms::mz::convolute_mz,
};
use combinatorics::Distribution;

/// Cooperative cancellation for long-running pattern calculations — clone it,
/// hand one copy to the calculator, and call [`AbortSignal::abort`] from
/// anywhere
#[derive(Clone, Debug, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tunables for the isotope engine. The defaults match the resource guard
/// and precision the algorithms were designed around; loosen them knowingly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IsotopeOptions {
    /// Hard cap on predicted combinations per element
    pub max_combinations: u64,
    /// Per-element bins under this fractional abundance are dropped
    pub min_abundance: f64,
    /// Below this abundance the enumeration switches from the log-domain
    /// rigorous method to the exact multiplicative-ratio method
    pub ratio_method_cutoff: f64,
    /// The base peak's abundance after normalization
    pub normalize_to: f64,
}

impl Default for IsotopeOptions {
    fn default() -> Self {
        Self {
            max_combinations: 10_000_000,
            min_abundance: 1e-6,
            ratio_method_cutoff: 1e-5,
            normalize_to: 100.0,
        }
    }
}

/// One line of a computed spectrum
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Peak {
    pub mass: f64,
    pub abundance: f64,
}

/// A whole-molecule isotopic-abundance spectrum, peaks in ascending mass
/// order and abundances normalized so the base peak reads `normalize_to`
#[derive(Clone, Debug, PartialEq)]
pub struct ConvolvedSpectrum {
    peaks: Vec<Peak>,
    combinations: u64,
}

impl ConvolvedSpectrum {
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// The most abundant peak
    pub fn base_peak(&self) -> Option<&Peak> {
        self.peaks
            .iter()
            .max_by(|a, b| a.abundance.total_cmp(&b.abundance))
    }

    /// Combination rows the enumeration constructed, summed over elements
    pub fn combinations(&self) -> u64 {
        self.combinations
    }

    /// The same spectrum with every mass converted to m/z at `charge`
    pub fn to_mz(&self, charge: i32, carrier_mass: f64) -> Self {
        let peaks = self
            .peaks
            .iter()
            .map(|peak| Peak {
                mass: convolute_mz(peak.mass, 0, charge, carrier_mass),
                abundance: peak.abundance,
            })
            .collect();
        Self {
            peaks,
            combinations: self.combinations,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error, Diagnostic)]
pub enum IsotopeError {
    #[error(
        "distributing {atom_count} {symbol} atoms would take {predicted} isotope combinations (limit {limit})"
    )]
    #[diagnostic(help("this is a hard resource guard against combinatorial explosion"))]
    TooManyCombinations {
        symbol: String,
        atom_count: u64,
        predicted: u64,
        limit: u64,
    },

    #[error("the isotopic-pattern calculation was aborted")]
    Aborted,

    #[error("{symbol} has a fractional atom count of {count}")]
    #[diagnostic(help(
        "only whole atoms can be distributed across isotopes; represent fractional masses with explicit ^ isotopes instead"
    ))]
    FractionalAtomCount { symbol: String, count: f64 },
}

impl IsotopeError {
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::TooManyCombinations { .. } => 50,
            Self::Aborted => 51,
            Self::FractionalAtomCount { .. } => 52,
        }
    }
}

/// Computes isotopic-abundance spectra for compositions or formula text
pub struct IsotopePatternCalculator<'a> {
    db: &'a AtomicDatabase,
    options: IsotopeOptions,
    abort: Option<AbortSignal>,
    progress: Option<Box<dyn Fn(f64) + 'a>>,
}

impl<'a> IsotopePatternCalculator<'a> {
    pub fn new(db: &'a AtomicDatabase) -> Self {
        Self {
            db,
            options: IsotopeOptions::default(),
            abort: None,
            progress: None,
        }
    }

    pub fn with_options(mut self, options: IsotopeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_abort(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    /// Register a callback receiving completion fractions in `0.0..=1.0`
    pub fn on_progress(mut self, callback: impl Fn(f64) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Parse `formula` and compute its spectrum
    pub fn pattern(&self, formula: &str) -> Result<ConvolvedSpectrum> {
        let parsed = self.db.parse_formula(formula)?;
        self.spectrum(parsed.composition())
            .map_err(|e| Box::new(MolmassError::from(e)))
    }

    /// Compute the spectrum of an already-resolved composition
    pub fn spectrum(&self, composition: &ElementComposition) -> Result<ConvolvedSpectrum, IsotopeError> {
        let distributions = self.element_distributions(composition)?;
        let combinations = distributions.iter().map(|d| d.combinations).sum();

        // Enumeration reported the first half of the progress range, so the
        // convolution passes walk the second half up to exactly 1.0
        let total_steps = distributions.len().max(1) as f64;
        let mut convolved = Distribution::default();
        for (step, element) in distributions.iter().enumerate() {
            self.check_abort()?;
            convolved = convolution::convolve(&convolved, &element.distribution);
            self.report_progress(0.5 + (step + 1) as f64 / total_steps * 0.5);
        }

        Ok(self.normalize(convolved, combinations))
    }

    fn element_distributions(
        &self,
        composition: &ElementComposition,
    ) -> Result<Vec<ElementDistribution>, IsotopeError> {
        let element_count = composition.iter().count().max(1) as f64;
        let mut distributions = Vec::new();
        for (handled, (id, tally)) in composition.iter().enumerate() {
            self.check_abort()?;
            let element = self.db.element(id);

            // Atoms pinned to an explicit isotope leave the plain count and
            // enter as single-peak distributions of abundance 1
            let explicit = tally.explicit_count();
            let plain = tally.count - explicit;
            let atom_count = whole_atoms(plain, element.symbol(), tally.count)?;

            if atom_count > 0 {
                let predicted = combinatorics::predicted_combinations(
                    atom_count as usize,
                    element.isotopes().len(),
                );
                if predicted > self.options.max_combinations {
                    return Err(IsotopeError::TooManyCombinations {
                        symbol: element.symbol().to_owned(),
                        atom_count,
                        predicted,
                        limit: self.options.max_combinations,
                    });
                }
                // Large enumerations run for a while, so the abort signal is
                // polled and progress reported from inside them too. The
                // enumeration phase covers the first half of the range.
                let mut distribution = combinatorics::element_distribution(
                    element.isotopes(),
                    atom_count,
                    self.options.ratio_method_cutoff,
                    &mut |rows| {
                        self.check_abort()?;
                        let within = rows as f64 / predicted as f64;
                        self.report_progress((handled as f64 + within) / element_count * 0.5);
                        Ok(())
                    },
                )?;
                distribution.trim(self.options.min_abundance);
                distributions.push(ElementDistribution {
                    distribution,
                    combinations: predicted,
                });
            }

            for isotope in &tally.explicit_isotopes {
                let count = whole_atoms(isotope.count, element.symbol(), isotope.count)?;
                if count == 0 {
                    continue;
                }
                let nominal = isotope.mass.round() as i64 * count as i64;
                let mass = isotope.mass * count as f64;
                distributions.push(ElementDistribution {
                    distribution: Distribution::certain(nominal, mass),
                    combinations: 1,
                });
            }
        }
        Ok(distributions)
    }

    fn normalize(&self, mut distribution: Distribution, combinations: u64) -> ConvolvedSpectrum {
        let base = distribution
            .bins
            .iter()
            .map(|bin| bin.abundance)
            .fold(0.0, f64::max);
        let scale = if base > 0.0 {
            // Convolution regrows tails the per-element trims already cut, so
            // the floor is re-applied relative to the base peak before the
            // bins become reported peaks
            distribution.trim(self.options.min_abundance * base);
            self.options.normalize_to / base
        } else {
            0.0
        };

        let peaks = distribution
            .bins
            .iter()
            .filter(|bin| bin.abundance > 0.0)
            .map(|bin| Peak {
                mass: bin.mean_mass(),
                abundance: bin.abundance * scale,
            })
            .collect();
        ConvolvedSpectrum {
            peaks,
            combinations,
        }
    }

    fn check_abort(&self) -> Result<(), IsotopeError> {
        if self.abort.as_ref().is_some_and(AbortSignal::is_aborted) {
            Err(IsotopeError::Aborted)
        } else {
            Ok(())
        }
    }

    fn report_progress(&self, fraction: f64) {
        if let Some(progress) = &self.progress {
            progress(fraction.clamp(0.0, 1.0));
        }
    }
}

/// A whole-number atom count, or the fractional-count error
fn whole_atoms(count: f64, symbol: &str, reported: f64) -> Result<u64, IsotopeError> {
    let rounded = count.round();
    if (count - rounded).abs() > 1e-9 || rounded < 0.0 {
        return Err(IsotopeError::FractionalAtomCount {
            symbol: symbol.to_owned(),
            count: reported,
        });
    }
    Ok(rounded as u64)
}

struct ElementDistribution {
    distribution: Distribution,
    combinations: u64,
}
