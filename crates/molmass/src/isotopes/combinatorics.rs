//! Stars-and-bars enumeration of isotope-count combinations and their
//! multinomial abundances
//!
//! For `n` atoms of an element with `k` isotopes, every way to distribute the
//! atoms across the isotope bins is visited exactly once. Each combination's
//! abundance is the multinomial `n!/(Π nᵢ!) · Π pᵢ^nᵢ`, evaluated in the log
//! domain while contributions are large and by a multiplicative ratio from
//! the previous combination once they fall under a cutoff — the ratio path
//! skips most of the log-table lookups for the long tail of tiny terms and
//! is exact, not an approximation.

use crate::Isotope;

/// One nominal-mass bin of a per-element (or convolved) distribution
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Bin {
    pub abundance: f64,
    /// Abundance-weighted sum of exact masses — divide by `abundance` for
    /// the bin's mean mass (the mass-defect-corrected peak position)
    pub weighted_mass: f64,
}

impl Bin {
    pub fn mean_mass(self) -> f64 {
        if self.abundance > 0.0 {
            self.weighted_mass / self.abundance
        } else {
            0.0
        }
    }
}

/// Abundance per nominal-mass bin, starting at `min_nominal`
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Distribution {
    pub min_nominal: i64,
    pub bins: Vec<Bin>,
}

impl Distribution {
    /// A single certain peak — how explicitly specified isotopes enter the
    /// convolution machinery
    pub fn certain(nominal: i64, mass: f64) -> Self {
        Self {
            min_nominal: nominal,
            bins: vec![Bin {
                abundance: 1.0,
                weighted_mass: mass,
            }],
        }
    }

    pub fn total_abundance(&self) -> f64 {
        self.bins.iter().map(|bin| bin.abundance).sum()
    }

    /// Strip leading and trailing bins under `min_abundance`. Interior bins
    /// are never touched — dropping them would lose probability mass from
    /// the middle of the distribution.
    pub fn trim(&mut self, min_abundance: f64) {
        let leading = self
            .bins
            .iter()
            .take_while(|bin| bin.abundance < min_abundance)
            .count();
        if leading == self.bins.len() {
            self.bins.clear();
            return;
        }
        let trailing = self
            .bins
            .iter()
            .rev()
            .take_while(|bin| bin.abundance < min_abundance)
            .count();
        self.bins.drain(..leading);
        self.bins.truncate(self.bins.len() - trailing);
        self.min_nominal += leading as i64;
    }
}

/// Closed-form count of the combination rows the enumeration constructs for
/// `atom_count` atoms over `isotope_count` isotopes, including the rows for
/// every intermediate atom count — `C(n + k, k)`, computed with the iterative
/// running-sum recurrence (saturating, so an overflow still trips the cap)
pub(crate) fn predicted_combinations(atom_count: usize, isotope_count: usize) -> u64 {
    let mut totals = vec![1u64; atom_count + 1];
    for _ in 0..isotope_count {
        let mut running = 0u64;
        for total in &mut totals {
            running = running.saturating_add(*total);
            *total = running;
        }
    }
    totals[atom_count]
}

/// How many combination rows are visited between two `checkpoint` calls
const CHECKPOINT_STRIDE: u64 = 4096;

/// Build the isotopic distribution of `atom_count` atoms of one element.
/// `checkpoint` runs every [`CHECKPOINT_STRIDE`] rows with the number of
/// rows visited so far — returning an error from it stops the enumeration.
pub(crate) fn element_distribution(
    isotopes: &[Isotope],
    atom_count: u64,
    cutoff: f64,
    checkpoint: &mut dyn FnMut(u64) -> Result<(), super::IsotopeError>,
) -> Result<Distribution, super::IsotopeError> {
    let k = isotopes.len();
    if k == 0 {
        return Ok(Distribution::default());
    }
    let min_nominal: i64 = isotopes
        .iter()
        .map(Isotope::nominal_mass)
        .min()
        .unwrap_or(0)
        * atom_count as i64;
    let max_nominal: i64 = isotopes
        .iter()
        .map(Isotope::nominal_mass)
        .max()
        .unwrap_or(0)
        * atom_count as i64;

    let mut distribution = Distribution {
        min_nominal,
        bins: vec![Bin::default(); (max_nominal - min_nominal + 1) as usize],
    };

    let math = AbundanceMath::new(isotopes, atom_count);
    let mut previous: Option<(Vec<u64>, f64)> = None;
    let mut rows = 0u64;
    let mut bins = vec![0u64; k];
    enumerate(&mut bins, 1, atom_count, &mut |combination| {
        rows += 1;
        if rows % CHECKPOINT_STRIDE == 0 {
            checkpoint(rows)?;
        }
        // An abundance that underflowed to zero would pin the ratio path at
        // zero for the rest of the enumeration, so it falls back to the
        // rigorous method until a representable abundance reappears
        let abundance = match &previous {
            Some((prev, prev_abundance)) if *prev_abundance > 0.0 && *prev_abundance < cutoff => {
                math.ratio(prev, *prev_abundance, combination)
            }
            _ => math.rigorous(combination),
        };
        previous = Some((combination.to_vec(), abundance));

        let nominal: i64 = combination
            .iter()
            .zip(isotopes)
            .map(|(&count, isotope)| count as i64 * isotope.nominal_mass())
            .sum();
        let exact: f64 = combination
            .iter()
            .zip(isotopes)
            .map(|(&count, isotope)| count as f64 * isotope.mass)
            .sum();
        let bin = &mut distribution.bins[(nominal - min_nominal) as usize];
        bin.abundance += abundance;
        bin.weighted_mass += abundance * exact;
        Ok(())
    })?;

    Ok(distribution)
}

/// Visit every distribution of the remaining atoms over bins `from..`, with
/// bin 0 absorbing whatever is left
fn enumerate(
    bins: &mut Vec<u64>,
    from: usize,
    remaining: u64,
    visit: &mut impl FnMut(&[u64]) -> Result<(), super::IsotopeError>,
) -> Result<(), super::IsotopeError> {
    if from == bins.len() {
        bins[0] = remaining;
        return visit(bins);
    }
    for count in 0..=remaining {
        bins[from] = count;
        enumerate(bins, from + 1, remaining - count, visit)?;
    }
    Ok(())
}

/// The multinomial abundance of a combination, in both evaluation styles
struct AbundanceMath {
    log_factorials: Vec<f64>,
    log_abundances: Vec<f64>,
    atom_count: u64,
}

impl AbundanceMath {
    fn new(isotopes: &[Isotope], atom_count: u64) -> Self {
        let mut log_factorials = vec![0.0; atom_count as usize + 1];
        for i in 1..log_factorials.len() {
            log_factorials[i] = log_factorials[i - 1] + (i as f64).ln();
        }
        let log_abundances = isotopes.iter().map(|i| i.abundance.ln()).collect();
        Self {
            log_factorials,
            log_abundances,
            atom_count,
        }
    }

    /// `exp(log n! − Σ log nᵢ! + Σ nᵢ log pᵢ)`
    fn rigorous(&self, combination: &[u64]) -> f64 {
        let log_abundance = self.log_factorials[self.atom_count as usize]
            - combination
                .iter()
                .map(|&count| self.log_factorials[count as usize])
                .sum::<f64>()
            + combination
                .iter()
                .zip(&self.log_abundances)
                .map(|(&count, &log_p)| count as f64 * log_p)
                .sum::<f64>();
        log_abundance.exp()
    }

    /// Derive a combination's abundance from the previous one, touching only
    /// the bins whose counts changed
    fn ratio(&self, previous: &[u64], previous_abundance: f64, combination: &[u64]) -> f64 {
        let log_ratio: f64 = previous
            .iter()
            .zip(combination)
            .zip(&self.log_abundances)
            .filter(|((prev, next), _)| prev != next)
            .map(|((&prev, &next), &log_p)| {
                self.log_factorials[prev as usize] - self.log_factorials[next as usize]
                    + (next as f64 - prev as f64) * log_p
            })
            .sum();
        previous_abundance * log_ratio.exp()
    }
}
