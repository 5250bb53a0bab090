pub mod errors;
mod formula;

pub(crate) use formula::{parse, parse_definition};

use crate::{
    AtomicDatabase, Charge, Charged, ElementComposition, ElementId, Mass, Massive,
    atoms::mass::format_mass_std_dev,
};

/// Knobs controlling how formula text is interpreted
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ParseOptions {
    /// Treat `[` and `]` as ordinary parentheses instead of leading-multiplier
    /// brackets
    pub brackets_as_parentheses: bool,
    /// Replace abbreviations with their definitions in the normalized text
    pub expand_abbreviations: bool,
    /// Forgive a lowercase first letter on element and abbreviation symbols
    pub convert_case_up: bool,
    /// The value substituted for the `x` placeholder in `[x...]` brackets
    pub value_for_x: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            brackets_as_parentheses: false,
            expand_abbreviations: false,
            convert_case_up: true,
            value_for_x: 1.0,
        }
    }
}

/// The result of successfully interpreting a formula: its composition, total
/// average mass, net charge, propagated uncertainty, and normalized text
#[derive(Clone, PartialEq, Debug)]
pub struct ParsedFormula {
    pub(crate) composition: ElementComposition,
    pub(crate) mass: f64,
    pub(crate) charge: f64,
    pub(crate) std_dev: f64,
    pub(crate) formula: String,
}

impl ParsedFormula {
    pub fn composition(&self) -> &ElementComposition {
        &self.composition
    }

    /// The normalized formula text: canonical symbol casing, with
    /// abbreviations expanded when that option was set
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// One standard deviation of the total mass, from the per-element
    /// atomic-mass uncertainties
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// `mass ± stddev`, rounded so the digits shown are the meaningful ones
    pub fn mass_with_std_dev(&self) -> String {
        format_mass_std_dev(self.mass, self.std_dev)
    }

    pub fn percent_composition(&self, db: &AtomicDatabase) -> Vec<(ElementId, f64)> {
        self.composition.percent_composition(db)
    }

    pub fn to_empirical(&self, db: &AtomicDatabase) -> String {
        self.composition.to_empirical(db)
    }
}

impl Massive for ParsedFormula {
    fn average_mass(&self) -> Mass {
        Mass::new(self.mass)
    }
}

impl Charged for ParsedFormula {
    fn charge(&self) -> Charge {
        Charge::new(self.charge)
    }
}
