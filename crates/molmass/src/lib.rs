//! An interpreter for chemical-formula notation: elements, parenthetical
//! groups, bracketed multipliers, explicit isotopes, named abbreviations, and
//! formula subtraction — resolved into elemental compositions, masses with
//! propagated uncertainty, and whole-molecule isotopic-abundance spectra.

pub mod atoms;
pub mod errors;
pub mod isotopes;
pub mod parsers;
#[cfg(test)]
mod testing_tools;

use std::num::NonZeroU8;

use derive_more::{Add, AddAssign, Display, From, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

pub use atoms::atomic_database::AtomicDatabase;
pub use atoms::mz::{PROTON_MASS, convolute_mz};
pub use atoms::symbol_table::{RecognitionMode, SymbolEntry, SymbolKind, SymbolTable};
pub use errors::{AbbreviationError, MolmassError, Result};
pub use isotopes::{
    AbortSignal, ConvolvedSpectrum, IsotopeError, IsotopeOptions, IsotopePatternCalculator, Peak,
};
pub use parsers::errors::{FormulaError, FormulaErrorKind};
pub use parsers::{ParseOptions, ParsedFormula};

/// Number of elements in the periodic table carried by this crate (H through Lr)
pub const ELEMENT_COUNT: usize = 103;

// NOTE: `'a` lifetimes throughout this crate indicate references into an `AtomicDatabase`

/// An atomic number in the validated `1..=103` range, used to index every
/// per-element table in this crate (always zero-based via [`ElementId::index`])
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct ElementId(NonZeroU8);

/// A mass in unified atomic mass units (Da)
#[derive(
    Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display, Serialize, Deserialize, Add,
    AddAssign, Sub, SubAssign, Sum, Neg, From,
)]
pub struct Mass(f64);

/// A net electronic charge — fractional values arise from fractional atom counts
#[derive(
    Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display, Serialize, Deserialize, Add,
    AddAssign, Sub, SubAssign, Sum, Neg, From,
)]
pub struct Charge(f64);

/// One isotope of an element: its exact mass and natural fractional abundance
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Isotope {
    pub mass: f64,
    pub abundance: f64,
}

/// A single element of the periodic table, as configured in an [`AtomicDatabase`]
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ElementDefinition {
    pub(crate) symbol: &'static str,
    pub(crate) name: &'static str,
    pub(crate) mass: f64,
    pub(crate) uncertainty: f64,
    pub(crate) charge: f64,
    pub(crate) isotopes: Vec<Isotope>,
}

/// A named shorthand that expands to an elemental formula — possibly
/// referencing other abbreviations, but never itself transitively
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AbbreviationDefinition {
    pub(crate) symbol: String,
    pub(crate) formula: String,
    pub(crate) charge: f64,
    pub(crate) is_amino_acid: bool,
    pub(crate) one_letter: Option<char>,
    pub(crate) valid: bool,
}

/// The tally a parse accumulates for one element
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ElementTally {
    /// Total atom count — fractional counts (e.g. `H5.5`) are legal
    pub count: f64,
    /// Mass delta contributed by explicitly specified isotopes
    pub isotopic_correction: f64,
    /// Atoms whose isotope was pinned with the `^` notation
    pub explicit_isotopes: Vec<ExplicitIsotope>,
}

/// An explicitly specified isotope (`^13C6` → mass 13, count 6)
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ExplicitIsotope {
    pub mass: f64,
    pub count: f64,
}

/// Per-element atom tallies for a parsed formula, indexed by [`ElementId`]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ElementComposition {
    pub(crate) tallies: Vec<ElementTally>,
}

// =====================================================================================================================

pub trait Massive {
    fn average_mass(&self) -> Mass;
}

pub trait Charged {
    fn charge(&self) -> Charge;
}

// Blanket impls

macro_rules! massive_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Massive> Massive for $ref_type {
                fn average_mass(&self) -> Mass {
                    (**self).average_mass()
                }
            }
        )+
    };
}

massive_ref_impls!(&T, &mut T, Box<T>);

macro_rules! charged_ref_impls {
    ($($ref_type:ty),+ $(,)?) => {
        $(
            impl<T: Charged> Charged for $ref_type {
                fn charge(&self) -> Charge {
                    (**self).charge()
                }
            }
        )+
    };
}

charged_ref_impls!(&T, &mut T, Box<T>);

impl ElementId {
    /// Atomic numbers run from 1 (hydrogen) to 103 (lawrencium)
    pub const fn new(atomic_number: u8) -> Option<Self> {
        if atomic_number as usize > ELEMENT_COUNT {
            return None;
        }
        match NonZeroU8::new(atomic_number) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    pub const fn atomic_number(self) -> u8 {
        self.0.get()
    }

    /// Zero-based index into any per-element table
    pub const fn index(self) -> usize {
        self.0.get() as usize - 1
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        debug_assert!(index < ELEMENT_COUNT);
        // Indices are always derived from an existing `ElementId`
        match NonZeroU8::new(index as u8 + 1) {
            Some(n) => Self(n),
            None => unreachable!(),
        }
    }
}

impl Mass {
    pub const fn new(daltons: f64) -> Self {
        Self(daltons)
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Charge {
    pub const fn new(charge: f64) -> Self {
        Self(charge)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}
