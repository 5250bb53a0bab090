use std::sync::LazyLock;

use divan::{AllocProfiler, black_box};
use molmass::{
    AtomicDatabase, IsotopePatternCalculator, Massive, ParseOptions, ParsedFormula,
};

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

const FORMULAS: [&str; 5] = [
    "H2O",
    "C6H12O6",
    "(NH4)2SO4",
    "CuSO4-5H2O",
    "^13C6H12O6",
];

static DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

static PARSED: LazyLock<Vec<ParsedFormula>> = LazyLock::new(|| {
    FORMULAS
        .into_iter()
        .map(|formula| DB.parse_formula(formula).unwrap())
        .collect()
});

fn main() {
    LazyLock::force(&DB);
    LazyLock::force(&PARSED);
    divan::main();
}

mod atoms {
    use super::*;

    #[divan::bench]
    fn build_atomic_database() -> AtomicDatabase {
        AtomicDatabase::default()
    }

    #[divan::bench]
    fn parse_formulas() {
        for formula in FORMULAS.into_iter() {
            black_box(DB.parse_formula(formula).unwrap());
        }
    }

    #[divan::bench]
    fn parse_with_expansion() {
        let options = ParseOptions {
            expand_abbreviations: true,
            ..ParseOptions::default()
        };
        black_box(DB.parse_formula_with("PhMe2SiOTfa", &options).unwrap());
    }

    #[divan::bench]
    fn calculate_average_masses() {
        for parsed in PARSED.iter() {
            black_box(parsed.average_mass());
        }
    }
}

mod isotopes {
    use super::*;

    #[divan::bench]
    fn small_molecule_spectra() {
        let calculator = IsotopePatternCalculator::new(&DB);
        for parsed in PARSED.iter() {
            black_box(calculator.spectrum(parsed.composition()).unwrap());
        }
    }

    #[divan::bench]
    fn peptide_sized_spectrum() -> usize {
        let parsed = DB.parse_formula("C50H80N14O14S2").unwrap();
        let calculator = IsotopePatternCalculator::new(&DB);
        calculator.spectrum(parsed.composition()).unwrap().peaks().len()
    }
}
