use crate::{
    AbbreviationDefinition, ElementDefinition, ElementId, RecognitionMode, Result, SymbolTable,
    atoms::{mz::PROTON_MASS, periodic_table, symbol_table::SymbolEntry},
    errors::AbbreviationError,
    parsers::{ParseOptions, ParsedFormula, errors::FormulaError},
};

/// Hard cap on the abbreviation table — parse cost is linear in it
pub const MAX_ABBREVIATIONS: usize = 500;

/// The maximum length of an abbreviation symbol, in ASCII letters
pub const MAX_ABBREVIATION_LENGTH: usize = 6;

/// Elements, abbreviations, and the symbol table compiled from them.
///
/// All parsing and mass calculation goes through a database; constructing one
/// is cheap, so short-lived ones are fine, but mutating methods recompile the
/// symbol table and revalidate every abbreviation, so batch edits where
/// possible.
#[derive(Clone, Debug)]
pub struct AtomicDatabase {
    elements: Vec<ElementDefinition>,
    abbreviations: Vec<AbbreviationDefinition>,
    recognition_mode: RecognitionMode,
    charge_carrier_mass: f64,
    symbol_table: SymbolTable,
}

impl Default for AtomicDatabase {
    fn default() -> Self {
        let elements = periodic_table::ELEMENTS
            .iter()
            .map(ElementDefinition::from_record)
            .collect();
        let abbreviations = DEFAULT_ABBREVIATIONS
            .iter()
            .map(|&(symbol, formula, charge, one_letter)| AbbreviationDefinition {
                symbol: symbol.to_owned(),
                formula: formula.to_owned(),
                charge,
                is_amino_acid: one_letter.is_some(),
                one_letter,
                valid: true,
            })
            .collect();
        let mut db = Self {
            elements,
            abbreviations,
            recognition_mode: RecognitionMode::default(),
            charge_carrier_mass: PROTON_MASS,
            symbol_table: SymbolTable::default(),
        };
        db.rebuild();
        db
    }
}

// Public API ==========================================================================================================

impl AtomicDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a formula with the default options
    pub fn parse_formula(&self, formula: &str) -> Result<ParsedFormula> {
        self.parse_formula_with(formula, &ParseOptions::default())
    }

    pub fn parse_formula_with(&self, formula: &str, options: &ParseOptions) -> Result<ParsedFormula> {
        crate::parsers::parse(self, formula, options)
            .map_err(|e| Box::new(e.into()))
    }

    pub fn elements(&self) -> &[ElementDefinition] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> &ElementDefinition {
        &self.elements[id.index()]
    }

    /// Exact (case-sensitive) element symbol lookup
    pub fn find_element(&self, symbol: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.symbol() == symbol)
            .map(ElementId::from_index)
    }

    /// Longest recognized symbol at the start of `excerpt`, if any
    pub fn find_symbol(&self, excerpt: &str, fix_case: bool) -> Option<&SymbolEntry> {
        self.symbol_table.match_prefix(excerpt, fix_case)
    }

    pub fn abbreviations(&self) -> &[AbbreviationDefinition] {
        &self.abbreviations
    }

    pub(crate) fn abbreviation(&self, index: usize) -> &AbbreviationDefinition {
        &self.abbreviations[index]
    }

    /// Case-insensitive abbreviation symbol lookup
    pub fn find_abbreviation(&self, symbol: &str) -> Option<usize> {
        self.abbreviations
            .iter()
            .position(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn recognition_mode(&self) -> RecognitionMode {
        self.recognition_mode
    }

    pub fn set_recognition_mode(&mut self, mode: RecognitionMode) {
        if self.recognition_mode != mode {
            self.recognition_mode = mode;
            self.rebuild();
        }
    }

    /// Mass of the ion used when converting between charge states
    pub fn charge_carrier_mass(&self) -> f64 {
        self.charge_carrier_mass
    }

    /// A non-positive mass resets the carrier to the proton mass
    pub fn set_charge_carrier_mass(&mut self, mass: f64) {
        self.charge_carrier_mass = if mass > 0.0 { mass } else { PROTON_MASS };
    }

    pub(crate) fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    /// Override an element's average mass and uncertainty
    pub fn set_element_mass(&mut self, id: ElementId, mass: f64, uncertainty: f64) {
        self.elements[id.index()].set_mass(mass, uncertainty);
        self.revalidate_abbreviations();
    }

    pub fn set_element_charge(&mut self, id: ElementId, charge: f64) {
        self.elements[id.index()].set_charge(charge);
    }

    /// Add a new abbreviation, or redefine the existing one with the same
    /// symbol (case-insensitively). Returns its index in the table.
    pub fn set_abbreviation(
        &mut self,
        symbol: &str,
        formula: &str,
        charge: f64,
        one_letter: Option<char>,
    ) -> Result<usize, AbbreviationError> {
        let symbol = canonical_symbol(symbol)?;
        if self.find_element(&symbol).is_some() {
            return Err(AbbreviationError::DuplicateSymbol(
                symbol,
                "an element".to_owned(),
            ));
        }
        let definition = AbbreviationDefinition {
            symbol: symbol.clone(),
            formula: formula.to_owned(),
            charge,
            is_amino_acid: one_letter.is_some(),
            one_letter,
            valid: true,
        };
        let index = match self.find_abbreviation(&symbol) {
            Some(index) => {
                self.abbreviations[index] = definition;
                index
            }
            None => {
                if self.abbreviations.len() >= MAX_ABBREVIATIONS {
                    return Err(AbbreviationError::TableFull(MAX_ABBREVIATIONS));
                }
                self.abbreviations.push(definition);
                self.abbreviations.len() - 1
            }
        };
        self.rebuild();
        Ok(index)
    }

    pub fn remove_abbreviation(&mut self, symbol: &str) -> bool {
        match self.find_abbreviation(symbol) {
            Some(index) => {
                self.abbreviations.remove(index);
                self.rebuild();
                true
            }
            None => false,
        }
    }

    /// Drop every abbreviation and restore the built-in set
    pub fn reset_abbreviations(&mut self) {
        *self = Self {
            elements: std::mem::take(&mut self.elements),
            recognition_mode: self.recognition_mode,
            charge_carrier_mass: self.charge_carrier_mass,
            ..Self::default()
        };
        self.rebuild();
    }
}

// Private =============================================================================================================

impl AtomicDatabase {
    /// Recompile the symbol table, then revalidate every abbreviation
    fn rebuild(&mut self) {
        self.symbol_table =
            SymbolTable::build(&self.elements, &self.abbreviations, self.recognition_mode);
        self.revalidate_abbreviations();
    }

    /// Reparse every abbreviation formula and flag the ones that fail.
    /// Iterated to a fixpoint so that an abbreviation referencing a newly
    /// invalid one is itself invalidated.
    fn revalidate_abbreviations(&mut self) {
        // Validation ignores the recognition mode so that definitions can
        // reference amino acids even when parsing has them switched off
        let options = ParseOptions {
            convert_case_up: false,
            ..ParseOptions::default()
        };
        let validation_table = SymbolTable::build(
            &self.elements,
            &self.abbreviations,
            RecognitionMode::NormalPlusAminoAcids,
        );
        let parse_table = std::mem::replace(&mut self.symbol_table, validation_table);

        for abbreviation in &mut self.abbreviations {
            abbreviation.valid = true;
        }
        for _ in 0..=self.abbreviations.len() {
            let validity: Vec<bool> = {
                let db: &Self = self;
                db.abbreviations
                    .iter()
                    .map(|a| crate::parsers::parse_definition(db, &a.symbol, &a.formula, &options).is_ok())
                    .collect()
            };
            let changed = self
                .abbreviations
                .iter()
                .zip(&validity)
                .any(|(a, &valid)| a.valid != valid);
            for (abbreviation, valid) in self.abbreviations.iter_mut().zip(validity) {
                abbreviation.valid = valid;
            }
            if !changed {
                break;
            }
        }

        self.symbol_table = parse_table;
    }
}

impl AbbreviationDefinition {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn is_amino_acid(&self) -> bool {
        self.is_amino_acid
    }

    pub fn one_letter(&self) -> Option<char> {
        self.one_letter
    }

    /// `false` when the formula failed its last validation parse — the
    /// symbol stays in the table but using it is a parse error
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Span-free parse failure reason, if the definition is invalid
    pub fn validation_error(&self, db: &AtomicDatabase) -> Option<FormulaError> {
        let options = ParseOptions {
            convert_case_up: false,
            ..ParseOptions::default()
        };
        crate::parsers::parse_definition(db, &self.symbol, &self.formula, &options).err()
    }
}

/// Uppercase the first letter, keep the rest verbatim, reject non-letters
fn canonical_symbol(symbol: &str) -> Result<String, AbbreviationError> {
    if symbol.is_empty() || symbol.len() > MAX_ABBREVIATION_LENGTH {
        return Err(AbbreviationError::SymbolTooLong(symbol.to_owned()));
    }
    if !symbol.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(AbbreviationError::SymbolNotLetters(symbol.to_owned()));
    }
    let mut canonical = symbol.to_owned();
    canonical[..1].make_ascii_uppercase();
    Ok(canonical)
}

// Built-in abbreviations ==============================================================================================

/// `(symbol, formula, charge, one-letter amino acid code)`
const DEFAULT_ABBREVIATIONS: &[(&str, &str, f64, Option<char>)] = &[
    ("Bpy", "C10H8N2", 0.0, None),
    ("Bu", "C4H9", 1.0, None),
    ("D", "^2.014H", 1.0, None),
    ("En", "C2H8N2", 0.0, None),
    ("Et", "C2H5", 1.0, None),
    ("Me", "CH3", 1.0, None),
    ("Ms", "CH3SOO", -1.0, None),
    ("Oac", "C2H3O2", -1.0, None),
    ("Otf", "OSO2CF3", -1.0, None),
    ("Ox", "C2O4", -2.0, None),
    ("Ph", "C6H5", 1.0, None),
    ("Phen", "C12H8N2", 0.0, None),
    ("Py", "C5H5N", 0.0, None),
    ("Tfa", "C2F3O2", -1.0, None),
    ("Tms", "C3H9Si", 1.0, None),
    ("Ts", "CH3C6H4SOO", -1.0, None),
    ("Urea", "CH4N2O", 0.0, None),
    // Amino acid residues (peptide-bonded, i.e. minus one water)
    ("Ala", "C3H5NO", 0.0, Some('A')),
    ("Arg", "C6H12N4O", 0.0, Some('R')),
    ("Asn", "C4H6N2O2", 0.0, Some('N')),
    ("Asp", "C4H5NO3", 0.0, Some('D')),
    ("Cys", "C3H5NOS", 0.0, Some('C')),
    ("Gln", "C5H8N2O2", 0.0, Some('Q')),
    ("Glu", "C5H7NO3", 0.0, Some('E')),
    ("Gly", "C2H3NO", 0.0, Some('G')),
    ("His", "C6H7N3O", 0.0, Some('H')),
    ("Ile", "C6H11NO", 0.0, Some('I')),
    ("Leu", "C6H11NO", 0.0, Some('L')),
    ("Lys", "C6H12N2O", 0.0, Some('K')),
    ("Met", "C5H9NOS", 0.0, Some('M')),
    ("Phe", "C9H9NO", 0.0, Some('F')),
    ("Pro", "C5H7NO", 0.0, Some('P')),
    ("Ser", "C3H5NO2", 0.0, Some('S')),
    ("Thr", "C4H7NO2", 0.0, Some('T')),
    ("Trp", "C11H10N2O", 0.0, Some('W')),
    ("Tyr", "C9H9NO2", 0.0, Some('Y')),
    ("Val", "C5H9NO", 0.0, Some('V')),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_database_is_fully_valid() {
        let db = AtomicDatabase::default();
        assert_eq!(db.elements().len(), crate::ELEMENT_COUNT);
        for abbreviation in db.abbreviations() {
            assert!(
                abbreviation.valid(),
                "built-in {:?} failed validation",
                abbreviation.symbol()
            );
        }
    }

    #[test]
    fn element_lookup_is_case_sensitive() {
        let db = AtomicDatabase::default();
        assert_eq!(db.find_element("Na"), ElementId::new(11));
        assert_eq!(db.find_element("na"), None);
        assert_eq!(db.find_element("NA"), None);
    }

    #[test]
    fn abbreviation_lookup_is_case_insensitive() {
        let db = AtomicDatabase::default();
        assert!(db.find_abbreviation("ph").is_some());
        assert!(db.find_abbreviation("PH").is_some());
        assert!(db.find_abbreviation("Bogus").is_none());
    }

    #[test]
    fn redefining_an_abbreviation_keeps_its_slot() {
        let mut db = AtomicDatabase::default();
        let before = db.find_abbreviation("Me").unwrap();
        let after = db.set_abbreviation("Me", "CH3", 0.0, None).unwrap();
        assert_eq!(before, after);
        assert_eq!(db.abbreviation(after).charge(), 0.0);
    }

    #[test]
    fn abbreviation_symbol_must_be_letters() {
        let mut db = AtomicDatabase::default();
        let err = db.set_abbreviation("X9", "H2O", 0.0, None).unwrap_err();
        assert_eq!(err.error_code(), 41);
        let err = db.set_abbreviation("", "H2O", 0.0, None).unwrap_err();
        assert_eq!(err.error_code(), 40);
        let err = db
            .set_abbreviation("Toolong", "H2O", 0.0, None)
            .unwrap_err();
        assert_eq!(err.error_code(), 40);
    }

    #[test]
    fn abbreviation_cannot_shadow_an_element() {
        let mut db = AtomicDatabase::default();
        let err = db.set_abbreviation("Na", "H2O", 0.0, None).unwrap_err();
        assert_eq!(err.error_code(), 42);
    }

    #[test]
    fn invalid_definitions_are_flagged_not_rejected() {
        let mut db = AtomicDatabase::default();
        let index = db.set_abbreviation("Bad", "Qq7", 0.0, None).unwrap();
        assert!(!db.abbreviation(index).valid());
        assert!(db.abbreviation(index).validation_error(&db).is_some());
    }

    #[test]
    fn mutually_recursive_definitions_are_invalidated() {
        let mut db = AtomicDatabase::default();
        db.set_abbreviation("Aaa", "Bbb", 0.0, None).unwrap();
        let a = db.find_abbreviation("Aaa").unwrap();
        // Bbb is undefined at this point
        assert!(!db.abbreviation(a).valid());
        db.set_abbreviation("Bbb", "Aaa", 0.0, None).unwrap();
        let b = db.find_abbreviation("Bbb").unwrap();
        assert!(!db.abbreviation(a).valid());
        assert!(!db.abbreviation(b).valid());
    }

    #[test]
    fn removing_an_abbreviation() {
        let mut db = AtomicDatabase::default();
        assert!(db.remove_abbreviation("Urea"));
        assert!(!db.remove_abbreviation("Urea"));
        assert!(db.find_abbreviation("Urea").is_none());
    }

    #[test]
    fn resetting_restores_the_builtin_set() {
        let mut db = AtomicDatabase::default();
        let builtin_count = db.abbreviations().len();
        db.set_abbreviation("Mine", "H2O", 0.0, None).unwrap();
        db.remove_abbreviation("Urea");
        db.reset_abbreviations();
        assert_eq!(db.abbreviations().len(), builtin_count);
        assert!(db.find_abbreviation("Urea").is_some());
        assert!(db.find_abbreviation("Mine").is_none());
    }

    #[test]
    fn carrier_mass_defaults_and_resets() {
        let mut db = AtomicDatabase::default();
        assert_eq!(db.charge_carrier_mass(), PROTON_MASS);
        db.set_charge_carrier_mass(22.989);
        assert_eq!(db.charge_carrier_mass(), 22.989);
        db.set_charge_carrier_mass(0.0);
        assert_eq!(db.charge_carrier_mass(), PROTON_MASS);
    }
}
