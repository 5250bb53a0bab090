use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{AbbreviationDefinition, ElementDefinition, ElementId};

/// Which entries of the abbreviation table participate in symbol matching
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub enum RecognitionMode {
    /// Elements only
    None,
    /// Elements plus the normal (non-amino-acid) abbreviations
    #[default]
    Normal,
    /// Elements plus all abbreviations, amino acids included
    NormalPlusAminoAcids,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub enum SymbolKind {
    Element(ElementId),
    /// Index into the database's abbreviation table
    Abbreviation(usize),
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct SymbolEntry {
    symbol: String,
    kind: SymbolKind,
}

impl SymbolEntry {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub const fn kind(&self) -> SymbolKind {
        self.kind
    }
}

/// Every matchable symbol, sorted by `(−length, symbol)` so that a linear
/// prefix scan implements greedy longest-match without backtracking
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub(crate) fn build(
        elements: &[ElementDefinition],
        abbreviations: &[AbbreviationDefinition],
        mode: RecognitionMode,
    ) -> Self {
        let element_entries = elements.iter().enumerate().map(|(index, element)| SymbolEntry {
            symbol: element.symbol().to_owned(),
            kind: SymbolKind::Element(ElementId::from_index(index)),
        });

        let abbreviation_entries = abbreviations
            .iter()
            .enumerate()
            .filter(|(_, abbreviation)| match mode {
                RecognitionMode::None => false,
                RecognitionMode::Normal => !abbreviation.is_amino_acid(),
                RecognitionMode::NormalPlusAminoAcids => true,
            })
            .map(|(index, abbreviation)| SymbolEntry {
                symbol: abbreviation.symbol().to_owned(),
                kind: SymbolKind::Abbreviation(index),
            });

        let entries = element_entries
            .chain(abbreviation_entries)
            .sorted_by(|a, b| {
                b.symbol
                    .len()
                    .cmp(&a.symbol.len())
                    .then_with(|| a.symbol.cmp(&b.symbol))
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Greedy longest match of `excerpt` against the table. With `fix_case`,
    /// the first letter is compared case-insensitively (so `na` and `fe`
    /// resolve to Na and Fe) while the remaining letters stay case-exact
    /// (so `CO` stays carbon monoxide rather than becoming cobalt, but an
    /// all-lowercase `co` does read as cobalt thanks to longest-match).
    pub fn match_prefix(&self, excerpt: &str, fix_case: bool) -> Option<&SymbolEntry> {
        self.entries
            .iter()
            .find(|entry| symbol_matches(&entry.symbol, excerpt, fix_case))
    }
}

fn symbol_matches(symbol: &str, excerpt: &str, fix_case: bool) -> bool {
    let (symbol, excerpt) = (symbol.as_bytes(), excerpt.as_bytes());
    if excerpt.len() < symbol.len() {
        return false;
    }
    symbol.iter().zip(excerpt).enumerate().all(|(i, (s, e))| {
        if i == 0 && fix_case {
            s.eq_ignore_ascii_case(e)
        } else {
            s == e
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::AtomicDatabase;

    static DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

    fn table(mode: RecognitionMode) -> SymbolTable {
        SymbolTable::build(DB.elements(), DB.abbreviations(), mode)
    }

    #[test]
    fn longest_symbols_first() {
        let table = table(RecognitionMode::Normal);
        let lengths: Vec<_> = table.entries().iter().map(|e| e.symbol().len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn greedy_longest_match() {
        let table = table(RecognitionMode::Normal);
        // "He" must beat "H"
        let entry = table.match_prefix("He2", false).unwrap();
        assert_eq!(entry.symbol(), "He");
        // A lone "H" still matches
        let entry = table.match_prefix("H2O", false).unwrap();
        assert_eq!(entry.symbol(), "H");
        // Abbreviations compete with elements: "Ph" beats "P"
        let entry = table.match_prefix("PhCl", false).unwrap();
        assert_eq!(entry.symbol(), "Ph");
        // Unknown symbols don't match
        assert!(table.match_prefix("~", false).is_none());
        assert!(table.match_prefix("zz", false).is_none());
    }

    #[test]
    fn case_fixing_is_first_letter_only() {
        let table = table(RecognitionMode::None);
        // Lowercase first letters are forgiven
        assert_eq!(table.match_prefix("na", true).unwrap().symbol(), "Na");
        assert_eq!(table.match_prefix("fe2", true).unwrap().symbol(), "Fe");
        // But an uppercase second letter never turns CO into cobalt
        assert_eq!(table.match_prefix("CO", true).unwrap().symbol(), "C");
        assert_eq!(table.match_prefix("Co", true).unwrap().symbol(), "Co");
        // A lowercase second letter is exact, so all-lowercase co is cobalt
        assert_eq!(table.match_prefix("co", true).unwrap().symbol(), "Co");
        // Without case fixing, lowercase matches nothing
        assert!(table.match_prefix("na", false).is_none());
    }

    #[test]
    fn recognition_modes_gate_abbreviations() {
        // With abbreviations off, the scan falls through to the element "P"
        let table_none = table(RecognitionMode::None);
        let entry = table_none.match_prefix("Ph", false).unwrap();
        assert_eq!(entry.symbol(), "P");
        let table_normal = table(RecognitionMode::Normal);
        let entry = table_normal.match_prefix("Ph", false).unwrap();
        assert_eq!(entry.symbol(), "Ph");
        // Amino acids only match in the extended mode
        assert!(table(RecognitionMode::Normal).match_prefix("Gly", false).is_none());
        assert!(
            table(RecognitionMode::NormalPlusAminoAcids)
                .match_prefix("Gly", false)
                .is_some()
        );
    }
}
