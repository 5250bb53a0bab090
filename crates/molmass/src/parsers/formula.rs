//! The recursive-descent formula interpreter
//!
//! Parsing walks the source text byte-by-byte, resolving symbols greedily
//! against the database's symbol table and accumulating atom counts scaled by
//! the multiplier chain in force: outer group multipliers arrive through an
//! immutable [`ParseContext`], while dash and bracket coefficients live as
//! frame-local state in each [`FormulaParser::parse_sequence`] call.

use std::ops::Range;

use ahash::HashSet;

use super::{
    ParseOptions, ParsedFormula,
    errors::{FormulaError, FormulaErrorKind},
};
use crate::{AtomicDatabase, ElementComposition, ElementId, ExplicitIsotope, SymbolKind};

pub(crate) fn parse(
    db: &AtomicDatabase,
    formula: &str,
    options: &ParseOptions,
) -> Result<ParsedFormula, FormulaError> {
    parse_with_visited(db, formula, options, HashSet::default())
}

/// Parse an abbreviation's defining formula. The definition is an expansion
/// of `symbol`, so the symbol itself starts out visited and a self-reference
/// is reported as the cycle it is
pub(crate) fn parse_definition(
    db: &AtomicDatabase,
    symbol: &str,
    formula: &str,
    options: &ParseOptions,
) -> Result<ParsedFormula, FormulaError> {
    let mut visited = HashSet::default();
    visited.insert(symbol.to_owned());
    parse_with_visited(db, formula, options, visited)
}

fn parse_with_visited(
    db: &AtomicDatabase,
    formula: &str,
    options: &ParseOptions,
    visited: HashSet<String>,
) -> Result<ParsedFormula, FormulaError> {
    let parser = FormulaParser {
        db,
        src: formula,
        options,
    };
    let context = ParseContext {
        multiplier: 1.0,
        value_for_x: options.value_for_x,
        visited,
    };
    let mut acc = Accumulator::default();
    parser.parse_section(0..formula.len(), &context, &mut acc)?;

    let mass = acc.composition.total_mass(db);
    let std_dev = acc.composition.mass_variance(db).max(0.0).sqrt();
    Ok(ParsedFormula {
        composition: acc.composition,
        mass,
        charge: acc.charge,
        std_dev,
        formula: acc.text,
    })
}

/// Multipliers and expansion state threaded through recursive calls — never
/// mutated in place, only rebuilt for inner scopes
#[derive(Clone, Debug)]
struct ParseContext {
    /// Product of every enclosing group multiplier (and the coefficients in
    /// force where the group was opened)
    multiplier: f64,
    value_for_x: f64,
    /// Abbreviations currently being expanded, for cycle detection
    visited: HashSet<String>,
}

impl ParseContext {
    fn group(&self, multiplier: f64) -> Self {
        Self {
            multiplier,
            value_for_x: self.value_for_x,
            visited: self.visited.clone(),
        }
    }

    fn expansion(&self, symbol: &str) -> Self {
        let mut visited = self.visited.clone();
        visited.insert(symbol.to_owned());
        Self {
            multiplier: 1.0,
            value_for_x: self.value_for_x,
            visited,
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    composition: ElementComposition,
    charge: f64,
    /// Normalized text rebuilt as parsing goes
    text: String,
    /// The last plain element token resolved, for the hydride special-case
    last_element: Option<ElementId>,
}

/// A numeric literal scanned after a token (empty when absent)
struct NumberToken<'s> {
    value: Option<f64>,
    text: &'s str,
    /// Where the digits begin — error positions for bad counts point here
    start: usize,
    after: usize,
}

struct FormulaParser<'a> {
    db: &'a AtomicDatabase,
    src: &'a str,
    options: &'a ParseOptions,
}

impl FormulaParser<'_> {
    /// Parse a whole formula, splitting at the first `>` into a left side and
    /// a subtracted right side
    fn parse_section(
        &self,
        range: Range<usize>,
        context: &ParseContext,
        acc: &mut Accumulator,
    ) -> Result<(), FormulaError> {
        match self.find_subtraction(&range) {
            Some(gt) => {
                self.parse_sequence(range.start..gt, context, acc)?;
                let mut right = Accumulator::default();
                self.parse_sequence(gt + 1..range.end, context, &mut right)?;
                acc.composition.subtract(&right.composition).map_err(|_| {
                    self.error(FormulaErrorKind::InvalidSubtraction, gt)
                })?;
                acc.charge -= right.charge;
                acc.last_element = None;
                acc.text.push('>');
                acc.text.push_str(&right.text);
                Ok(())
            }
            None => self.parse_sequence(range, context, acc),
        }
    }

    /// Parse one sequence of terms — a whole formula side, or the inside of a
    /// parenthesized group
    fn parse_sequence(
        &self,
        range: Range<usize>,
        context: &ParseContext,
        acc: &mut Accumulator,
    ) -> Result<(), FormulaError> {
        let bytes = self.src.as_bytes();
        let end = range.end;
        let mut i = range.start;

        let mut dash_multiplier = 1.0;
        let mut bracket_multiplier = 1.0;
        let mut in_bracket = false;
        // Bare carbon/silicon atoms seen in this frame, for the covalent
        // charge correction applied when the frame closes
        let mut carbon_silicon_run = 0.0;
        let mut pending_isotope: Option<f64> = None;

        while i < end {
            let c = bytes[i];
            match c {
                b' ' | b'\t' => i += 1,

                b'(' | b'{' => {
                    self.reject_pending_isotope(pending_isotope, i)?;
                    i = self.parse_group(i, end, dash_multiplier * bracket_multiplier, context, acc)?;
                    acc.last_element = None;
                }

                b'[' if self.options.brackets_as_parentheses => {
                    self.reject_pending_isotope(pending_isotope, i)?;
                    i = self.parse_group(i, end, dash_multiplier * bracket_multiplier, context, acc)?;
                    acc.last_element = None;
                }

                b'[' => {
                    self.reject_pending_isotope(pending_isotope, i)?;
                    if in_bracket {
                        return Err(self.error(FormulaErrorKind::NestedBrackets, i));
                    }
                    if self.src[i..end].find(']').is_none() {
                        return Err(self.error(FormulaErrorKind::MissingClosingBracket, i));
                    }
                    let (value, consumed) = self.parse_bracket_head(i + 1, end, context)?;
                    bracket_multiplier = value;
                    in_bracket = true;
                    acc.text.push('[');
                    acc.text.push_str(&self.src[i + 1..consumed]);
                    acc.last_element = None;
                    i = consumed;
                }

                b')' | b'}' => {
                    return Err(self.error(FormulaErrorKind::UnmatchedParenthesis, i));
                }

                b']' if self.options.brackets_as_parentheses => {
                    return Err(self.error(FormulaErrorKind::UnmatchedParenthesis, i));
                }

                b']' => {
                    self.reject_pending_isotope(pending_isotope, i)?;
                    if !in_bracket {
                        return Err(self.error(FormulaErrorKind::UnmatchedBracket, i));
                    }
                    in_bracket = false;
                    bracket_multiplier = 1.0;
                    acc.text.push(']');
                    acc.last_element = None;
                    i += 1;
                    // A count cannot attach to a bracket scope
                    let mut j = i;
                    while j < end && (bytes[j] == b' ' || bytes[j] == b'\t') {
                        j += 1;
                    }
                    if j < end && bytes[j].is_ascii_digit() {
                        return Err(self.error(FormulaErrorKind::NumberAfterClosingBracket, j));
                    }
                }

                b'-' => {
                    self.reject_pending_isotope(pending_isotope, i)?;
                    let number = self.scan_number(i + 1, end)?;
                    if number.value == Some(0.0) {
                        return Err(self.error(FormulaErrorKind::ZeroAfterElementOrDash, number.start));
                    }
                    dash_multiplier = number.value.unwrap_or(1.0);
                    acc.text.push('-');
                    acc.text.push_str(number.text);
                    acc.last_element = None;
                    i = number.after;
                }

                b'^' => {
                    self.reject_pending_isotope(pending_isotope, i)?;
                    let number = self.scan_number(i + 1, end)?;
                    let Some(mass) = number.value else {
                        return Err(self.error(FormulaErrorKind::CaretWithoutNumber, i));
                    };
                    pending_isotope = Some(mass);
                    acc.text.push('^');
                    acc.text.push_str(number.text);
                    i = number.after;
                }

                b'>' => return Err(self.error(FormulaErrorKind::MisplacedSubtraction, i)),

                b'~' => return Err(self.error(FormulaErrorKind::ReservedFillerCharacter, i)),

                b'0'..=b'9' | b'.' => {
                    return Err(self.error(FormulaErrorKind::MisplacedNumber, i));
                }

                _ if c.is_ascii_alphabetic() || c == b'+' || c == b'_' => {
                    let multipliers = Multipliers {
                        dash: dash_multiplier,
                        bracket: bracket_multiplier,
                        outer: context.multiplier,
                    };
                    let outcome = self.parse_symbol(
                        i,
                        end,
                        &multipliers,
                        pending_isotope.take(),
                        context,
                        acc,
                    )?;
                    carbon_silicon_run += outcome.carbon_silicon_atoms;
                    i = outcome.after;
                }

                _ => {
                    let character = self.src[i..].chars().next().unwrap_or('?');
                    return Err(self.error(
                        FormulaErrorKind::UnknownElement(character.to_string()),
                        i,
                    ));
                }
            }
        }

        if pending_isotope.is_some() {
            return Err(self.error(FormulaErrorKind::CaretWithoutElement, end));
        }

        // Runs of bare carbon or silicon lower the accumulated charge by 2
        // per atom beyond the first, settled once per frame
        if carbon_silicon_run > 1.0 {
            acc.charge -= 2.0 * (carbon_silicon_run - 1.0) * context.multiplier;
        }

        Ok(())
    }

    /// A parenthesized group with an optional trailing count — recurses with
    /// the full multiplier chain folded into the child context
    fn parse_group(
        &self,
        open: usize,
        end: usize,
        local_multiplier: f64,
        context: &ParseContext,
        acc: &mut Accumulator,
    ) -> Result<usize, FormulaError> {
        let close = self
            .matching_close(open, end)
            .ok_or_else(|| self.error(FormulaErrorKind::MissingClosingParenthesis, open))?;
        let number = self.scan_number(close + 1, end)?;
        // A zero group count is legal and zeroes out the group
        let group_multiplier = number.value.unwrap_or(1.0);
        let inner =
            context.group(group_multiplier * local_multiplier * context.multiplier);

        acc.text.push('(');
        self.parse_sequence(open + 1..close, &inner, acc)?;
        acc.text.push(')');
        acc.text.push_str(number.text);
        Ok(number.after)
    }

    /// Resolve an element or abbreviation token starting at `i`
    fn parse_symbol(
        &self,
        i: usize,
        end: usize,
        multipliers: &Multipliers,
        pending_isotope: Option<f64>,
        context: &ParseContext,
        acc: &mut Accumulator,
    ) -> Result<SymbolOutcome, FormulaError> {
        let excerpt = &self.src[i..end];
        let Some(entry) = self
            .db
            .find_symbol(excerpt, self.options.convert_case_up)
        else {
            return Err(self.unknown_symbol(i, end));
        };

        let number = self.scan_number(i + entry.symbol().len(), end)?;
        if number.value == Some(0.0) {
            return Err(self.error(FormulaErrorKind::ZeroAfterElementOrDash, number.start));
        }
        let local = number.value.unwrap_or(1.0) * multipliers.dash * multipliers.bracket;
        let count = local * multipliers.outer;

        let mut carbon_silicon_atoms = 0.0;
        match entry.kind() {
            SymbolKind::Element(id) => {
                let element = self.db.element(id);
                let tally = acc.composition.tally_mut(id);
                tally.count += count;
                if let Some(isotope_mass) = pending_isotope {
                    tally.isotopic_correction += (isotope_mass - element.mass()) * count;
                    tally.explicit_isotopes.push(ExplicitIsotope {
                        mass: isotope_mass,
                        count,
                    });
                }

                // Hydride: H bonded to a metal contributes −1, not its own +1
                let hydride = id == ElementId::HYDROGEN
                    && acc.last_element.is_some_and(ElementId::is_hydride_metal);
                acc.charge += if hydride { -count } else { element.charge() * count };

                if id.takes_covalent_run_correction() && pending_isotope.is_none() {
                    carbon_silicon_atoms = local;
                }

                acc.last_element = Some(id);
                acc.text.push_str(element.symbol());
                acc.text.push_str(number.text);
            }

            SymbolKind::Abbreviation(index) => {
                if pending_isotope.is_some() {
                    return Err(self.error(FormulaErrorKind::IsotopeOnAbbreviation, i));
                }
                let abbreviation = self.db.abbreviation(index);
                let symbol = abbreviation.symbol();
                if context.visited.contains(symbol) {
                    return Err(self.error(
                        FormulaErrorKind::CircularAbbreviation(symbol.to_owned()),
                        i,
                    ));
                }
                if !abbreviation.valid() {
                    return Err(self.error(
                        FormulaErrorKind::InvalidAbbreviationFormula(symbol.to_owned()),
                        i,
                    ));
                }

                // Expand one unit of the definition, then scale it in
                let nested = FormulaParser {
                    db: self.db,
                    src: abbreviation.formula(),
                    options: self.options,
                };
                let mut unit = Accumulator::default();
                nested
                    .parse_section(
                        0..abbreviation.formula().len(),
                        &context.expansion(symbol),
                        &mut unit,
                    )
                    .map_err(|e| e.rehome(self.src, i))?;
                acc.composition.merge_scaled(&unit.composition, count);
                acc.charge += abbreviation.charge() * count;
                acc.last_element = None;

                if self.options.expand_abbreviations {
                    // Subtractions cannot be nested, so a definition using
                    // `>` expands to its empirical form instead
                    let body = if abbreviation.formula().contains('>') {
                        unit.composition.to_empirical(self.db)
                    } else {
                        unit.text
                    };
                    if number.value.is_some() {
                        acc.text.push('(');
                        acc.text.push_str(&body);
                        acc.text.push(')');
                        acc.text.push_str(number.text);
                    } else {
                        acc.text.push_str(&body);
                    }
                } else {
                    acc.text.push_str(symbol);
                    acc.text.push_str(number.text);
                }
            }
        }

        Ok(SymbolOutcome {
            after: number.after,
            carbon_silicon_atoms,
        })
    }

    /// The value of a bracket scope's head: `x` (optionally with an explicit
    /// value) or a numeric literal. An `x` followed by `e` is left alone — it
    /// is the element xenon, which makes the head a misplaced number.
    fn parse_bracket_head(
        &self,
        start: usize,
        end: usize,
        context: &ParseContext,
    ) -> Result<(f64, usize), FormulaError> {
        let bytes = self.src.as_bytes();
        if start < end
            && (bytes[start] == b'x' || bytes[start] == b'X')
            && !(start + 1 < end && (bytes[start + 1] == b'e' || bytes[start + 1] == b'E'))
        {
            let number = self.scan_number(start + 1, end)?;
            let value = number.value.unwrap_or(context.value_for_x);
            return Ok((value, number.after));
        }
        let number = self.scan_number(start, end)?;
        match number.value {
            Some(value) => Ok((value, number.after)),
            None => Err(self.error(FormulaErrorKind::MisplacedNumber, start)),
        }
    }

    /// Scan an optional numeric literal (digits with at most one decimal
    /// point), forgiving leading whitespace
    fn scan_number(&self, from: usize, end: usize) -> Result<NumberToken<'_>, FormulaError> {
        let bytes = self.src.as_bytes();
        let mut start = from;
        while start < end && (bytes[start] == b' ' || bytes[start] == b'\t') {
            start += 1;
        }

        let mut i = start;
        let mut seen_digit = false;
        let mut seen_dot = false;
        while i < end {
            match bytes[i] {
                b'0'..=b'9' => {
                    seen_digit = true;
                    i += 1;
                }
                b'.' => {
                    if seen_dot {
                        return Err(self.error(FormulaErrorKind::MultipleDecimalPoints, i));
                    }
                    seen_dot = true;
                    i += 1;
                }
                _ => break,
            }
        }

        if !seen_digit {
            return Ok(NumberToken {
                value: None,
                text: "",
                start: from,
                after: from,
            });
        }
        let text = &self.src[start..i];
        let value = text
            .parse::<f64>()
            .map_err(|_| self.error(FormulaErrorKind::MisplacedNumber, start))?;
        Ok(NumberToken {
            value: Some(value),
            text,
            start,
            after: i,
        })
    }

    /// Find the top-level `>` splitting a formula into a left side and a
    /// subtracted right side — one nested in a group is a misplacement, left
    /// for [`Self::parse_sequence`] to report
    fn find_subtraction(&self, range: &Range<usize>) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut depth = 0i32;
        for i in range.clone() {
            match bytes[i] {
                b'(' | b'{' => depth += 1,
                b')' | b'}' => depth -= 1,
                b'[' if self.options.brackets_as_parentheses => depth += 1,
                b']' if self.options.brackets_as_parentheses => depth -= 1,
                b'>' if depth == 0 => return Some(i),
                _ => {}
            }
        }
        None
    }

    /// Find the `)`/`}` closing the group opened at `open`, by depth counting
    fn matching_close(&self, open: usize, end: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut depth = 0usize;
        for i in open..end {
            match bytes[i] {
                b'(' | b'{' => depth += 1,
                b'[' | b']' if !self.options.brackets_as_parentheses => {}
                b'[' => depth += 1,
                b')' | b'}' | b']' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn reject_pending_isotope(
        &self,
        pending: Option<f64>,
        position: usize,
    ) -> Result<(), FormulaError> {
        if pending.is_some() {
            Err(self.error(FormulaErrorKind::CaretWithoutElement, position))
        } else {
            Ok(())
        }
    }

    fn unknown_symbol(&self, i: usize, end: usize) -> FormulaError {
        // An element-symbol-like excerpt: the first character plus a
        // following lowercase letter, if any
        let mut chars = self.src[i..end].chars();
        let first = chars.next().unwrap_or('?');
        let second = chars.next().filter(char::is_ascii_lowercase);

        if (first == 'X' || first == 'x') && second.is_none() {
            return self.error(FormulaErrorKind::XOutsideBrackets, i);
        }
        let token = match second {
            Some(second) => format!("{first}{second}"),
            None => first.to_string(),
        };
        self.error(FormulaErrorKind::UnknownElement(token), i)
    }

    fn error(&self, kind: FormulaErrorKind, position: usize) -> FormulaError {
        FormulaError::new(kind, self.src, position)
    }
}

struct Multipliers {
    dash: f64,
    bracket: f64,
    outer: f64,
}

struct SymbolOutcome {
    after: usize,
    /// Bare C/Si atoms this token contributed to the current frame's run
    carbon_silicon_atoms: f64,
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::testing_tools::assert_close;

    static DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

    fn parse_ok(formula: &str) -> ParsedFormula {
        parse(&DB, formula, &ParseOptions::default()).unwrap()
    }

    fn parse_err(formula: &str) -> FormulaError {
        parse(&DB, formula, &ParseOptions::default()).unwrap_err()
    }

    fn count(parsed: &ParsedFormula, symbol: &str) -> f64 {
        parsed.composition().count(DB.find_element(symbol).unwrap())
    }

    #[test]
    fn water() {
        let water = parse_ok("H2O");
        assert_close!(water.mass, 18.0153, 1e-3);
        assert_eq!(water.charge, 0.0);
        assert_eq!(water.formula(), "H2O");
        assert_close!(water.std_dev(), 3.16e-4, 1e-5);
    }

    #[test]
    fn glucose() {
        let glucose = parse_ok("C6H12O6");
        assert_close!(glucose.mass, 180.156, 1e-2);
        assert_eq!(count(&glucose, "C"), 6.0);
        assert_eq!(count(&glucose, "H"), 12.0);
        assert_eq!(count(&glucose, "O"), 6.0);
    }

    #[test]
    fn parenthesized_groups_multiply() {
        let parsed = parse_ok("(NH4)2SO4");
        assert_eq!(count(&parsed, "N"), 2.0);
        assert_eq!(count(&parsed, "H"), 8.0);
        assert_eq!(count(&parsed, "S"), 1.0);
        assert_eq!(count(&parsed, "O"), 4.0);
    }

    #[test]
    fn nested_groups_and_braces() {
        let parsed = parse_ok("{C2(H2O)3}2");
        assert_eq!(count(&parsed, "C"), 4.0);
        assert_eq!(count(&parsed, "H"), 12.0);
        assert_eq!(count(&parsed, "O"), 6.0);
    }

    #[test]
    fn fractional_counts() {
        let parsed = parse_ok("H5.5O");
        assert_eq!(count(&parsed, "H"), 5.5);
    }

    #[test]
    fn empty_parentheses_are_fine() {
        let parsed = parse_ok("()");
        assert!(parsed.composition().is_empty());
        assert_eq!(parsed.mass, 0.0);
    }

    #[test]
    fn zero_group_count_zeroes_the_group() {
        let parsed = parse_ok("(CO2)0H2O");
        assert_eq!(count(&parsed, "C"), 0.0);
        assert_eq!(count(&parsed, "H"), 2.0);
    }

    #[test]
    fn case_fixing() {
        assert_eq!(parse_ok("h2o").formula(), "H2O");
        // An uppercase CO is carbon monoxide: the 'O' is not a lowercase
        // second letter, so it can never complete cobalt
        let parsed = parse_ok("CO2");
        assert_eq!(count(&parsed, "C"), 1.0);
        assert_eq!(count(&parsed, "O"), 2.0);
        // All-lowercase co2 greedily matches the longer symbol and reads as
        // cobalt, exactly as a capitalized Co2 would
        let parsed = parse_ok("co2");
        assert_eq!(count(&parsed, "Co"), 2.0);
        assert_eq!(parsed.formula(), "Co2");
        // Without case fixing, lowercase fails
        let options = ParseOptions {
            convert_case_up: false,
            ..ParseOptions::default()
        };
        assert!(parse(&DB, "h2o", &options).is_err());
    }

    #[test]
    fn whitespace_is_ignored() {
        let parsed = parse_ok(" C6 H12 O6 ");
        assert_eq!(count(&parsed, "C"), 6.0);
        assert_eq!(parsed.formula(), "C6H12O6");
    }

    #[test]
    fn dash_coefficient_hydrate() {
        let parsed = parse_ok("CuSO4-5H2O");
        assert_eq!(count(&parsed, "Cu"), 1.0);
        assert_eq!(count(&parsed, "S"), 1.0);
        assert_eq!(count(&parsed, "H"), 10.0);
        assert_eq!(count(&parsed, "O"), 9.0);
    }

    #[test]
    fn dash_coefficient_resets_at_the_next_dash() {
        let parsed = parse_ok("-2H2O-3CO2");
        assert_eq!(count(&parsed, "H"), 4.0);
        assert_eq!(count(&parsed, "C"), 3.0);
        assert_eq!(count(&parsed, "O"), 8.0);
    }

    #[test]
    fn bracketed_multiplier() {
        let parsed = parse_ok("[2H2O]");
        assert_eq!(count(&parsed, "H"), 4.0);
        assert_eq!(count(&parsed, "O"), 2.0);
        // The scope ends at the closing bracket
        let parsed = parse_ok("[2H2O]Na");
        assert_eq!(count(&parsed, "Na"), 1.0);
    }

    #[test]
    fn bracket_x_placeholder() {
        let options = ParseOptions {
            value_for_x: 3.0,
            ..ParseOptions::default()
        };
        let parsed = parse(&DB, "[xH2O]", &options).unwrap();
        assert_eq!(count(&parsed, "H"), 6.0);
        // An explicit value beats the option
        let parsed = parse(&DB, "[x2H2O]", &options).unwrap();
        assert_eq!(count(&parsed, "H"), 4.0);
    }

    #[test]
    fn bracket_head_xenon_is_not_the_placeholder() {
        // Xe is an element, leaving the bracket without a multiplier
        let error = parse_err("[XeF4]");
        assert_eq!(error.error_code(), 2);
    }

    #[test]
    fn brackets_as_parentheses_mode() {
        let options = ParseOptions {
            brackets_as_parentheses: true,
            ..ParseOptions::default()
        };
        let parsed = parse(&DB, "[NH4]2SO4", &options).unwrap();
        assert_eq!(count(&parsed, "N"), 2.0);
        assert_eq!(count(&parsed, "H"), 8.0);
    }

    #[test]
    fn explicit_isotopes() {
        let parsed = parse_ok("^13C6H6");
        assert_eq!(count(&parsed, "C"), 6.0);
        let tally = parsed.composition().tally(ElementId::CARBON);
        assert_eq!(tally.explicit_isotopes.len(), 1);
        assert_eq!(tally.explicit_isotopes[0].count, 6.0);
        assert_close!(
            tally.isotopic_correction,
            (13.0 - 12.0107) * 6.0,
            1e-9
        );
        // The labelled atoms carry no atomic-mass uncertainty
        assert!(parsed.std_dev() < parse_ok("C6H6").std_dev());
    }

    #[test]
    fn deuterium_expands_to_an_isotopic_hydrogen() {
        let parsed = parse_ok("D2O");
        assert_eq!(count(&parsed, "H"), 2.0);
        let tally = parsed.composition().tally(ElementId::HYDROGEN);
        assert_close!(tally.explicit_isotopes[0].count, 2.0, 1e-9);
        assert_close!(parsed.mass, 2.0 * 2.014 + 15.9994, 1e-3);
    }

    #[test]
    fn abbreviations_expand_with_declared_charge() {
        let parsed = parse_ok("PhCl");
        assert_eq!(count(&parsed, "C"), 6.0);
        assert_eq!(count(&parsed, "H"), 5.0);
        assert_eq!(count(&parsed, "Cl"), 1.0);
        // Ph carries +1, Cl −1
        assert_eq!(parsed.charge, 0.0);
    }

    #[test]
    fn abbreviation_counts_scale_the_expansion() {
        let parsed = parse_ok("Me2O");
        assert_eq!(count(&parsed, "C"), 2.0);
        assert_eq!(count(&parsed, "H"), 6.0);
    }

    #[test]
    fn expanded_normalized_text() {
        let options = ParseOptions {
            expand_abbreviations: true,
            ..ParseOptions::default()
        };
        let phenol = parse(&DB, "PhOH", &options).unwrap();
        assert_eq!(phenol.formula(), "C6H5OH");
        assert_eq!(parse(&DB, "Me2O", &options).unwrap().formula(), "(CH3)2O");
        // The expanded text parses back to the same mass
        let reparsed = parse_ok(phenol.formula());
        assert_close!(reparsed.mass, phenol.mass, 1e-9);
    }

    #[test]
    fn amino_acids_only_parse_in_the_extended_mode() {
        assert_eq!(parse_err("GlyAla").error_code(), 1);
        let mut db = AtomicDatabase::default();
        db.set_recognition_mode(crate::RecognitionMode::NormalPlusAminoAcids);
        let parsed = parse(&db, "GlyAla", &ParseOptions::default()).unwrap();
        assert_eq!(parsed.composition().count(ElementId::CARBON), 5.0);
    }

    #[test]
    fn hydride_hydrogen_after_a_metal() {
        // Na +1, then H −1 (hydride), not +1
        assert_eq!(parse_ok("NaH").charge, 0.0);
        // With oxygen in between the hydrogen keeps its own +1
        assert_eq!(parse_ok("NaOH").charge, 0.0);
    }

    #[test]
    fn carbon_run_charge_correction() {
        // C +4 and H +1 by table; each extra bare carbon subtracts 2
        let methane = parse_ok("CH4");
        assert_eq!(methane.charge, 8.0);
        let ethane = parse_ok("C2H6");
        assert_eq!(ethane.charge, 2.0 * 4.0 + 6.0 - 2.0);
        // The correction scales with the group multiplier
        let doubled = parse_ok("(C2H6)2");
        assert_eq!(doubled.charge, 2.0 * ethane.charge);
    }

    #[test]
    fn formula_subtraction() {
        let parsed = parse_ok("C6H5Cl2>HCl");
        assert_eq!(count(&parsed, "C"), 6.0);
        assert_eq!(count(&parsed, "H"), 4.0);
        assert_eq!(count(&parsed, "Cl"), 1.0);
        assert_eq!(parsed.formula(), "C6H5Cl2>HCl");
    }

    #[test]
    fn oversubtraction_is_an_error() {
        assert_eq!(parse_err("H2O>H3").error_code(), 24);
        assert_eq!(parse_err("H2O>C").error_code(), 24);
    }

    #[test]
    fn only_one_subtraction_allowed() {
        assert_eq!(parse_err("C6H6>H>H").error_code(), 26);
        assert_eq!(parse_err("(C>H)O").error_code(), 26);
    }

    #[test]
    fn error_positions_point_at_the_offence() {
        let error = parse_err("H2O)");
        assert_eq!((error.error_code(), error.position()), (4, 3));
        assert_eq!(error.character(), Some(')'));

        let error = parse_err("H2Qq4");
        assert_eq!(error.error_code(), 1);
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn lexical_errors() {
        assert_eq!(parse_err("2H2O").error_code(), 2);
        assert_eq!(parse_err("(H2O").error_code(), 3);
        assert_eq!(parse_err("H2O)").error_code(), 4);
        assert_eq!(parse_err("H0").error_code(), 5);
        assert_eq!(parse_err("-0H2O").error_code(), 5);
        assert_eq!(parse_err("H2.3.4O").error_code(), 11);
        assert_eq!(parse_err("[2H]3").error_code(), 12);
        assert_eq!(parse_err("[2[3H]]").error_code(), 13);
        assert_eq!(parse_err("H2O]").error_code(), 14);
        assert_eq!(parse_err("[2H2O").error_code(), 15);
        assert_eq!(parse_err("H~O").error_code(), 16);
        assert_eq!(parse_err("X2O").error_code(), 18);
    }

    #[test]
    fn isotope_errors() {
        assert_eq!(parse_err("^C6").error_code(), 20);
        assert_eq!(parse_err("^-13C").error_code(), 20);
        assert_eq!(parse_err("C6H6^13").error_code(), 21);
        assert_eq!(parse_err("^13(CH)6").error_code(), 21);
        assert_eq!(parse_err("^115Ph").error_code(), 22);
    }

    #[test]
    fn abbreviation_reference_errors() {
        let mut db = AtomicDatabase::default();
        db.set_abbreviation("Selfy", "Selfy2O", 0.0, None).unwrap();
        let definition = &db.abbreviations()[db.find_abbreviation("Selfy").unwrap()];
        assert!(!definition.valid());
        let validation = definition.validation_error(&db).unwrap();
        assert_eq!(validation.error_code(), 28);
        // Using it in a formula reports the invalid definition
        let error = parse(&db, "H2Selfy", &ParseOptions::default()).unwrap_err();
        assert_eq!(error.error_code(), 29);
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn subtracting_definitions_expand_to_empirical_text() {
        let mut db = AtomicDatabase::default();
        db.set_abbreviation("Jk", "C6H5Cl2>HCl", 0.0, None).unwrap();
        let options = ParseOptions {
            expand_abbreviations: true,
            ..ParseOptions::default()
        };
        let parsed = db.parse_formula_with("JkBr", &options).unwrap();
        assert_eq!(parsed.formula(), "C6H4ClBr");
    }

    #[test]
    fn empty_formula_is_massless() {
        let parsed = parse_ok("");
        assert!(parsed.composition().is_empty());
        assert_eq!(parsed.mass, 0.0);
        assert_eq!(parsed.formula(), "");
    }
}
