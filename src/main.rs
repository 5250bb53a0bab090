use std::{fmt::Write, sync::LazyLock};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use molmass::{
    AtomicDatabase, Charged, IsotopePatternCalculator, Massive, ParseOptions, Result,
};
use rustyline::DefaultEditor;

static DB: LazyLock<AtomicDatabase> = LazyLock::new(AtomicDatabase::default);

fn main() {
    let Ok(mut rl) = DefaultEditor::new() else {
        eprintln!("failed to open an interactive terminal");
        return;
    };
    while let Ok(line) = rl.readline("Formula: ") {
        let _ = rl.add_history_entry(&line);
        let result = match line.split_once(char::is_whitespace) {
            Some(("isotopes", formula)) => isotope_info(formula),
            _ => formula_info(&line),
        };
        match result {
            Ok(info) => print!("{info}"),
            Err(diagnostic) => render_error(*diagnostic),
        }
    }
}

fn formula_info(formula: &str) -> Result<String> {
    let mut buf = String::new();
    let options = ParseOptions {
        expand_abbreviations: true,
        ..ParseOptions::default()
    };
    let parsed = DB.parse_formula_with(formula, &options)?;

    writeln!(buf, "Formula: {}", parsed.formula()).unwrap();
    writeln!(buf, "Average Mass: {}", parsed.mass_with_std_dev()).unwrap();
    writeln!(buf, "Charge: {}", parsed.charge()).unwrap();
    writeln!(buf, "Empirical: {}", parsed.to_empirical(&DB)).unwrap();
    for (id, percent) in parsed.percent_composition(&DB) {
        writeln!(buf, "  {:>2}: {percent:.4}%", DB.element(id).symbol()).unwrap();
    }

    let charge = parsed.charge().value();
    if charge > 0.0 && charge.fract() == 0.0 {
        let mz = molmass::convolute_mz(
            parsed.average_mass().value(),
            0,
            charge as i32,
            DB.charge_carrier_mass(),
        );
        writeln!(buf, "Average m/z: {mz:.4}").unwrap();
    }

    writeln!(buf).unwrap();
    Ok(buf)
}

fn isotope_info(formula: &str) -> Result<String> {
    let mut buf = String::new();
    let spectrum = IsotopePatternCalculator::new(&DB).pattern(formula)?;

    writeln!(buf, "Combinations: {}", spectrum.combinations()).unwrap();
    for peak in spectrum.peaks() {
        writeln!(buf, "  {:>12.6}  {:>10.6}", peak.mass, peak.abundance).unwrap();
    }

    writeln!(buf).unwrap();
    Ok(buf)
}

fn render_error(diagnostic: impl Into<Box<dyn Diagnostic + 'static>>) {
    let mut buf = String::new();
    if GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
        .render_report(&mut buf, diagnostic.into().as_ref())
        .is_ok()
    {
        println!("{buf}");
    }
}
