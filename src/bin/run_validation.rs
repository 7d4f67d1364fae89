//! Compare engine output against the pricing workbook reference values
//!
//! Usage: cargo run --bin run_validation

use anyhow::bail;
use health_quote::{PremiumEngine, RatingTables, ReferenceValidator};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let tables = match std::env::var("RATING_TABLES_PATH") {
        Ok(path) => RatingTables::from_csv_path(std::path::Path::new(&path))?,
        Err(_) => RatingTables::default_pricing(),
    };
    let engine = PremiumEngine::new(tables);
    let validator = ReferenceValidator::new();

    println!("Reference validation (tolerance {})", validator.tolerance());
    println!("{}", "=".repeat(78));
    println!(
        "{:<18} {:<16} {:>14} {:>14} {:>8} {:>4}",
        "Case", "Metric", "Expected", "Calculated", "Diff", ""
    );
    println!("{}", "-".repeat(78));

    let report = validator.run(&engine);
    for r in &report.results {
        println!(
            "{:<18} {:<16} {:>14.4} {:>14.4} {:>8.4} {:>4}{}",
            r.test_name,
            format!("{:?}", r.metric),
            r.expected,
            r.calculated,
            r.difference,
            if r.passed { "OK" } else { "FAIL" },
            if r.critical { " *" } else { "" },
        );
    }
    println!("{}", "-".repeat(78));
    println!("* critical");

    let failed = report.failures().count();
    if !report.passed() {
        bail!("{} reference check(s) failed, including critical cases", failed);
    }

    println!("\nAll critical checks passed ({} non-critical failure(s))", failed);
    Ok(())
}
