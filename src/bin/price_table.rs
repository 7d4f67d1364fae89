//! Generate the published price tables
//!
//! Usage: cargo run --bin price_table -- --table complete --csv price_table.csv

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use health_quote::quote::PremiumEngine;
use health_quote::rating::{PlanTier, RatingTables};
use health_quote::report::{
    family_table, optional_services_table, price_table, render_family_table, render_monthly_table,
    render_optional_services_table, render_price_table, PriceRow, FAMILY_AGES, MONTHLY_AGES,
    OPTIONAL_REFERENCE_AGE, PRICE_TABLE_NOTES, STANDARD_AGES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Table {
    Main,
    Monthly,
    Family,
    Optional,
    Complete,
}

#[derive(Debug, Parser)]
#[command(about = "Print premium tables by age and plan")]
struct Args {
    /// Which table to print
    #[arg(long, value_enum, default_value_t = Table::Complete)]
    table: Table,

    /// Also write the main annual/monthly grid to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Directory with services.csv and factors.csv (defaults to built-in tables)
    #[arg(long)]
    tables: Option<PathBuf>,
}

fn write_csv(path: &Path, rows: &[PriceRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["Age".to_string()];
    for tier in PlanTier::ALL {
        header.push(format!("{}_annual", tier));
        header.push(format!("{}_monthly", tier));
    }
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.age.to_string()];
        for tier in PlanTier::ALL {
            let price = row.prices.get(tier);
            record.push(format!("{:.2}", price.annual));
            record.push(format!("{:.2}", price.monthly));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let tables = match &args.tables {
        Some(path) => RatingTables::from_csv_path(path)?,
        None => RatingTables::default_pricing(),
    };
    let engine = PremiumEngine::new(tables);

    let show = |table: Table| args.table == table || args.table == Table::Complete;

    if show(Table::Main) {
        println!("\nTabla de primas anuales por edad y plan (sin servicios opcionales)");
        println!("{}", "=".repeat(80));
        print!("{}", render_price_table(&price_table(&engine, &STANDARD_AGES)));
        for note in PRICE_TABLE_NOTES {
            println!("  - {}", note);
        }
    }

    if show(Table::Monthly) {
        println!("\nTabla de primas mensuales");
        println!("{}", "=".repeat(50));
        print!("{}", render_monthly_table(&price_table(&engine, &MONTHLY_AGES)));
    }

    if show(Table::Family) {
        let factor = engine.calculation_factors().family_factor;
        println!("\nTabla con factor familiar ({}x, Plan Oro)", factor);
        println!("{}", "=".repeat(60));
        print!("{}", render_family_table(&family_table(&engine, &FAMILY_AGES, PlanTier::Oro)));
    }

    if show(Table::Optional) {
        let factor = engine.calculation_factors().optional_factor;
        println!("\nCosto adicional por servicio opcional ({} años, factor {}x)", OPTIONAL_REFERENCE_AGE, factor);
        println!("{}", "=".repeat(50));
        print!("{}", render_optional_services_table(&optional_services_table(&engine, OPTIONAL_REFERENCE_AGE)));
    }

    if let Some(path) = &args.csv {
        write_csv(path, &price_table(&engine, &STANDARD_AGES))?;
        println!("\nPrice grid written to {}", path.display());
    }

    log::info!("Tables generated in {:?}", start.elapsed());
    Ok(())
}
