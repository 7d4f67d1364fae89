//! Health Quote CLI
//!
//! Command-line interface for quoting a single applicant

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use health_quote::quote::{validate_age, Applicant, OptionalSelections, PremiumEngine};
use health_quote::rating::{PlanTier, RatingTables, ServiceCategory};
use health_quote::report::{age_impact, compare_plans, render_age_impact, render_comparison, AGE_IMPACT_AGES};

#[derive(Debug, Parser)]
#[command(name = "health_quote", version, about = "Quote a health assistance plan")]
struct Cli {
    /// Applicant age in years (18-80)
    #[arg(long, default_value_t = 45)]
    age: i32,

    /// Plan tier: plata, oro or diamante
    #[arg(long, default_value = "oro")]
    plan: PlanTier,

    /// Include parents or in-laws
    #[arg(long)]
    parents: bool,

    /// Add funeral assistance
    #[arg(long)]
    funeral: bool,

    /// Add tele-veterinary assistance
    #[arg(long)]
    televet: bool,

    /// Also print a comparison of every plan for this age
    #[arg(long)]
    compare: bool,

    /// Also print premiums by age for the selected plan
    #[arg(long)]
    age_impact: bool,

    /// Print the breakdown as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Directory with services.csv and factors.csv (defaults to built-in tables)
    #[arg(long)]
    tables: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(path) => RatingTables::from_csv_path(path)
            .with_context(|| format!("Failed to load rating tables from {}", path.display()))?,
        None => RatingTables::default_pricing(),
    };
    let engine = PremiumEngine::new(tables);

    let age_check = validate_age(cli.age);
    if !age_check.valid {
        bail!(age_check.message.unwrap_or_else(|| "Invalid age".to_string()));
    }

    let applicant = Applicant::new(cli.age, cli.parents);
    let optionals = OptionalSelections::new(cli.funeral, cli.televet);
    let result = engine.calculate_premium(&applicant, cli.plan, &optionals, true);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Health Quote v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Cotización:");
    println!("  Edad: {} años", applicant.age);
    println!("  Plan: {}", cli.plan.as_str().to_uppercase());
    println!("  Incluir padres: {}", if applicant.include_parents { "Sí" } else { "No" });
    println!("  Asistencia funeraria: {}", if optionals.funeral_assistance { "Sí" } else { "No" });
    println!("  TeleVet: {}", if optionals.tele_vet { "Sí" } else { "No" });
    println!();

    println!("Resultado:");
    println!("  Prima anual:   ${:>12.2}", result.total_annual);
    println!("  Prima mensual: ${:>12.2}", result.total_monthly);
    println!();

    let factors = engine.calculation_factors();
    println!("Desglose:");
    println!("  Prima base:            {:>12.2}", result.base_premium);
    println!("  Servicios opcionales:  {:>12.2}", result.optionals_premium);
    println!("  Ajuste por edad:       {:>12.2}", result.age_adjustment);
    println!("  Ajuste familiar:       {:>12.2}", result.family_adjustment);
    println!("  Gastos ({:.0}%):          {:>12.2}", factors.expense_rate * 100.0, result.expenses);
    println!("  Utilidad ({:.0}%):        {:>12.2}", factors.profit_rate * 100.0, result.profit);
    println!("  Comisión ({:.0}%):        {:>12.2}", factors.commission_rate * 100.0, result.commission);
    println!();

    if let Some(steps) = &result.calculation_steps {
        println!("Pasos:");
        for step in steps {
            println!("  {}. {:<30} {:>12.2}  {}", step.step, step.description, step.value, step.calculation);
        }
        println!();
    }

    println!("Coberturas incluidas:");
    for item in engine.coverage_details(cli.plan, &optionals).iter().filter(|c| c.included) {
        let marker = match item.service_type {
            ServiceCategory::Base => "*",
            ServiceCategory::Optional => "+",
        };
        println!("  {} {}: {}", marker, item.service_name, item.coverage);
    }

    if cli.compare {
        println!();
        print!("{}", render_comparison(cli.age, &compare_plans(&engine, cli.age)));
    }

    if cli.age_impact {
        println!();
        print!("{}", render_age_impact(cli.plan, &age_impact(&engine, cli.plan, &AGE_IMPACT_AGES)));
    }

    Ok(())
}
