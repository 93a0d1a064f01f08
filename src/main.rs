use std::{io, path::PathBuf};

use anyhow::Error;
use clap::{ArgAction, Args, Parser, Subcommand};
use olive_harvest::{
    config::{init_tracing, DATA_FILE_ENV, DEFAULT_DATA_FILE},
    default_selection, enrich, load,
    report::{write_comparison, write_enriched_as_csv, write_json, write_metrics, write_table},
    submit_entry, ComparisonReport, Config, HarvestEntry, Result, Submission,
};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "olive-harvest",
    about = "Record olive harvests and compare oil yield and costs across years",
    version
)]
struct Cli {
    #[arg(long, global = true, env = DATA_FILE_ENV, default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new harvest
    Add(AddArgs),
    /// Show the recorded harvests
    Show,
    /// Show oil totals and yield for every harvest
    Stats,
    /// Compare production and costs across years
    Compare(CompareArgs),
    /// Write harvests and derived metrics to a CSV file
    Export(ExportArgs),
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    year: i32,
    /// Harvest date (YYYY-MM-DD)
    #[arg(long)]
    harvest_date: String,
    /// Milling date (YYYY-MM-DD)
    #[arg(long)]
    milling_date: String,
    #[arg(long = "drum-30kg", default_value_t = 0)]
    drum_30kg: u32,
    #[arg(long = "drum-12kg", default_value_t = 0)]
    drum_12kg: u32,
    #[arg(long = "drum-10kg", default_value_t = 0)]
    drum_10kg: u32,
    #[arg(long = "can-5l", default_value_t = 0)]
    can_5l: u32,
    #[arg(long = "can-3l", default_value_t = 0)]
    can_3l: u32,
    #[arg(long = "can-2l", default_value_t = 0)]
    can_2l: u32,
    #[arg(long = "can-1l", default_value_t = 0)]
    can_1l: u32,
    /// Total paid to the farmer (€)
    #[arg(long, default_value_t = 0.)]
    farmer_cost: f64,
    /// Total milling cost (€)
    #[arg(long, default_value_t = 0.)]
    milling_cost: f64,
    /// Milling cost per quintal (€)
    #[arg(long, default_value_t = 0.)]
    milling_cost_per_quintal: f64,
    /// Olives milled (kg)
    #[arg(long, default_value_t = 0.)]
    olive_kg: f64,
}

impl From<AddArgs> for HarvestEntry {
    fn from(args: AddArgs) -> Self {
        HarvestEntry {
            year: args.year,
            harvest_date: args.harvest_date,
            milling_date: args.milling_date,
            drum_30kg: args.drum_30kg,
            drum_12kg: args.drum_12kg,
            drum_10kg: args.drum_10kg,
            can_5l: args.can_5l,
            can_3l: args.can_3l,
            can_2l: args.can_2l,
            can_1l: args.can_1l,
            farmer_cost_total: args.farmer_cost,
            milling_cost_total: args.milling_cost,
            milling_cost_per_quintal: args.milling_cost_per_quintal,
            olive_kg_total: args.olive_kg,
        }
    }
}

#[derive(Args)]
struct CompareArgs {
    /// Year to include, repeatable. Defaults to the two most recent years.
    #[arg(long = "year")]
    years: Vec<i32>,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long, default_value = "harvest_report.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config {
        data_file: cli.data_file,
        json: cli.json,
    };
    debug!(?config, "starting");

    match cli.command {
        Commands::Add(args) => add(&config, args.into()),
        Commands::Show => show(&config),
        Commands::Stats => stats(&config),
        Commands::Compare(args) => compare(&config, args),
        Commands::Export(args) => export(&config, args),
    }
}

fn add(config: &Config, entry: HarvestEntry) -> Result<()> {
    match submit_entry(&config.data_file, &entry)? {
        Submission::Accepted(table) => {
            println!(
                "Harvest for {} recorded ({} records in {}).",
                entry.year,
                table.len(),
                config.data_file.display()
            );
            Ok(())
        }
        Submission::Rejected(err) => Err(Error::new(err).context("entry rejected")),
    }
}

fn show(config: &Config) -> Result<()> {
    let table = load(&config.data_file)?;
    let mut out = io::stdout().lock();
    if config.json {
        write_json(&mut out, table.records())
    } else {
        write_table(&mut out, &table)
    }
}

fn stats(config: &Config) -> Result<()> {
    let rows = enrich(&load(&config.data_file)?);
    let mut out = io::stdout().lock();
    if config.json {
        write_json(&mut out, &rows)
    } else {
        write_metrics(&mut out, &rows)
    }
}

fn compare(config: &Config, args: CompareArgs) -> Result<()> {
    let table = load(&config.data_file)?;
    let years = if args.years.is_empty() {
        default_selection(&table)
    } else {
        args.years.into_iter().collect()
    };
    let report = ComparisonReport::build(&table, years);
    let mut out = io::stdout().lock();
    if config.json {
        write_json(&mut out, &report)
    } else {
        write_comparison(&mut out, &report)
    }
}

fn export(config: &Config, args: ExportArgs) -> Result<()> {
    let rows = enrich(&load(&config.data_file)?);
    write_enriched_as_csv(&rows, &args.output)?;
    println!(
        "The harvest detail was written as CSV to file {}",
        args.output.display()
    );
    Ok(())
}
