// File: ./src/cli.rs
//! Command-line interface: argument definitions and command dispatch.
use crate::classifier::{ClassificationReport, InvalidDatePolicy};
use crate::config::Config;
use crate::context::{AppContext, StandardContext};
use crate::error::ShelfLifeError;
use crate::ingest;
use crate::logging;
use crate::model::RecordId;
use crate::model::dates::DateParser;
use crate::report::{self, ExportFormat};
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "shelflife",
    version,
    about = "Product shelf-life analysis: which items are still consumable?"
)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Use a different directory for config, data and logs"
    )]
    pub root: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "DATE",
        help = "Evaluate against this date instead of today"
    )]
    pub today: Option<String>,
    #[arg(
        long,
        global = true,
        value_enum,
        help = "How to treat rows with unparseable dates (overrides config)"
    )]
    pub on_invalid: Option<InvalidDatePolicy>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More log output (repeatable)")]
    pub verbose: u8,
    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Consumable vs not consumable counts and shares
    Summary { file: PathBuf },
    /// Every classified record with its derived values
    List { file: PathBuf },
    /// Detail and shelf-life bar for one record, by id or by name
    Show {
        file: PathBuf,
        #[arg(required_unless_present = "name", conflicts_with = "name")]
        id: Option<RecordId>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Write the classified table to a file or stdout
    Export {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(short, long, help = "Destination file (defaults to stdout)")]
        output: Option<PathBuf>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with the default settings
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
}

/// Parses `--today` with the same date rules as the CSV cells, or captures
/// the local date once for the whole run.
pub fn resolve_evaluation_date(arg: Option<&str>, parser: &DateParser) -> Result<NaiveDate> {
    match arg {
        Some(raw) => parser
            .parse(raw)
            .map(|dt| dt.date())
            .ok_or_else(|| anyhow::anyhow!("Invalid --today date '{}'", raw)),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = StandardContext::new(cli.root.clone());
    let mut config = match Config::load_or_default(&ctx) {
        Ok(cfg) => cfg,
        // A broken file must not block replacing it
        Err(_)
            if matches!(
                cli.command,
                Commands::Config {
                    command: ConfigCommands::Init { force: true }
                }
            ) =>
        {
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let level = logging::resolve_level(config.log_level.to_filter(), cli.verbose, cli.quiet);
    logging::init(&ctx, level);

    if let Some(policy) = cli.on_invalid {
        config.on_invalid_date = policy;
    }

    let evaluation_date = resolve_evaluation_date(cli.today.as_deref(), &config.date_parser())?;
    log::debug!("Evaluation date: {}", evaluation_date);

    match cli.command {
        Commands::Summary { file } => {
            let report = load_report(&config, &file, evaluation_date)?;
            if cli.json {
                println!("{}", report::summary_json(&report)?);
            } else {
                print!("{}", report::render_summary(&report, config.bar_width()));
            }
        }
        Commands::List { file } => {
            let report = load_report(&config, &file, evaluation_date)?;
            if cli.json {
                println!("{}", report::report_json(&report)?);
            } else {
                print!("{}", report::render_list(&report));
            }
        }
        Commands::Show { file, id, name } => {
            let report = load_report(&config, &file, evaluation_date)?;
            let selected = select_records(&report, id, name.as_deref())?;
            if cli.json {
                println!("{}", report::records_json(&selected)?);
            } else {
                let scale = report.shelf_life_scale();
                let blocks: Vec<String> = selected
                    .iter()
                    .map(|r| report::render_detail(r, config.bar_width(), scale))
                    .collect();
                print!("{}", blocks.join("\n"));
            }
        }
        Commands::Export {
            file,
            format,
            output,
        } => {
            let report = load_report(&config, &file, evaluation_date)?;
            let body = report::export(&report, format)?;
            match output {
                Some(path) => {
                    LocalStorage::atomic_write(&path, body)?;
                    eprintln!(
                        "Exported {} records to {}",
                        report.records.len(),
                        path.display()
                    );
                }
                None => print!("{}", body),
            }
            if !report.excluded.is_empty() {
                eprint!("{}", report::render_excluded(&report.excluded));
            }
        }
        Commands::Config { command } => run_config(&ctx, &config, command)?,
    }

    Ok(())
}

fn load_report(config: &Config, file: &Path, evaluation_date: NaiveDate) -> Result<ClassificationReport> {
    let rows = ingest::read_csv_path(file, &config.input_options()?)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    let report = config.classifier().run(&rows, evaluation_date)?;
    Ok(report)
}

fn select_records<'a>(
    report: &'a ClassificationReport,
    id: Option<RecordId>,
    name: Option<&str>,
) -> Result<Vec<&'a crate::model::ClassifiedRecord>> {
    if let Some(id) = id {
        if let Some(record) = report.get(id) {
            return Ok(vec![record]);
        }
        if let Some(row) = report.excluded_row(id) {
            return Err(anyhow::anyhow!("Record {} was excluded: {}", id, row));
        }
        return Err(ShelfLifeError::RecordNotFound(format!("#{}", id)).into());
    }

    let name = name.unwrap_or_default();
    let found = report.find_by_name(name);
    if found.is_empty() {
        return Err(ShelfLifeError::RecordNotFound(name.to_string()).into());
    }
    Ok(found)
}

fn run_config(ctx: &dyn AppContext, config: &Config, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => {
            let path = ctx.get_config_file_path()?;
            if path.exists() && !force {
                return Err(anyhow::anyhow!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                ));
            }
            Config::default().save(ctx)?;
            println!("Wrote {}", path.display());
        }
        ConfigCommands::Show => print!("{}", toml::to_string_pretty(config)?),
        ConfigCommands::Path => println!("{}", Config::get_path_string(ctx)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_override_accepts_any_supported_format() {
        let parser = DateParser::default();
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(resolve_evaluation_date(Some("2024-05-01"), &parser).unwrap(), expected);
        assert_eq!(resolve_evaluation_date(Some("May 1, 2024"), &parser).unwrap(), expected);
        assert!(resolve_evaluation_date(Some("soon"), &parser).is_err());
    }

    #[test]
    fn today_override_follows_configured_date_order() {
        let config = Config {
            day_first: true,
            date_formats: vec!["%d|%m|%Y".to_string()],
            ..Config::default()
        };
        let parser = config.date_parser();
        assert_eq!(
            resolve_evaluation_date(Some("01/02/2024"), &parser).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(
            resolve_evaluation_date(Some("05|03|2024"), &parser).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn show_requires_id_or_name() {
        assert!(Cli::try_parse_from(["shelflife", "show", "x.csv"]).is_err());
        assert!(Cli::try_parse_from(["shelflife", "show", "x.csv", "4"]).is_ok());
        assert!(Cli::try_parse_from(["shelflife", "show", "x.csv", "--name", "Milk"]).is_ok());
        assert!(Cli::try_parse_from(["shelflife", "show", "x.csv", "4", "--name", "Milk"]).is_err());
    }
}
