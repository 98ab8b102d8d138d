//! Command-line interface.

pub mod render;

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};

use crate::config::{ClientConfig, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_SECS};
use crate::error::TaricResult;
use crate::model::TradeMovement;
use crate::protocol::DATE_FORMAT;
use crate::services::batch::{self, BatchOptions, DEFAULT_COLUMN};
use crate::services::TaricClient;

/// EU TARIC customs tariff lookups
#[derive(Parser, Debug)]
#[command(name = "taric-match")]
#[command(about = "EU TARIC customs tariff lookups")]
#[command(version)]
pub struct Cli {
    /// TARIC service endpoint
    #[arg(long, global = true, env = "TARIC_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "TARIC_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Serve the local substitute dataset without calling the service
    #[arg(
        long,
        global = true,
        env = "TARIC_MOCK",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up the description of a goods code
    Describe(DescribeArgs),
    /// Look up the duty measures applicable to a goods code
    #[command(alias = "query")]
    Measure(MeasureArgs),
    /// Look up measures for every goods code in a CSV column
    Batch(BatchArgs),
    /// Print the version
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// TARIC goods code (4-10 digits)
    pub goods_code: String,

    /// Language code (EN, ZH, FR, DE, ...)
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub lang: String,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct MeasureArgs {
    /// TARIC goods code (4-10 digits)
    pub goods_code: String,

    /// Country code (ISO 2 letters, e.g. CN, US)
    #[arg(long, env = "TARIC_COUNTRY")]
    pub country: Option<String>,

    /// Trade movement: I (import), E (export) or IE (both)
    #[arg(long, default_value = "I")]
    pub movement: TradeMovement,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV file with a column of goods codes
    pub input: PathBuf,

    /// Where to write the result CSV
    #[arg(long, short, default_value = "taric_measures.csv")]
    pub output: PathBuf,

    /// Name of the goods code column
    #[arg(long, default_value = DEFAULT_COLUMN)]
    pub column: String,

    /// Country code (ISO 2 letters, e.g. CN, US)
    #[arg(long, env = "TARIC_COUNTRY")]
    pub country: Option<String>,

    /// Trade movement: I (import), E (export) or IE (both)
    #[arg(long, default_value = "I")]
    pub movement: TradeMovement,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD, got '{s}': {e}"))
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_api_url(self.api_url.as_deref())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_force_substitute(self.mock)
    }
}

pub fn version_line() -> String {
    format!("taric-match v{}", env!("CARGO_PKG_VERSION"))
}

pub fn execute(cli: Cli) -> TaricResult<()> {
    if let Commands::Version = cli.command {
        println!("{}", version_line());
        return Ok(());
    }

    let client = TaricClient::new(cli.client_config())?;
    if client.config().force_substitute {
        info!("substitute mode: the TARIC service will not be called");
    } else {
        debug!("TARIC endpoint {}", client.config().api_url);
    }

    match cli.command {
        Commands::Describe(args) => {
            let result = client.describe(&args.goods_code, Some(args.lang.as_str()), args.date);
            match args.format {
                OutputFormat::Table => print!("{}", render::description_table(&result)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }
        Commands::Measure(args) => {
            let result = client.lookup_measures(
                &args.goods_code,
                args.country.as_deref(),
                args.movement,
                args.date,
            );
            match args.format {
                OutputFormat::Table => print!("{}", render::measures_tables(&result)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }
        Commands::Batch(args) => {
            let opts = BatchOptions {
                input: args.input,
                output: args.output,
                column: args.column,
                country_code: args.country,
                trade_movement: args.movement,
                reference_date: args.date,
            };
            info!("batch lookup {} -> {}", opts.input.display(), opts.output.display());
            let report = batch::run(&client, &opts)?;

            let mut table = render::Table::new("Batch summary", &["Field", "Value"]);
            table.add_row(&["Codes", &report.codes.to_string()]);
            table.add_row(&["Rows written", &report.rows.to_string()]);
            table.add_row(&["Placeholder rows", &report.placeholders.to_string()]);
            table.add_row(&["Substituted rows", &report.substituted.to_string()]);
            table.add_row(&["Output", &opts.output.display().to_string()]);
            print!("{}", table.render());
        }
        Commands::Version => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn query_is_an_alias_of_measure() {
        let cli = Cli::try_parse_from([
            "taric-match",
            "query",
            "87032319",
            "--country",
            "cn",
            "--movement",
            "IE",
        ])
        .unwrap();
        match cli.command {
            Commands::Measure(args) => {
                assert_eq!(args.goods_code, "87032319");
                assert_eq!(args.country.as_deref(), Some("cn"));
                assert_eq!(args.movement, TradeMovement::Both);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn describe_defaults() {
        let cli = Cli::try_parse_from(["taric-match", "--mock", "describe", "87032319"]).unwrap();
        assert!(cli.mock);
        let cfg = cli.client_config();
        assert!(cfg.force_substitute);
        match cli.command {
            Commands::Describe(args) => {
                assert_eq!(args.lang, "EN");
                assert_eq!(args.date, None);
                assert_eq!(args.format, OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bad_date_is_rejected() {
        let res = Cli::try_parse_from(["taric-match", "describe", "8703", "--date", "15/01/2024"]);
        assert!(res.is_err());
    }

    #[test]
    fn bad_movement_is_rejected() {
        let res = Cli::try_parse_from(["taric-match", "measure", "8703", "--movement", "X"]);
        assert!(res.is_err());
    }

    #[test]
    fn api_url_flag_reaches_config() {
        let cli = Cli::try_parse_from([
            "taric-match",
            "--api-url",
            "https://custom.api/taric",
            "--timeout",
            "5",
            "version",
        ])
        .unwrap();
        let cfg = cli.client_config();
        assert_eq!(cfg.api_url, "https://custom.api/taric");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn version_line_has_crate_version() {
        assert_eq!(version_line(), format!("taric-match v{}", env!("CARGO_PKG_VERSION")));
    }
}
