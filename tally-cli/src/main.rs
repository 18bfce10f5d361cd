use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tally_core::Direction;
use tally_finance::{
    CategoryClassifier, ClassificationRequest, Classifier, KeywordClassifier, RemoteClassifier,
    Utf8Extractor, import_statement,
};

mod config;
mod logging;
mod state;

use config::{Config, Provider};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Parse, classify, and audit bank statements")]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an extracted statement and print it as JSON
    Parse {
        /// Statement text file
        file: PathBuf,

        /// Year used when the header carries none (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// Compare recomputed totals against the declared ones
        #[arg(long)]
        strict: bool,

        /// Classify categories with the remote classifier
        #[arg(long)]
        remote: bool,

        #[arg(long)]
        pretty: bool,
    },

    /// Classify a single transaction description
    Classify {
        description: String,

        #[arg(long, default_value = "0.00")]
        amount: Decimal,

        #[arg(long, value_enum, default_value_t = DirectionArg::Withdrawal)]
        direction: DirectionArg,

        #[arg(long)]
        remote: bool,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Deposit,
    Withdrawal,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Deposit => Direction::Deposit,
            DirectionArg::Withdrawal => Direction::Withdrawal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Parse {
            file,
            year,
            strict,
            remote,
            pretty,
        } => {
            let cfg = config::load_config(config_path)?;
            parse(&cfg, &file, year, strict, remote, pretty).await?;
        }

        Command::Classify {
            description,
            amount,
            direction,
            remote,
        } => {
            let cfg = config::load_config(config_path)?;
            let request = ClassificationRequest {
                description: tally_core::summarize_description(&description),
                amount: amount.abs(),
                direction: direction.into(),
            };
            let classifier = build_classifier(&cfg, remote)?;
            let classification = classifier
                .classify(&request)
                .await
                .with_context(|| format!("{} classifier", classifier.name()))?;
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_path)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(config_path)?;
                print!("{}", config::render_config(&cfg)?);
            }
        },
    }

    Ok(())
}

fn build_classifier(cfg: &Config, force_remote: bool) -> Result<Classifier> {
    if force_remote || cfg.classifier.provider == Provider::Openai {
        let remote = RemoteClassifier::new(cfg.remote_config()?);
        tracing::info!(model = %remote.config().model, "using remote classifier");
        Ok(Classifier::Remote(remote))
    } else {
        Ok(Classifier::Keyword(KeywordClassifier))
    }
}

async fn parse(
    cfg: &Config,
    file: &Path,
    year: Option<i32>,
    strict: bool,
    remote: bool,
    pretty: bool,
) -> Result<()> {
    if !file.exists() {
        bail!("statement not found: {}", file.display());
    }
    let bytes = std::fs::read(file).with_context(|| format!("read {}", file.display()))?;

    let options = tally_finance::ImportOptions {
        parse: cfg.parse_options(year),
        audit: cfg.audit_config(strict),
        batch: cfg.batch_options(),
    };
    let classifier = build_classifier(cfg, remote)?;

    let report = import_statement(&bytes, &options, &Utf8Extractor, &classifier)
        .await
        .with_context(|| format!("import {}", file.display()))?;

    let summary = &report.statement.summary;
    tracing::info!(
        transactions = report.statement.transactions.len(),
        dropped = report.dropped_lines,
        failed = report.failed.len(),
        passed = summary.audit_passed,
        "{}",
        summary.audit_status
    );

    let json = if pretty {
        serde_json::to_string_pretty(&report.statement)?
    } else {
        serde_json::to_string(&report.statement)?
    };
    println!("{json}");
    Ok(())
}
