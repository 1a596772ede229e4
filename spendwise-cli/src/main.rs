use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use spendwise_finance::{
    detection_notice, draft_record, parse_manual_amount, Notifier, RecordKind, TracingNotifier,
};
use spendwise_ingest::{MessageParser, TransactionCandidate};
use std::io::{self, Read};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "spendwise", version, about = "Detect transactions in bank SMS/email text")]
struct Cli {
    /// Log parser decisions (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a message and print the detected transaction
    Parse {
        /// Message text (read from stdin when omitted)
        text: Option<String>,

        /// Print the candidate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a message and draft a record from it
    Add {
        /// Message text (read from stdin when omitted)
        text: Option<String>,

        /// Book as income instead of expense
        #[arg(long)]
        income: bool,

        /// Amount to use when none is found in the message
        #[arg(long)]
        amount: Option<String>,

        /// Date to use when none is found in the message (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Manage ~/.spendwise/config.toml
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

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    });

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Parse { text, json } => {
            let parser = load_parser()?;
            let message = read_message(text)?;
            let candidate = parser.parse(&message);
            TracingNotifier.notify(&detection_notice(candidate.as_ref()));

            let Some(c) = candidate else {
                return Ok(ExitCode::FAILURE);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&c)?);
            } else {
                print_candidate(&c);
            }
        }

        Command::Add {
            text,
            income,
            amount,
            date,
        } => {
            let parser = load_parser()?;
            let message = read_message(text)?;
            let Some(candidate) = parser.parse(&message) else {
                TracingNotifier.notify(&detection_notice(None));
                bail!("no transaction found in message");
            };

            let manual = amount
                .as_deref()
                .map(parse_manual_amount)
                .transpose()
                .context("parsing --amount")?;
            let kind = if income {
                RecordKind::Income
            } else {
                RecordKind::Expense
            };
            let today = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            let draft = draft_record(&candidate, kind, manual, today)
                .context("pass --amount <AMT> to supply it")?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn load_parser() -> Result<MessageParser> {
    let cfg = config::load_config()?;
    debug!(config = ?cfg.parser, "parser config loaded");
    MessageParser::new(cfg.parser).context("invalid [parser] section in config.toml")
}

fn read_message(text: Option<String>) -> Result<String> {
    if let Some(t) = text {
        return Ok(t);
    }
    let mut s = String::new();
    io::stdin()
        .read_to_string(&mut s)
        .context("read message from stdin")?;
    Ok(s)
}

fn print_candidate(c: &TransactionCandidate) {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    println!("Direction:    {}", c.direction);
    println!(
        "Amount:       {}",
        c.amount
            .map(|a| format!("₹{a}"))
            .unwrap_or_else(|| "(not detected)".to_string())
    );
    println!("Counterparty: {}", or_dash(c.counterparty.clone()));
    println!("Date:         {}", or_dash(c.occurred_on.map(|d| d.to_string())));
}

fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{bin}={level},spendwise_ingest={level},spendwise_finance={level}",
            bin = env!("CARGO_CRATE_NAME"),
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
