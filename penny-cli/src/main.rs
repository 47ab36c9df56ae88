use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use penny_core::{AlertLog, BudgetBook, BudgetStatus, Transaction};
use penny_ingest::{Extractor, JsonFileSource, JsonLedgerStore};
use std::path::PathBuf;

mod config;
mod logging;
mod state;

use config::{Config, PathsSection};

const BREACH_MESSAGE: &str = "Budget limit exceeded! You are overspending.";

#[derive(Parser, Debug)]
#[command(name = "penny", version, about = "Track bank SMS debits against a monthly budget")]
struct Cli {
    /// Config file (default: ~/.penny/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the next unprocessed debit SMS, record it, and check the budget
    Read,

    /// Forget which SMS ids were processed so they can be read again
    Reset,

    /// Monthly budget commands
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Show budget, spending this month, and where it stands
    Status,

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Set the monthly budget (clears the transaction log)
    Set { amount: f64 },
    Show,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let home = state::ensure_penny_home()?;
    let config_path = match cli.config {
        Some(p) => p,
        None => config::config_path()?,
    };
    let cfg = config::load_config(&config_path)?;
    logging::init_logging(&cfg.log.level, cli.verbose);

    let paths = cfg.paths.resolved(&home);
    let today = Local::now().date_naive();

    match cli.command {
        Command::Read => {
            let outcome = read(&cfg, &paths, today)?;
            match &outcome.transaction {
                Some(tx) => print_transaction(tx),
                None => println!("No new debit SMS found."),
            }
            if outcome.breached {
                println!("[ALERT] {}", BREACH_MESSAGE);
            } else {
                println!("All good. Budget not yet breached.");
            }
        }

        Command::Reset => {
            let mut extractor = open_extractor(&cfg, &paths);
            let cleared = extractor.ledger().len();
            extractor.reset().context("reset processed SMS ids")?;
            println!("Cleared {} processed SMS id(s)", cleared);
        }

        Command::Budget { command } => match command {
            BudgetCommand::Set { amount } => {
                let mut book = open_book(&paths)?;
                book.set_monthly(amount).context("update monthly budget")?;
                println!("Monthly budget set to {}", format_naira(amount));
            }
            BudgetCommand::Show => {
                let book = open_book(&paths)?;
                println!("Monthly budget: {}", format_naira(book.monthly()));
            }
        },

        Command::Status => {
            let book = open_book(&paths)?;
            print_status(&book, today);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
            ConfigCommand::Show => {
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn open_extractor(
    cfg: &Config,
    paths: &PathsSection,
) -> Extractor<JsonFileSource, JsonLedgerStore> {
    Extractor::new(
        JsonFileSource::new(&paths.sms_file),
        JsonLedgerStore::new(&paths.ledger_file),
        cfg.extract.clone(),
    )
}

fn open_book(paths: &PathsSection) -> Result<BudgetBook> {
    BudgetBook::open(&paths.budget_file, &paths.transactions_file).with_context(|| {
        format!(
            "open budget {} / transactions {}",
            paths.budget_file.display(),
            paths.transactions_file.display()
        )
    })
}

/// Result of one `penny read`
#[derive(Debug)]
struct ReadOutcome {
    transaction: Option<Transaction>,
    breached: bool,
}

/// Extract at most one transaction, record it, and raise an alert on breach.
fn read(cfg: &Config, paths: &PathsSection, today: NaiveDate) -> Result<ReadOutcome> {
    let mut book = open_book(paths)?;
    let mut extractor = open_extractor(cfg, paths);
    tracing::debug!(
        sms = %paths.sms_file.display(),
        ledger = %paths.ledger_file.display(),
        "reading SMS batch"
    );

    let transaction = extractor
        .next_transaction()
        .context("extract transaction from SMS")?;

    if let Some(tx) = &transaction {
        // The SMS id is already in the ledger; a failed write here loses the
        // transaction unless it is re-entered by hand.
        if let Err(e) = book.record(tx.clone()) {
            let id = extractor.last_processed().unwrap_or("?");
            tracing::error!(
                id,
                amount = tx.amount,
                date = %tx.date,
                source = %tx.source,
                error = %e,
                "SMS marked processed but transaction not recorded"
            );
            return Err(e).with_context(|| {
                format!(
                    "record transaction from SMS {} ({} on {})",
                    id, tx.amount, tx.date
                )
            });
        }
    }

    let breached = book.is_breached(today);
    if breached {
        AlertLog::new(&paths.alert_file)
            .raise(BREACH_MESSAGE)
            .context("log budget alert")?;
    }

    Ok(ReadOutcome {
        transaction,
        breached,
    })
}

fn print_transaction(tx: &Transaction) {
    println!(
        "[{}] {} | {} | {}",
        tx.kind.as_str(),
        format_naira(tx.amount),
        tx.date,
        tx.source
    );
}

fn print_status(book: &BudgetBook, today: NaiveDate) {
    println!("Monthly budget: {}", format_naira(book.monthly()));
    println!(
        "Spent in {}: {}",
        today.format("%B %Y"),
        format_naira(book.monthly_spending(today))
    );
    match book.status(today) {
        BudgetStatus::NoBudget => println!("No budget set"),
        BudgetStatus::Over { by } => println!("Over budget by {}", format_naira(by)),
        BudgetStatus::Under { remaining } => println!("Remaining: {}", format_naira(remaining)),
    }
}

/// `₦1,234.56`
fn format_naira(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}₦{grouped}.{frac}")
}
