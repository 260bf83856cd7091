use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payledger::application::ledger::LedgerService;
use payledger::domain::ports::{LedgerStoreBox, NotifierBox};
use payledger::domain::record::Submission;
use payledger::error::LedgerError;
use payledger::infrastructure::json_file::JsonFileStore;
use payledger::infrastructure::telegram::{NoopNotifier, TelegramNotifier};
use payledger::interfaces::callback::{CallbackOutcome, apply_callback};
use payledger::interfaces::intake::StatusReply;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ledger file
    #[arg(long, default_value = "payments.json")]
    ledger: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new payment as pending and notify the operator
    Submit {
        txn_id: String,
        /// Stable account identifier used for grant matching
        #[arg(long)]
        account: String,
        /// Display name shown in operator messages
        #[arg(long)]
        name: String,
        #[arg(long)]
        product: Option<String>,
        /// Path to the payment-screenshot evidence
        #[arg(long)]
        screenshot: Option<String>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        course: Option<String>,
    },
    /// Approve a pending payment
    Approve { txn_id: String },
    /// Reject a pending payment
    Reject { txn_id: String },
    /// Apply a raw callback token (approve_<id> / reject_<id>)
    Callback { token: String },
    /// Show the current status of a transaction
    Status { txn_id: String },
    /// List the product grants of an account
    Grants { account: String },
    /// List payments awaiting a decision
    Pending,
}

fn notifier_from_env() -> NotifierBox {
    match (env::var("BOT_TOKEN"), env::var("CHAT_ID")) {
        (Ok(token), Ok(chat_id)) => match TelegramNotifier::new(&token, &chat_id) {
            Ok(notifier) => Box::new(notifier),
            Err(e) => {
                tracing::warn!("telegram notifier unavailable: {e}");
                Box::new(NoopNotifier)
            }
        },
        _ => Box::new(NoopNotifier),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store: LedgerStoreBox = Box::new(JsonFileStore::new(&cli.ledger));
    let service = LedgerService::new(store, notifier_from_env());

    match cli.command {
        Command::Submit {
            txn_id,
            account,
            name,
            product,
            screenshot,
            amount,
            course,
        } => {
            let submission = Submission {
                txn_id,
                account,
                user: name,
                product,
                ss_path: screenshot,
                amount,
                course_name: course,
            };
            match service.submit(submission).await {
                Ok(record) => println!("submitted {} ({})", record.txn_id, record.status),
                Err(LedgerError::DuplicateTransaction(id)) => {
                    println!("duplicate {id}: this payment is already submitted")
                }
                Err(e) => return Err(e).into_diagnostic(),
            }
        }
        Command::Approve { txn_id } => resolve(&service, &txn_id, true).await?,
        Command::Reject { txn_id } => resolve(&service, &txn_id, false).await?,
        Command::Callback { token } => {
            match apply_callback(&service, &token).await.into_diagnostic()? {
                CallbackOutcome::Applied(status) => println!("applied: {status}"),
                CallbackOutcome::AlreadyProcessed(status) => {
                    println!("already processed ({status})")
                }
                CallbackOutcome::UnknownTransaction => println!("unknown transaction"),
                CallbackOutcome::MalformedToken => println!("malformed token"),
            }
        }
        Command::Status { txn_id } => {
            let status = service.status_of(&txn_id).await.into_diagnostic()?;
            let reply = StatusReply::from(status);
            println!("{}", serde_json::to_string(&reply).into_diagnostic()?);
        }
        Command::Grants { account } => {
            for product in service.approved_products_for(&account).await.into_diagnostic()? {
                println!("{product}");
            }
        }
        Command::Pending => {
            for record in service.pending().await.into_diagnostic()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.txn_id, record.account, record.product, record.submitted_at
                );
            }
        }
    }

    Ok(())
}

async fn resolve(service: &LedgerService, txn_id: &str, approve: bool) -> Result<()> {
    let result = if approve {
        service.approve(txn_id).await
    } else {
        service.reject(txn_id).await
    };
    match result {
        Ok(record) => println!("{} {}", record.status, record.txn_id),
        // Retrying a decided payment is a no-op, not a failure.
        Err(LedgerError::AlreadyResolved { txn_id, status }) => {
            println!("already processed {txn_id} ({status})")
        }
        Err(e) => return Err(e).into_diagnostic(),
    }
    Ok(())
}
