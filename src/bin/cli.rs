//! patronkv CLI
//!
//! Command-line interface over a snapshot-backed store.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use patronkv::{Config, DayBoundary, MemoryStore, PatronError, StaticIdentity, User, UserService};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Failures of the CLI itself, on top of library errors
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Patron(#[from] PatronError),

    #[error("No such user: {0}")]
    UnknownUser(String),

    #[error("Bad date {input:?}: {reason}")]
    BadDate { input: String, reason: String },
}

type CliResult<T> = std::result::Result<T, CliError>;

/// patronkv CLI
#[derive(Parser, Debug)]
#[command(name = "patronkv")]
#[command(about = "Users, library cards and vacations over a key-value store")]
#[command(version)]
struct Args {
    /// Snapshot file
    #[arg(short, long, default_value = "./patronkv.db")]
    data_file: String,

    /// Authenticated caller email (omit for an anonymous caller)
    #[arg(short, long)]
    caller: Option<String>,

    /// Treat the caller as an administrator
    #[arg(long)]
    admin: bool,

    /// Use UTC midnight instead of local midnight for day boundaries
    #[arg(long)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a user (the caller when no email is given), creating it if new
    Login {
        email: Option<String>,
    },

    /// Look up a user without creating it
    Find {
        email: String,
    },

    /// Report whether the caller is an administrator
    Admin,

    /// List a user's library cards
    Cards {
        email: String,
    },

    /// Look up one library card
    Card {
        email: String,
        filter: String,
    },

    /// Add a library card to a user
    AddCard {
        email: String,
        filter: String,
    },

    /// List a user's vacations
    Vacations {
        email: String,
    },

    /// Add a vacation (dates as RFC 3339 or YYYY-MM-DD)
    AddVacation {
        email: String,
        start: String,
        end: String,
    },

    /// Print the day a user is next available, pruning expired vacations
    VacationEnds {
        email: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,patronkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("patronkv v{}", patronkv::VERSION);
    tracing::debug!("Data file: {}", args.data_file);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> CliResult<()> {
    let boundary = if args.utc {
        DayBoundary::Utc
    } else {
        DayBoundary::Local
    };

    let config = Config::builder()
        .data_file(&args.data_file)
        .day_boundary(boundary)
        .build();

    let identity = match args.caller {
        Some(email) => StaticIdentity::caller(email).with_admin(args.admin),
        None => StaticIdentity::anonymous(),
    };

    let store = MemoryStore::open(&config)?;
    let service = UserService::new(store, identity, &config)?;

    match args.command {
        Commands::Login { email } => {
            let user = match email {
                Some(email) => service.find_or_create(&email)?,
                None => service.find_or_create_caller()?,
            };
            print_user(&user);
        }
        Commands::Find { email } => match service.find(&email)? {
            Some(user) => print_user(&user),
            None => println!("(no such user)"),
        },
        Commands::Admin => println!("{}", service.is_admin()),
        Commands::Cards { email } => {
            let user = existing(&service, &email)?;
            for card in service.library_cards(&user)? {
                println!("{}", card.filter());
            }
        }
        Commands::Card { email, filter } => {
            let user = existing(&service, &email)?;
            match service.library_card(&user, &filter)? {
                Some(card) => println!("{}\t{}", card.owner(), card.filter()),
                None => println!("(no such card)"),
            }
        }
        Commands::AddCard { email, filter } => {
            let user = existing(&service, &email)?;
            service.add_library_card(&user, &filter)?;
        }
        Commands::Vacations { email } => {
            let user = existing(&service, &email)?;
            for v in service.all_vacations(&user)? {
                println!("{}\t{}\t{}", v.id(), v.start.to_rfc3339(), v.end.to_rfc3339());
            }
        }
        Commands::AddVacation { email, start, end } => {
            let user = existing(&service, &email)?;
            let vacation = service.add_vacation(&user, parse_date(&start)?, parse_date(&end)?)?;
            println!("{}", vacation.id());
        }
        Commands::VacationEnds { email } => {
            let user = existing(&service, &email)?;
            println!("{}", service.vacation_ends(&user)?.to_rfc3339());
        }
    }

    service.records().store().flush()?;
    Ok(())
}

/// Users named on the command line must already exist
fn existing(service: &UserService<MemoryStore, StaticIdentity>, email: &str) -> CliResult<User> {
    service
        .find(email)?
        .ok_or_else(|| CliError::UnknownUser(email.to_string()))
}

fn print_user(user: &User) {
    println!("{}\tlast login {}", user.email(), user.last_login.to_rfc3339());
}

/// RFC 3339, or a bare date meaning midnight UTC
fn parse_date(s: &str) -> CliResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| CliError::BadDate {
            input: s.to_string(),
            reason: e.to_string(),
        })
}
