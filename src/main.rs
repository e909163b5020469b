use std::{path::PathBuf, process::ExitCode};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use library_lending::{
    config::LOG_ENV_VAR, BookId, Category, Library, LibraryConfig, LibraryError, LibraryEvent,
    LibraryResult, LoanFilter, LoanStatus, MemberId, RecordId, Report,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line front end for the lending library
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON fixture file used to seed the stores instead of the built-in sample
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Evaluate loans as of this date (YYYY-MM-DD); defaults to today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// What to do
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Command {
    /// Show dashboard figures and the category breakdown
    Stats,
    /// Search the catalog
    Books {
        /// Substring matched against title, author and ISBN
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only show this category
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Search the member roster
    Members {
        /// Substring matched against name and e-mail
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List lending records
    Loans {
        /// Substring matched against book title and member name
        #[arg(short, long)]
        search: Option<String>,
        /// Only show this status (borrowed, returned or overdue)
        #[arg(long)]
        status: Option<LoanStatus>,
    },
    /// Lend a book to a member
    Checkout {
        /// Book id
        #[arg(long)]
        book: String,
        /// Member id
        #[arg(long)]
        member: String,
    },
    /// Take a book back
    Return {
        /// Lending record id
        #[arg(long)]
        record: String,
    },
    /// Walk through a checkout, a refused checkout and a return
    Demo,
}

/// Install the tracing subscriber, filtered by `LIBRARY_LOG`
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Build the library and dispatch the subcommand
fn run(args: Args) -> LibraryResult<()> {
    let mut config = LibraryConfig::load(args.config.as_deref())?;
    if let Some(path) = &args.fixtures {
        config.fixtures = Some(path.clone());
    }
    let mut library = Library::from_config(&config)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    match args.command {
        Command::Stats => {
            println!("{}", Report::dashboard(&library.stats(today)));
        }
        Command::Books { search, category } => {
            println!("{}", Report::books_table(&library.search_books(&search, category)));
        }
        Command::Members { search } => {
            println!("{}", Report::members_table(&library.search_members(&search)));
        }
        Command::Loans { search, status } => {
            let filter = LoanFilter { term: search, status };
            println!("{}", Report::loans_table(&library.query_loans(today, &filter)));
        }
        Command::Checkout { book, member } => {
            let event = library.checkout(&BookId::new(book), &MemberId::new(member), today)?;
            print_event(&event);
        }
        Command::Return { record } => {
            let event = library.return_book(&RecordId::new(record), today)?;
            print_event(&event);
        }
        Command::Demo => demo(&mut library, today)?,
    }

    Ok(())
}

/// Print a change in colour
fn print_event(event: &LibraryEvent) {
    let text = event.describe();
    match event {
        LibraryEvent::Returned(record) if !record.fine.is_zero() => println!("{}", text.yellow()),
        LibraryEvent::CheckedOut(record) => {
            println!("{}", text.green());
            println!("Record id: {}", record.id.to_string().bold());
        }
        _ => println!("{}", text.green()),
    }
}

/// Simulate a short session against the loaded stores
fn demo(library: &mut Library, today: NaiveDate) -> LibraryResult<()> {
    println!("{}", "Lending library demonstration".green().bold());
    println!("=====================================\n");
    println!("Loaded: {library}\n");

    let book = library.search_books("", None).into_iter().find(|book| book.is_available()).cloned();
    let members = library.search_members("");
    let active = members.iter().find(|member| member.is_active()).copied().cloned();
    let suspended = members.iter().find(|member| !member.is_active()).copied().cloned();

    if let (Some(book), Some(member)) = (&book, &active) {
        println!("{}", format!("Checking out {} for {}...", book.title, member.name).yellow().bold());
        let event = library.checkout(&book.id, &member.id, today)?;
        print_event(&event);

        if let LibraryEvent::CheckedOut(record) = &event {
            println!("\n{}", "Returning it the same day...".yellow().bold());
            let returned = library.return_book(&record.id, today)?;
            print_event(&returned);
        }
    } else {
        println!("{}", "No available book and active member to lend to.".yellow());
    }

    if let (Some(book), Some(member)) = (&book, &suspended) {
        println!("\n{}", format!("Trying a checkout for suspended member {}...", member.name).yellow().bold());
        match library.checkout(&book.id, &member.id, today) {
            Ok(event) => print_event(&event),
            Err(e @ LibraryError::InvalidCheckout(_)) => println!("{} {e}", "Refused:".red()),
            Err(e) => return Err(e),
        }
    }

    println!("\n{}", "Ledger".bold());
    println!("{}", Report::loans_table(&library.loans(today)));
    println!("{}", Report::dashboard(&library.stats(today)));
    println!("{}", "Recent activity".bold());
    println!("{}", Report::activity(library.recent_activity()));

    println!("{}", "Demonstration complete!".green().bold());
    Ok(())
}
