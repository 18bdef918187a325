//! quote-queue - Manage the quote inventory
//!
//! Unix-style tool for inspecting and topping up the stored quotations.

use clap::{Parser, Subcommand};
use libquotecast::{Config, QuoteStore, QuotecastError, Result};

#[derive(Parser, Debug)]
#[command(name = "quote-queue")]
#[command(version)]
#[command(about = "Manage the quote inventory")]
#[command(long_about = "\
quote-queue - Manage the quote inventory

DESCRIPTION:
    quote-queue is a Unix-style tool for inspecting the Quotecast quote
    inventory. Use it to view statistics, list stored quotations, or add
    a quotation by hand.

    Quotes are never deleted: once published they stay in the store with
    their consumption flag set, which is what prevents reposting.

COMMANDS:
    stats   Show inventory statistics
    list    List stored quotes
    add     Add a quote manually

USAGE EXAMPLES:
    # Show how many quotes are left
    quote-queue stats

    # List the ten most recent quotes in JSON format
    quote-queue list --limit 10 --format json

    # List only quotes still eligible for publishing
    quote-queue list --unused

    # Add a quote by hand
    quote-queue add \"Be yourself.\" --author \"Anon\"

CONFIGURATION:
    Configuration file: ~/.config/quotecast/config.toml
    Database location: ~/.local/share/quotecast/quotes.db

    Override with environment variables:
        QUOTECAST_CONFIG - Path to config file

EXIT CODES:
    0 - Success
    1 - Operation failed
    3 - Invalid input
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show inventory statistics
    Stats {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List stored quotes
    List {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Only show quotes that have not been published yet
        #[arg(short, long)]
        unused: bool,

        /// Maximum number of quotes to show
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Add a quote manually
    Add {
        /// The quotation text
        text: String,

        /// The quotation author
        #[arg(short, long, default_value = "Unknown")]
        author: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("error")
            .with_writer(std::io::stderr)
            .init();
    }

    // Run the main logic and handle errors
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Only the store is needed here; credentials are not validated.
    let config = Config::load()?;
    let store = QuoteStore::open(&config.store.path).await?;

    match cli.command {
        Commands::Stats { format } => {
            validate_format(&format)?;
            cmd_stats(&store, &format).await?;
        }
        Commands::List {
            format,
            unused,
            limit,
        } => {
            validate_format(&format)?;
            cmd_list(&store, &format, unused, limit).await?;
        }
        Commands::Add { text, author } => {
            cmd_add(&store, &text, &author).await?;
        }
    }

    Ok(())
}

fn validate_format(format: &str) -> Result<()> {
    if format != "text" && format != "json" {
        return Err(QuotecastError::InvalidInput(format!(
            "Unknown format '{}'. Valid options: text, json",
            format
        )));
    }
    Ok(())
}

/// Show inventory statistics
async fn cmd_stats(store: &QuoteStore, format: &str) -> Result<()> {
    let total = store.count_total().await?;
    let unused = store.count_unused().await?;
    let used = total - unused;

    if format == "json" {
        let stats = serde_json::json!({
            "total": total,
            "unused": unused,
            "used": used,
        });
        println!("{}", serde_json::to_string_pretty(&stats).unwrap());
    } else {
        println!("Total quotes: {}", total);
        println!("Unused:       {}", unused);
        println!("Used:         {}", used);
    }

    Ok(())
}

/// List stored quotes
async fn cmd_list(store: &QuoteStore, format: &str, unused: bool, limit: u32) -> Result<()> {
    let quotes = if unused {
        store.take_unused(limit).await?
    } else {
        store.list_recent(limit).await?
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&quotes).unwrap());
        return Ok(());
    }

    if quotes.is_empty() {
        println!("No quotes stored");
        return Ok(());
    }

    for quote in quotes {
        let marker = if quote.used { "used  " } else { "unused" };
        println!("{:>5} [{}] {} - {}", quote.id, marker, quote.text, quote.author);
    }

    Ok(())
}

/// Add a quote manually
async fn cmd_add(store: &QuoteStore, text: &str, author: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QuotecastError::InvalidInput(
            "Quote text cannot be empty".to_string(),
        ));
    }

    if store.insert_if_new(text, author.trim()).await? {
        println!("Added: {} - {}", text, author.trim());
    } else {
        println!("Already stored, ignoring: {}", text);
    }

    Ok(())
}
