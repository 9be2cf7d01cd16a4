use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use bargain_hunter::config::AppConfig;
use bargain_hunter::core::BargainHunter;
use bargain_hunter::search::{SearchParams, SearchProgress};
use bargain_hunter::utils::{format_price, truncate_string};

#[derive(Parser)]
#[command(name = "bh-cli")]
#[command(about = "Bargain Hunter Command Line Interface")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Enable verbose logging")]
    verbose: bool,

    #[arg(short, long, help = "Configuration file path")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the deal catalog
    Search {
        #[arg(help = "Search keywords")]
        query: String,

        #[arg(short, long, help = "Page number (1-based)")]
        page: Option<usize>,

        #[arg(short, long, help = "Deals per page")]
        limit: Option<usize>,

        #[arg(long, help = "Only deals in this category")]
        category: Option<String>,

        #[arg(long, help = "Print the raw JSON response")]
        json: bool,
    },

    /// Ask a product question
    Ask {
        #[arg(help = "Question text")]
        question: String,

        #[arg(long, help = "Also print the findings the answer is based on")]
        sources: bool,
    },

    /// Send one chat message and print the reply
    Chat {
        #[arg(help = "Message text")]
        message: String,
    },

    /// Show how a message would be routed
    Classify {
        #[arg(help = "Message text")]
        message: String,
    },

    /// List catalog categories
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("bargain_hunter={},bh_cli={}", log_level, log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Bargain Hunter CLI v{}", env!("CARGO_PKG_VERSION"));

    let config = if let Some(config_path) = cli.config {
        AppConfig::load_from_file(&config_path).await?
    } else {
        AppConfig::load().await?
    };

    let app = BargainHunter::new(config).await?;

    match cli.command {
        Commands::Search { query, page, limit, category, json } => {
            let mut params = SearchParams::new(query);
            params.page = page;
            params.limit = limit;
            params.category = category;
            search(&app, params, json).await?;
        }
        Commands::Ask { question, sources } => {
            ask(&app, &question, sources).await;
        }
        Commands::Chat { message } => {
            chat(&app, &message).await?;
        }
        Commands::Classify { message } => {
            let decision = app.classify_with_decision(&message);
            println!("{:?}", decision.kind);
            if let Some(keyword) = decision.keyword {
                println!("matched keyword: {}", keyword);
            }
        }
        Commands::Categories => {
            for category in app.categories() {
                println!("{}", category);
            }
        }
    }

    Ok(())
}

async fn search(app: &BargainHunter, params: SearchParams, json: bool) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let SearchProgress::Started { query } = event {
                eprintln!("Searching deals for \"{}\"...", query);
            }
        }
    });

    let response = app.search_deals_with_progress(&params, &tx).await;
    drop(tx);
    progress.await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.deals.is_empty() {
        println!("No deals found.");
        return Ok(());
    }

    println!("{:<4} {:<40} {:>10} {:>6} {:<12}", "ID", "Title", "Price", "Off", "Merchant");
    println!("{}", "-".repeat(76));
    for deal in &response.deals {
        println!(
            "{:<4} {:<40} {:>10} {:>5}% {:<12}",
            deal.id,
            truncate_string(&deal.title, 40),
            format_price(deal.price),
            deal.discount_percentage,
            deal.merchant
        );
    }
    println!();
    println!(
        "{} of {} deals{}",
        response.deals.len(),
        response.total,
        if response.has_more { " (more available)" } else { "" }
    );

    Ok(())
}

async fn ask(app: &BargainHunter, question: &str, show_sources: bool) {
    let answer = app.answer_question(question).await;
    println!("{}", answer.answer);

    if show_sources {
        println!();
        println!("Sources ({:?}):", answer.origin);
        for source in &answer.sources {
            println!("  - {}", source);
        }
    }
}

async fn chat(app: &BargainHunter, message: &str) -> Result<()> {
    let mut session = app.new_session();

    match app.handle_message(&mut session, message).await? {
        Some(reply) => {
            println!("{}", reply.content);
            for deal in &reply.deals {
                println!("  - {} ({}, {})", deal.title, format_price(deal.price), deal.merchant);
            }
        }
        None => println!("Nothing to send."),
    }

    Ok(())
}
