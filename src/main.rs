use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use bargain_hunter::config::AppConfig;
use bargain_hunter::core::{BargainHunter, ChatReply};
use bargain_hunter::logging::{LogContext, RequestIdGenerator};
use bargain_hunter::utils::format_price;

#[derive(Parser)]
#[command(name = "bargain-hunter")]
#[command(about = "Bargain Hunter shopping-deal assistant")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(short, long, help = "Configuration file path")]
    config: Option<String>,

    /// Serve the HTTP API instead of the interactive chat
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path).await?,
        None => AppConfig::load().await?,
    };

    init_logging(&config)?;
    info!("Starting {} v{}", config.brand.name, env!("CARGO_PKG_VERSION"));

    let app = Arc::new(BargainHunter::new(config).await?);
    info!("Core application initialized");

    #[cfg(feature = "api")]
    {
        if args.serve {
            return serve(app).await;
        }
    }

    run_chat(&app).await?;

    info!("{} shutting down", app.brand().name);
    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_dir = config.logging.log_directory();
    bargain_hunter::logging::init_logging(&config.logging, &log_dir)?;

    let context = LogContext::new("main", "startup")
        .with_request_id(RequestIdGenerator::generate())
        .with_string_field("version", env!("CARGO_PKG_VERSION"))
        .with_bool_field("completion_configured", config.assistant.is_configured());

    bargain_hunter::log_info!(context, "Bargain Hunter starting up");

    Ok(())
}

/// Line-oriented chat on stdin until EOF or "exit"
async fn run_chat(app: &BargainHunter) -> Result<()> {
    let mut session = app.new_session();
    let brand = app.brand();

    println!("{} - {}", brand.name, brand.tagline);
    println!();
    if let Some(welcome) = session.last() {
        println!("{}", welcome.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        match app.handle_message(&mut session, &line).await {
            Ok(Some(reply)) => print_reply(&reply),
            Ok(None) => {}
            Err(e) => {
                error!("Message rejected: {}", e);
                println!("Sorry, I couldn't process that message: {}", e);
            }
        }
    }

    Ok(())
}

fn print_reply(reply: &ChatReply) {
    println!("{}", reply.content);

    let now = chrono::Utc::now();
    for deal in &reply.deals {
        let hot = if deal.is_hot { " [HOT]" } else { "" };
        let ending = if deal.is_expiring_soon(now) { " [ENDS SOON]" } else { "" };
        println!(
            "  - {}{}{} | {} (was {}, {}% off) at {}",
            deal.title,
            hot,
            ending,
            format_price(deal.price),
            format_price(deal.original_price),
            deal.discount_percentage,
            deal.merchant
        );
        if let Some(code) = &deal.coupon_code {
            println!("    code: {}", code);
        }
        println!("    {}", deal.url);
    }
    println!();
}

#[cfg(feature = "api")]
async fn serve(app: Arc<BargainHunter>) -> Result<()> {
    use actix_web::{web, App, HttpServer};

    let host = app.config().api.host.clone();
    let port = app.config().api.port;
    info!("Starting HTTP API on {}:{}", host, port);

    let data = web::Data::new(app);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(bargain_hunter::api::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
