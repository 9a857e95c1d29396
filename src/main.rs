use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use wikisearch::api::create_router;
use wikisearch::config::CONFIG;
use wikisearch::data_models::Query;
use wikisearch::render::render_text;
use wikisearch::search::SearchOrchestrator;
use wikisearch::session::SearchSession;
use wikisearch::wiki_client::WikipediaClient;

#[derive(Parser, Debug)]
#[command(name = "wikisearch", version, about = "Search Wikipedia articles with thumbnails")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the search page and JSON API
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        static_dir: Option<String>,
    },
    /// Run a single search and print the results
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read queries from stdin, one per line
    Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    // Bridge log crate -> tracing (so log::info! etc. work)
    tracing_log::LogTracer::init().context("Failed to bridge log records")?;

    let client = WikipediaClient::from_config()?;
    let orchestrator = Arc::new(SearchOrchestrator::new(client));

    match cli.command {
        Command::Serve { bind, static_dir } => {
            let bind = bind.unwrap_or_else(|| CONFIG.bind_addr.clone());
            let static_dir = static_dir.unwrap_or_else(|| CONFIG.static_dir.clone());
            serve(orchestrator, &bind, &static_dir).await
        }
        Command::Search { query, json } => search_once(&orchestrator, &query.join(" "), json).await,
        Command::Repl => repl(orchestrator).await,
    }
}

async fn serve(orchestrator: Arc<SearchOrchestrator>, bind: &str, static_dir: &str) -> Result<()> {
    let router = create_router(orchestrator, static_dir);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}

async fn search_once(orchestrator: &SearchOrchestrator, raw: &str, json: bool) -> Result<()> {
    let Some(query) = Query::parse(raw) else {
        anyhow::bail!("Query cannot be empty");
    };

    let results = orchestrator.search(&query).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_text(&results));
    }
    Ok(())
}

async fn repl(orchestrator: Arc<SearchOrchestrator>) -> Result<()> {
    let session = SearchSession::new(orchestrator);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"search> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if let Some(snapshot) = session.submit(&line).await {
            stdout.write_all(render_text(&snapshot.results).as_bytes()).await?;
        }
    }
    Ok(())
}
