use anyhow::Context;
use axum::http::Method;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docsite::api::create_router;
use docsite::build_state;
use docsite::config::Config;

#[derive(Parser)]
#[command(name = "docsite", version, about = "Documentation site server with semantic search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve pages, assets and the search API
    Serve {
        /// Address to bind, overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one query through the search pipeline and print the JSON response
    Search {
        query: String,
        #[arg(long)]
        limit: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    if config.search.index_name.is_none() {
        log::warn!("AI_SEARCH_NAME is not set, /api/search will answer 500 until it is");
    }

    let state = build_state(&config)?;

    match cli.command {
        Command::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let app = create_router(state, &config.assets_dir);

            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("failed to bind {bind_addr}"))?;
            log::info!(
                "serving {} on http://{} (content: {}, assets: {})",
                config.site_title,
                bind_addr,
                config.content_dir.display(),
                config.assets_dir.display()
            );
            axum::serve(listener, app).await?;
        }
        Command::Search { query, limit } => {
            let mut body = serde_json::json!({ "query": query });
            if let Some(limit) = limit {
                body["limit"] = limit.into();
            }
            let (status, response) = state
                .search
                .handle(&Method::POST, body.to_string().as_bytes())
                .await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !status.is_success() {
                anyhow::bail!("search failed with status {status}");
            }
        }
    }
    Ok(())
}
