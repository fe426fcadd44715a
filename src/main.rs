use anyhow::Context;
use clap::Parser;
use issue_scope_proxy::{configuration::get_configuration, server::config::configure_app};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "issue-scope-proxy", about = "Scope and complete GitHub issues with Devin")]
struct Cli {
    /// Interface to bind, overriding configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding configuration
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = get_configuration().context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        settings.application.host = host;
    }
    if let Some(port) = cli.port {
        settings.application.port = port;
    }

    let app = configure_app(&settings)?;

    let addr: SocketAddr = format!("{}:{}", settings.application.host, settings.application.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✨ Server ready:");
    info!("  🌎 http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
