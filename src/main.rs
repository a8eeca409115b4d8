mod app;
mod cli;
mod config;
mod console;
mod driver;
mod guide;
mod paths;
mod provider;

#[cfg(feature = "tui")]
mod tui;

use anyhow::Context;
use clap::Parser;
use guide::TravelGuide;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(log_writer(&args))
        .init();

    let config_file = paths::config_file()?;
    let cfg = config::Config::load_optional(&config_file)?;
    tracing::debug!(?config_file, ?cfg, "resolved config");

    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    let model = app::resolve_model(args.model.clone(), cfg.as_ref());
    let provider_name = app::resolve_provider_name(args.provider.clone(), cfg.as_ref());
    let api_key = app::resolve_api_key(cfg.as_ref());

    let provider = app::build_provider(&http, cfg.as_ref(), &provider_name, api_key)?;
    let guide = TravelGuide::new(provider, model);

    match args.cmd {
        #[cfg(feature = "tui")]
        Some(cli::Command::Tui) => {
            return tui::run_tui(guide).await;
        }
        None => {}
    }

    let form = driver::FormValues {
        source: args.source,
        destination: args.destination,
        date: args.date.unwrap_or_else(cli::today),
    };

    app::cmd_plan(guide, form).await
}

/// stderr, except under the terminal form where any stray line would be drawn over it.
fn log_writer(args: &cli::Args) -> BoxMakeWriter {
    match args.cmd {
        #[cfg(feature = "tui")]
        Some(cli::Command::Tui) => BoxMakeWriter::new(std::io::sink),
        None => BoxMakeWriter::new(std::io::stderr),
    }
}
