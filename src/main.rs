mod cli;

use clap::Parser;
use libra_client::{
    adapters::console::{ConsoleNavigator, ConsoleNotifier},
    adapters::http::HttpLibraryApi,
    application::PageContext,
    config::load_config,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.base_url {
        config = config.with_api_base_url(url);
    }
    if let Some(session) = cli.session {
        config = config.with_session_id(session);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Backend: {}", config.api_base_url());

    let api = match HttpLibraryApi::new(&config) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let logged_in = config.session_id().is_some();
    let ctx = PageContext::new(
        &config,
        api,
        Arc::new(ConsoleNotifier::new(cli.yes)),
        Arc::new(ConsoleNavigator),
    );

    match cli::run(cli.command, ctx, logged_in).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
