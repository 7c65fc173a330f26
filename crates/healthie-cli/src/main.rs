//! Healthie CLI Application
//!
//! Command-line interface for the Healthie weekly health planner.

mod args;
mod cli;
mod renderer;
mod session;

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use args::{Args, Commands, ShowArgs};
use clap::Parser;
use cli::Cli;
use healthie_core::{
    gemini::{GeminiClient, GeminiConfig},
    models::HealthProfile,
    PlannerBuilder,
};
use log::info;
use renderer::TerminalRenderer;
use session::Session;

fn load_profile(path: &Path) -> Result<HealthProfile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse profile {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        profile,
        api_key,
        model,
        command,
    } = Args::parse();

    let profile = profile.as_deref().map(load_profile).transpose()?;

    let mut builder = PlannerBuilder::new().with_database_path(database_file);
    if let Some(profile) = &profile {
        builder = builder.with_profile(profile.clone());
    }
    if let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) {
        let mut config = GeminiConfig::new(api_key);
        if let Some(model) = model {
            config = config.with_model(model);
        }
        let client = GeminiClient::new(config).context("Failed to configure generative service")?;
        builder = builder.with_service(Arc::new(client));
    }

    let planner = Arc::new(
        builder
            .build()
            .await
            .context("Failed to initialize planner")?,
    );
    let renderer = Arc::new(TerminalRenderer::new(!no_color));

    info!("Healthie started");

    let cli = Cli::new(Arc::clone(&planner), Arc::clone(&renderer));
    match command {
        Some(Commands::Generate) => cli.generate(profile).await,
        Some(Commands::Show(ShowArgs { day })) => cli.show(day).await,
        Some(Commands::Clear) => cli.clear().await,
        Some(Commands::Session) => {
            cli.restore().await?;
            Session::new(planner, renderer).run().await
        }
        None => cli.show(None).await,
    }
}
