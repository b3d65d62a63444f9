mod app;
mod handler;
mod logging;
mod page;
mod tui;
mod ui;

use std::time::Duration;

use anyhow::Result;
use tally_core::{client_for, Config, OllamaClient, Provider, Settings};
use tracing::{info, warn};

use crate::app::App;
use crate::tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init()?;

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {:#}", e);
        Config::default()
    });
    let mut settings = Settings::from_env(config);

    if settings.provider == Provider::Ollama && !settings.model_is_explicit {
        pick_installed_ollama_model(&mut settings).await;
    }

    info!(
        profile = settings.profile.key,
        provider = settings.provider.as_str(),
        model = %settings.model,
        "starting"
    );
    if settings.provider == Provider::Gemini && settings.gemini_api_key.is_none() {
        warn!("no Gemini API key configured, chat replies will use the fallback message");
    }

    let client = client_for(&settings);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let mut app = App::new(&settings, client, events.sender());

    let result = run(&mut terminal, &mut app, &mut events).await;
    app.shutdown();

    tui::restore()?;
    if let Err(e) = &result {
        warn!("exited with error: {:#}", e);
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

/// Without an explicit model, use whatever the local Ollama server has
/// installed first.
async fn pick_installed_ollama_model(settings: &mut Settings) {
    let ollama = OllamaClient::new(
        &settings.ollama_base_url,
        Duration::from_secs(settings.request_timeout_secs),
    );
    match ollama.list_models().await {
        Ok(models) => {
            if let Some(first) = models.into_iter().next() {
                settings.model = first;
            }
        }
        Err(e) => warn!("Could not list Ollama models: {:#}", e),
    }
}
