mod backend_bridge;
mod config;
mod controller;
mod ui;

use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use clap::Parser;
use client_core::{
    HttpEntityClient, InMemoryEntityClient, MissingEntityClient, SharedEntityClient,
};
use crossbeam_channel::bounded;
use shared::domain::Animal;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use config::{Args, Settings};
use controller::events::UiEvent;
use ui::{TrackerApp, APP_TITLE};

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_seed(path: &Path) -> anyhow::Result<Vec<Animal>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed file '{}'", path.display()))
}

/// Picks the entity client for this run and a short label describing it.
fn build_client(settings: &Settings) -> anyhow::Result<(SharedEntityClient, String)> {
    if settings.offline {
        let records = match &settings.seed_file {
            Some(path) => load_seed(path)?,
            None => Vec::new(),
        };
        let label = format!("Offline store ({} seeded)", records.len());
        tracing::info!(count = records.len(), "using in-memory entity store");
        return Ok((Arc::new(InMemoryEntityClient::with_records(records)), label));
    }

    match HttpEntityClient::with_timeout(
        &settings.entity_base_url,
        settings.entity_name.as_str(),
        settings.request_timeout(),
    ) {
        Ok(client) => {
            let label = format!("{} @ {}", client.entity(), client.base_url());
            tracing::info!(url = %client.base_url(), entity = client.entity(), "using http entity store");
            Ok((Arc::new(client), label))
        }
        Err(err) => {
            tracing::error!("entity client configuration rejected: {err}");
            let label = format!("Entity store unavailable: {err}");
            Ok((Arc::new(MissingEntityClient::new(err.to_string())), label))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = config::load_settings(&args)?;
    init_tracing(&settings.log_level);

    let (client, source_label) = build_client(&settings)?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(client, cmd_rx, ui_tx);

    let page_size = settings.page_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1180.0, 760.0])
            .with_min_inner_size([860.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(TrackerApp::new(
                cmd_tx,
                ui_rx,
                page_size,
                source_label,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run {APP_TITLE}: {err}"))
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn offline_mode_uses_seed_records() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("animal_tracker_seed_{suffix}.json"));
        fs::write(
            &path,
            r#"[{"_id":"1","name":"Rex","species":"Dog"},{"_id":"2","name":"Milo","species":"Cat","age":2}]"#,
        )
        .expect("write seed");

        let settings = Settings {
            offline: true,
            seed_file: Some(path.clone()),
            ..Settings::default()
        };
        let (_client, label) = build_client(&settings).expect("client");
        assert_eq!(label, "Offline store (2 seeded)");

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let settings = Settings {
            offline: true,
            seed_file: Some(env::temp_dir().join("animal_tracker_missing_seed.json")),
            ..Settings::default()
        };
        assert!(build_client(&settings).is_err());
    }

    #[test]
    fn bad_base_url_falls_back_to_unavailable_client() {
        let settings = Settings {
            entity_base_url: "ftp://example.com".to_string(),
            ..Settings::default()
        };
        let (_client, label) = build_client(&settings).expect("fallback client");
        assert!(label.starts_with("Entity store unavailable"));
    }
}
