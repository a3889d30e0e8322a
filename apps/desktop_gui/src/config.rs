use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::controller::table::DEFAULT_PAGE_SIZE;

pub const DEFAULT_CONFIG_FILE: &str = "animal_tracker.toml";
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Parser)]
#[command(
    name = "animal_tracker",
    version,
    about = "Keep track of animals you've observed or are monitoring"
)]
pub struct Args {
    /// TOML settings file (defaults to ./animal_tracker.toml when present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub entity_base_url: Option<String>,
    #[arg(long)]
    pub entity_name: Option<String>,
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
    #[arg(long)]
    pub page_size: Option<usize>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Use the process-local store instead of the HTTP entity store.
    #[arg(long)]
    pub offline: bool,
    /// JSON array of animals to preload into the offline store.
    #[arg(long)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub entity_base_url: String,
    pub entity_name: String,
    pub request_timeout_secs: u64,
    pub page_size: usize,
    pub log_level: String,
    pub offline: bool,
    pub seed_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entity_base_url: "http://127.0.0.1:8080/api".into(),
            entity_name: "Animal".into(),
            request_timeout_secs: 15,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".into(),
            offline: false,
            seed_file: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    entity_base_url: Option<String>,
    entity_name: Option<String>,
    request_timeout_secs: Option<u64>,
    page_size: Option<usize>,
    log_level: Option<String>,
    offline: Option<bool>,
    seed_file: Option<PathBuf>,
}

pub fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    load_settings_with(args, |key| std::env::var(key).ok())
}

fn load_settings_with(
    args: &Args,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match &args.config {
        Some(path) => Some(read_file_settings(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Some(read_file_settings(Path::new(DEFAULT_CONFIG_FILE))?)
        }
        None => None,
    };
    if let Some(file_cfg) = file_cfg {
        apply_file(&mut settings, file_cfg);
    }

    apply_env(&mut settings, env);

    if let Some(v) = &args.entity_base_url {
        settings.entity_base_url = v.clone();
    }
    if let Some(v) = &args.entity_name {
        settings.entity_name = v.clone();
    }
    if let Some(v) = args.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = args.page_size {
        settings.page_size = v;
    }
    if let Some(v) = &args.log_level {
        settings.log_level = v.clone();
    }
    if args.offline {
        settings.offline = true;
    }
    if let Some(v) = &args.seed_file {
        settings.seed_file = Some(v.clone());
    }

    settings.page_size = settings.page_size.clamp(1, MAX_PAGE_SIZE);
    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.entity_base_url {
        settings.entity_base_url = v;
    }
    if let Some(v) = file_cfg.entity_name {
        settings.entity_name = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.page_size {
        settings.page_size = v;
    }
    if let Some(v) = file_cfg.log_level {
        settings.log_level = v;
    }
    if let Some(v) = file_cfg.offline {
        settings.offline = v;
    }
    if let Some(v) = file_cfg.seed_file {
        settings.seed_file = Some(v);
    }
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("APP__ENTITY_BASE_URL") {
        settings.entity_base_url = v;
    }
    if let Some(v) = env("APP__ENTITY_NAME") {
        settings.entity_name = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(err) => tracing::warn!("ignoring APP__REQUEST_TIMEOUT_SECS={v:?}: {err}"),
        }
    }
    if let Some(v) = env("APP__PAGE_SIZE") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.page_size = parsed,
            Err(err) => tracing::warn!("ignoring APP__PAGE_SIZE={v:?}: {err}"),
        }
    }
    if let Some(v) = env("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
    if let Some(v) = env("APP__OFFLINE") {
        settings.offline = matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }
    if let Some(v) = env("APP__SEED_FILE") {
        settings.seed_file = Some(PathBuf::from(v));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("animal_tracker").chain(argv.iter().copied()))
    }

    fn temp_settings_file(contents: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("animal_tracker_settings_{suffix}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn layers_file_then_env_then_flags() {
        let path = temp_settings_file(
            "entity_base_url = \"http://file.example/api\"\n\
             entity_name = \"Critter\"\n\
             page_size = 20\n\
             offline = true\n",
        );
        let path_arg = path.to_string_lossy().into_owned();
        let env_vars: HashMap<&str, &str> = HashMap::from([
            ("APP__ENTITY_NAME", "Beast"),
            ("APP__PAGE_SIZE", "50"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]);

        let settings = load_settings_with(
            &args(&["--config", &path_arg, "--page-size", "100"]),
            |key| env_vars.get(key).map(|v| v.to_string()),
        )
        .expect("settings");

        assert_eq!(settings.entity_base_url, "http://file.example/api");
        assert_eq!(settings.entity_name, "Beast");
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.request_timeout_secs, 15);
        assert!(settings.offline);

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn explicit_config_must_exist_and_parse() {
        let missing = env::temp_dir().join("animal_tracker_does_not_exist.toml");
        let missing_arg = missing.to_string_lossy().into_owned();
        assert!(load_settings_with(&args(&["--config", &missing_arg]), |_| None).is_err());

        let broken = temp_settings_file("page_size = \"many\"");
        let broken_arg = broken.to_string_lossy().into_owned();
        assert!(load_settings_with(&args(&["--config", &broken_arg]), |_| None).is_err());
        fs::remove_file(broken).expect("cleanup");
    }

    #[test]
    fn page_size_is_clamped() {
        let settings =
            load_settings_with(&args(&["--page-size", "0"]), |_| None).expect("settings");
        assert_eq!(settings.page_size, 1);

        let settings =
            load_settings_with(&args(&["--page-size", "5000"]), |_| None).expect("settings");
        assert_eq!(settings.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn offline_env_accepts_common_truthy_values() {
        let settings = load_settings_with(&args(&[]), |key| {
            (key == "APP__OFFLINE").then(|| "Yes".to_string())
        })
        .expect("settings");
        assert!(settings.offline);
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
    }
}
