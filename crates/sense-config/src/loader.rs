use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::schema::SenseConfig;
use sense_core::SenseError;

/// Loads and optionally hot-reloads the Sense configuration.
pub struct ConfigLoader {
    config: Arc<RwLock<SenseConfig>>,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > SENSE_CONFIG env > ~/.sense/sense.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("SENSE_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sense")
            .join("sense.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> sense_core::Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            Self::parse_file(&config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            SenseConfig::default()
        };

        let config = Self::apply_env_overrides(config);

        // Validate config: log warnings, fail on errors
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(SenseError::Config(e));
            }
        }

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// Get a read snapshot of the current config.
    pub fn get(&self) -> SenseConfig {
        self.config.read().clone()
    }

    /// Get a shared reference for subscription.
    pub fn shared(&self) -> Arc<RwLock<SenseConfig>> {
        Arc::clone(&self.config)
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn parse_file(path: &Path) -> sense_core::Result<SenseConfig> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str::<SenseConfig>(&raw).map_err(|e| {
            SenseError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply env var overrides (SENSE_AUTO_RESPOND, SENSE_USE_OFFHAND, etc.)
    fn apply_env_overrides(mut config: SenseConfig) -> SenseConfig {
        if let Some(v) = env_flag("SENSE_AUTO_RESPOND") {
            config.options.auto_respond = v;
        }
        if let Some(v) = env_flag("SENSE_USE_OFFHAND") {
            config.options.use_offhand = v;
        }
        if let Ok(v) = std::env::var("SENSE_REACH") {
            if let Ok(reach) = v.parse::<f64>() {
                config.options.reach = reach;
            }
        }
        if let Ok(v) = std::env::var("SENSE_LOG_LEVEL") {
            config.logging.level = v;
        }
        config
    }

    /// Reload the config from disk.
    pub fn reload(&self) -> sense_core::Result<SenseConfig> {
        if !self.config_path.exists() {
            return Err(SenseError::Config(format!(
                "config file not found: {}",
                self.config_path.display()
            )));
        }
        let new_config = Self::apply_env_overrides(Self::parse_file(&self.config_path)?);
        new_config.validate().map_err(SenseError::Config)?;
        *self.config.write() = new_config.clone();
        info!("configuration reloaded");
        Ok(new_config)
    }

    /// Start a background file watcher that reloads the config when the file changes
    /// and hands each valid new config to `on_reload`.
    /// Returns a handle to the watcher (must be kept alive for watching to continue).
    pub fn watch_with<F>(&self, on_reload: F) -> sense_core::Result<notify::RecommendedWatcher>
    where
        F: Fn(&SenseConfig) + Send + 'static,
    {
        let config = Arc::clone(&self.config);
        let config_path = self.config_path.clone();

        info!(?config_path, "starting config file watcher");

        let path_for_event = config_path.clone();
        let mut watcher =
            notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "file watcher error");
                        return;
                    }
                };
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                let is_our_file = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == path_for_event.file_name());
                if !is_our_file {
                    return;
                }

                info!("config file changed, reloading");
                let new_config = match ConfigLoader::parse_file(&path_for_event) {
                    Ok(c) => ConfigLoader::apply_env_overrides(c),
                    Err(e) => {
                        warn!(error = %e, "config file has errors, keeping current config");
                        return;
                    }
                };
                if let Err(e) = new_config.validate() {
                    warn!(error = %e, "config failed validation, keeping current config");
                    return;
                }
                *config.write() = new_config.clone();
                on_reload(&new_config);
                info!("configuration hot-reloaded successfully");
            })
            .map_err(|e| SenseError::Config(format!("failed to create file watcher: {}", e)))?;

        // Watch the parent directory (some editors create temp files + rename)
        let watch_path = self.config_path.parent().unwrap_or(Path::new("."));
        watcher
            .watch(watch_path, RecursiveMode::NonRecursive)
            .map_err(|e| SenseError::Config(format!("failed to watch config directory: {}", e)))?;

        Ok(watcher)
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let v = std::env::var(name).ok()?;
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
