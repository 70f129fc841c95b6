use std::path::{Path, PathBuf};

const STARTER_CONFIG: &str = r#"# Sense configuration

[options]
auto_respond = true
use_offhand = false
reach = 4.5
fire_check = true
fall_check = { mode = "predictive", predict_ticks = 1 }
no_extinguish_worlds = ["the_nether"]
# mount_vehicle_names = ["boat", "minecart", "horse", "donkey", "mule", "pig", "strider"]

# Tried in order; the first usable item in the inventory wins.
[[options.mlg_items]]
name = "water_bucket"
disallowed_worlds = ["the_nether"]

[[options.mlg_items]]
name = "slime_block"

[[options.mlg_items]]
name = "hay_block"
max_fall_distance = 40.0

[[options.mlg_items]]
name = "oak_boat"

[options.timing]
# fall_attempts = 120
# trigger_height = 3.0
# confirm_timeout_ms = 1000

[logging]
level = "info"
format = "pretty"  # pretty, compact, json
"#;

pub(super) fn cmd_init(local: bool) -> sense_core::Result<()> {
    let dir = if local {
        std::env::current_dir()?
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sense")
    };

    match write_starter_config(&dir)? {
        Some(path) => {
            println!("✅ Created {}", path.display());
            println!("   Run 'sense doctor' to check it.");
        }
        None => println!("⚠️  {} already exists", dir.join("sense.toml").display()),
    }
    Ok(())
}

/// Write the starter `sense.toml` into `dir`. Returns `None` if one is already there.
fn write_starter_config(dir: &Path) -> sense_core::Result<Option<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let config_path = dir.join("sense.toml");
    if config_path.exists() {
        return Ok(None);
    }
    std::fs::write(&config_path, STARTER_CONFIG)?;
    Ok(Some(config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sense_config::{ConfigLoader, FallCheck};

    #[test]
    fn test_starter_config_loads_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_starter_config(dir.path()).unwrap().unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap().get();
        assert!(config.options.auto_respond);
        assert_eq!(
            config.options.fall_check,
            FallCheck::Predictive { predict_ticks: 1 }
        );
        assert_eq!(
            config.options.mlg_item_names(),
            vec!["water_bucket", "slime_block", "hay_block", "oak_boat"]
        );
        assert_eq!(config.options.timing.fall_attempts, 120);
    }

    #[test]
    fn test_init_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sense.toml"), "# mine").unwrap();
        assert!(write_starter_config(dir.path()).unwrap().is_none());
        let kept = std::fs::read_to_string(dir.path().join("sense.toml")).unwrap();
        assert_eq!(kept, "# mine");
    }
}
