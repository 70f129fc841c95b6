use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Root configuration, maps to `sense.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SenseConfig {
    pub options: MitigationOptions,
    pub logging: LoggingConfig,
}

// ── Mitigation options ─────────────────────────────────────────

/// How the controller watches for dangerous falls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FallCheck {
    #[default]
    Off,
    /// Search from the current position every tick.
    Simple,
    /// Advance the position snapshot by `predict_ticks` physics steps before searching.
    Predictive { predict_ticks: u32 },
    /// Skip placement entirely and look for something to ride.
    MountOnly,
}

impl FallCheck {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, FallCheck::Off)
    }
}

/// A candidate mitigation item plus the conditions under which it may be used.
/// Rules are evaluated in list order; the first applicable rule whose item is
/// in the inventory wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRule {
    pub name: String,
    /// Only use this item if the agent has fallen at most this far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fall_distance: Option<f64>,
    /// Worlds in which this item must not be used (water evaporates in the nether).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallowed_worlds: Option<BTreeSet<String>>,
    /// Only use this item when landing on one of these blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_landing_blocks: Option<BTreeSet<String>>,
}

impl ItemRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_fall_distance: None,
            disallowed_worlds: None,
            allowed_landing_blocks: None,
        }
    }

    pub fn with_max_fall_distance(mut self, distance: f64) -> Self {
        self.max_fall_distance = Some(distance);
        self
    }

    pub fn disallow_world(mut self, world: impl Into<String>) -> Self {
        self.disallowed_worlds
            .get_or_insert_with(BTreeSet::new)
            .insert(world.into());
        self
    }

    pub fn allow_landing_on(mut self, block: impl Into<String>) -> Self {
        self.allowed_landing_blocks
            .get_or_insert_with(BTreeSet::new)
            .insert(block.into());
        self
    }
}

/// Bounds for every retry loop and confirmation wait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Ticks the fall loop keeps searching and placing before giving up.
    pub fall_attempts: u32,
    /// Ticks the mount fallback keeps looking for a vehicle.
    pub mount_attempts: u32,
    /// Longest wait for a single simulation tick before re-checking state.
    pub tick_timeout_ms: u64,
    /// Wait for a block-change confirmation after placing or pouring.
    pub confirm_timeout_ms: u64,
    /// Wait for the agent to land in / on the placed material.
    pub landing_timeout_ms: u64,
    /// Wait for a placed vehicle to spawn.
    pub entity_spawn_timeout_ms: u64,
    /// Act once the agent's feet are within this many blocks of the surface.
    pub trigger_height: f64,
    /// Radius searched for fire and lava when extinguishing.
    pub fire_search_radius: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fall_attempts: 120,
            mount_attempts: 1000,
            tick_timeout_ms: 250,
            confirm_timeout_ms: 1000,
            landing_timeout_ms: 2000,
            entity_spawn_timeout_ms: 5000,
            trigger_height: 3.0,
            fire_search_radius: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MitigationOptions {
    /// React to hazards automatically. When false, hazards are only tracked.
    pub auto_respond: bool,
    /// Hold mitigation items in the off hand.
    pub use_offhand: bool,
    /// Maximum interaction distance in blocks.
    pub reach: f64,
    pub fire_check: bool,
    pub fall_check: FallCheck,
    /// Ordered fall-mitigation items.
    pub mlg_items: Vec<ItemRule>,
    /// Entity names the mount fallback may ride.
    pub mount_vehicle_names: BTreeSet<String>,
    /// Item names must match exactly (otherwise substring match).
    pub strict_name_match: bool,
    /// Landing block names must match exactly (otherwise substring match).
    pub strict_block_match: bool,
    /// Worlds where the agent never tries to put itself out.
    pub no_extinguish_worlds: BTreeSet<String>,
    /// Empty the hand before mounting.
    pub mount_empty_hand: bool,
    pub timing: TimingConfig,
}

impl Default for MitigationOptions {
    fn default() -> Self {
        Self {
            auto_respond: false,
            use_offhand: false,
            reach: 4.5,
            fire_check: false,
            fall_check: FallCheck::Off,
            mlg_items: vec![
                ItemRule::new("water_bucket").disallow_world("the_nether"),
                ItemRule::new("slime_block"),
                ItemRule::new("hay_block").with_max_fall_distance(40.0),
                ItemRule::new("oak_boat"),
            ],
            mount_vehicle_names: ["boat", "minecart", "horse", "donkey", "mule", "pig", "strider"]
                .into_iter()
                .map(String::from)
                .collect(),
            strict_name_match: true,
            strict_block_match: false,
            no_extinguish_worlds: BTreeSet::from(["the_nether".to_string()]),
            mount_empty_hand: true,
            timing: TimingConfig::default(),
        }
    }
}

/// Partial overlay for [`MitigationOptions`]. Omitted fields keep their prior value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_respond: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_offhand: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reach: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_check: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fall_check: Option<FallCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mlg_items: Option<Vec<ItemRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_vehicle_names: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_name_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_block_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_extinguish_worlds: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_empty_hand: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingConfig>,
}

impl MitigationOptions {
    /// Overlay every field present in `patch`. No cross-field validation happens here.
    pub fn merge(&mut self, patch: OptionsPatch) {
        let OptionsPatch {
            auto_respond,
            use_offhand,
            reach,
            fire_check,
            fall_check,
            mlg_items,
            mount_vehicle_names,
            strict_name_match,
            strict_block_match,
            no_extinguish_worlds,
            mount_empty_hand,
            timing,
        } = patch;

        if let Some(v) = auto_respond {
            self.auto_respond = v;
        }
        if let Some(v) = use_offhand {
            self.use_offhand = v;
        }
        if let Some(v) = reach {
            self.reach = v;
        }
        if let Some(v) = fire_check {
            self.fire_check = v;
        }
        if let Some(v) = fall_check {
            self.fall_check = v;
        }
        if let Some(v) = mlg_items {
            self.mlg_items = v;
        }
        if let Some(v) = mount_vehicle_names {
            self.mount_vehicle_names = v;
        }
        if let Some(v) = strict_name_match {
            self.strict_name_match = v;
        }
        if let Some(v) = strict_block_match {
            self.strict_block_match = v;
        }
        if let Some(v) = no_extinguish_worlds {
            self.no_extinguish_worlds = v;
        }
        if let Some(v) = mount_empty_hand {
            self.mount_empty_hand = v;
        }
        if let Some(v) = timing {
            self.timing = v;
        }
    }

    /// Names of the configured mitigation items, in priority order.
    pub fn mlg_item_names(&self) -> Vec<&str> {
        self.mlg_items.iter().map(|rule| rule.name.as_str()).collect()
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
            WarningSeverity::Info => "info",
        };
        write!(f, "[{}] {}: {}", tag, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl MitigationOptions {
    /// Collect issues with these options into `warnings`.
    pub fn check(&self, warnings: &mut Vec<ConfigWarning>) {
        // ── Reach ───
        if self.reach <= 0.0 {
            warnings.push(ConfigWarning {
                field: "options.reach".into(),
                message: format!("reach {} must be positive", self.reach),
                severity: WarningSeverity::Error,
                hint: Some("Vanilla survival reach is 4.5".into()),
            });
        } else if self.reach > 6.0 {
            warnings.push(ConfigWarning {
                field: "options.reach".into(),
                message: format!("reach {} exceeds what servers usually accept", self.reach),
                severity: WarningSeverity::Warning,
                hint: Some("Placements beyond ~6 blocks are rejected by most servers".into()),
            });
        }

        // ── Fall check ───
        match self.fall_check {
            FallCheck::Predictive { predict_ticks: 0 } => {
                warnings.push(ConfigWarning {
                    field: "options.fall_check.predict_ticks".into(),
                    message: "predictive mode with 0 ticks behaves like simple mode".into(),
                    severity: WarningSeverity::Warning,
                    hint: Some("Use mode = \"simple\" or set predict_ticks to 1-3".into()),
                });
            }
            FallCheck::Predictive { predict_ticks } if predict_ticks > 20 => {
                warnings.push(ConfigWarning {
                    field: "options.fall_check.predict_ticks".into(),
                    message: format!("predicting {} ticks ahead is unreliable", predict_ticks),
                    severity: WarningSeverity::Warning,
                    hint: Some("1-3 ticks is typical".into()),
                });
            }
            FallCheck::MountOnly if self.mount_vehicle_names.is_empty() => {
                warnings.push(ConfigWarning {
                    field: "options.mount_vehicle_names".into(),
                    message: "mount_only fall check with no vehicle names can never act".into(),
                    severity: WarningSeverity::Error,
                    hint: Some("Add e.g. \"boat\" or \"horse\"".into()),
                });
            }
            _ => {}
        }

        if self.fall_check.is_enabled()
            && self.fall_check != FallCheck::MountOnly
            && self.mlg_items.is_empty()
        {
            warnings.push(ConfigWarning {
                field: "options.mlg_items".into(),
                message: "fall check is enabled but no mitigation items are configured".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Add e.g. { name = \"water_bucket\" }".into()),
            });
        }

        // ── Item rules ───
        for (i, rule) in self.mlg_items.iter().enumerate() {
            if rule.name.trim().is_empty() {
                warnings.push(ConfigWarning {
                    field: format!("options.mlg_items[{}].name", i),
                    message: "item name is empty".into(),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
            if let Some(d) = rule.max_fall_distance {
                if d < 0.0 {
                    warnings.push(ConfigWarning {
                        field: format!("options.mlg_items[{}].max_fall_distance", i),
                        message: format!("max_fall_distance {} is negative", d),
                        severity: WarningSeverity::Error,
                        hint: None,
                    });
                }
            }
        }

        // ── Auto respond ───
        if !self.auto_respond && (self.fire_check || self.fall_check.is_enabled()) {
            warnings.push(ConfigWarning {
                field: "options.auto_respond".into(),
                message: "hazard checks are on but auto_respond is off, hazards are only tracked"
                    .into(),
                severity: WarningSeverity::Info,
                hint: None,
            });
        }

        // ── Timing ───
        let t = &self.timing;
        for (field, value) in [
            ("fall_attempts", t.fall_attempts as u64),
            ("mount_attempts", t.mount_attempts as u64),
            ("tick_timeout_ms", t.tick_timeout_ms),
            ("confirm_timeout_ms", t.confirm_timeout_ms),
            ("landing_timeout_ms", t.landing_timeout_ms),
            ("entity_spawn_timeout_ms", t.entity_spawn_timeout_ms),
        ] {
            if value == 0 {
                warnings.push(ConfigWarning {
                    field: format!("options.timing.{}", field),
                    message: "must be greater than zero".into(),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
        }
        if t.trigger_height <= 0.0 {
            warnings.push(ConfigWarning {
                field: "options.timing.trigger_height".into(),
                message: format!("trigger_height {} must be positive", t.trigger_height),
                severity: WarningSeverity::Error,
                hint: Some("3.0 places the item about three blocks before impact".into()),
            });
        }
    }
}

impl SenseConfig {
    /// Validate the config and return a list of warnings.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();
        self.options.check(&mut warnings);

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        // Check for hard errors
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
