use sense_config::{ItemRule, MitigationOptions};
use sense_core::{Block, Item};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How an item is used to mitigate a fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Single-use container (water bucket): activated against the surface.
    Activatable = 0,
    /// Stackable block (slime, hay): placed on top of the surface.
    Placeable = 1,
    /// Vehicle item (boat): placed as an entity, then mounted.
    Vehicle = 2,
}

pub fn categorize(item: &Item) -> ItemCategory {
    if is_vehicle_item(&item.name) {
        ItemCategory::Vehicle
    } else if item.stack_size > 1 {
        ItemCategory::Placeable
    } else {
        ItemCategory::Activatable
    }
}

fn is_vehicle_item(name: &str) -> bool {
    name == "boat" || name.ends_with("_boat") || name.ends_with("_raft")
}

/// Entity name a vehicle item spawns as (`oak_boat` → `boat`).
pub fn spawned_entity_name(item_name: &str) -> &str {
    if is_vehicle_item(item_name) { "boat" } else { item_name }
}

/// What the policy knows about the fall being mitigated.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a> {
    pub fall_distance: f64,
    pub landing: Option<&'a Block>,
    pub world: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleVerdict {
    Eligible,
    Rejected(String),
}

/// The item chosen for this iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Index into the configured rule list.
    pub rule_index: usize,
    pub item: Item,
    pub category: ItemCategory,
}

/// Ordered, first-match-wins item selection.
pub struct ItemPolicy<'a> {
    rules: &'a [ItemRule],
    strict_name: bool,
    strict_block: bool,
}

impl<'a> ItemPolicy<'a> {
    pub fn new(rules: &'a [ItemRule], strict_name: bool, strict_block: bool) -> Self {
        Self {
            rules,
            strict_name,
            strict_block,
        }
    }

    pub fn from_options(options: &'a MitigationOptions) -> Self {
        Self::new(
            &options.mlg_items,
            options.strict_name_match,
            options.strict_block_match,
        )
    }

    /// Check a single rule's applicability predicates against the context.
    pub fn evaluate(&self, rule: &ItemRule, ctx: &ItemContext<'_>) -> RuleVerdict {
        if let Some(max) = rule.max_fall_distance {
            if ctx.fall_distance > max {
                return RuleVerdict::Rejected(format!(
                    "fell {:.1} blocks, '{}' allows at most {:.1}",
                    ctx.fall_distance, rule.name, max
                ));
            }
        }

        if let Some(allowed) = &rule.allowed_landing_blocks {
            let Some(landing) = ctx.landing else {
                return RuleVerdict::Rejected(format!(
                    "'{}' needs a known landing block",
                    rule.name
                ));
            };
            let ok = allowed
                .iter()
                .any(|name| name_matches(&landing.name, name, self.strict_block));
            if !ok {
                return RuleVerdict::Rejected(format!(
                    "'{}' cannot be used on '{}'",
                    rule.name, landing.name
                ));
            }
        }

        if let Some(worlds) = &rule.disallowed_worlds {
            if worlds.contains(ctx.world) {
                return RuleVerdict::Rejected(format!(
                    "'{}' is disallowed in '{}'",
                    rule.name, ctx.world
                ));
            }
        }

        RuleVerdict::Eligible
    }

    /// First eligible rule whose item is present in `inventory`.
    pub fn select<'i, I>(&self, ctx: &ItemContext<'_>, inventory: I) -> Option<Selection>
    where
        I: IntoIterator<Item = &'i Item>,
    {
        let inventory: Vec<&Item> = inventory.into_iter().collect();
        for (rule_index, rule) in self.rules.iter().enumerate() {
            if let RuleVerdict::Rejected(reason) = self.evaluate(rule, ctx) {
                debug!(rule = %rule.name, %reason, "item rule skipped");
                continue;
            }
            let found = inventory
                .iter()
                .find(|item| name_matches(&item.name, &rule.name, self.strict_name));
            if let Some(item) = found {
                return Some(Selection {
                    rule_index,
                    item: (*item).clone(),
                    category: categorize(item),
                });
            }
        }
        None
    }
}

/// Exact match when `strict`, otherwise `wanted` must appear in `actual`.
pub fn name_matches(actual: &str, wanted: &str, strict: bool) -> bool {
    if strict {
        actual == wanted
    } else {
        actual.contains(wanted)
    }
}
