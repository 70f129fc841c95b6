use sense_core::BlockPos;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a hazard was neutralised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Liquid poured onto the landing surface.
    Liquid,
    /// Solid block placed on the landing surface.
    Block,
    /// Vehicle item placed as an entity, then ridden.
    Vehicle,
    /// An existing rideable entity was mounted.
    Mount,
    /// Liquid poured to put the agent out.
    Extinguish,
}

/// A completed mitigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mitigation {
    pub method: Method,
    /// Item used, or the entity ridden for [`Method::Mount`].
    pub item: String,
    /// Cell the action targeted.
    pub target: BlockPos,
    /// Whether the world confirmed the effect before the deadlines.
    pub confirmed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotHandledReason {
    /// Fall checking is off.
    Disabled,
    NoLandingSurface,
    NoEligibleItem,
    NoVehicle,
    NoWaterItem,
    /// The hazard ended before anything had to be done.
    AlreadySafe,
    /// Every attempt was used up.
    GaveUp,
    /// The agent died or disconnected mid-mitigation.
    AgentLost,
}

impl fmt::Display for NotHandledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NotHandledReason::Disabled => "disabled",
            NotHandledReason::NoLandingSurface => "no landing surface",
            NotHandledReason::NoEligibleItem => "no eligible item",
            NotHandledReason::NoVehicle => "no vehicle in reach",
            NotHandledReason::NoWaterItem => "no water item",
            NotHandledReason::AlreadySafe => "already safe",
            NotHandledReason::GaveUp => "gave up",
            NotHandledReason::AgentLost => "agent lost",
        };
        f.write_str(text)
    }
}

/// Result of a mitigation entry point. Mitigations never return errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum MitigationOutcome {
    Mitigated(Mitigation),
    NotHandled(NotHandledReason),
    /// Another mitigation of the same kind is already running.
    InProgress,
}

impl MitigationOutcome {
    pub fn is_mitigated(&self) -> bool {
        matches!(self, MitigationOutcome::Mitigated(_))
    }

    pub fn mitigation(&self) -> Option<&Mitigation> {
        match self {
            MitigationOutcome::Mitigated(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for MitigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MitigationOutcome::Mitigated(m) => write!(
                f,
                "mitigated ({:?} with {} at {}, {})",
                m.method,
                m.item,
                m.target,
                if m.confirmed { "confirmed" } else { "unconfirmed" }
            ),
            MitigationOutcome::NotHandled(reason) => write!(f, "not handled: {reason}"),
            MitigationOutcome::InProgress => f.write_str("already in progress"),
        }
    }
}
