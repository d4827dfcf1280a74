//! Cheat sheet: a phase-ordered ability digest across a collection
//!
//! Operates purely on parsed records, no XML here. Every ability on every
//! unit and trait is resolved to a "stage" label and the whole set is
//! flattened into one sorted list for at-the-table reference. Grouping and
//! rendering are presentation concerns left to the caller.

use crate::model::{Ability, AbilityColor, AbilityPhase, AbilityTimingQualifier, BattleTrait, Warscroll};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Cheat sheet stage order (round flow). Unrecognized stages sort last.
pub const CHEAT_SHEET_STAGE_ORDER: [&str; 10] = [
    "Deployment Phase",
    "Start of Battle Round",
    "Start of Turn",
    "Hero Phase",
    "Movement Phase",
    "Shooting Phase",
    "Charge Phase",
    "Combat Phase",
    "End of Turn",
    "Passive",
];

static DEPLOY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bdeploy").unwrap());
static START_OF_ROUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bstart\s+of\s+(?:any\s+)?(?:battle\s+)?round\b").unwrap());
static START_OF_TURN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bstart\s+of\s+(?:any\s+)?turn\b").unwrap());
static BATTLE_ROUND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bbattle\s+round\b").unwrap());

/// Color → stage fallback for abilities without an explicit phase. Black is
/// overloaded across Deployment / Start of Battle Round / Start of Turn and
/// gets a text-based disambiguation pass in [`resolve_stage`].
fn color_stage(color: AbilityColor) -> &'static str {
    match color {
        AbilityColor::Yellow => "Hero Phase",
        AbilityColor::Blue => "Shooting Phase",
        AbilityColor::Red => "Combat Phase",
        AbilityColor::Orange => "Charge Phase",
        AbilityColor::Grey => "Movement Phase",
        AbilityColor::Purple => "End of Turn",
        AbilityColor::Black => "Start of Turn",
        AbilityColor::Green => "Passive",
    }
}

/// Resolve an ability to a cheat sheet stage.
///
/// Signals in priority order: explicit phase (Deployment is relabelled
/// "Deployment Phase" for display), Passive timing, free-text scanning of
/// the reaction phase + name + body (most specific pattern first), then
/// the color fallback.
pub fn resolve_stage(ability: &Ability) -> String {
    if let Some(phase) = ability.phase {
        if phase == AbilityPhase::Deployment {
            return "Deployment Phase".to_string();
        }
        return phase.as_str().to_string();
    }
    if ability.timing == Some(AbilityTimingQualifier::Passive) {
        return "Passive".to_string();
    }

    let combined = [
        ability.reaction_phase.as_deref().unwrap_or(""),
        &ability.name,
        &ability.text,
    ]
    .join(" ");
    if DEPLOY.is_match(&combined) {
        return "Deployment Phase".to_string();
    }
    if START_OF_ROUND.is_match(&combined) {
        return "Start of Battle Round".to_string();
    }
    if START_OF_TURN.is_match(&combined) {
        return "Start of Turn".to_string();
    }

    let stage = color_stage(ability.color);
    if ability.color == AbilityColor::Black {
        if DEPLOY.is_match(&combined) {
            return "Deployment Phase".to_string();
        }
        if BATTLE_ROUND.is_match(&combined) {
            return "Start of Battle Round".to_string();
        }
    }
    stage.to_string()
}

/// One line of the cheat sheet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheatSheetEntry {
    /// The ability itself (cloned; the sheet outlives its source records)
    pub ability: Ability,
    /// Name of the card the ability came from
    pub card_name: String,
    /// Resolved stage label
    pub stage: String,
}

fn stage_index(stage: &str) -> usize {
    CHEAT_SHEET_STAGE_ORDER
        .iter()
        .position(|s| *s == stage)
        .unwrap_or(CHEAT_SHEET_STAGE_ORDER.len())
}

/// Build sorted cheat sheet entries from warscrolls and battle traits.
///
/// Entries sort by canonical stage order, then by card name ascending
/// (case-sensitive).
pub fn build_cheat_sheet(warscrolls: &[Warscroll], battle_traits: &[BattleTrait]) -> Vec<CheatSheetEntry> {
    let mut entries: Vec<CheatSheetEntry> = Vec::new();

    for w in warscrolls {
        let card_name = if w.unit_name.is_empty() {
            "Untitled"
        } else {
            &w.unit_name
        };
        for ability in &w.abilities {
            entries.push(CheatSheetEntry {
                ability: ability.clone(),
                card_name: card_name.to_string(),
                stage: resolve_stage(ability),
            });
        }
    }
    for t in battle_traits {
        let card_name = if t.name.is_empty() { "Untitled" } else { &t.name };
        for ability in &t.abilities {
            entries.push(CheatSheetEntry {
                ability: ability.clone(),
                card_name: card_name.to_string(),
                stage: resolve_stage(ability),
            });
        }
    }

    entries.sort_by(|a, b| {
        stage_index(&a.stage)
            .cmp(&stage_index(&b.stage))
            .then_with(|| a.card_name.cmp(&b.card_name))
    });

    entries
}
