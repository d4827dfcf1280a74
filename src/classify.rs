//! Classifiers from catalogue free text onto the closed card taxonomy
//!
//! Every classifier is a pure function over text, implemented as an ordered
//! rule list evaluated short-circuit: first match wins. Rule order is part
//! of the contract: "start of battle round" must be tested before the more
//! general "start of turn", and "once per turn (army)" before "once per
//! turn". The lists below are data, not control flow.

use crate::model::{AbilityColor, AbilityPhase, AbilityType, AbilityTimingQualifier, UnitType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Keyword fallback rules for phase detection, in precedence order
static PHASE_RULES: Lazy<Vec<(Regex, AbilityPhase)>> = Lazy::new(|| {
    [
        (r"(?i)\bhero\b", AbilityPhase::HeroPhase),
        (r"(?i)\bshoot", AbilityPhase::ShootingPhase),
        (r"(?i)\bcombat\b", AbilityPhase::CombatPhase),
        (r"(?i)\bcharge\b", AbilityPhase::ChargePhase),
        (r"(?i)\bmov(e|ement)\b", AbilityPhase::MovementPhase),
        (r"(?i)\bend\s+of\s+turn\b", AbilityPhase::EndOfTurn),
        (r"(?i)\bdeploy", AbilityPhase::Deployment),
        (
            r"(?i)\bstart\s+of\s+battle\s+round\b",
            AbilityPhase::StartOfBattleRound,
        ),
        (r"(?i)\bstart\s+of\s+turn\b", AbilityPhase::StartOfTurn),
    ]
    .into_iter()
    .map(|(pattern, phase)| (Regex::new(pattern).unwrap(), phase))
    .collect()
});

/// Timing qualifier rules, in precedence order. Passive is first: text that
/// matches "passive" is never reported as anything else.
static TIMING_RULES: Lazy<Vec<(Regex, AbilityTimingQualifier)>> = Lazy::new(|| {
    [
        (r"(?i)passive", AbilityTimingQualifier::Passive),
        (r"(?i)\byour\b", AbilityTimingQualifier::Your),
        (r"(?i)\bany\b", AbilityTimingQualifier::Any),
        (r"(?i)\benemy\b", AbilityTimingQualifier::Enemy),
        (r"(?i)reaction", AbilityTimingQualifier::Reaction),
    ]
    .into_iter()
    .map(|(pattern, timing)| (Regex::new(pattern).unwrap(), timing))
    .collect()
});

/// Once-per rules; the parenthetical (Army) variant is the more specific
/// match and is tested first
static ABILITY_TYPE_RULES: Lazy<Vec<(Regex, AbilityType)>> = Lazy::new(|| {
    [
        (r"(?i)once per turn \(army\)", AbilityType::OncePerTurnArmy),
        (r"(?i)once per turn", AbilityType::OncePerTurn),
        (r"(?i)once per battle", AbilityType::OncePerBattle),
    ]
    .into_iter()
    .map(|(pattern, t)| (Regex::new(pattern).unwrap(), t))
    .collect()
});

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map free text to a canonical phase.
///
/// Exact (case-insensitive, whitespace-collapsed) names win outright;
/// keyword detection is the fallback.
pub fn normalize_phase(s: &str) -> Option<AbilityPhase> {
    let collapsed = collapse_whitespace(s);
    if collapsed.is_empty() {
        return None;
    }
    for phase in crate::model::ABILITY_PHASE_OPTIONS {
        if phase.as_str().eq_ignore_ascii_case(&collapsed) {
            return Some(phase);
        }
    }
    PHASE_RULES
        .iter()
        .find(|(re, _)| re.is_match(&collapsed))
        .map(|(_, phase)| *phase)
}

/// Map free text to a timing qualifier
pub fn parse_timing(s: &str) -> Option<AbilityTimingQualifier> {
    TIMING_RULES
        .iter()
        .find(|(re, _)| re.is_match(s))
        .map(|(_, timing)| *timing)
}

/// Map free text to an ability type (once-per limit)
pub fn parse_ability_type(s: &str) -> Option<AbilityType> {
    ABILITY_TYPE_RULES
        .iter()
        .find(|(re, _)| re.is_match(s))
        .map(|(_, t)| *t)
}

/// Map a color name to the closed color set. `gray` and `grey` both map to
/// grey; anything unrecognized defaults to grey.
pub fn normalize_color(s: &str) -> AbilityColor {
    match s.trim().to_ascii_lowercase().as_str() {
        "grey" | "gray" => AbilityColor::Grey,
        "blue" => AbilityColor::Blue,
        "green" => AbilityColor::Green,
        "orange" => AbilityColor::Orange,
        "yellow" => AbilityColor::Yellow,
        "red" => AbilityColor::Red,
        "purple" => AbilityColor::Purple,
        "black" => AbilityColor::Black,
        _ => AbilityColor::Grey,
    }
}

/// Default bar color for a phase-scheduled ability. Assignment rule, not a
/// text classifier: used only when no explicit Color survived parsing.
pub fn phase_color(phase: AbilityPhase) -> AbilityColor {
    match phase {
        AbilityPhase::HeroPhase => AbilityColor::Yellow,
        AbilityPhase::ShootingPhase => AbilityColor::Blue,
        AbilityPhase::CombatPhase => AbilityColor::Red,
        AbilityPhase::ChargePhase => AbilityColor::Orange,
        AbilityPhase::MovementPhase => AbilityColor::Grey,
        AbilityPhase::EndOfTurn => AbilityColor::Purple,
        AbilityPhase::Deployment => AbilityColor::Black,
        AbilityPhase::StartOfBattleRound => AbilityColor::Black,
        AbilityPhase::StartOfTurn => AbilityColor::Black,
    }
}

/// Literal category tags that classify a unit, checked per category name
const UNIT_TYPE_TAGS: [(&str, UnitType); 7] = [
    ("HERO", UnitType::Hero),
    ("INFANTRY", UnitType::Infantry),
    ("CAVALRY", UnitType::Cavalry),
    ("BEAST", UnitType::Beast),
    ("MONSTER", UnitType::Monster),
    ("WAR MACHINE", UnitType::WarMachine),
    ("MANIFESTATION", UnitType::Manifestation),
];

/// Derive a unit type from category-link names, scanned in document order;
/// the first category matching any tag wins.
pub fn unit_type_from_categories<S: AsRef<str>>(names: &[S]) -> Option<UnitType> {
    for name in names {
        let trimmed = name.as_ref().trim();
        for (tag, unit_type) in UNIT_TYPE_TAGS {
            if trimmed.eq_ignore_ascii_case(tag) {
                return Some(unit_type);
            }
        }
    }
    None
}
