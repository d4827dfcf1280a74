//! Profile handling: characteristic accessors, the profile-to-ability
//! parser, and the selection-entry tree walker
//!
//! A catalogue "profile" is a named, typed attribute bag. Its `typeName`
//! decides how it is interpreted: unit stat block, weapon stat line, or
//! ability text. This module owns the ability interpretation; the stat and
//! weapon branches live with the library parser.

use crate::classify::{normalize_color, normalize_phase, parse_ability_type, parse_timing, phase_color};
use crate::documents::Element;
use crate::model::{Ability, AbilityColor, AbilityTimingQualifier};
use crate::text::{build_ability_text, strip_weapon_ability};
use once_cell::sync::Lazy;
use regex::Regex;

static PASSIVE_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^ability\s*\(\s*passive\s*\)$").unwrap());
static SPELL_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ability\s*\(\s*spell\s*\)").unwrap());
static PRAYER_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ability\s*\(\s*prayer\s*\)").unwrap());
static PASSIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)passive").unwrap());
static REACTION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)reaction\s*:").unwrap());
static REACTION_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)reaction:\s*([^\n.]+)").unwrap());
static REACTION_REST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)reaction:\s*(.+)").unwrap());
static BATTLE_DAMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)battle\s*damaged?").unwrap());

/// Text of the first matching `<characteristic>` anywhere under `profile`,
/// trying the caller-supplied synonym names in order. Empty string when
/// none match.
pub fn characteristic(profile: &Element, ns: Option<&str>, names: &[&str]) -> String {
    for name in names {
        let found = profile
            .descendants_named(ns, "characteristic")
            .into_iter()
            .find(|c| c.attr("name") == Some(*name));
        if let Some(c) = found {
            return c.text().to_string();
        }
    }
    String::new()
}

/// Like [`characteristic`], but restricted to the profile's *direct*
/// `<characteristics>` container.
///
/// Some catalogue elements nest `<characteristics>` at multiple depths; a
/// deep search would read values off an unrelated sibling profile (e.g. a
/// spell's casting value leaking from an adjacent profile).
pub fn characteristic_direct(profile: &Element, ns: Option<&str>, names: &[&str]) -> String {
    let Some(container) = profile.first_child_named(ns, "characteristics") else {
        return String::new();
    };
    for name in names {
        let found = container
            .children_named(ns, "characteristic")
            .find(|c| c.attr("name") == Some(*name));
        if let Some(c) = found {
            return c.text().to_string();
        }
    }
    String::new()
}

/// Value of the named `<attribute>` under `profile`: the `value` attribute
/// when present, else the element text. Empty string when absent.
pub fn attribute_value(profile: &Element, ns: Option<&str>, name: &str) -> String {
    let found = profile
        .descendants_named(ns, "attribute")
        .into_iter()
        .find(|a| a.attr("name") == Some(name));
    match found {
        Some(a) => match a.attr("value") {
            Some(v) => v.to_string(),
            None => a.text().to_string(),
        },
        None => String::new(),
    }
}

/// All `<profile>` elements reachable from a selection entry: the entry's
/// direct `<profiles>` container, then recursion into nested entries
/// (model/upgrade sub-entries), flattening in document order.
///
/// Weapon and ability profiles for one unit are scattered across the
/// sub-entries representing individual models and equipment options; the
/// library parser wants them as one flat list per unit.
pub fn collect_profiles<'a>(entry: &'a Element, ns: Option<&'a str>) -> Vec<&'a Element> {
    let mut out = Vec::new();
    if let Some(profiles_el) = entry.first_child_named(ns, "profiles") {
        out.extend(profiles_el.children_named(ns, "profile"));
    }
    if let Some(entries_el) = entry.first_child_named(ns, "selectionEntries") {
        for child in entries_el.children_named(ns, "selectionEntry") {
            out.extend(collect_profiles(child, ns));
        }
    }
    out
}

/// Parse one profile element into an [`Ability`], or `None` when the
/// profile is not ability-shaped.
///
/// Passivity is decided before any other classification. A profile counts
/// as passive when its type says so explicitly, when `passive` appears in
/// the type/timing signals, or when *no* Timing/Phase/When signal is
/// populated at all: catalogue authors habitually omit the timing
/// characteristic for passives instead of writing "Passive", so absence is
/// itself evidence. That last rule is a heuristic over author habit, not a
/// schema guarantee.
pub fn parse_ability_profile(profile: &Element, ns: Option<&str>) -> Option<Ability> {
    let type_name = profile
        .attr("typeName")
        .or_else(|| profile.attr("type"))
        .unwrap_or("");
    let type_lower = type_name.to_lowercase();
    if !type_lower.contains("ability") && !type_lower.contains("effect") {
        return None;
    }

    let name = profile.attr("name").unwrap_or("");
    let declare = characteristic(profile, ns, &["Declare"]);
    let effect = characteristic(profile, ns, &["Effect", "Description", "Rules"]);
    if declare.is_empty() && effect.is_empty() && name.is_empty() {
        return None;
    }

    let color_raw = {
        let from_attr = attribute_value(profile, ns, "Color");
        if from_attr.is_empty() {
            characteristic(profile, ns, &["Color", "Colour"])
        } else {
            from_attr
        }
    };
    let type_str = {
        let from_attr = attribute_value(profile, ns, "Type");
        if from_attr.is_empty() {
            characteristic(profile, ns, &["Type", "Ability Type"])
        } else {
            from_attr
        }
    };
    let timing_str = {
        let from_timing = attribute_value(profile, ns, "Timing");
        let from_phase = if from_timing.is_empty() {
            attribute_value(profile, ns, "Phase")
        } else {
            from_timing
        };
        if from_phase.is_empty() {
            characteristic(profile, ns, &["Timing", "Phase", "When"])
        } else {
            from_phase
        }
    };
    let combined = format!("{} {}", timing_str, type_str).trim().to_string();

    let is_passive = PASSIVE_TYPE.is_match(type_name.trim())
        || timing_str.is_empty()
        || PASSIVE.is_match(&type_str)
        || PASSIVE.is_match(&combined);

    let mut phase = None;
    let mut timing = None;
    let mut ability_type = None;
    let mut reaction_ability_type = None;

    if is_passive {
        timing = Some(AbilityTimingQualifier::Passive);
    } else {
        phase = normalize_phase(&timing_str).or_else(|| normalize_phase(&combined));
        timing = parse_timing(&combined).or_else(|| parse_timing(&timing_str));
        ability_type = parse_ability_type(&combined).or_else(|| parse_ability_type(&type_str));

        if REACTION_MARKER.is_match(&combined) || REACTION_MARKER.is_match(&effect) {
            timing = Some(AbilityTimingQualifier::Reaction);
            let clause = REACTION_CLAUSE
                .captures(&effect)
                .or_else(|| REACTION_REST.captures(&combined));
            if let Some(c) = clause {
                reaction_ability_type = Some(strip_weapon_ability(&c[1]));
            }
        }
    }

    // Explicit color always wins over inferred
    let color = if !color_raw.is_empty() {
        normalize_color(&color_raw)
    } else if is_passive {
        AbilityColor::Green
    } else {
        phase.map(phase_color).unwrap_or_default()
    };

    let mut is_spell = None;
    let mut casting_value = None;
    if SPELL_TYPE.is_match(type_name) {
        is_spell = Some(true);
        let cv = characteristic_direct(profile, ns, &["Casting Value"]);
        if !cv.is_empty() {
            casting_value = Some(cv);
        }
    }
    let mut is_prayer = None;
    let mut chanting_value = None;
    if PRAYER_TYPE.is_match(type_name) {
        is_prayer = Some(true);
        let cv = characteristic_direct(profile, ns, &["Chanting Value"]);
        if !cv.is_empty() {
            chanting_value = Some(cv);
        }
    }

    let battle_damage = if BATTLE_DAMAGE.is_match(name)
        || BATTLE_DAMAGE.is_match(&effect)
        || BATTLE_DAMAGE.is_match(&declare)
    {
        Some(true)
    } else {
        None
    };

    let keywords = {
        let raw = characteristic(profile, ns, &["Keywords"]);
        let list: Vec<String> = raw
            .split(',')
            .map(strip_weapon_ability)
            .filter(|k| !k.is_empty())
            .collect();
        if list.is_empty() {
            None
        } else {
            Some(list)
        }
    };

    Some(Ability {
        name: if name.is_empty() { "Ability" } else { name }.to_string(),
        color,
        phase,
        timing,
        ability_type,
        reaction_ability_type,
        reaction_phase: None,
        text: build_ability_text(&declare, &effect, name),
        battle_damage,
        is_spell,
        casting_value,
        is_prayer,
        chanting_value,
        keywords,
        ..Ability::empty()
    })
}
