//! Library catalogue parser: units into warscroll records
//!
//! A "Library" catalogue defines one faction's units. Each top-level
//! `unit`/`model` selection entry becomes one warscroll; its scattered
//! sub-entry profiles (models, equipment options) are flattened, classified
//! by profile type, and assembled into stats, weapons and abilities.

use crate::classify::unit_type_from_categories;
use crate::documents::{Document, Element};
use crate::model::{new_id, now_timestamp, Ability, Warscroll, WeaponProfile};
use crate::profiles::{characteristic, collect_profiles, parse_ability_profile};
use crate::text::strip_weapon_ability;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{catalogue_root, category_names, faction_name, keywords_and_ward, split_subfaction};

static BOLD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

/// Result of parsing one library catalogue
#[derive(Debug)]
pub struct ParsedLibrary {
    /// One warscroll per top-level unit entry
    pub units: Vec<Warscroll>,
    /// Faction name derived from the catalogue name
    pub faction: String,
}

/// Parse a Library catalogue into warscroll records.
///
/// Unusable input degrades to an empty result rather than erroring; a
/// truncated document yields the units parsed before the break.
pub fn parse_cat_xml(xml: &str) -> ParsedLibrary {
    let doc = match Document::from_string(xml) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("library catalogue unusable: {}", e);
            return ParsedLibrary {
                units: Vec::new(),
                faction: "Imported".to_string(),
            };
        }
    };
    let ns = doc.namespace();
    let Some(catalogue) = catalogue_root(&doc) else {
        return ParsedLibrary {
            units: Vec::new(),
            faction: "Imported".to_string(),
        };
    };
    let faction = faction_name(catalogue);
    let now = now_timestamp();

    // Only top-level units: direct children of the shared container. Nested
    // model/upgrade entries are reached through the profile walker, never
    // emitted as cards of their own.
    let shared = catalogue
        .first_descendant_named(ns, "sharedSelectionEntries")
        .or_else(|| catalogue.first_descendant_named(ns, "selectionEntries"));
    let entries: Vec<&Element> = match shared {
        Some(container) => container.children_named(ns, "selectionEntry").collect(),
        None => Vec::new(),
    };

    let mut units = Vec::new();
    for entry in entries {
        let entry_type = entry.attr("type").unwrap_or("").to_lowercase();
        if entry_type != "unit" && entry_type != "model" {
            continue;
        }
        units.push(parse_unit_entry(entry, ns, &faction, &now));
    }

    log::debug!("parsed {} units for faction '{}'", units.len(), faction);
    ParsedLibrary { units, faction }
}

fn parse_unit_entry(entry: &Element, ns: Option<&str>, faction: &str, now: &str) -> Warscroll {
    let raw_name = entry
        .attr("name")
        .map(str::to_string)
        .or_else(|| {
            entry
                .first_child_named(ns, "name")
                .map(|n| n.text().to_string())
        })
        .unwrap_or_else(|| "Unknown".to_string());
    let (unit_name, subfaction) = split_subfaction(&raw_name);

    let mut move_ = String::new();
    let mut health = String::new();
    let mut save = String::new();
    let mut control = String::new();
    let mut ward: Option<String> = None;
    let mut weapons: Vec<WeaponProfile> = Vec::new();
    let mut abilities: Vec<Ability> = Vec::new();

    for profile in collect_profiles(entry, ns) {
        let profile_type = profile
            .attr("typeName")
            .or_else(|| profile.attr("type"))
            .unwrap_or("")
            .to_lowercase();

        if profile_type.contains("unit")
            && !profile_type.contains("weapon")
            && !profile_type.contains("ability")
        {
            // First-seen wins per field; a later stat profile never
            // overwrites a value that is already set.
            if move_.is_empty() {
                move_ = characteristic(profile, ns, &["Move", "Movement"]);
            }
            if health.is_empty() {
                health = characteristic(profile, ns, &["Wounds", "Health", "Damage"]);
            }
            if save.is_empty() {
                save = characteristic(profile, ns, &["Save"]);
            }
            if control.is_empty() {
                control = characteristic(profile, ns, &["Bravery", "Control"]);
            }
            if ward.is_none() {
                let w = characteristic(profile, ns, &["Ward"]);
                if !w.is_empty() {
                    ward = Some(w);
                }
            }
        } else if profile_type.contains("weapon") {
            weapons.push(parse_weapon_profile(profile, ns, &profile_type));
        } else if let Some(ability) = parse_ability_profile(profile, ns) {
            abilities.push(ability);
        }
    }

    // Keywords and ward come from the same category links; a WARD(n+)
    // category sets the ward value instead of becoming a keyword, and
    // overrides any characteristic-derived ward.
    let categories = category_names(entry, ns);
    let (keywords, category_ward) = keywords_and_ward(&categories);
    if category_ward.is_some() {
        ward = category_ward;
    }
    let unit_type = unit_type_from_categories(&categories);

    // The same weapon profile is frequently reachable via several model
    // sub-branches; first occurrence wins.
    let mut seen_weapons: HashSet<(String, bool)> = HashSet::new();
    let mut deduped: Vec<WeaponProfile> = Vec::new();
    for weapon in weapons {
        if seen_weapons.insert((weapon.name.clone(), weapon.is_ranged)) {
            deduped.push(weapon);
        }
    }

    if deduped.is_empty() {
        deduped.push(WeaponProfile {
            id: new_id(),
            name: "Melee".to_string(),
            range: "1\"".to_string(),
            attacks: "-".to_string(),
            hit: "-".to_string(),
            wound: "-".to_string(),
            rend: "-".to_string(),
            damage: "-".to_string(),
            abilities: Some(Vec::new()),
            is_ranged: false,
            suffers_battle_damage: None,
        });
    }

    link_battle_damage(&abilities, &mut deduped);

    Warscroll {
        id: new_id(),
        unit_name,
        faction: faction.to_string(),
        subfaction,
        unit_type,
        regiment_of_renown: None,
        move_: or_dash(move_),
        health: or_dash(health),
        save: or_dash(save),
        control: or_dash(control),
        ward,
        weapons: deduped,
        abilities,
        keywords,
        created_at: now.to_string(),
        updated_at: now.to_string(),
    }
}

fn parse_weapon_profile(profile: &Element, ns: Option<&str>, profile_type: &str) -> WeaponProfile {
    let name = profile
        .attr("name")
        .filter(|n| !n.is_empty())
        .unwrap_or("Weapon");
    let range = characteristic(profile, ns, &["Range", "Rng"]);
    let attacks = characteristic(profile, ns, &["Attacks", "Atk"]);
    let hit = characteristic(profile, ns, &["To Hit", "Hit"]);
    let wound = characteristic(profile, ns, &["To Wound", "Wnd", "Wound"]);
    let rend = characteristic(profile, ns, &["Rend", "Rnd"]);
    let damage = characteristic(profile, ns, &["Damage", "Dmg"]);
    let ability_tags = characteristic(profile, ns, &["Abilities", "Ability", "Special"]);

    let is_ranged = profile_type.contains("ranged") || leading_number(&range).is_some_and(|n| n > 0.0);
    let range = if !range.is_empty() {
        if range.contains('"') {
            range
        } else {
            format!("{}\"", range)
        }
    } else if is_ranged {
        "12\"".to_string()
    } else {
        "1\"".to_string()
    };

    let abilities: Vec<String> = ability_tags
        .split(',')
        .map(strip_weapon_ability)
        .filter(|tag| !tag.is_empty() && tag != "-" && tag != "\u{2013}")
        .collect();

    WeaponProfile {
        id: new_id(),
        name: name.to_string(),
        range,
        attacks: or_dash(attacks),
        hit: or_dash(hit),
        wound: or_dash(wound),
        rend: or_dash(rend),
        damage: or_dash(damage),
        abilities: Some(abilities),
        is_ranged,
        suffers_battle_damage: None,
    }
}

/// Mark weapons referenced by battle-damage ability text.
///
/// Battle-damage abilities name the affected weapons in bold. Matching is
/// by normalized name and deliberately non-unique: every weapon whose
/// normalized name equals a referenced name is marked.
fn link_battle_damage(abilities: &[Ability], weapons: &mut [WeaponProfile]) {
    let mut referenced: HashSet<String> = HashSet::new();
    for ability in abilities {
        if ability.battle_damage != Some(true) {
            continue;
        }
        for caps in BOLD_RUN.captures_iter(&ability.text) {
            let run = caps[1].trim();
            if run.eq_ignore_ascii_case("Declare") || run.eq_ignore_ascii_case("Effect") {
                continue;
            }
            referenced.insert(normalize_weapon_name(run));
        }
    }
    if referenced.is_empty() {
        return;
    }
    for weapon in weapons {
        if referenced.contains(&normalize_weapon_name(&weapon.name)) {
            weapon.suffers_battle_damage = Some(true);
        }
    }
}

/// Collapse whitespace, unify apostrophe variants, lowercase
fn normalize_weapon_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{2019}', "'")
        .to_lowercase()
}

/// Leading numeric prefix of a characteristic value, e.g. `12"` → 12.0
fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let end = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    trimmed[..end].parse().ok()
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("12\""), Some(12.0));
        assert_eq!(leading_number("3"), Some(3.0));
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("D6"), None);
    }

    #[test]
    fn test_normalize_weapon_name() {
        assert_eq!(normalize_weapon_name("Fjori\u{2019}s   Axe"), "fjori's axe");
        assert_eq!(normalize_weapon_name("Fjori's Axe"), "fjori's axe");
        assert_eq!(normalize_weapon_name("GREAT MAW"), "great maw");
    }

    #[test]
    fn test_empty_catalogue_degrades_to_empty_result() {
        let parsed = parse_cat_xml("not xml at all <<<");
        assert!(parsed.units.is_empty());
        assert_eq!(parsed.faction, "Imported");
    }
}
