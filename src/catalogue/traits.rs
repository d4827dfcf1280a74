//! Battle-trait catalogue parser
//!
//! A faction's bare catalogue groups its battle traits, formations, heroic
//! traits, artefacts and lores under shared selection-entry groups. Lore
//! entries often carry no ability text of their own: they reference spell
//! and prayer bodies in the shared Lores catalogue by `targetId`, which is
//! resolved here through a one-time id index over the lores document.

use crate::documents::{Document, Element};
use crate::model::{new_id, now_timestamp, Ability, BattleTrait, BattleTraitType};
use crate::profiles::{collect_profiles, parse_ability_profile};
use crate::{SCOURGE_OF_GHYRAN_LABEL, SCOURGE_OF_GHYRAN_PUBLICATION_ID};
use std::collections::{HashMap, HashSet};

use super::{catalogue_root, category_names, faction_name, keywords_and_ward, split_subfaction};

/// Entry names that are bookkeeping constructs in the source data, not
/// real traits
const DENY_LIST: [&str; 2] = ["Battle Wounds", "Drained"];

/// Group-name → trait-type mapping rules, tried in order; substring match
/// on the lowercased group name. Unmatched groups default to battle traits.
const GROUP_TYPE_RULES: &[(&[&str], BattleTraitType)] = &[
    (&["battle formation"], BattleTraitType::BattleFormations),
    (&["heroic trait"], BattleTraitType::HeroicTraits),
    (
        &["artefact", "artifact", "heirloom", "marks of"],
        BattleTraitType::Artefacts,
    ),
    (&["prayer lore"], BattleTraitType::PrayerLores),
    (&["manifestation"], BattleTraitType::ManifestationLores),
    (&["spell lore", "lore"], BattleTraitType::SpellLores),
];

/// Map a selection-entry group name to a trait section type
pub fn trait_type_for_group(group_name: &str) -> BattleTraitType {
    let lower = group_name.to_lowercase();
    for (patterns, trait_type) in GROUP_TYPE_RULES {
        if patterns.iter().any(|p| lower.contains(p)) {
            return *trait_type;
        }
    }
    BattleTraitType::BattleTraits
}

/// Result of parsing one battle-trait catalogue
#[derive(Debug)]
pub struct ParsedTraits {
    /// One record per trait/formation/artefact/lore entry
    pub traits: Vec<BattleTrait>,
    /// Faction name derived from the catalogue name
    pub faction: String,
}

struct CollectedEntry<'a> {
    entry: &'a Element,
    group: String,
    scourge: bool,
}

/// Parse a faction's battle-trait catalogue. `lores_xml`, when supplied, is
/// the shared Lores catalogue used to resolve lore entry links.
pub fn parse_battle_trait_cat_xml(xml: &str, lores_xml: Option<&str>) -> ParsedTraits {
    let doc = match Document::from_string(xml) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("battle-trait catalogue unusable: {}", e);
            return ParsedTraits {
                traits: Vec::new(),
                faction: "Imported".to_string(),
            };
        }
    };
    let ns = doc.namespace();
    let Some(catalogue) = catalogue_root(&doc) else {
        return ParsedTraits {
            traits: Vec::new(),
            faction: "Imported".to_string(),
        };
    };
    let faction = faction_name(catalogue);
    let now = now_timestamp();

    // Lores side-document, parsed once, with an id index that also records
    // whether each indexed element sits under a Scourge-of-Ghyran
    // publication marker.
    let lores_doc = lores_xml.and_then(|x| match Document::from_string(x) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("lores catalogue unusable, links will not resolve: {}", e);
            None
        }
    });
    let lores = lores_doc.as_ref().map(|doc| {
        let mut index = HashMap::new();
        if let Some(root) = doc.root() {
            index_with_scourge(root, false, &mut index);
        }
        LoresIndex {
            ns: doc.namespace(),
            index,
        }
    });

    // Grouped entries keep their top-level ancestor group's label even when
    // nested several groups deep; bare shared entries count as battle traits.
    let mut collected: Vec<CollectedEntry> = Vec::new();
    if let Some(groups) = catalogue.first_descendant_named(ns, "sharedSelectionEntryGroups") {
        for group in groups.children_named(ns, "selectionEntryGroup") {
            let label = group.attr("name").unwrap_or("").to_string();
            collect_group_entries(group, ns, &label, false, &mut collected);
        }
    }
    if let Some(shared) = catalogue.first_descendant_named(ns, "sharedSelectionEntries") {
        for entry in shared.children_named(ns, "selectionEntry") {
            let scourge = entry.attr("publicationId") == Some(SCOURGE_OF_GHYRAN_PUBLICATION_ID);
            collected.push(CollectedEntry {
                entry,
                group: "Battle traits".to_string(),
                scourge,
            });
        }
    }

    let mut traits = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for item in collected {
        let raw_name = item.entry.attr("name").unwrap_or("");
        if raw_name.is_empty() || DENY_LIST.contains(&raw_name) {
            continue;
        }
        let (name, mut subfaction) = split_subfaction(raw_name);
        if subfaction.is_none() && item.scourge {
            subfaction = Some(SCOURGE_OF_GHYRAN_LABEL.to_string());
        }

        let dedup_key = match item.entry.attr("id") {
            Some(id) => format!("id:{}", id),
            None => format!("key:{}|{}|{}", name, faction, subfaction.as_deref().unwrap_or("")),
        };
        if !seen.insert(dedup_key) {
            continue;
        }

        let trait_type = trait_type_for_group(&item.group);

        let mut abilities: Vec<Ability> = collect_profiles(item.entry, ns)
            .into_iter()
            .filter_map(|p| parse_ability_profile(p, ns))
            .collect();

        // Lore entries usually reference their spells out of the shared
        // Lores catalogue instead of carrying profiles.
        if abilities.is_empty() && trait_type.is_lore() {
            if let Some(lores) = &lores {
                let (resolved, target_scourge) = resolve_lore_links(item.entry, ns, lores);
                abilities = resolved;
                if target_scourge {
                    subfaction = Some(SCOURGE_OF_GHYRAN_LABEL.to_string());
                }
            }
        }

        let categories = category_names(item.entry, ns);
        let (keywords, ward) = keywords_and_ward(&categories);

        traits.push(BattleTrait {
            id: new_id(),
            name,
            trait_type: Some(trait_type),
            regiment_of_renown: None,
            faction: Some(faction.clone()),
            subfaction,
            move_: "-".to_string(),
            health: "-".to_string(),
            save: "-".to_string(),
            control: "-".to_string(),
            ward,
            keywords,
            abilities,
            created_at: now.clone(),
            updated_at: now.clone(),
        });
    }

    log::debug!("parsed {} traits for faction '{}'", traits.len(), faction);
    ParsedTraits { traits, faction }
}

/// Walk a selection-entry group, collecting trait entries and tagging each
/// with the *top-level* group label and its publication ancestry
fn collect_group_entries<'a>(
    group: &'a Element,
    ns: Option<&'a str>,
    top_label: &str,
    scourge: bool,
    out: &mut Vec<CollectedEntry<'a>>,
) {
    let scourge = scourge || group.attr("publicationId") == Some(SCOURGE_OF_GHYRAN_PUBLICATION_ID);
    if let Some(entries) = group.first_child_named(ns, "selectionEntries") {
        for entry in entries.children_named(ns, "selectionEntry") {
            let entry_scourge =
                scourge || entry.attr("publicationId") == Some(SCOURGE_OF_GHYRAN_PUBLICATION_ID);
            out.push(CollectedEntry {
                entry,
                group: top_label.to_string(),
                scourge: entry_scourge,
            });
        }
    }
    if let Some(groups) = group.first_child_named(ns, "selectionEntryGroups") {
        for sub in groups.children_named(ns, "selectionEntryGroup") {
            collect_group_entries(sub, ns, top_label, scourge, out);
        }
    }
}

struct LoresIndex<'a> {
    ns: Option<&'a str>,
    index: HashMap<&'a str, (&'a Element, bool)>,
}

/// Index every id-carrying element together with whether any ancestor
/// carried the Scourge-of-Ghyran publication id
fn index_with_scourge<'a>(
    element: &'a Element,
    scourge: bool,
    index: &mut HashMap<&'a str, (&'a Element, bool)>,
) {
    let scourge =
        scourge || element.attr("publicationId") == Some(SCOURGE_OF_GHYRAN_PUBLICATION_ID);
    if let Some(id) = element.attr("id") {
        index.entry(id).or_insert((element, scourge));
    }
    for child in &element.children {
        index_with_scourge(child, scourge, index);
    }
}

/// Resolve an entry's `entryLink` children into the lores document and
/// collect the abilities found behind them. Returns the abilities plus
/// whether any resolved target sat under Scourge-of-Ghyran content.
fn resolve_lore_links(
    entry: &Element,
    entry_ns: Option<&str>,
    lores: &LoresIndex,
) -> (Vec<Ability>, bool) {
    let mut abilities = Vec::new();
    let mut scourge = false;
    let mut visited: HashSet<String> = HashSet::new();

    for link in entry.descendants_named(entry_ns, "entryLink") {
        let Some(target_id) = link.attr("targetId") else {
            continue;
        };
        match lores.index.get(target_id) {
            Some((target, target_scourge)) => {
                scourge = scourge || *target_scourge;
                collect_target_abilities(target, lores, &mut visited, &mut abilities);
            }
            None => {
                log::warn!("unresolvable lore targetId '{}'", target_id);
            }
        }
    }
    (abilities, scourge)
}

/// Abilities behind one resolved target: an entry yields its own profile
/// walk; a group recurses through its entries, nested groups and further
/// entry links.
fn collect_target_abilities(
    target: &Element,
    lores: &LoresIndex,
    visited: &mut HashSet<String>,
    out: &mut Vec<Ability>,
) {
    if let Some(id) = target.attr("id") {
        if !visited.insert(id.to_string()) {
            return;
        }
    }
    match target.local_name() {
        "selectionEntry" => {
            out.extend(
                collect_profiles(target, lores.ns)
                    .into_iter()
                    .filter_map(|p| parse_ability_profile(p, lores.ns)),
            );
        }
        "selectionEntryGroup" => {
            if let Some(entries) = target.first_child_named(lores.ns, "selectionEntries") {
                for entry in entries.children_named(lores.ns, "selectionEntry") {
                    collect_target_abilities(entry, lores, visited, out);
                }
            }
            if let Some(links) = target.first_child_named(lores.ns, "entryLinks") {
                for link in links.children_named(lores.ns, "entryLink") {
                    if let Some(id) = link.attr("targetId") {
                        if let Some((next, _)) = lores.index.get(id) {
                            collect_target_abilities(next, lores, visited, out);
                        } else {
                            log::warn!("unresolvable lore targetId '{}'", id);
                        }
                    }
                }
            }
            if let Some(groups) = target.first_child_named(lores.ns, "selectionEntryGroups") {
                for sub in groups.children_named(lores.ns, "selectionEntryGroup") {
                    collect_target_abilities(sub, lores, visited, out);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trait_type_for_group() {
        assert_eq!(
            trait_type_for_group("Battle Formations"),
            BattleTraitType::BattleFormations
        );
        assert_eq!(trait_type_for_group("Heroic Traits"), BattleTraitType::HeroicTraits);
        assert_eq!(trait_type_for_group("Artefacts of Power"), BattleTraitType::Artefacts);
        assert_eq!(trait_type_for_group("Marks of Chaos"), BattleTraitType::Artefacts);
        assert_eq!(trait_type_for_group("Prayer Lores"), BattleTraitType::PrayerLores);
        assert_eq!(
            trait_type_for_group("Manifestation Lores"),
            BattleTraitType::ManifestationLores
        );
        assert_eq!(trait_type_for_group("Spell Lores"), BattleTraitType::SpellLores);
        // Bare "lore" falls to spell lores only after the specific rules
        assert_eq!(trait_type_for_group("Lores"), BattleTraitType::SpellLores);
        assert_eq!(trait_type_for_group("Anything Else"), BattleTraitType::BattleTraits);
    }

    #[test]
    fn test_empty_input_degrades() {
        let parsed = parse_battle_trait_cat_xml("", None);
        assert!(parsed.traits.is_empty());
    }
}
