//! Regiments of Renown catalogue parser
//!
//! The regiments catalogue encodes membership through a three-hop
//! indirection: the regiment upgrade entry carries a force-scoped
//! `instanceOf` condition whose `childId` is the join key; root entry
//! links carrying the same `childId` in their modifier groups name the
//! member units. Units themselves are defined in the per-faction Library
//! catalogues, reachable via `catalogueLink`s. This parser learns member
//! *names* only.

use crate::documents::{Document, Element};
use crate::model::{new_id, now_timestamp, BattleTrait, BattleTraitType};
use crate::profiles::{collect_profiles, parse_ability_profile};
use crate::REGIMENTS_OF_RENOWN_PUBLICATION_ID;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::catalogue_root;

static REGIMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Regiment of Renown:\s*(.+)$").unwrap());
static LIBRARY_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*-\s*Library\s*$").unwrap());

/// Result of parsing the Regiments of Renown catalogue
#[derive(Debug)]
pub struct ParsedRegiments {
    /// One trait record per regiment that carried abilities
    pub traits: Vec<BattleTrait>,
    /// Regiment name → member unit names, in order of first appearance
    pub regiment_mapping: IndexMap<String, Vec<String>>,
}

/// Parse the Regiments of Renown catalogue.
///
/// `only_regiment` restricts parsing to a single regiment by exact name;
/// callers use it for a cheap single-regiment import instead of walking
/// the whole file.
pub fn parse_regiments_of_renown_cat_xml(
    xml: &str,
    only_regiment: Option<&str>,
) -> ParsedRegiments {
    let doc = match Document::from_string(xml) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("regiments catalogue unusable: {}", e);
            return ParsedRegiments {
                traits: Vec::new(),
                regiment_mapping: IndexMap::new(),
            };
        }
    };
    let ns = doc.namespace();
    let Some(catalogue) = catalogue_root(&doc) else {
        return ParsedRegiments {
            traits: Vec::new(),
            regiment_mapping: IndexMap::new(),
        };
    };
    let now = now_timestamp();

    // Hop 1: regiment upgrade entries, filtered by the regiments
    // publication id so unrelated same-named entries drop out.
    let mut regiments: Vec<(String, &Element)> = Vec::new();
    if let Some(shared) = catalogue.first_descendant_named(ns, "sharedSelectionEntries") {
        for entry in shared.children_named(ns, "selectionEntry") {
            if entry.attr("publicationId") != Some(REGIMENTS_OF_RENOWN_PUBLICATION_ID) {
                continue;
            }
            let Some(name) = entry.attr("name") else { continue };
            let Some(caps) = REGIMENT_NAME.captures(name) else {
                continue;
            };
            let regiment = caps[1].trim().to_string();
            if only_regiment.is_some_and(|only| only != regiment) {
                continue;
            }
            regiments.push((regiment, entry));
        }
    }

    // Hop 2: the force-scoped instanceOf condition on the regiment's
    // modifier carries the childId join key.
    let mut child_to_regiment: IndexMap<String, String> = IndexMap::new();
    let mut regiment_mapping: IndexMap<String, Vec<String>> = IndexMap::new();
    for (regiment, entry) in &regiments {
        regiment_mapping.entry(regiment.clone()).or_default();
        for modifier in entry.descendants_named(ns, "modifier") {
            if let Some(child_id) = force_instance_child_id(modifier, ns) {
                child_to_regiment.insert(child_id, regiment.clone());
            }
        }
    }

    // Hop 3: root entry links whose modifier-group condition shares a
    // recorded childId name the member units.
    if let Some(links) = catalogue.first_descendant_named(ns, "entryLinks") {
        for link in links.children_named(ns, "entryLink") {
            if link.attr("type") != Some("selectionEntry") {
                continue;
            }
            let Some(unit_name) = link.attr("name") else {
                continue;
            };
            for group in link.descendants_named(ns, "modifierGroup") {
                let Some(child_id) = force_instance_child_id(group, ns) else {
                    continue;
                };
                if let Some(regiment) = child_to_regiment.get(&child_id) {
                    let members = regiment_mapping.entry(regiment.clone()).or_default();
                    if !members.iter().any(|m| m == unit_name) {
                        members.push(unit_name.to_string());
                    }
                }
            }
        }
    }

    // Regiment traits come from the upgrade entry's own profiles; a
    // regiment with no parsed abilities gets no placeholder record.
    let mut traits = Vec::new();
    for (regiment, entry) in &regiments {
        let abilities: Vec<_> = collect_profiles(entry, ns)
            .into_iter()
            .filter_map(|p| parse_ability_profile(p, ns))
            .collect();
        if abilities.is_empty() {
            continue;
        }
        traits.push(BattleTrait {
            id: new_id(),
            name: regiment.clone(),
            trait_type: Some(BattleTraitType::RegimentsOfRenown),
            regiment_of_renown: Some(regiment.clone()),
            faction: None,
            subfaction: None,
            move_: "-".to_string(),
            health: "-".to_string(),
            save: "-".to_string(),
            control: "-".to_string(),
            ward: None,
            keywords: Vec::new(),
            abilities,
            created_at: now.clone(),
            updated_at: now.clone(),
        });
    }

    log::debug!(
        "parsed {} regiments, {} with traits",
        regiment_mapping.len(),
        traits.len()
    );
    ParsedRegiments {
        traits,
        regiment_mapping,
    }
}

/// The `childId` of a force-scoped `instanceOf` condition under `scope_el`
fn force_instance_child_id(scope_el: &Element, ns: Option<&str>) -> Option<String> {
    scope_el
        .descendants_named(ns, "condition")
        .into_iter()
        .find(|c| c.attr("scope") == Some("force") && c.attr("type") == Some("instanceOf"))
        .and_then(|c| c.attr("childId"))
        .map(str::to_string)
}

/// Library catalogue paths referenced by the regiments catalogue.
///
/// Regiment members are only *named* here; their stat blocks live in the
/// per-faction Library catalogues listed as `catalogueLink`s. Returns the
/// `.cat` file names so the caller can fetch them.
pub fn get_library_paths_from_regiments_xml(xml: &str) -> Vec<String> {
    let doc = match Document::from_string(xml) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("regiments catalogue unusable: {}", e);
            return Vec::new();
        }
    };
    let ns = doc.namespace();
    let Some(root) = doc.root() else {
        return Vec::new();
    };

    let mut paths = Vec::new();
    for link in root.descendants_named(ns, "catalogueLink") {
        let Some(name) = link.attr("name") else { continue };
        if !LIBRARY_LINK.is_match(name) {
            continue;
        }
        let path = format!("{}.cat", name);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}
