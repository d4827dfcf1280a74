//! Catalogue drivers: one parser per catalogue kind
//!
//! Four catalogue kinds are consumed: a per-faction "Library" catalogue
//! (units), a per-faction bare catalogue (battle traits, formations,
//! lores), the shared Lores catalogue (spell/prayer/manifestation bodies,
//! referenced by id from trait catalogues), and the Regiments of Renown
//! catalogue. All parsers are pure text-in/records-out: they never fetch,
//! never persist, and degrade to partial results on bad input.

pub mod library;
pub mod regiments;
pub mod traits;

pub use library::{parse_cat_xml, ParsedLibrary};
pub use regiments::{
    get_library_paths_from_regiments_xml, parse_regiments_of_renown_cat_xml, ParsedRegiments,
};
pub use traits::{parse_battle_trait_cat_xml, ParsedTraits};

use crate::documents::{Document, Element};
use once_cell::sync::Lazy;
use regex::Regex;

static LIBRARY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*-\s*Library\s*$").unwrap());
static SUBFACTION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+\(([^)]+)\)\s*$").unwrap());
static WARD_CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^WARD\s*\((\d+\+)\)$").unwrap());

/// Resolve the `<catalogue>` root of a parsed document. Falls back to the
/// document root so a wrapper element does not lose the whole file.
pub(crate) fn catalogue_root(doc: &Document) -> Option<&Element> {
    let root = doc.root()?;
    if root.local_name() == "catalogue" {
        return Some(root);
    }
    root.first_descendant_named(doc.namespace(), "catalogue")
        .or(Some(root))
}

/// Faction name from the catalogue `name` attribute, with any trailing
/// `" - Library"` suffix stripped. `"Imported"` when absent.
pub(crate) fn faction_name(catalogue: &Element) -> String {
    match catalogue.attr("name") {
        Some(name) => LIBRARY_SUFFIX.replace(name, "").trim().to_string(),
        None => "Imported".to_string(),
    }
}

/// Split a trailing parenthetical subfaction suffix off a display name:
/// `"Auric Runeson (Scourge of Ghyran)"` → `("Auric Runeson",
/// Some("Scourge of Ghyran"))`.
pub(crate) fn split_subfaction(name: &str) -> (String, Option<String>) {
    match SUBFACTION_SUFFIX.captures(name) {
        Some(caps) => (caps[1].to_string(), Some(caps[2].to_string())),
        None => (name.to_string(), None),
    }
}

/// Category-link names under an entry, in document order
pub(crate) fn category_names(entry: &Element, ns: Option<&str>) -> Vec<String> {
    match entry.first_descendant_named(ns, "categoryLinks") {
        Some(links) => links
            .children_named(ns, "categoryLink")
            .filter_map(|link| {
                link.attr("name")
                    .map(str::to_string)
                    .or_else(|| Some(link.text().to_string()).filter(|t| !t.is_empty()))
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Split category names into keyword list and ward value: a `WARD(n+)`
/// category sets the ward instead of becoming a keyword; everything else
/// becomes a keyword once, in first-seen order.
pub(crate) fn keywords_and_ward(names: &[String]) -> (Vec<String>, Option<String>) {
    let mut keywords: Vec<String> = Vec::new();
    let mut ward = None;
    for name in names {
        if let Some(caps) = WARD_CATEGORY.captures(name) {
            ward = Some(caps[1].to_string());
        } else if !keywords.iter().any(|k| k == name) {
            keywords.push(name.clone());
        }
    }
    (keywords, ward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keywords_and_ward() {
        let names = vec![
            "ORDER".to_string(),
            "WARD (5+)".to_string(),
            "HERO".to_string(),
            "ORDER".to_string(),
        ];
        let (keywords, ward) = keywords_and_ward(&names);
        assert_eq!(keywords, vec!["ORDER".to_string(), "HERO".to_string()]);
        assert_eq!(ward.as_deref(), Some("5+"));
    }

    #[test]
    fn test_faction_name_strips_library_suffix() {
        let doc = Document::from_string(r#"<catalogue name="Fyreslayers - Library"/>"#).unwrap();
        let root = catalogue_root(&doc).unwrap();
        assert_eq!(faction_name(root), "Fyreslayers");

        let doc = Document::from_string(r#"<catalogue name="Fyreslayers"/>"#).unwrap();
        assert_eq!(faction_name(catalogue_root(&doc).unwrap()), "Fyreslayers");

        let doc = Document::from_string(r#"<catalogue/>"#).unwrap();
        assert_eq!(faction_name(catalogue_root(&doc).unwrap()), "Imported");
    }

    #[test]
    fn test_split_subfaction() {
        assert_eq!(
            split_subfaction("Auric Runeson (Scourge of Ghyran)"),
            ("Auric Runeson".to_string(), Some("Scourge of Ghyran".to_string()))
        );
        assert_eq!(split_subfaction("Auric Runeson"), ("Auric Runeson".to_string(), None));
        // Inner parentheticals that are not a trailing suffix stay put
        assert_eq!(
            split_subfaction("Korgorath (Bound)"),
            ("Korgorath".to_string(), Some("Bound".to_string()))
        );
    }
}
