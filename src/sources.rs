//! Catalogue sources: paths, URLs and the fetch collaborator
//!
//! The parsing core never performs network I/O itself; it consumes strings.
//! This module owns the path conventions of the community data repository
//! and defines the [`CatalogueSource`] trait callers implement (an HTTP
//! implementation ships behind the `fetch` feature). It also hosts the
//! multi-catalogue regiment import, which tolerates individual library
//! fetch failures: one unreachable library drops its units, never the
//! whole import.

use crate::catalogue::{
    get_library_paths_from_regiments_xml, parse_cat_xml, parse_regiments_of_renown_cat_xml,
};
use crate::error::Result;
use crate::model::{BattleTrait, Warscroll};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Raw content base of the community data repository
pub const RAW_BASE: &str = "https://raw.githubusercontent.com/BSData/age-of-sigmar-4th/main";

/// Path to the shared Lores catalogue (spell/prayer/manifestation bodies)
pub const LORES_CATALOGUE_PATH: &str = "Lores.cat";

/// Path to the Regiments of Renown catalogue
pub const REGIMENTS_OF_RENOWN_PATH: &str = "Regiments of Renown.cat";

static LIBRARY_FILE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*Library\.cat$").unwrap());
static LIBRARY_NAME_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*Library\s*$").unwrap());
static CAT_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.cat$").unwrap());

/// Known Library catalogues, used as a static fallback when the repository
/// listing is unavailable
pub const FALLBACK_LIBRARY: [&str; 25] = [
    "Beasts of Chaos - Library.cat",
    "Blades of Khorne - Library.cat",
    "Bonesplitterz - Library.cat",
    "Cities of Sigmar - Library.cat",
    "Daughters of Khaine - Library.cat",
    "Disciples of Tzeentch - Library.cat",
    "Flesh-eater Courts - Library.cat",
    "Fyreslayers - Library.cat",
    "Gloomspite Gitz - Library.cat",
    "Hedonites of Slaanesh - Library.cat",
    "Helsmiths of Hashut - Library.cat",
    "Idoneth Deepkin - Library.cat",
    "Ironjawz - Library.cat",
    "Kharadron Overlords - Library.cat",
    "Kruleboyz - Library.cat",
    "Lumineth Realm-lords - Library.cat",
    "Maggotkin of Nurgle - Library.cat",
    "Nighthaunt - Library.cat",
    "Ogor Mawtribes - Library.cat",
    "Ossiarch Bonereapers - Library.cat",
    "Seraphon - Library.cat",
    "Skaven - Library.cat",
    "Slaves to Darkness - Library.cat",
    "Sons of Behemat - Library.cat",
    "Soulblight Gravelords - Library.cat",
];

/// Display label for a library catalogue file name:
/// `"Fyreslayers - Library.cat"` → `"Fyreslayers"`
pub fn library_catalogue_label(filename: &str) -> String {
    let no_ext = CAT_EXTENSION.replace(filename, "");
    let label = LIBRARY_NAME_SUFFIX.replace(&no_ext, "").trim().to_string();
    if label.is_empty() {
        filename.to_string()
    } else {
        label
    }
}

/// Battle-trait catalogue path for a library path:
/// `"Fyreslayers - Library.cat"` → `"Fyreslayers.cat"`
pub fn battle_trait_catalogue_path(library_path: &str) -> String {
    LIBRARY_FILE_SUFFIX.replace(library_path, ".cat").into_owned()
}

/// Absolute raw URL for a catalogue path. Absolute URLs pass through
/// unchanged; relative paths are percent-encoded against [`RAW_BASE`].
pub fn raw_catalogue_url(path: &str) -> Result<String> {
    if path.starts_with("http") {
        return Ok(path.to_string());
    }
    let base = Url::parse(&format!("{}/", RAW_BASE))?;
    let joined = base.join(path)?;
    Ok(joined.to_string())
}

/// The fetch collaborator: given a catalogue path or absolute URL, return
/// the catalogue XML text or fail (non-2xx status, transport error).
///
/// Implementations own retries and caching; the parsing core calls `fetch`
/// and nothing else.
pub trait CatalogueSource {
    /// Fetch the text content of one catalogue
    fn fetch(&self, path: &str) -> Result<String>;
}

/// HTTP catalogue source over the community data repository
#[cfg(feature = "fetch")]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "fetch")]
impl HttpSource {
    /// Create a new HTTP source
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

#[cfg(feature = "fetch")]
impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "fetch")]
impl CatalogueSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<String> {
        let url = raw_catalogue_url(path)?;
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| crate::error::Error::Fetch {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(crate::error::Error::Fetch {
                path: path.to_string(),
                reason: response.status().to_string(),
            });
        }
        response.text().map_err(|e| crate::error::Error::Fetch {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Result of a regiment import: the regiment's traits, its member units
/// materialized from the library catalogues, and the name mapping
#[derive(Debug)]
pub struct RegimentImport {
    /// Trait records for the imported regiments
    pub traits: Vec<BattleTrait>,
    /// Member units with `regiment_of_renown` set
    pub units: Vec<Warscroll>,
    /// Regiment name → member unit names
    pub regiment_mapping: IndexMap<String, Vec<String>>,
}

/// Import one regiment (or all, when `regiment` is `None`) together with
/// its member units.
///
/// The regiments catalogue itself must load; that failure propagates. The
/// member libraries are fetched independently: a library that fails to
/// load is logged and skipped, removing its units from consideration
/// without aborting the import.
pub fn import_regiment_of_renown(
    source: &dyn CatalogueSource,
    regiment: Option<&str>,
) -> Result<RegimentImport> {
    let regiments_xml = source.fetch(REGIMENTS_OF_RENOWN_PATH)?;
    let parsed = parse_regiments_of_renown_cat_xml(&regiments_xml, regiment);

    let member_of: IndexMap<&str, &str> = parsed
        .regiment_mapping
        .iter()
        .flat_map(|(regiment, members)| {
            members.iter().map(move |m| (m.as_str(), regiment.as_str()))
        })
        .collect();

    let mut units = Vec::new();
    for path in get_library_paths_from_regiments_xml(&regiments_xml) {
        let xml = match source.fetch(&path) {
            Ok(xml) => xml,
            Err(e) => {
                log::warn!("skipping library '{}': {}", path, e);
                continue;
            }
        };
        let library = parse_cat_xml(&xml);
        for mut unit in library.units {
            if let Some(regiment) = member_of.get(unit.unit_name.as_str()) {
                unit.regiment_of_renown = Some((*regiment).to_string());
                units.push(unit);
            }
        }
    }

    Ok(RegimentImport {
        traits: parsed.traits,
        units,
        regiment_mapping: parsed.regiment_mapping,
    })
}
