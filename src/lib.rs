//! # warscribe
//!
//! Parser for BattleScribe-derived `.cat` catalogue XML into Age of Sigmar
//! warscroll card records, plus a phase-ordered cheat-sheet builder over
//! the parsed records.
//!
//! Four catalogue kinds are consumed: per-faction "Library" catalogues
//! (units), per-faction bare catalogues (battle traits, formations, lores),
//! the shared `Lores.cat` (spell/prayer/manifestation bodies resolved by
//! id), and `Regiments of Renown.cat` (regiment traits plus a
//! regiment-to-member-unit mapping).
//!
//! The parsers are tolerant by design: missing fields fall back to defined
//! defaults, unresolvable links resolve to nothing, and truncated XML
//! yields a partial record set instead of an error. They are synchronous,
//! CPU-bound pure functions over in-memory documents, safe to call
//! concurrently on different inputs.
//!
//! ## Example
//!
//! ```rust,ignore
//! use warscribe::catalogue::parse_cat_xml;
//! use warscribe::cheatsheet::build_cheat_sheet;
//!
//! let parsed = parse_cat_xml(&xml);
//! let sheet = build_cheat_sheet(&parsed.units, &[]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// XML layer
pub mod documents;
pub mod namespaces;

// Text and classification
pub mod classify;
pub mod text;

// Record model
pub mod model;

// Profile interpretation
pub mod profiles;

// Catalogue drivers
pub mod catalogue;

// Derived aggregation
pub mod cheatsheet;

// Paths and the fetch collaborator
pub mod sources;

// Re-exports for convenience
pub use catalogue::{
    parse_battle_trait_cat_xml, parse_cat_xml, parse_regiments_of_renown_cat_xml, ParsedLibrary,
    ParsedRegiments, ParsedTraits,
};
pub use cheatsheet::{build_cheat_sheet, CheatSheetEntry};
pub use error::{Error, Result};
pub use model::{Ability, ArmyCollection, BattleTrait, Warscroll, WeaponProfile};

/// Version of the warscribe library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// BattleScribe catalogue schema namespace
pub const CATALOGUE_NAMESPACE: &str = "http://www.battlescribe.net/schema/catalogueSchema";

/// BattleScribe game system schema namespace
pub const GAME_SYSTEM_NAMESPACE: &str = "http://www.battlescribe.net/schema/gameSystemSchema";

/// Publication id marking Scourge of Ghyran content; entries under it get
/// the matching subfaction label when their name carries no parenthetical
pub const SCOURGE_OF_GHYRAN_PUBLICATION_ID: &str = "3c5e-45c0-e767-6cf0";

/// Subfaction label for Scourge of Ghyran content
pub const SCOURGE_OF_GHYRAN_LABEL: &str = "Scourge of Ghyran";

/// Publication id of the Regiments of Renown entries; filters out
/// unrelated entries that happen to share the naming convention
pub const REGIMENTS_OF_RENOWN_PUBLICATION_ID: &str = "7cbf-a1ae-6c14-86ba";
