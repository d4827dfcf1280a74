//! Text normalization for catalogue free-text fields
//!
//! Catalogue ability text arrives double-escaped (`&amp;quot;` survives the
//! XML parse as a literal `&quot;`) and carries its own emphasis markup:
//! `^^word^^` marks a bold run, sometimes already wrapped in `**`. Card
//! bodies keep the emphasis as markdown bold; terse weapon-ability tags and
//! reaction labels are displayed plain and lose the markers entirely.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_WRAPPED_CARETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\^\^([^^]+)\^\^\*\*").unwrap());
static CARETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\^\^([^^]+)\^\^").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

/// Decode the five standard XML entities. No other entities are supported.
pub fn decode_entities(s: &str) -> String {
    s.replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Clean ability flavour text for card bodies: decode entities and rewrite
/// caret emphasis as markdown bold. `**^^X^^**` collapses to `**X**`, not
/// `****X****`.
pub fn clean_effect(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let collapsed = BOLD_WRAPPED_CARETS.replace_all(&decoded, "**$1**");
    CARETS.replace_all(&collapsed, "**$1**").into_owned()
}

/// Strip all emphasis markers for plain display (weapon ability tags,
/// reaction labels): decode entities, drop `^^`/`**` wrappers, trim.
pub fn strip_weapon_ability(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let no_carets = CARETS.replace_all(&decoded, "$1");
    BOLD.replace_all(&no_carets, "$1").trim().to_string()
}

/// Build an ability's body text from its Declare and Effect characteristics.
///
/// Both present: two labelled lines. One present: that text alone. Neither:
/// the profile name stands in so the card never renders an empty body.
pub fn build_ability_text(declare: &str, effect: &str, name: &str) -> String {
    if !declare.is_empty() && !effect.is_empty() {
        format!(
            "**Declare**: {}\n**Effect**: {}",
            clean_effect(declare),
            clean_effect(effect)
        )
    } else if !effect.is_empty() {
        clean_effect(effect)
    } else if !declare.is_empty() {
        clean_effect(declare)
    } else {
        clean_effect(name)
    }
}
