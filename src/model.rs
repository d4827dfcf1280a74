//! Warscroll card data model
//!
//! Record shapes for units, battle traits and army collections. Optional
//! fields serialize as absent keys (not `null`): downstream consumers check
//! strict absence, so every `Option` carries `skip_serializing_if`.
//!
//! Records are created fresh on each parse: new v4 ids, new timestamps.
//! Deduplication across re-imports is the caller's concern.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mint a fresh record identity
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 UTC string (millisecond precision)
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Phase when an ability applies. Shown after timing on the card, e.g.
/// "Your Combat Phase".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityPhase {
    /// Hero Phase
    #[serde(rename = "Hero Phase")]
    HeroPhase,
    /// Shooting Phase
    #[serde(rename = "Shooting Phase")]
    ShootingPhase,
    /// Combat Phase
    #[serde(rename = "Combat Phase")]
    CombatPhase,
    /// Charge Phase
    #[serde(rename = "Charge Phase")]
    ChargePhase,
    /// Movement Phase
    #[serde(rename = "Movement Phase")]
    MovementPhase,
    /// End of Turn
    #[serde(rename = "End of Turn")]
    EndOfTurn,
    /// Deployment (relabelled "Deployment Phase" on cheat sheets)
    #[serde(rename = "Deployment")]
    Deployment,
    /// Start of Battle Round
    #[serde(rename = "Start of Battle Round")]
    StartOfBattleRound,
    /// Start of Turn
    #[serde(rename = "Start of Turn")]
    StartOfTurn,
}

impl AbilityPhase {
    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityPhase::HeroPhase => "Hero Phase",
            AbilityPhase::ShootingPhase => "Shooting Phase",
            AbilityPhase::CombatPhase => "Combat Phase",
            AbilityPhase::ChargePhase => "Charge Phase",
            AbilityPhase::MovementPhase => "Movement Phase",
            AbilityPhase::EndOfTurn => "End of Turn",
            AbilityPhase::Deployment => "Deployment",
            AbilityPhase::StartOfBattleRound => "Start of Battle Round",
            AbilityPhase::StartOfTurn => "Start of Turn",
        }
    }
}

impl std::fmt::Display for AbilityPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nine phases in canonical order
pub const ABILITY_PHASE_OPTIONS: [AbilityPhase; 9] = [
    AbilityPhase::HeroPhase,
    AbilityPhase::ShootingPhase,
    AbilityPhase::CombatPhase,
    AbilityPhase::ChargePhase,
    AbilityPhase::MovementPhase,
    AbilityPhase::EndOfTurn,
    AbilityPhase::Deployment,
    AbilityPhase::StartOfBattleRound,
    AbilityPhase::StartOfTurn,
];

/// Ability bar color. Display grouping, but load-bearing for cheat-sheet
/// phase inference when no explicit phase survived parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityColor {
    /// Slate grey (the default)
    Grey,
    /// Blue
    Blue,
    /// Green
    Green,
    /// Orange
    Orange,
    /// Yellow
    Yellow,
    /// Red
    Red,
    /// Purple
    Purple,
    /// Black
    Black,
}

impl AbilityColor {
    /// Lowercase color name
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityColor::Grey => "grey",
            AbilityColor::Blue => "blue",
            AbilityColor::Green => "green",
            AbilityColor::Orange => "orange",
            AbilityColor::Yellow => "yellow",
            AbilityColor::Red => "red",
            AbilityColor::Purple => "purple",
            AbilityColor::Black => "black",
        }
    }
}

impl Default for AbilityColor {
    fn default() -> Self {
        AbilityColor::Grey
    }
}

impl std::fmt::Display for AbilityColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eight bar colors
pub const ABILITY_COLOR_OPTIONS: [AbilityColor; 8] = [
    AbilityColor::Grey,
    AbilityColor::Blue,
    AbilityColor::Green,
    AbilityColor::Orange,
    AbilityColor::Yellow,
    AbilityColor::Red,
    AbilityColor::Purple,
    AbilityColor::Black,
];

/// Timing qualifier. Passive is mutually exclusive with phase-scheduled
/// abilities; Reaction replaces the type/phase label with free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityTimingQualifier {
    /// Always in effect; mutually exclusive with a phase
    Passive,
    /// Your phase only
    Your,
    /// Any player's phase
    Any,
    /// Enemy phase only
    Enemy,
    /// Triggered response; label built from the reaction fields
    Reaction,
}

impl AbilityTimingQualifier {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityTimingQualifier::Passive => "Passive",
            AbilityTimingQualifier::Your => "Your",
            AbilityTimingQualifier::Any => "Any",
            AbilityTimingQualifier::Enemy => "Enemy",
            AbilityTimingQualifier::Reaction => "Reaction",
        }
    }
}

impl std::fmt::Display for AbilityTimingQualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Once-per usage limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityType {
    /// Once per turn, per unit
    #[serde(rename = "Once Per Turn")]
    OncePerTurn,
    /// Once per turn across the whole army
    #[serde(rename = "Once Per Turn (Army)")]
    OncePerTurnArmy,
    /// Once per battle
    #[serde(rename = "Once Per Battle")]
    OncePerBattle,
}

impl AbilityType {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityType::OncePerTurn => "Once Per Turn",
            AbilityType::OncePerTurnArmy => "Once Per Turn (Army)",
            AbilityType::OncePerBattle => "Once Per Battle",
        }
    }
}

impl std::fmt::Display for AbilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit type for grouping warscrolls, derived from category links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// Hero
    #[serde(rename = "hero")]
    Hero,
    /// Infantry
    #[serde(rename = "infantry")]
    Infantry,
    /// Cavalry
    #[serde(rename = "cavalry")]
    Cavalry,
    /// Beast
    #[serde(rename = "beast")]
    Beast,
    /// Monster
    #[serde(rename = "monster")]
    Monster,
    /// War machine
    #[serde(rename = "war machine")]
    WarMachine,
    /// Manifestation (summoned endless-spell-like unit)
    #[serde(rename = "manifestation")]
    Manifestation,
}

impl UnitType {
    /// Lowercase display name
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Hero => "hero",
            UnitType::Infantry => "infantry",
            UnitType::Cavalry => "cavalry",
            UnitType::Beast => "beast",
            UnitType::Monster => "monster",
            UnitType::WarMachine => "war machine",
            UnitType::Manifestation => "manifestation",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping order for unit types
pub const UNIT_TYPE_ORDER: [UnitType; 7] = [
    UnitType::Hero,
    UnitType::Infantry,
    UnitType::Cavalry,
    UnitType::Beast,
    UnitType::Monster,
    UnitType::WarMachine,
    UnitType::Manifestation,
];

/// Battle trait section types for grouping on the traits page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleTraitType {
    /// Army-wide battle traits
    #[serde(rename = "Battle traits")]
    BattleTraits,
    /// Battle formations
    #[serde(rename = "Battle formations")]
    BattleFormations,
    /// Heroic traits
    #[serde(rename = "Heroic traits")]
    HeroicTraits,
    /// Artefacts of power
    #[serde(rename = "Artefacts")]
    Artefacts,
    /// Spell lores
    #[serde(rename = "Spell lores")]
    SpellLores,
    /// Prayer lores
    #[serde(rename = "Prayer lores")]
    PrayerLores,
    /// Manifestation lores
    #[serde(rename = "Manifestation Lores")]
    ManifestationLores,
    /// Regiment of Renown traits
    #[serde(rename = "Regiments of Renown")]
    RegimentsOfRenown,
}

impl BattleTraitType {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            BattleTraitType::BattleTraits => "Battle traits",
            BattleTraitType::BattleFormations => "Battle formations",
            BattleTraitType::HeroicTraits => "Heroic traits",
            BattleTraitType::Artefacts => "Artefacts",
            BattleTraitType::SpellLores => "Spell lores",
            BattleTraitType::PrayerLores => "Prayer lores",
            BattleTraitType::ManifestationLores => "Manifestation Lores",
            BattleTraitType::RegimentsOfRenown => "Regiments of Renown",
        }
    }

    /// True for the three lore categories, which may resolve their abilities
    /// out of the shared Lores catalogue
    pub fn is_lore(&self) -> bool {
        matches!(
            self,
            BattleTraitType::SpellLores
                | BattleTraitType::PrayerLores
                | BattleTraitType::ManifestationLores
        )
    }
}

impl std::fmt::Display for BattleTraitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping order for trait sections
pub const TRAIT_TYPE_ORDER: [BattleTraitType; 8] = [
    BattleTraitType::BattleTraits,
    BattleTraitType::RegimentsOfRenown,
    BattleTraitType::BattleFormations,
    BattleTraitType::HeroicTraits,
    BattleTraitType::Artefacts,
    BattleTraitType::SpellLores,
    BattleTraitType::PrayerLores,
    BattleTraitType::ManifestationLores,
];

/// One weapon stat line on a warscroll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponProfile {
    /// Record identity
    pub id: String,
    /// Weapon name as shown on the card
    pub name: String,
    /// Only ranged weapons have a range characteristic; melee do not
    pub range: String,
    /// Attacks characteristic, `"-"` when absent
    pub attacks: String,
    /// To-hit roll, e.g. `"3+"`
    pub hit: String,
    /// To-wound roll
    pub wound: String,
    /// Rend, e.g. `"-1"` or `"-"`
    pub rend: String,
    /// Damage characteristic
    pub damage: String,
    /// Short ability tags, e.g. "Crit (Auto-wound)"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<String>>,
    /// Ranged-vs-melee flag
    pub is_ranged: bool,
    /// Weapon suffers from battle damage; set post-hoc from ability text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffers_battle_damage: Option<bool>,
}

impl WeaponProfile {
    /// Empty weapon line for the form editor
    pub fn empty(is_ranged: bool) -> Self {
        Self {
            id: new_id(),
            name: String::new(),
            range: if is_ranged { "12\"" } else { "1\"" }.to_string(),
            attacks: String::new(),
            hit: String::new(),
            wound: String::new(),
            rend: "-".to_string(),
            damage: String::new(),
            abilities: Some(Vec::new()),
            is_ranged,
            suffers_battle_damage: None,
        }
    }
}

/// One ability block on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    /// Record identity
    pub id: String,
    /// Ability name
    pub name: String,
    /// Bar color; type, timing and phase are shown in white on top
    pub color: AbilityColor,
    /// Phase, displayed after timing: "Your Combat Phase"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<AbilityPhase>,
    /// Timing qualifier; Passive excludes phase and ability type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<AbilityTimingQualifier>,
    /// Once-per limit, displayed first on the card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability_type: Option<AbilityType>,
    /// When timing is Reaction: free-text replacement for ability type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_ability_type: Option<String>,
    /// When timing is Reaction: free-text replacement for phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_phase: Option<String>,
    /// Body text; may carry bold **Declare**/**Effect** labelled lines
    pub text: String,
    /// Battle damage ability; cross-linked onto weapon profiles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battle_damage: Option<bool>,
    /// Spell: show the casting value on the card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_spell: Option<bool>,
    /// Casting value, e.g. `"7"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub casting_value: Option<String>,
    /// Prayer: show the chanting value on the card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prayer: Option<bool>,
    /// Chanting value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chanting_value: Option<String>,
    /// Ability keywords, e.g. Arcane, Divine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl Ability {
    /// Empty ability for the form editor
    pub fn empty() -> Self {
        Self {
            id: new_id(),
            name: String::new(),
            color: AbilityColor::Grey,
            phase: None,
            timing: None,
            ability_type: None,
            reaction_ability_type: None,
            reaction_phase: None,
            text: String::new(),
            battle_damage: None,
            is_spell: None,
            casting_value: None,
            is_prayer: None,
            chanting_value: None,
            keywords: None,
        }
    }

    /// The card header label: "Passive", a reaction label built from the
    /// reaction fields, or "type, timing phase" assembled from the parts
    /// that are present.
    pub fn header_label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        match self.timing {
            Some(AbilityTimingQualifier::Reaction) => {
                parts.push("Reaction".to_string());
                if let Some(t) = self.reaction_ability_type.as_deref() {
                    if !t.trim().is_empty() {
                        parts.push(t.trim().to_string());
                    }
                }
                if let Some(p) = self.reaction_phase.as_deref() {
                    if !p.trim().is_empty() {
                        parts.push(p.trim().to_string());
                    }
                }
            }
            _ => {
                if let Some(t) = self.ability_type {
                    parts.push(t.to_string());
                }
                let timing_and_phase = match (self.timing, self.phase) {
                    (Some(t), Some(p)) => format!("{} {}", t, p),
                    (Some(t), None) => t.to_string(),
                    (None, Some(p)) => p.to_string(),
                    (None, None) => String::new(),
                };
                if !timing_and_phase.is_empty() {
                    parts.push(timing_and_phase);
                }
            }
        }
        parts.join(", ")
    }
}

/// Unit card record ("warscroll")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warscroll {
    /// Record identity, fresh per parse
    pub id: String,
    /// Display name, with any subfaction parenthetical split off
    pub unit_name: String,
    /// Owning faction, from the catalogue name
    pub faction: String,
    /// Subfaction parsed from a trailing parenthetical in the source name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfaction: Option<String>,
    /// Derived from category links for grouping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,
    /// Set when this unit belongs to a Regiment of Renown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regiment_of_renown: Option<String>,
    /// Move characteristic, `"-"` when absent
    #[serde(rename = "move")]
    pub move_: String,
    /// Health characteristic
    pub health: String,
    /// Save characteristic
    pub save: String,
    /// Control characteristic
    pub control: String,
    /// Ward value, e.g. `"4+"`; absent when the unit has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    /// Never empty: a default melee weapon is synthesized when the source
    /// has no weapon profiles
    pub weapons: Vec<WeaponProfile>,
    /// Ability blocks in document order
    pub abilities: Vec<Ability>,
    /// Insertion-ordered, duplicates suppressed
    pub keywords: Vec<String>,
    /// Creation timestamp (RFC 3339 UTC)
    pub created_at: String,
    /// Last-update timestamp (RFC 3339 UTC)
    pub updated_at: String,
}

impl Warscroll {
    /// Empty warscroll for the form editor; carries one blank melee weapon
    /// so the weapons invariant holds from the start
    pub fn empty() -> Self {
        let now = now_timestamp();
        Self {
            id: new_id(),
            unit_name: String::new(),
            faction: String::new(),
            subfaction: None,
            unit_type: None,
            regiment_of_renown: None,
            move_: String::new(),
            health: String::new(),
            save: String::new(),
            control: String::new(),
            ward: None,
            weapons: vec![WeaponProfile::empty(false)],
            abilities: Vec::new(),
            keywords: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Battle trait card: a warscroll without weapons, plus a section type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleTrait {
    /// Record identity, fresh per parse
    pub id: String,
    /// Trait name
    pub name: String,
    /// Section type for grouping (Prayer lores, Artefacts, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trait_type: Option<BattleTraitType>,
    /// Set when this trait belongs to a Regiment of Renown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regiment_of_renown: Option<String>,
    /// Owning faction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    /// Subfaction, parsed or derived from publication ancestry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfaction: Option<String>,
    /// Stat placeholder, `"-"` for traits
    #[serde(rename = "move")]
    pub move_: String,
    /// Stat placeholder
    pub health: String,
    /// Stat placeholder
    pub save: String,
    /// Stat placeholder
    pub control: String,
    /// Ward value when a category carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    /// Insertion-ordered, duplicates suppressed
    pub keywords: Vec<String>,
    /// Ability blocks in document order
    pub abilities: Vec<Ability>,
    /// Creation timestamp (RFC 3339 UTC)
    pub created_at: String,
    /// Last-update timestamp (RFC 3339 UTC)
    pub updated_at: String,
}

impl BattleTrait {
    /// Empty battle trait with "-" stat placeholders
    pub fn empty() -> Self {
        let now = now_timestamp();
        Self {
            id: new_id(),
            name: String::new(),
            trait_type: Some(BattleTraitType::BattleTraits),
            regiment_of_renown: None,
            faction: None,
            subfaction: None,
            move_: "-".to_string(),
            health: "-".to_string(),
            save: "-".to_string(),
            control: "-".to_string(),
            ward: None,
            keywords: Vec::new(),
            abilities: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Army Collection: a saved set of warscroll and battle trait references.
/// Lifecycle of the referenced records is owned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmyCollection {
    /// Record identity
    pub id: String,
    /// Collection name
    pub name: String,
    /// Faction label, populated from loaded warscrolls/traits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    /// Referenced warscroll ids, in order
    pub warscroll_ids: Vec<String>,
    /// Referenced battle trait ids, in order
    pub battle_trait_ids: Vec<String>,
    /// Creation timestamp (RFC 3339 UTC)
    pub created_at: String,
    /// Last-update timestamp (RFC 3339 UTC)
    pub updated_at: String,
}

impl ArmyCollection {
    /// Empty collection
    pub fn empty() -> Self {
        let now = now_timestamp();
        Self {
            id: new_id(),
            name: String::new(),
            faction: None,
            warscroll_ids: Vec::new(),
            battle_trait_ids: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_optional_fields_serialize_as_absent_keys() {
        let ability = Ability {
            name: "Volcanic Blood".to_string(),
            timing: Some(AbilityTimingQualifier::Passive),
            text: "Inflict 1 mortal damage.".to_string(),
            ..Ability::empty()
        };
        let json = serde_json::to_value(&ability).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("phase"));
        assert!(!obj.contains_key("abilityType"));
        assert_eq!(obj["timing"], "Passive");
    }

    #[test]
    fn test_enum_string_forms() {
        assert_eq!(
            serde_json::to_value(AbilityPhase::StartOfBattleRound).unwrap(),
            "Start of Battle Round"
        );
        assert_eq!(serde_json::to_value(AbilityColor::Grey).unwrap(), "grey");
        assert_eq!(serde_json::to_value(UnitType::WarMachine).unwrap(), "war machine");
        assert_eq!(
            serde_json::to_value(AbilityType::OncePerTurnArmy).unwrap(),
            "Once Per Turn (Army)"
        );
        assert_eq!(
            serde_json::to_value(BattleTraitType::ManifestationLores).unwrap(),
            "Manifestation Lores"
        );
    }

    #[test]
    fn test_warscroll_serializes_move_key() {
        let w = Warscroll::empty();
        let json = serde_json::to_value(&w).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("move"));
        assert!(obj.contains_key("unitName"));
        assert!(obj.contains_key("createdAt"));
        assert!(!obj.contains_key("ward"));
    }

    #[test]
    fn test_empty_warscroll_has_one_weapon() {
        let w = Warscroll::empty();
        assert_eq!(w.weapons.len(), 1);
        assert!(!w.weapons[0].is_ranged);
        assert_eq!(w.weapons[0].range, "1\"");
    }

    #[test]
    fn test_header_label_passive() {
        let a = Ability {
            timing: Some(AbilityTimingQualifier::Passive),
            ..Ability::empty()
        };
        assert_eq!(a.header_label(), "Passive");
    }

    #[test]
    fn test_header_label_type_timing_phase() {
        let a = Ability {
            timing: Some(AbilityTimingQualifier::Your),
            phase: Some(AbilityPhase::CombatPhase),
            ability_type: Some(AbilityType::OncePerTurn),
            ..Ability::empty()
        };
        assert_eq!(a.header_label(), "Once Per Turn, Your Combat Phase");
    }

    #[test]
    fn test_header_label_reaction_uses_reaction_fields() {
        let a = Ability {
            timing: Some(AbilityTimingQualifier::Reaction),
            // Phase/type must not leak into a reaction label
            phase: Some(AbilityPhase::CombatPhase),
            ability_type: Some(AbilityType::OncePerBattle),
            reaction_ability_type: Some("Opponent declared a charge".to_string()),
            reaction_phase: Some("Any Charge Phase".to_string()),
            ..Ability::empty()
        };
        assert_eq!(
            a.header_label(),
            "Reaction, Opponent declared a charge, Any Charge Phase"
        );
    }

    #[test]
    fn test_fresh_ids_per_record() {
        let a = Warscroll::empty();
        let b = Warscroll::empty();
        assert_ne!(a.id, b.id);
    }
}
