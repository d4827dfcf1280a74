//! Integration tests for the Library catalogue parser
//!
//! Fixtures are minimal catalogue documents in the shape BSData publishes:
//! default-namespaced root, shared selection entries, profiles scattered
//! across nested model/upgrade sub-entries.

use pretty_assertions::assert_eq;
use warscribe::catalogue::parse_cat_xml;
use warscribe::model::{AbilityTimingQualifier, UnitType};
use warscribe::CATALOGUE_NAMESPACE;

/// Minimal catalogue: one unit with one passive ability and one weapon
/// nested two entries deep
fn minimal_passive_catalogue() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Test Unit" id="test-1">
      <profiles>
        <profile name="Test Unit" typeId="u" typeName="Unit">
          <characteristics>
            <characteristic name="Move">6"</characteristic>
            <characteristic name="Health">5</characteristic>
            <characteristic name="Save">4+</characteristic>
            <characteristic name="Control">2</characteristic>
          </characteristics>
        </profile>
        <profile name="Volcanic Blood" typeId="907f-a48-6a04-f788" typeName="Ability (Passive)" id="p1">
          <characteristics>
            <characteristic name="Keywords"/>
            <characteristic name="Effect">If you make an unmodified save roll of 1, inflict 1 mortal damage.</characteristic>
          </characteristics>
          <attributes>
            <attribute name="Color">Red</attribute>
            <attribute name="Type">Offensive</attribute>
          </attributes>
        </profile>
      </profiles>
      <categoryLinks>
        <categoryLink name="ORDER"/>
        <categoryLink name="HERO"/>
      </categoryLinks>
      <selectionEntries>
        <selectionEntry type="model" name="Model">
          <selectionEntries>
            <selectionEntry type="upgrade" name="Weapon">
              <profiles>
                <profile name="Sword" typeId="w" typeName="Melee Weapon">
                  <characteristics>
                    <characteristic name="Atk">3</characteristic>
                    <characteristic name="Hit">3+</characteristic>
                    <characteristic name="Wnd">3+</characteristic>
                    <characteristic name="Rnd">1</characteristic>
                    <characteristic name="Dmg">1</characteristic>
                    <characteristic name="Ability">-</characteristic>
                  </characteristics>
                </profile>
              </profiles>
            </selectionEntry>
          </selectionEntries>
        </selectionEntry>
      </selectionEntries>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    )
}

#[test]
fn parses_faction_from_library_suffix() {
    let parsed = parse_cat_xml(&minimal_passive_catalogue());
    assert_eq!(parsed.faction, "Test");
}

#[test]
fn parses_unit_stats_and_weapon_from_nested_entries() {
    let parsed = parse_cat_xml(&minimal_passive_catalogue());
    assert_eq!(parsed.units.len(), 1);
    let unit = &parsed.units[0];
    assert_eq!(unit.unit_name, "Test Unit");
    assert_eq!(unit.move_, "6\"");
    assert_eq!(unit.health, "5");
    assert_eq!(unit.save, "4+");
    assert_eq!(unit.control, "2");
    assert_eq!(unit.ward, None);
    assert_eq!(unit.subfaction, None);
    assert_eq!(unit.unit_type, Some(UnitType::Hero));
    assert_eq!(unit.keywords, vec!["ORDER".to_string(), "HERO".to_string()]);

    assert_eq!(unit.weapons.len(), 1);
    let sword = &unit.weapons[0];
    assert_eq!(sword.name, "Sword");
    assert!(!sword.is_ranged);
    assert_eq!(sword.range, "1\"");
    assert_eq!(sword.attacks, "3");
    assert_eq!(sword.hit, "3+");
    assert_eq!(sword.wound, "3+");
    assert_eq!(sword.rend, "1");
    assert_eq!(sword.damage, "1");
    // The "-" placeholder tag is filtered out
    assert_eq!(sword.abilities, Some(Vec::new()));
}

#[test]
fn passive_ability_has_passive_timing_and_no_phase() {
    let parsed = parse_cat_xml(&minimal_passive_catalogue());
    let unit = &parsed.units[0];
    let volcanic = unit
        .abilities
        .iter()
        .find(|a| a.name == "Volcanic Blood")
        .expect("Volcanic Blood parsed");
    assert_eq!(volcanic.timing, Some(AbilityTimingQualifier::Passive));
    assert_eq!(volcanic.phase, None);
    assert_eq!(volcanic.ability_type, None);
    // Explicit color attribute wins
    assert_eq!(volcanic.color.as_str(), "red");
}

#[test]
fn splits_trailing_parenthetical_into_subfaction() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Fyreslayers - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Auric Runeson (Scourge of Ghyran)" id="a1"/>
    <selectionEntry type="unit" name="Auric Runeson" id="a2"/>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    assert_eq!(parsed.units.len(), 2);
    assert_eq!(parsed.units[0].unit_name, "Auric Runeson");
    assert_eq!(parsed.units[0].subfaction.as_deref(), Some("Scourge of Ghyran"));
    assert_eq!(parsed.units[1].unit_name, "Auric Runeson");
    assert_eq!(parsed.units[1].subfaction, None);
}

#[test]
fn nested_model_entries_do_not_become_cards() {
    // Only top-level unit/model entries produce cards; the nested model
    // inside the unit is flattened into it.
    let parsed = parse_cat_xml(&minimal_passive_catalogue());
    assert_eq!(parsed.units.len(), 1);
}

#[test]
fn deduplicates_weapons_reachable_via_sibling_models() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Vulkite Berzerkers" id="v1">
      <selectionEntries>
        <selectionEntry type="model" name="Model A">
          <profiles>
            <profile name="Handaxe" typeName="Melee Weapon">
              <characteristics>
                <characteristic name="Atk">2</characteristic>
              </characteristics>
            </profile>
          </profiles>
        </selectionEntry>
        <selectionEntry type="model" name="Model B">
          <profiles>
            <profile name="Handaxe" typeName="Melee Weapon">
              <characteristics>
                <characteristic name="Atk">2</characteristic>
              </characteristics>
            </profile>
          </profiles>
        </selectionEntry>
      </selectionEntries>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    let unit = &parsed.units[0];
    assert_eq!(unit.weapons.len(), 1);
    assert_eq!(unit.weapons[0].name, "Handaxe");
}

#[test]
fn ranged_and_melee_versions_of_a_weapon_both_survive() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Thrower" id="t1">
      <profiles>
        <profile name="Javelin" typeName="Ranged Weapon">
          <characteristics>
            <characteristic name="Range">8</characteristic>
            <characteristic name="Atk">1</characteristic>
          </characteristics>
        </profile>
        <profile name="Javelin" typeName="Melee Weapon">
          <characteristics>
            <characteristic name="Atk">2</characteristic>
          </characteristics>
        </profile>
      </profiles>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    let unit = &parsed.units[0];
    assert_eq!(unit.weapons.len(), 2);
    let ranged = unit.weapons.iter().find(|w| w.is_ranged).unwrap();
    // Bare numeric range gets the inch mark appended
    assert_eq!(ranged.range, "8\"");
    let melee = unit.weapons.iter().find(|w| !w.is_ranged).unwrap();
    assert_eq!(melee.range, "1\"");
}

#[test]
fn unit_with_no_weapons_gets_default_melee() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Bare Unit" id="b1">
      <profiles>
        <profile name="Bare Unit" typeName="Unit">
          <characteristics>
            <characteristic name="Move">5"</characteristic>
          </characteristics>
        </profile>
      </profiles>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    let unit = &parsed.units[0];
    assert_eq!(unit.weapons.len(), 1);
    let melee = &unit.weapons[0];
    assert_eq!(melee.name, "Melee");
    assert!(!melee.is_ranged);
    assert_eq!(melee.attacks, "-");
    assert_eq!(melee.damage, "-");
    // Other stats default to "-" as well
    assert_eq!(unit.health, "-");
    assert_eq!(unit.save, "-");
    assert_eq!(unit.control, "-");
}

#[test]
fn ward_category_overrides_characteristic_and_is_not_a_keyword() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Warded Unit" id="w1">
      <profiles>
        <profile name="Warded Unit" typeName="Unit">
          <characteristics>
            <characteristic name="Ward">6+</characteristic>
          </characteristics>
        </profile>
      </profiles>
      <categoryLinks>
        <categoryLink name="WARD (5+)"/>
        <categoryLink name="INFANTRY"/>
      </categoryLinks>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    let unit = &parsed.units[0];
    assert_eq!(unit.ward.as_deref(), Some("5+"));
    assert_eq!(unit.keywords, vec!["INFANTRY".to_string()]);
    assert_eq!(unit.unit_type, Some(UnitType::Infantry));
}

#[test]
fn first_stat_profile_wins_per_field() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Two Profiles" id="tp1">
      <profiles>
        <profile name="First" typeName="Unit">
          <characteristics>
            <characteristic name="Move">6"</characteristic>
          </characteristics>
        </profile>
        <profile name="Second" typeName="Unit">
          <characteristics>
            <characteristic name="Move">9"</characteristic>
            <characteristic name="Save">3+</characteristic>
          </characteristics>
        </profile>
      </profiles>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    let unit = &parsed.units[0];
    // Move was set by the first profile; Save only by the second
    assert_eq!(unit.move_, "6\"");
    assert_eq!(unit.save, "3+");
}

#[test]
fn battle_damage_ability_marks_referenced_weapons() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Magmadroth" id="m1">
      <profiles>
        <profile name="Sword" typeName="Melee Weapon">
          <characteristics>
            <characteristic name="Atk">4</characteristic>
          </characteristics>
        </profile>
        <profile name="Axe" typeName="Melee Weapon">
          <characteristics>
            <characteristic name="Atk">2</characteristic>
          </characteristics>
        </profile>
        <profile name="Battle Damaged" typeName="Ability (Passive)">
          <characteristics>
            <characteristic name="Effect">While this unit has 10 or more damage points, the ^^Sword^^ has Attacks 2.</characteristic>
          </characteristics>
        </profile>
      </profiles>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    let unit = &parsed.units[0];
    let damaged = unit.abilities.iter().find(|a| a.name == "Battle Damaged").unwrap();
    assert_eq!(damaged.battle_damage, Some(true));

    let sword = unit.weapons.iter().find(|w| w.name == "Sword").unwrap();
    assert_eq!(sword.suffers_battle_damage, Some(true));
    let axe = unit.weapons.iter().find(|w| w.name == "Axe").unwrap();
    assert_eq!(axe.suffers_battle_damage, None);
}

#[test]
fn weapon_ability_tags_are_stripped_plain() {
    let xml = format!(
        r#"<catalogue xmlns="{ns}" name="Test - Library">
  <sharedSelectionEntries>
    <selectionEntry type="unit" name="Tagged" id="tg1">
      <profiles>
        <profile name="Flail" typeName="Melee Weapon">
          <characteristics>
            <characteristic name="Atk">3</characteristic>
            <characteristic name="Abilities">^^Crit (Mortal)^^, **Shock**</characteristic>
          </characteristics>
        </profile>
      </profiles>
    </selectionEntry>
  </sharedSelectionEntries>
</catalogue>"#,
        ns = CATALOGUE_NAMESPACE
    );
    let parsed = parse_cat_xml(&xml);
    let flail = &parsed.units[0].weapons[0];
    assert_eq!(
        flail.abilities,
        Some(vec!["Crit (Mortal)".to_string(), "Shock".to_string()])
    );
}

#[test]
fn reimporting_produces_fresh_ids() {
    let xml = minimal_passive_catalogue();
    let first = parse_cat_xml(&xml);
    let second = parse_cat_xml(&xml);
    assert_ne!(first.units[0].id, second.units[0].id);
}
