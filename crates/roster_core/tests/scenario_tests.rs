//! End-to-end roster editing scenarios against the sample army book.

use roster_core::attachment::UnitGroup;
use roster_core::config::RosterConfig;
use roster_core::cost::{calculate_unit_total, unit_size};
use roster_core::loadout::{effective_loadout, loadout_summary};
use roster_core::rules::{aggregate_rules, rules_label};
use roster_core::save::{SaveData, SaveStatus};
use roster_core::upgrades::UpgradeChange;
use roster_test_utils::fixtures::{roster_with, sample_book};

// ==========================================================================
// Upgrade Scenarios
// ==========================================================================

#[test]
fn test_single_optional_swap_and_clear() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["squad"]);
    let squad = &ids[0];
    assert_eq!(roster.points(), 100);

    roster.apply_upgrade(&book, squad, "sergeant_weapon", "plasma_rifle").unwrap();
    assert_eq!(roster.points(), 110);

    roster.apply_upgrade(&book, squad, "sergeant_weapon", "melta_rifle").unwrap();
    assert_eq!(roster.points(), 120);
    let unit = roster.unit(squad).unwrap();
    assert_eq!(unit.option_count("sergeant_weapon", "plasma_rifle"), 0);
    assert_eq!(unit.option_count("sergeant_weapon", "melta_rifle"), 1);

    roster.remove_upgrade(&book, squad, "sergeant_weapon", None).unwrap();
    assert_eq!(roster.points(), 100);
    assert!(roster.unit(squad).unwrap().applied("sergeant_weapon").is_none());
}

#[test]
fn test_required_weapon_swaps_but_never_empties() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["captain"]);
    let captain = &ids[0];
    assert_eq!(roster.unit(captain).unwrap().option_count("captain_weapon", "pistol"), 1);

    roster.apply_upgrade(&book, captain, "captain_weapon", "plasma_pistol").unwrap();
    assert_eq!(roster.points(), 65);

    let change = roster.remove_upgrade(&book, captain, "captain_weapon", None).unwrap();
    assert_eq!(change, UpgradeChange::Unchanged);
    assert_eq!(roster.points(), 65);

    let unit = roster.unit(captain).unwrap();
    assert_eq!(loadout_summary(&effective_loadout(unit)), "Plasma Pistol");
}

#[test]
fn test_counted_per_model_weapons_replace_rifles() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["squad"]);
    let squad = &ids[0];

    for _ in 0..2 {
        roster.apply_upgrade(&book, squad, "squad_weapons", "grenade_launcher").unwrap();
    }
    let unit = roster.unit(squad).unwrap();
    assert_eq!(calculate_unit_total(unit), 110);
    assert_eq!(
        loadout_summary(&effective_loadout(unit)),
        "3x Rifle, 5x CCW, 2x Grenade Launcher"
    );

    // Five models, so at most five launchers.
    for _ in 0..10 {
        roster.apply_upgrade(&book, squad, "squad_weapons", "grenade_launcher").unwrap();
    }
    assert_eq!(roster.unit(squad).unwrap().option_count("squad_weapons", "grenade_launcher"), 5);
}

#[test]
fn test_added_models_raise_size_and_per_model_cap() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["squad"]);
    let squad = &ids[0];

    roster.apply_upgrade(&book, squad, "extra_models", "additional_brother").unwrap();
    roster.apply_upgrade(&book, squad, "extra_models", "additional_brother").unwrap();
    let unit = roster.unit(squad).unwrap();
    assert_eq!(unit_size(unit), 7);
    assert_eq!(calculate_unit_total(unit), 140);

    for _ in 0..10 {
        roster.apply_upgrade(&book, squad, "squad_weapons", "grenade_launcher").unwrap();
    }
    assert_eq!(roster.unit(squad).unwrap().option_count("squad_weapons", "grenade_launcher"), 7);
}

#[test]
fn test_multiple_gear_grants_rules() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["squad"]);
    let squad = &ids[0];

    roster.apply_upgrade(&book, squad, "gear", "medkit").unwrap();
    roster.apply_upgrade(&book, squad, "gear", "banner").unwrap();
    let unit = roster.unit(squad).unwrap();
    assert_eq!(calculate_unit_total(unit), 115);
    assert_eq!(rules_label(&aggregate_rules(unit)), "Regeneration, Fearless");

    roster.remove_upgrade(&book, squad, "gear", Some("medkit")).unwrap();
    let unit = roster.unit(squad).unwrap();
    assert_eq!(calculate_unit_total(unit), 110);
    assert_eq!(rules_label(&aggregate_rules(unit)), "Fearless");
}

#[test]
fn test_mount_item_defense_shows_as_rule() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["captain"]);
    let captain = &ids[0];

    let change = roster.apply_upgrade(&book, captain, "mount", "bike").unwrap();
    assert_eq!(change, UpgradeChange::Applied);
    let unit = roster.unit(captain).unwrap();
    assert_eq!(rules_label(&aggregate_rules(unit)), "Hero, Tough(3), Fast, Defense(+1)");
    assert_eq!(loadout_summary(&effective_loadout(unit)), "Pistol, Bike");
}

// ==========================================================================
// Group Scenarios
// ==========================================================================

#[test]
fn test_duplicate_group_in_three_unit_roster() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["scouts", "medic", "tank"]);
    let (host, joined, tank) = (&ids[0], &ids[1], &ids[2]);
    roster.join_unit(joined, host).unwrap();

    let clones = roster.duplicate_group(host).unwrap();
    assert_eq!(roster.len(), 5);
    assert_eq!(clones.len(), 2);
    for clone in &clones {
        assert!(!ids.contains(clone));
    }
    assert_eq!(roster.index_of(&clones[0]), Some(2));
    assert_eq!(roster.index_of(&clones[1]), Some(3));
    assert_eq!(roster.index_of(tank), Some(4));

    let clone_host = roster.unit(&clones[0]).unwrap();
    let clone_joined = roster.unit(&clones[1]).unwrap();
    assert_eq!(clone_joined.join_to_unit.as_ref(), Some(&clones[0]));
    assert_eq!(roster.unit(joined).unwrap().join_to_unit.as_ref(), Some(host));

    let group = UnitGroup::resolve(roster.units(), clone_host, "Hero");
    assert_eq!(group.cost(), 120);
    assert_eq!(roster.points(), 80 + 40 + 200 + 120);
}

#[test]
fn test_hero_leads_group_title() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["squad", "captain", "medic"]);
    roster.join_unit(&ids[1], &ids[0]).unwrap();
    roster.join_unit(&ids[2], &ids[0]).unwrap();
    roster.rename_unit(&ids[1], Some("Ivo".to_string())).unwrap();

    let groups = roster.root_groups(&RosterConfig::default());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].title(), "Ivo & squad [7]");
    assert_eq!(groups[0].cost(), 200);
}

#[test]
fn test_save_round_trip_keeps_groups() {
    let book = sample_book();
    let (mut roster, ids) = roster_with(&book, &["squad", "captain"]);
    roster.join_unit(&ids[1], &ids[0]).unwrap();
    roster.apply_upgrade(&book, &ids[0], "gear", "banner").unwrap();

    let json = SaveData::from_roster(&roster, "gf", 1, 2).to_json().unwrap();
    let loaded = SaveData::from_json(&json).unwrap().into_roster().unwrap();

    assert_eq!(loaded.status, SaveStatus::Current);
    assert_eq!(loaded.roster.units(), roster.units());
    assert_eq!(loaded.roster.points(), 170);
    assert!(loaded.roster.audit(&book).is_empty());
}
