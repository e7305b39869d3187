//! Test fixtures and helpers.
//!
//! A small army book exercising every upgrade type, plus builders for
//! one-off catalogue data.

use roster_core::data::{
    Affects, ArmyBook, ItemContent, ItemGain, LoadoutEntry, SpecialRule, UnitData, Upgrade,
    UpgradeGain, UpgradeOption, UpgradePackage, UpgradeType, WeaponGain,
};
use roster_core::ids::SelectionId;
use roster_core::roster::Roster;

/// Uid of the sample army book.
pub const SAMPLE_ARMY: &str = "battle_brothers";

/// Build an option with no gains.
#[must_use]
pub fn option(id: &str, cost: u32) -> UpgradeOption {
    UpgradeOption {
        id: id.to_string(),
        label: id.replace('_', " "),
        cost,
        gains: vec![],
        max_count: None,
        added_models: 0,
    }
}

/// Build an option granting a single weapon.
#[must_use]
pub fn weapon_option(id: &str, weapon: &str, cost: u32) -> UpgradeOption {
    UpgradeOption {
        gains: vec![UpgradeGain::Weapon(WeaponGain {
            name: weapon.to_string(),
            count: 1,
            range: Some(24),
            attacks: Some(1),
            special_rules: vec![],
        })],
        ..option(id, cost)
    }
}

/// Build an option granting a single rule.
#[must_use]
pub fn rule_option(id: &str, rule: SpecialRule, cost: u32) -> UpgradeOption {
    UpgradeOption {
        gains: vec![UpgradeGain::Rule(rule)],
        ..option(id, cost)
    }
}

/// Build an upgrade affecting the whole unit.
#[must_use]
pub fn upgrade(id: &str, kind: UpgradeType, options: Vec<UpgradeOption>) -> Upgrade {
    Upgrade {
        id: id.to_string(),
        label: id.replace('_', " "),
        kind,
        options,
        affects: Affects::All,
        select: None,
        replace_what: vec![],
        requires: vec![],
        excludes: vec![],
    }
}

/// Build a unit definition.
#[must_use]
pub fn unit_data(id: &str, cost: u32, size: u32, packages: &[&str]) -> UnitData {
    UnitData {
        id: id.to_string(),
        name: id.replace('_', " "),
        size,
        cost,
        quality: 4,
        defense: 4,
        equipment: vec![],
        special_rules: vec![],
        upgrades: packages.iter().map(|p| (*p).to_string()).collect(),
    }
}

/// Build a one-package army book.
#[must_use]
pub fn single_package_book(units: Vec<UnitData>, sections: Vec<Upgrade>) -> ArmyBook {
    ArmyBook {
        uid: SAMPLE_ARMY.to_string(),
        name: "Battle Brothers".to_string(),
        game_system: "gf".to_string(),
        units,
        upgrade_packages: vec![UpgradePackage {
            uid: "A".to_string(),
            hint: "A".to_string(),
            sections,
        }],
    }
}

/// The sample army book.
///
/// Units:
/// - `squad`: 5 models, 100pts, packages A and B
/// - `captain`: Hero, 60pts, package C
/// - `scouts`: 3 models, 80pts
/// - `medic`: 40pts
/// - `tank`: 200pts
///
/// Package A holds a single-optional sergeant weapon swap (10 / 20pts) and a
/// counted per-model weapon swap. Package B holds a multiple-choice gear
/// upgrade and a counted model addition. Package C holds a single-required
/// weapon and a mount that requires it.
#[must_use]
pub fn sample_book() -> ArmyBook {
    let mut squad = unit_data("squad", 100, 5, &["A", "B"]);
    squad.equipment = vec![
        LoadoutEntry::new("Rifle", 5).with_profile(Some(24), 1),
        LoadoutEntry::new("CCW", 5).with_profile(None, 1),
    ];

    let mut captain = unit_data("captain", 60, 1, &["C"]);
    captain.quality = 3;
    captain.defense = 3;
    captain.special_rules = vec![SpecialRule::new("Hero"), SpecialRule::rated("Tough", "3")];
    captain.equipment = vec![LoadoutEntry::new("Pistol", 1).with_profile(Some(12), 1)];

    let mut sergeant_weapon = upgrade(
        "sergeant_weapon",
        UpgradeType::SingleOptional,
        vec![
            weapon_option("plasma_rifle", "Plasma Rifle", 10),
            weapon_option("melta_rifle", "Melta Rifle", 20),
        ],
    );
    sergeant_weapon.affects = Affects::Models(1);
    sergeant_weapon.replace_what = vec!["Rifle".to_string()];

    let mut squad_weapons = upgrade(
        "squad_weapons",
        UpgradeType::Counted,
        vec![weapon_option("grenade_launcher", "Grenade Launcher", 5)],
    );
    squad_weapons.affects = Affects::AnyModel;
    squad_weapons.replace_what = vec!["Rifle".to_string()];

    let medkit = UpgradeOption {
        gains: vec![UpgradeGain::Item(ItemGain {
            name: "Medkit".to_string(),
            count: 1,
            content: vec![ItemContent::Rule(SpecialRule::new("Regeneration"))],
        })],
        ..option("medkit", 5)
    };
    let gear = upgrade(
        "gear",
        UpgradeType::Multiple,
        vec![medkit, rule_option("banner", SpecialRule::new("Fearless"), 10)],
    );

    let extra_models = upgrade(
        "extra_models",
        UpgradeType::Counted,
        vec![UpgradeOption {
            max_count: Some(5),
            added_models: 1,
            ..option("additional_brother", 20)
        }],
    );

    let mut captain_weapon = upgrade(
        "captain_weapon",
        UpgradeType::SingleRequired,
        vec![
            weapon_option("pistol", "Pistol", 0),
            weapon_option("plasma_pistol", "Plasma Pistol", 5),
        ],
    );
    captain_weapon.replace_what = vec!["Pistol".to_string()];

    let mut mount = upgrade(
        "mount",
        UpgradeType::SingleOptional,
        vec![rule_option("bike", SpecialRule::new("Fast"), 30)],
    );
    mount.requires = vec!["captain_weapon".to_string()];

    ArmyBook {
        uid: SAMPLE_ARMY.to_string(),
        name: "Battle Brothers".to_string(),
        game_system: "gf".to_string(),
        units: vec![
            squad,
            captain,
            unit_data("scouts", 80, 3, &[]),
            unit_data("medic", 40, 1, &[]),
            unit_data("tank", 200, 1, &[]),
        ],
        upgrade_packages: vec![
            UpgradePackage {
                uid: "A".to_string(),
                hint: "A".to_string(),
                sections: vec![sergeant_weapon, squad_weapons],
            },
            UpgradePackage {
                uid: "B".to_string(),
                hint: "B".to_string(),
                sections: vec![gear, extra_models],
            },
            UpgradePackage {
                uid: "C".to_string(),
                hint: "C".to_string(),
                sections: vec![captain_weapon, mount],
            },
        ],
    }
}

/// Add units from the sample book, returning their ids in order.
///
/// # Panics
///
/// Panics if a unit id is not in the sample book.
#[must_use]
pub fn roster_with(book: &ArmyBook, unit_ids: &[&str]) -> (Roster, Vec<SelectionId>) {
    let mut roster = Roster::new("Test Roster");
    let ids = unit_ids
        .iter()
        .map(|unit_id| {
            roster
                .add_unit(book, &book.uid, unit_id)
                .expect("fixture unit exists")
        })
        .collect();
    (roster, ids)
}
