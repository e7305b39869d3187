//! Unit duplication with fresh identities.

use std::collections::{HashMap, HashSet};

use crate::ids::{SelectionId, SelectionIdGenerator};
use crate::unit::SelectedUnit;

/// Clone units with fresh selection ids.
///
/// Every field except the id is preserved. Joins between units of the
/// source set are rewired to the clones, so a host cloned together with its
/// joined units yields a clone group with the same topology. Joins to units
/// outside the set are kept unchanged. Sources are not modified.
///
/// `taken` must contain every id already on the roster.
pub fn duplicate_units(
    sources: &[&SelectedUnit],
    ids: &mut SelectionIdGenerator,
    taken: &HashSet<&SelectionId>,
) -> Vec<SelectedUnit> {
    let renamed: HashMap<&SelectionId, SelectionId> = sources
        .iter()
        .map(|unit| (&unit.selection_id, ids.generate(taken)))
        .collect();

    sources
        .iter()
        .map(|unit| {
            let mut clone = (*unit).clone();
            clone.selection_id = renamed[&unit.selection_id].clone();
            if let Some(host) = &unit.join_to_unit {
                if let Some(new_host) = renamed.get(host) {
                    clone.join_to_unit = Some(new_host.clone());
                }
            }
            clone
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnitData;
    use crate::ids::SortId;

    fn unit(id: &str, host: Option<&str>) -> SelectedUnit {
        let data = UnitData {
            id: "u".to_string(),
            name: id.to_string(),
            size: 1,
            cost: 10,
            quality: 4,
            defense: 4,
            equipment: vec![],
            special_rules: vec![],
            upgrades: vec![],
        };
        let mut u = SelectedUnit::from_catalogue("book", &data, SelectionId::new(id), SortId(0));
        u.join_to_unit = host.map(SelectionId::new);
        u
    }

    #[test]
    fn test_clones_rewire_internal_joins() {
        let host = unit("h", None);
        let a = unit("a", Some("h"));
        let b = unit("b", Some("h"));
        let taken: HashSet<&SelectionId> = [&host.selection_id, &a.selection_id, &b.selection_id]
            .into_iter()
            .collect();

        let mut ids = SelectionIdGenerator::new();
        let clones = duplicate_units(&[&host, &a, &b], &mut ids, &taken);

        assert_eq!(clones.len(), 3);
        let new_host = &clones[0].selection_id;
        assert_ne!(new_host, &host.selection_id);
        assert!(clones[0].join_to_unit.is_none());
        assert_eq!(clones[1].join_to_unit.as_ref(), Some(new_host));
        assert_eq!(clones[2].join_to_unit.as_ref(), Some(new_host));
        for clone in &clones {
            assert!(!taken.contains(&clone.selection_id));
        }
        assert_eq!(a.join_to_unit, Some(SelectionId::new("h")), "source untouched");
    }

    #[test]
    fn test_clone_of_joined_unit_keeps_outside_host() {
        let joined = unit("a", Some("h"));
        let taken: HashSet<&SelectionId> = [&joined.selection_id].into_iter().collect();
        let mut ids = SelectionIdGenerator::new();

        let clones = duplicate_units(&[&joined], &mut ids, &taken);
        assert_eq!(clones[0].join_to_unit, Some(SelectionId::new("h")));
        assert_eq!(clones[0].name, "a");
    }
}
