use crate::model::UNASSIGNED_LABEL;

/// Result of reconciling a cart line's quantity against its saved
/// assignment. `units` preserves the caller's name order: the trailing name
/// absorbs growth and gives units back first on shrink, so the order is part
/// of the contract, not an implementation detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPlan {
    pub units: Vec<(String, u32)>,
    pub extras: u32,
}

impl UnitPlan {
    pub fn total_units(&self) -> u32 {
        self.units.iter().map(|(_, count)| count).sum::<u32>() + self.extras
    }

    pub fn count_for(&self, name: &str) -> u32 {
        self.units
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Allocates `quantity` indivisible units across named assignees and an
/// extras bucket. The naive allocation (one unit per name plus the saved
/// extras count) can disagree with the quantity when either side was edited
/// after the other was saved; the output is always adjusted so that
/// `sum(units) + extras == max(1, quantity)`.
pub fn plan_units_by_name(quantity: i64, member_names: &[String], extras_count: i64) -> UnitPlan {
    let quantity = quantity.max(1) as u32;
    let mut extras = extras_count.max(0) as u32;

    // Seed: one unit per distinct name, in caller order.
    let mut units: Vec<(String, u32)> = Vec::new();
    for name in member_names {
        if units.iter().any(|(existing, _)| existing == name) {
            continue;
        }
        units.push((name.clone(), 1));
    }

    // Nothing was ever assigned: the whole line becomes one synthetic
    // "Unassigned" bucket so the table still shows `quantity` rows.
    if units.is_empty() && extras == 0 {
        return UnitPlan {
            units: vec![(UNASSIGNED_LABEL.to_string(), quantity)],
            extras: 0,
        };
    }

    let total = units.len() as u32 + extras;
    if quantity > total {
        // Quantity grew after the assignment was saved: the trailing
        // assignee absorbs the whole difference.
        let diff = quantity - total;
        match units.last_mut() {
            Some((_, count)) => *count += diff,
            None => extras += diff,
        }
    } else if quantity < total {
        // Saved counts exceed the current quantity: give units back from
        // extras first, then from the trailing names backward.
        let mut need = total - quantity;
        let from_extras = need.min(extras);
        extras -= from_extras;
        need -= from_extras;
        for (_, count) in units.iter_mut().rev() {
            if need == 0 {
                break;
            }
            let take = need.min(*count);
            *count -= take;
            need -= take;
        }
        units.retain(|(_, count)| *count > 0);
    }

    UnitPlan { units, extras }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_match_keeps_naive_allocation() {
        let plan = plan_units_by_name(3, &names(&["Alice", "Bob", "Carol"]), 0);
        assert_eq!(
            plan.units,
            vec![
                ("Alice".to_string(), 1),
                ("Bob".to_string(), 1),
                ("Carol".to_string(), 1)
            ]
        );
        assert_eq!(plan.extras, 0);
    }

    #[test]
    fn growth_is_absorbed_by_last_name() {
        let plan = plan_units_by_name(5, &names(&["Alice", "Bob"]), 0);
        assert_eq!(plan.count_for("Alice"), 1);
        assert_eq!(plan.count_for("Bob"), 4);
        assert_eq!(plan.extras, 0);
    }

    #[test]
    fn growth_with_no_names_goes_to_extras() {
        let plan = plan_units_by_name(6, &[], 2);
        assert!(plan.units.is_empty());
        assert_eq!(plan.extras, 6);
    }

    #[test]
    fn shrink_removes_extras_first_then_trailing_names() {
        // Naive total 4, quantity 1: drop 2 extras, then Bob entirely.
        let plan = plan_units_by_name(1, &names(&["Alice", "Bob"]), 2);
        assert_eq!(plan.units, vec![("Alice".to_string(), 1)]);
        assert_eq!(plan.extras, 0);
    }

    #[test]
    fn shrink_below_name_count_drops_trailing_names() {
        let plan = plan_units_by_name(2, &names(&["Alice", "Bob", "Carol", "Dan"]), 0);
        assert_eq!(
            plan.units,
            vec![("Alice".to_string(), 1), ("Bob".to_string(), 1)]
        );
        assert_eq!(plan.extras, 0);
    }

    #[test]
    fn no_names_no_extras_becomes_unassigned_bucket() {
        let plan = plan_units_by_name(4, &[], 0);
        assert_eq!(plan.units, vec![("Unassigned".to_string(), 4)]);
        assert_eq!(plan.extras, 0);
    }

    #[test]
    fn zero_and_negative_quantity_clamp_to_one() {
        let plan = plan_units_by_name(0, &[], 0);
        assert_eq!(plan.units, vec![("Unassigned".to_string(), 1)]);
        let plan = plan_units_by_name(-3, &names(&["Alice"]), 0);
        assert_eq!(plan.units, vec![("Alice".to_string(), 1)]);
        assert_eq!(plan.extras, 0);
    }

    #[test]
    fn duplicate_names_seed_a_single_unit() {
        let plan = plan_units_by_name(3, &names(&["Alice", "Alice", "Bob"]), 0);
        assert_eq!(plan.count_for("Alice"), 1);
        assert_eq!(plan.count_for("Bob"), 2);
    }

    #[test]
    fn negative_extras_count_is_treated_as_zero() {
        let plan = plan_units_by_name(2, &names(&["Alice"]), -5);
        assert_eq!(plan.count_for("Alice"), 2);
        assert_eq!(plan.extras, 0);
    }

    #[test]
    fn total_always_matches_clamped_quantity() {
        let name_sets: Vec<Vec<String>> = vec![
            names(&[]),
            names(&["Alice"]),
            names(&["Alice", "Bob"]),
            names(&["Alice", "Bob", "Carol", "Dan", "Eve"]),
        ];
        for quantity in -2..12_i64 {
            for extras in -1..6_i64 {
                for set in &name_sets {
                    let plan = plan_units_by_name(quantity, set, extras);
                    assert_eq!(
                        plan.total_units() as i64,
                        quantity.max(1),
                        "quantity={quantity} extras={extras} names={}",
                        set.len()
                    );
                }
            }
        }
    }

    #[test]
    fn same_inputs_give_same_outputs() {
        let set = names(&["Zed", "Alice", "Mia"]);
        let first = plan_units_by_name(7, &set, 1);
        let second = plan_units_by_name(7, &set, 1);
        assert_eq!(first, second);
        // Caller order is preserved, not sorted.
        assert_eq!(first.units[0].0, "Zed");
    }
}
