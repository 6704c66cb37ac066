//! Tri-state checked status derived for container entities

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::entities::EntityId;

/// Checked status of a customer or subscription, aggregated over its leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    Unchecked,
    Checked,
    /// Some, but not all, leaves are checked.
    Indeterminate,
}

impl CheckState {
    /// Combine leaf counts of companies and environments.
    ///
    /// The "none checked" test runs first, so a container whose leaf counts
    /// are all zero reports `Unchecked`.
    pub fn from_tallies(companies: Tally, environments: Tally) -> Self {
        if companies.checked == 0 && environments.checked == 0 {
            CheckState::Unchecked
        } else if companies.is_full() && environments.is_full() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }
}

impl From<bool> for CheckState {
    fn from(value: bool) -> Self {
        if value {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self {
            CheckState::Unchecked => "[ ]",
            CheckState::Checked => "[x]",
            CheckState::Indeterminate => "[-]",
        };
        f.write_str(marker)
    }
}

/// How many of a group of leaves are in a checked set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub checked: usize,
    pub total: usize,
}

impl Tally {
    pub fn count<'a>(ids: impl IntoIterator<Item = &'a EntityId>, set: &BTreeSet<EntityId>) -> Self {
        ids.into_iter().fold(Tally::default(), |acc, id| Tally {
            checked: acc.checked + usize::from(set.contains(id)),
            total: acc.total + 1,
        })
    }

    fn is_full(self) -> bool {
        self.checked == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tally(checked: usize, total: usize) -> Tally {
        Tally { checked, total }
    }

    #[rstest]
    #[case(tally(0, 2), tally(0, 2), CheckState::Unchecked)]
    #[case(tally(1, 2), tally(0, 2), CheckState::Indeterminate)]
    #[case(tally(2, 2), tally(1, 2), CheckState::Indeterminate)]
    #[case(tally(2, 2), tally(2, 2), CheckState::Checked)]
    #[case(tally(0, 0), tally(0, 0), CheckState::Unchecked)]
    #[case(tally(0, 0), tally(1, 1), CheckState::Checked)]
    fn given_tallies_when_combining_then_yields_tri_state(
        #[case] companies: Tally,
        #[case] environments: Tally,
        #[case] expected: CheckState,
    ) {
        assert_eq!(CheckState::from_tallies(companies, environments), expected);
    }

    #[test]
    fn given_ids_when_counting_then_counts_members_of_set() {
        let set: BTreeSet<EntityId> = ["a", "c"].into_iter().map(EntityId::from).collect();
        let ids: Vec<EntityId> = ["a", "b", "c"].into_iter().map(EntityId::from).collect();

        assert_eq!(Tally::count(&ids, &set), tally(2, 3));
    }

    #[test]
    fn given_leaf_flag_when_converted_then_two_valued_state() {
        assert_eq!(CheckState::from(true), CheckState::Checked);
        assert_eq!(CheckState::from(false), CheckState::Unchecked);
        assert_eq!(CheckState::Indeterminate.to_string(), "[-]");
    }
}
