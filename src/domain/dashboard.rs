//! Dashboard aggregation and filtering

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::contract::Contract;
use super::lifecycle::{Category, ContractStatus};

/// Contract counts by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub signed: usize,
    pub revoked: usize,
}

impl DashboardStats {
    pub fn tally<'a>(contracts: impl IntoIterator<Item = &'a Contract>) -> Self {
        let mut stats = Self::default();
        for contract in contracts {
            stats.total += 1;
            match contract.status.category() {
                Category::Active => stats.active += 1,
                Category::Pending => stats.pending += 1,
                Category::Signed => stats.signed += 1,
                Category::Revoked => stats.revoked += 1,
            }
        }
        stats
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Active => self.active,
            Category::Pending => self.pending,
            Category::Signed => self.signed,
            Category::Revoked => self.revoked,
        }
    }
}

/// Filter applied to the contract list
///
/// A contract matches when either its category or its exact status equals
/// the filter. Names shared by a category and a status (`signed`,
/// `revoked`) parse as the category, which is the wider of the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Category(Category),
    Status(ContractStatus),
}

impl StatusFilter {
    pub fn matches(&self, contract: &Contract) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Category(category) => contract.status.category() == *category,
            StatusFilter::Status(status) => contract.status == *status,
        }
    }

    /// Filters a slice, keeping original order
    pub fn apply<'a>(&self, contracts: &'a [Contract]) -> Vec<&'a Contract> {
        contracts.iter().filter(|c| self.matches(c)).collect()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Category(category) => fmt::Display::fmt(category, f),
            StatusFilter::Status(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        if let Ok(category) = s.parse::<Category>() {
            return Ok(StatusFilter::Category(category));
        }
        s.parse::<ContractStatus>()
            .map(StatusFilter::Status)
            .map_err(|_| {
                format!(
                    "Unknown filter: {} (expected all, a category or a status)",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blueprint::BlueprintDraft;
    use crate::domain::contract::ContractDraft;
    use crate::domain::field::FieldType;

    fn contracts() -> Vec<Contract> {
        let mut draft = BlueprintDraft::new("NDA");
        draft.add_field(FieldType::Text);
        let blueprint = draft.save().unwrap();

        ContractStatus::ALL
            .into_iter()
            .map(|status| {
                ContractDraft::new(format!("NDA {}", status))
                    .save(Some(&blueprint))
                    .unwrap()
                    .with_status(status)
            })
            .collect()
    }

    #[test]
    fn tally_by_category() {
        let stats = DashboardStats::tally(&contracts());

        assert_eq!(
            stats,
            DashboardStats {
                total: 6,
                active: 1,
                pending: 2,
                signed: 2,
                revoked: 1,
            }
        );
        assert_eq!(stats.count(Category::Signed), 2);
    }

    #[test]
    fn tally_of_nothing_is_zero() {
        assert_eq!(DashboardStats::tally(&[]), DashboardStats::default());
    }

    #[test]
    fn filter_by_category() {
        let contracts = contracts();
        let pending: Vec<_> = StatusFilter::Category(Category::Pending)
            .apply(&contracts)
            .iter()
            .map(|c| c.status)
            .collect();

        assert_eq!(pending, vec![ContractStatus::Created, ContractStatus::Approved]);
    }

    #[test]
    fn filter_by_exact_status() {
        let contracts = contracts();
        let filter: StatusFilter = "locked".parse().unwrap();

        assert_eq!(filter, StatusFilter::Status(ContractStatus::Locked));
        assert_eq!(filter.apply(&contracts).len(), 1);
    }

    #[test]
    fn shared_names_parse_as_category() {
        assert_eq!(
            "signed".parse::<StatusFilter>(),
            Ok(StatusFilter::Category(Category::Signed))
        );
        assert_eq!(
            "Revoked".parse::<StatusFilter>(),
            Ok(StatusFilter::Category(Category::Revoked))
        );
        assert_eq!("ALL".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert!("draft".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn all_keeps_everything_in_order() {
        let contracts = contracts();
        let names: Vec<_> = StatusFilter::All
            .apply(&contracts)
            .iter()
            .map(|c| c.name.clone())
            .collect();
        let expected: Vec<_> = contracts.iter().map(|c| c.name.clone()).collect();

        assert_eq!(names, expected);
    }
}
