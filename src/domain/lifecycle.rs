//! Contract lifecycle
//!
//! A contract moves along a single forward path
//! `created -> approved -> sent -> signed -> locked`. Revocation is a
//! separate escape available only before signing. `locked` and `revoked`
//! are terminal.
//!
//! Every mapping below is an exhaustive `match`, so a new status does not
//! compile until each of them has been taught about it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Contract is {0} and cannot advance any further")]
    Terminal(ContractStatus),

    #[error("Contract is {0} and can no longer be revoked")]
    NotRevocable(ContractStatus),
}

/// Status of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    #[default]
    Created,
    Approved,
    Sent,
    Signed,
    Locked,
    Revoked,
}

impl ContractStatus {
    /// All statuses, happy path first
    pub const ALL: [ContractStatus; 6] = [
        ContractStatus::Created,
        ContractStatus::Approved,
        ContractStatus::Sent,
        ContractStatus::Signed,
        ContractStatus::Locked,
        ContractStatus::Revoked,
    ];

    /// The forward path shown on a contract timeline
    pub const PATH: [ContractStatus; 5] = [
        ContractStatus::Created,
        ContractStatus::Approved,
        ContractStatus::Sent,
        ContractStatus::Signed,
        ContractStatus::Locked,
    ];

    /// Returns the single legal forward successor, or None when terminal
    pub fn next_status(self) -> Option<ContractStatus> {
        match self {
            ContractStatus::Created => Some(ContractStatus::Approved),
            ContractStatus::Approved => Some(ContractStatus::Sent),
            ContractStatus::Sent => Some(ContractStatus::Signed),
            ContractStatus::Signed => Some(ContractStatus::Locked),
            ContractStatus::Locked | ContractStatus::Revoked => None,
        }
    }

    /// Returns true if the contract may still be revoked
    pub fn can_revoke(self) -> bool {
        match self {
            ContractStatus::Created | ContractStatus::Approved | ContractStatus::Sent => true,
            ContractStatus::Signed | ContractStatus::Locked | ContractStatus::Revoked => false,
        }
    }

    /// Returns the dashboard category this status is counted under
    pub fn category(self) -> Category {
        match self {
            ContractStatus::Created | ContractStatus::Approved => Category::Pending,
            ContractStatus::Sent => Category::Active,
            ContractStatus::Signed | ContractStatus::Locked => Category::Signed,
            ContractStatus::Revoked => Category::Revoked,
        }
    }

    /// Returns the presentation colour for this status
    pub fn status_color(self) -> StatusColor {
        match self {
            ContractStatus::Created => StatusColor::Gray,
            ContractStatus::Approved => StatusColor::Blue,
            ContractStatus::Sent => StatusColor::Purple,
            ContractStatus::Signed => StatusColor::Green,
            ContractStatus::Locked => StatusColor::Slate,
            ContractStatus::Revoked => StatusColor::Red,
        }
    }

    /// Returns true if field values may be edited in this status
    pub fn can_edit(self) -> bool {
        matches!(self, ContractStatus::Created | ContractStatus::Approved)
    }

    /// Returns true if no transition leaves this status
    pub fn is_terminal(self) -> bool {
        matches!(self, ContractStatus::Locked | ContractStatus::Revoked)
    }

    /// Position on the forward path (`created` = 0), None for `revoked`
    pub fn stage(self) -> Option<usize> {
        Self::PATH.iter().position(|s| *s == self)
    }

    /// Returns the next status, or an error when terminal
    pub fn advance(self) -> Result<ContractStatus, LifecycleError> {
        self.next_status().ok_or(LifecycleError::Terminal(self))
    }

    /// Returns `revoked` if revocation is legal from this status
    pub fn revoke(self) -> Result<ContractStatus, LifecycleError> {
        if self.can_revoke() {
            Ok(ContractStatus::Revoked)
        } else {
            Err(LifecycleError::NotRevocable(self))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Created => "created",
            ContractStatus::Approved => "approved",
            ContractStatus::Sent => "sent",
            ContractStatus::Signed => "signed",
            ContractStatus::Locked => "locked",
            ContractStatus::Revoked => "revoked",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(ContractStatus::Created),
            "approved" => Ok(ContractStatus::Approved),
            "sent" => Ok(ContractStatus::Sent),
            "signed" => Ok(ContractStatus::Signed),
            "locked" => Ok(ContractStatus::Locked),
            "revoked" => Ok(ContractStatus::Revoked),
            _ => Err(format!("Unknown contract status: {}", s)),
        }
    }
}

/// Coarse grouping of statuses used for dashboard counts and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Active,
    Pending,
    Signed,
    Revoked,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Active,
        Category::Pending,
        Category::Signed,
        Category::Revoked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Active => "active",
            Category::Pending => "pending",
            Category::Signed => "signed",
            Category::Revoked => "revoked",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Category::Active),
            "pending" => Ok(Category::Pending),
            "signed" => Ok(Category::Signed),
            "revoked" => Ok(Category::Revoked),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Presentation token for a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Gray,
    Blue,
    Purple,
    Green,
    Slate,
    Red,
}

impl StatusColor {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusColor::Gray => "gray",
            StatusColor::Blue => "blue",
            StatusColor::Purple => "purple",
            StatusColor::Green => "green",
            StatusColor::Slate => "slate",
            StatusColor::Red => "red",
        }
    }

    /// Utility classes for web badges
    pub fn css_classes(self) -> &'static str {
        match self {
            StatusColor::Gray => "bg-gray-100 text-gray-800",
            StatusColor::Blue => "bg-blue-100 text-blue-800",
            StatusColor::Purple => "bg-purple-100 text-purple-800",
            StatusColor::Green => "bg-green-100 text-green-800",
            StatusColor::Slate => "bg-slate-100 text-slate-800",
            StatusColor::Red => "bg-red-100 text-red-800",
        }
    }

    /// SGR escape sequence for terminal badges
    pub fn ansi(self) -> &'static str {
        match self {
            StatusColor::Gray => "\x1b[90m",
            StatusColor::Blue => "\x1b[34m",
            StatusColor::Purple => "\x1b[35m",
            StatusColor::Green => "\x1b[32m",
            StatusColor::Slate => "\x1b[36m",
            StatusColor::Red => "\x1b[31m",
        }
    }

    /// Wraps text in this colour for terminal output
    pub fn paint(self, text: &str) -> String {
        format!("{}{}\x1b[0m", self.ansi(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_chain_has_no_skips() {
        let mut status = ContractStatus::Created;
        let mut visited = vec![status];

        while let Some(next) = status.next_status() {
            status = next;
            visited.push(status);
        }

        assert_eq!(visited, ContractStatus::PATH.to_vec());
        assert_eq!(status, ContractStatus::Locked);
        assert!(!status.can_revoke());
    }

    #[test]
    fn terminal_statuses_have_no_successor() {
        assert_eq!(ContractStatus::Locked.next_status(), None);
        assert_eq!(ContractStatus::Revoked.next_status(), None);
        assert!(ContractStatus::Locked.is_terminal());
        assert!(ContractStatus::Revoked.is_terminal());
        assert!(!ContractStatus::Signed.is_terminal());
    }

    #[test]
    fn revocation_only_before_signing() {
        let revocable: Vec<_> = ContractStatus::ALL
            .into_iter()
            .filter(|s| s.can_revoke())
            .collect();

        assert_eq!(
            revocable,
            vec![
                ContractStatus::Created,
                ContractStatus::Approved,
                ContractStatus::Sent
            ]
        );
    }

    #[test]
    fn revoked_is_never_a_forward_successor() {
        for status in ContractStatus::ALL {
            assert_ne!(status.next_status(), Some(ContractStatus::Revoked));
        }
    }

    #[test]
    fn category_mapping() {
        assert_eq!(ContractStatus::Created.category(), Category::Pending);
        assert_eq!(ContractStatus::Approved.category(), Category::Pending);
        assert_eq!(ContractStatus::Sent.category(), Category::Active);
        assert_eq!(ContractStatus::Signed.category(), Category::Signed);
        assert_eq!(ContractStatus::Locked.category(), Category::Signed);
        assert_eq!(ContractStatus::Revoked.category(), Category::Revoked);
    }

    #[test]
    fn every_status_has_a_distinct_color() {
        let mut colors: Vec<_> = ContractStatus::ALL
            .into_iter()
            .map(|s| s.status_color().as_str())
            .collect();
        colors.sort();
        colors.dedup();

        assert_eq!(colors.len(), ContractStatus::ALL.len());
        assert_eq!(
            ContractStatus::Revoked.status_color().css_classes(),
            "bg-red-100 text-red-800"
        );
    }

    #[test]
    fn sent_contract_revoked_directly() {
        let status = ContractStatus::Sent.revoke().unwrap();

        assert_eq!(status, ContractStatus::Revoked);
        assert!(!status.can_revoke());
        assert_eq!(status.next_status(), None);
        assert_eq!(
            status.revoke(),
            Err(LifecycleError::NotRevocable(ContractStatus::Revoked))
        );
    }

    #[test]
    fn advance_fails_on_terminal() {
        assert_eq!(
            ContractStatus::Signed.advance(),
            Ok(ContractStatus::Locked)
        );
        assert_eq!(
            ContractStatus::Locked.advance(),
            Err(LifecycleError::Terminal(ContractStatus::Locked))
        );
    }

    #[test]
    fn editing_only_before_sending() {
        assert!(ContractStatus::Created.can_edit());
        assert!(ContractStatus::Approved.can_edit());
        assert!(!ContractStatus::Sent.can_edit());
        assert!(!ContractStatus::Locked.can_edit());
        assert!(!ContractStatus::Revoked.can_edit());
    }

    #[test]
    fn stage_positions() {
        assert_eq!(ContractStatus::Created.stage(), Some(0));
        assert_eq!(ContractStatus::Locked.stage(), Some(4));
        assert_eq!(ContractStatus::Revoked.stage(), None);
    }

    #[test]
    fn status_string_roundtrip() {
        for status in ContractStatus::ALL {
            assert_eq!(status.to_string().parse::<ContractStatus>(), Ok(status));
        }
        assert_eq!("SIGNED".parse::<ContractStatus>(), Ok(ContractStatus::Signed));
        assert!("draft".parse::<ContractStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ContractStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
