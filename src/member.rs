use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::MemberId;

/// Standing of a membership
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// May borrow books
    #[default]
    Active,
    /// Borrowing privileges withdrawn
    Suspended,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Suspended => f.write_str("suspended"),
        }
    }
}

/// A registered library patron
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,
    /// Full name
    pub name: String,
    /// Contact e-mail
    pub email: String,
    /// Contact phone number
    #[serde(alias = "phoneNumber")]
    pub phone: String,
    /// Date the membership started
    #[serde(alias = "membershipDate")]
    pub membership_date: NaiveDate,
    /// Current standing
    pub status: MemberStatus,
    /// Postal address
    pub address: String,
}

impl Member {
    /// Whether this member may check books out
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Case-insensitive substring match over name and e-mail
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}
