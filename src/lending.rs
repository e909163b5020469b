use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    config::LendingPolicy,
    ids::{BookId, MemberId, RecordId},
    money::Money,
};

/// Lifecycle state kept on a record.
///
/// Overdue is never stored: it is derived from the due date when the record
/// is read, so time can pass without a transition step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    /// The copy is with the member
    #[default]
    #[serde(alias = "overdue")]
    Borrowed,
    /// The copy came back
    Returned,
}

/// Status of a loan as seen on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Out and not yet due
    Borrowed,
    /// Back on the shelf
    Returned,
    /// Out and past its due date
    Overdue,
}

impl LoanStatus {
    /// Every status, in display order
    pub const ALL: [Self; 3] = [Self::Borrowed, Self::Returned, Self::Overdue];

    /// Lowercase label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Borrowed => "borrowed",
            Self::Returned => "returned",
            Self::Overdue => "overdue",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no loan status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown loan status '{0}', expected borrowed, returned or overdue")]
pub struct UnknownStatus(pub String);

impl FromStr for LoanStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One checkout of one copy by one member.
///
/// `book_title` and `member_name` are snapshots taken at checkout; later edits
/// to the book or member do not reach them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LendingRecord {
    /// Unique identifier
    pub id: RecordId,
    /// The borrowed title
    pub book_id: BookId,
    /// The borrower
    pub member_id: MemberId,
    /// Title at checkout time
    pub book_title: String,
    /// Borrower name at checkout time
    pub member_name: String,
    /// Day the copy left the shelf
    pub checkout_date: NaiveDate,
    /// Last day the copy may be kept without a fine
    pub due_date: NaiveDate,
    /// Day the copy came back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    /// Stored lifecycle state
    #[serde(default)]
    pub state: RecordState,
    /// Final fine, frozen on return
    #[serde(default)]
    pub fine: Money,
}

/// Derived status and fine of a record on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    /// Status on that day
    pub status: LoanStatus,
    /// Amount owed on that day
    pub fine: Money,
}

impl LendingRecord {
    /// Whether the copy is still out
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == RecordState::Borrowed
    }

    /// Full days past the due date as of `now`; zero when not late
    #[must_use]
    pub fn days_overdue(&self, now: NaiveDate) -> u64 {
        u64::try_from(now.signed_duration_since(self.due_date).num_days()).unwrap_or(0)
    }

    /// Status of the record as of `now`
    #[must_use]
    pub fn derive_status(&self, now: NaiveDate) -> LoanStatus {
        match self.state {
            RecordState::Returned => LoanStatus::Returned,
            RecordState::Borrowed if now > self.due_date => LoanStatus::Overdue,
            RecordState::Borrowed => LoanStatus::Borrowed,
        }
    }

    /// Fine owed as of `now`.
    ///
    /// Open records accrue the daily rate for every day past due; returned
    /// records report the amount frozen at return.
    #[must_use]
    pub fn accrue_fine(&self, policy: &LendingPolicy, now: NaiveDate) -> Money {
        match self.state {
            RecordState::Returned => self.fine,
            RecordState::Borrowed => policy.fine_for_days(self.days_overdue(now)),
        }
    }

    /// Status and fine together
    #[must_use]
    pub fn assess(&self, policy: &LendingPolicy, now: NaiveDate) -> Assessment {
        Assessment { status: self.derive_status(now), fine: self.accrue_fine(policy, now) }
    }

    /// Case-insensitive substring match over the title and borrower snapshots
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.book_title.to_lowercase().contains(&needle)
            || self.member_name.to_lowercase().contains(&needle)
    }

    /// Close the record on `now`, freezing whatever fine has accrued
    pub(crate) fn close(&mut self, policy: &LendingPolicy, now: NaiveDate) -> Money {
        let fine = self.accrue_fine(policy, now);
        self.fine = fine;
        self.return_date = Some(now);
        self.state = RecordState::Returned;
        fine
    }
}

/// A record together with its status and fine on a given day
#[derive(Debug, Clone, Copy)]
pub struct LoanView<'a> {
    /// The stored record
    pub record: &'a LendingRecord,
    /// Derived status
    pub status: LoanStatus,
    /// Derived fine
    pub fine: Money,
}

impl<'a> LoanView<'a> {
    /// Evaluate `record` as of `now`
    #[must_use]
    pub fn new(record: &'a LendingRecord, policy: &LendingPolicy, now: NaiveDate) -> Self {
        let Assessment { status, fine } = record.assess(policy, now);
        Self { record, status, fine }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::expect_used)]
    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn open_record(checkout: NaiveDate, due: NaiveDate) -> LendingRecord {
        LendingRecord {
            id: RecordId::new("3"),
            book_id: BookId::new("3"),
            member_id: MemberId::new("3"),
            book_title: "Introduction to Algorithms".to_string(),
            member_name: "Michael Brown".to_string(),
            checkout_date: checkout,
            due_date: due,
            return_date: None,
            state: RecordState::Borrowed,
            fine: Money::ZERO,
        }
    }

    #[test]
    fn test_past_due_record_is_overdue_with_fine() {
        let policy = LendingPolicy::default();
        let record = open_record(date(2023, 12, 20), date(2024, 1, 3));

        let assessment = record.assess(&policy, date(2024, 1, 10));
        assert_eq!(assessment.status, LoanStatus::Overdue);
        assert_eq!(assessment.fine, policy.daily_fine().times(7));
        assert_eq!(assessment.fine, Money::from_cents(350));
    }

    #[test]
    fn test_future_due_record_is_borrowed_without_fine() {
        let policy = LendingPolicy::default();
        let record = open_record(date(2024, 1, 10), date(2024, 1, 24));

        let assessment = record.assess(&policy, date(2024, 1, 15));
        assert_eq!(assessment.status, LoanStatus::Borrowed);
        assert!(assessment.fine.is_zero());
    }

    #[test]
    fn test_due_day_itself_is_not_overdue() {
        let policy = LendingPolicy::default();
        let record = open_record(date(2024, 1, 10), date(2024, 1, 24));

        assert_eq!(record.derive_status(date(2024, 1, 24)), LoanStatus::Borrowed);
        assert_eq!(record.accrue_fine(&policy, date(2024, 1, 24)), Money::ZERO);
        assert_eq!(record.derive_status(date(2024, 1, 25)), LoanStatus::Overdue);
    }

    #[test]
    fn test_close_freezes_fine() {
        let policy = LendingPolicy::default();
        let mut record = open_record(date(2023, 12, 20), date(2024, 1, 3));

        let fine = record.close(&policy, date(2024, 1, 5));
        assert_eq!(fine, Money::from_cents(100));
        assert_eq!(record.return_date, Some(date(2024, 1, 5)));

        // No further accrual once returned
        let later = record.assess(&policy, date(2024, 3, 1));
        assert_eq!(later.status, LoanStatus::Returned);
        assert_eq!(later.fine, Money::from_cents(100));
    }

    #[test]
    fn test_stored_overdue_is_read_as_borrowed() -> Result<(), serde_json::Error> {
        let state: RecordState = serde_json::from_str("\"overdue\"")?;
        assert_eq!(state, RecordState::Borrowed);
        assert_eq!(serde_json::to_string(&RecordState::Borrowed)?, "\"borrowed\"");
        Ok(())
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Overdue".parse::<LoanStatus>(), Ok(LoanStatus::Overdue));
        assert!("lost".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn test_search_matches_snapshots() {
        let record = open_record(date(2024, 1, 10), date(2024, 1, 24));
        assert!(record.matches("algorithms"));
        assert!(record.matches("BROWN"));
        assert!(!record.matches("gatsby"));
    }
}
