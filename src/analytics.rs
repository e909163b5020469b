//! Aggregate counts over the three stores.
//!
//! Nothing is maintained incrementally; each call walks the full collections.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    book::Category,
    config::LendingPolicy,
    lending::LoanStatus,
    money::Money,
    store::{BookRepository, LendingRepository, MemberRepository},
};

/// Dashboard figures as of one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    /// Copies owned across the catalog
    pub total_books: u64,
    /// Copies currently on the shelf
    pub available_books: u64,
    /// Registered members
    pub total_members: usize,
    /// Loans out and not yet due
    pub books_checked_out: usize,
    /// Loans out and past due
    pub overdue_books: usize,
    /// Fines accrued so far on loans that are still out
    pub outstanding_fines: Money,
    /// Copies owned per category; categories without books are omitted
    pub copies_by_category: BTreeMap<Category, u64>,
}

/// Compute the dashboard figures as of `now`
#[must_use]
pub fn compute<S>(store: &S, policy: &LendingPolicy, now: NaiveDate) -> LibraryStats
where
    S: BookRepository + MemberRepository + LendingRepository,
{
    let mut stats = LibraryStats { total_members: store.members().count(), ..LibraryStats::default() };

    for book in store.books() {
        let copies = u64::from(book.total_copies);
        stats.total_books = stats.total_books.saturating_add(copies);
        stats.available_books = stats.available_books.saturating_add(u64::from(book.available_copies));
        let entry = stats.copies_by_category.entry(book.category).or_insert(0);
        *entry = entry.saturating_add(copies);
    }

    for record in store.records() {
        let assessment = record.assess(policy, now);
        match assessment.status {
            LoanStatus::Borrowed => {
                stats.books_checked_out = stats.books_checked_out.saturating_add(1);
            }
            LoanStatus::Overdue => stats.overdue_books = stats.overdue_books.saturating_add(1),
            LoanStatus::Returned => {}
        }
        if record.is_open() {
            stats.outstanding_fines = stats.outstanding_fines.saturating_add(assessment.fine);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, ids::RecordId, store::InMemoryStore};

    #[allow(clippy::expect_used)]
    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_sample_stats() {
        let store = fixtures::sample();
        let stats = compute(&store, &LendingPolicy::default(), date(2024, 1, 15));

        assert_eq!(stats.total_books, 21);
        assert_eq!(stats.available_books, 13);
        assert_eq!(stats.total_members, 3);
        assert_eq!(stats.books_checked_out, 1);
        assert_eq!(stats.overdue_books, 1);
        assert_eq!(stats.copies_by_category.get(&Category::Fiction), Some(&9));
        assert_eq!(stats.copies_by_category.get(&Category::ComputerScience), Some(&9));
        assert_eq!(stats.copies_by_category.get(&Category::ClassicLiterature), Some(&3));
        assert_eq!(stats.copies_by_category.get(&Category::Science), None);
    }

    #[test]
    fn test_borrowed_turns_overdue_as_time_passes() {
        let store = fixtures::sample();
        let policy = LendingPolicy::default();

        let later = compute(&store, &policy, date(2024, 2, 1));
        assert_eq!(later.books_checked_out, 0);
        assert_eq!(later.overdue_books, 2);
    }

    #[test]
    fn test_outstanding_fines_cover_open_loans_only() {
        let mut store = fixtures::sample();
        let policy = LendingPolicy::default();

        // Record 3 is twelve days late on 2024-01-15
        let before = compute(&store, &policy, date(2024, 1, 15));
        assert_eq!(before.outstanding_fines, Money::from_cents(600));

        let record = store.record_mut(&RecordId::new("3"));
        assert!(record.is_some());
        if let Some(record) = record {
            assert_eq!(record.close(&policy, date(2024, 1, 10)), Money::from_cents(350));
        }

        let after = compute(&store, &policy, date(2024, 1, 15));
        assert_eq!(after.overdue_books, 0);
        assert_eq!(after.outstanding_fines, Money::ZERO);
    }

    #[test]
    fn test_empty_store() {
        let stats = compute(&InMemoryStore::new(), &LendingPolicy::default(), date(2024, 1, 1));
        assert_eq!(stats, LibraryStats::default());
    }
}
