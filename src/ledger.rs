//! Checkout and return operations, and read queries over the ledger.
//!
//! Operations take the store by reference. Every precondition is checked
//! before anything is written, so a rejected call leaves the store untouched.

use chrono::NaiveDate;

use crate::{
    book::Book,
    config::LendingPolicy,
    error::{CheckoutRejection, LibraryResult, ReturnRejection},
    ids::{BookId, MemberId, RecordId},
    lending::{LendingRecord, LoanStatus, LoanView, RecordState},
    money::Money,
    store::{BookRepository, LendingRepository, MemberRepository},
};

/// Lend one copy of `book_id` to `member_id` on `now`.
///
/// On success the book loses one available copy and the new record is
/// appended to the ledger and returned.
///
/// # Errors
///
/// Returns `LibraryError::InvalidCheckout` if either id is unknown, the member
/// is not active, or no copy is available.
pub fn checkout<S>(
    store: &mut S,
    policy: &LendingPolicy,
    book_id: &BookId,
    member_id: &MemberId,
    now: NaiveDate,
) -> LibraryResult<LendingRecord>
where
    S: BookRepository + MemberRepository + LendingRepository,
{
    let book =
        store.book(book_id).ok_or_else(|| CheckoutRejection::UnknownBook(book_id.clone()))?;
    let member = store
        .member(member_id)
        .ok_or_else(|| CheckoutRejection::UnknownMember(member_id.clone()))?;

    if !member.is_active() {
        return Err(CheckoutRejection::MemberNotActive(member_id.clone()).into());
    }
    if !book.is_available() {
        return Err(CheckoutRejection::NoCopiesAvailable(book_id.clone()).into());
    }

    let record = LendingRecord {
        id: RecordId::generate(),
        book_id: book_id.clone(),
        member_id: member_id.clone(),
        book_title: book.title.clone(),
        member_name: member.name.clone(),
        checkout_date: now,
        due_date: policy.due_date(now),
        return_date: None,
        state: RecordState::Borrowed,
        fine: Money::ZERO,
    };

    let taken = store.book_mut(book_id).is_some_and(Book::take_copy);
    if !taken {
        return Err(CheckoutRejection::NoCopiesAvailable(book_id.clone()).into());
    }
    store.append_record(record.clone());

    Ok(record)
}

/// Close `record_id` on `now` and put the copy back on the shelf.
///
/// Any fine accrued up to `now` is frozen on the record as the amount owed.
/// The closed record is returned.
///
/// # Errors
///
/// Returns `LibraryError::InvalidReturn` if the record is unknown, already
/// returned, or refers to a book the catalog does not hold.
pub fn return_book<S>(
    store: &mut S,
    policy: &LendingPolicy,
    record_id: &RecordId,
    now: NaiveDate,
) -> LibraryResult<LendingRecord>
where
    S: BookRepository + LendingRepository,
{
    let record =
        store.record(record_id).ok_or_else(|| ReturnRejection::UnknownRecord(record_id.clone()))?;
    if !record.is_open() {
        return Err(ReturnRejection::AlreadyReturned(record_id.clone()).into());
    }
    let book_id = record.book_id.clone();
    if store.book(&book_id).is_none() {
        return Err(ReturnRejection::UnknownBook { record: record_id.clone(), book: book_id }.into());
    }

    let record = store
        .record_mut(record_id)
        .ok_or_else(|| ReturnRejection::UnknownRecord(record_id.clone()))?;
    record.close(policy, now);
    let closed = record.clone();

    if let Some(book) = store.book_mut(&book_id) {
        book.restore_copy();
    }

    Ok(closed)
}

/// Criteria for listing ledger entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    /// Substring matched against title and borrower snapshots
    pub term: Option<String>,
    /// Derived status to keep
    pub status: Option<LoanStatus>,
}

impl LoanFilter {
    /// Keep entries whose snapshots contain `term`
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self { term: Some(term.into()), status: None }
    }

    /// Keep entries with the given derived status
    #[must_use]
    pub fn status(status: LoanStatus) -> Self {
        Self { term: None, status: Some(status) }
    }

    /// Whether `view` passes every criterion
    #[must_use]
    pub fn accepts(&self, view: &LoanView<'_>) -> bool {
        let term_ok = self.term.as_deref().is_none_or(|term| view.record.matches(term));
        let status_ok = self.status.is_none_or(|status| view.status == status);
        term_ok && status_ok
    }
}

/// Ledger entries evaluated on `now` that pass `filter`, newest checkout first
#[must_use]
pub fn query<'a, S>(
    store: &'a S,
    policy: &LendingPolicy,
    now: NaiveDate,
    filter: &LoanFilter,
) -> Vec<LoanView<'a>>
where
    S: LendingRepository,
{
    let mut views: Vec<LoanView<'a>> = store
        .records()
        .map(|record| LoanView::new(record, policy, now))
        .filter(|view| filter.accepts(view))
        .collect();
    // Later entries first among equal checkout dates
    views.reverse();
    views.sort_by(|a, b| b.record.checkout_date.cmp(&a.record.checkout_date));
    tracing::debug!(matched = views.len(), ?filter, "ledger query");
    views
}

/// Every ledger entry evaluated on `now`, newest checkout first
#[must_use]
pub fn list<'a, S>(store: &'a S, policy: &LendingPolicy, now: NaiveDate) -> Vec<LoanView<'a>>
where
    S: LendingRepository,
{
    query(store, policy, now, &LoanFilter::default())
}

/// Entries whose derived status on `now` equals `status`
#[must_use]
pub fn filter_by_status<'a, S>(
    store: &'a S,
    policy: &LendingPolicy,
    now: NaiveDate,
    status: LoanStatus,
) -> Vec<LoanView<'a>>
where
    S: LendingRepository,
{
    query(store, policy, now, &LoanFilter::status(status))
}

/// Entries whose title or borrower snapshot contains `term`, ignoring case
#[must_use]
pub fn search<'a, S>(
    store: &'a S,
    policy: &LendingPolicy,
    now: NaiveDate,
    term: &str,
) -> Vec<LoanView<'a>>
where
    S: LendingRepository,
{
    query(store, policy, now, &LoanFilter::search(term))
}

/// Copies a member still has out, evaluated on `now`
#[must_use]
pub fn open_loans_for_member<'a, S>(
    store: &'a S,
    policy: &LendingPolicy,
    now: NaiveDate,
    member_id: &MemberId,
) -> Vec<LoanView<'a>>
where
    S: LendingRepository,
{
    list(store, policy, now)
        .into_iter()
        .filter(|view| view.record.is_open() && &view.record.member_id == member_id)
        .collect()
}

/// Every loan of a book, returned ones included, evaluated on `now`
#[must_use]
pub fn history_for_book<'a, S>(
    store: &'a S,
    policy: &LendingPolicy,
    now: NaiveDate,
    book_id: &BookId,
) -> Vec<LoanView<'a>>
where
    S: LendingRepository,
{
    list(store, policy, now).into_iter().filter(|view| &view.record.book_id == book_id).collect()
}
