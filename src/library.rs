use std::fmt;

use chrono::NaiveDate;

use crate::{
    analytics::{self, LibraryStats},
    book::{Book, Category, NewBook},
    catalog,
    config::{LendingPolicy, LibraryConfig},
    error::LibraryResult,
    events::LibraryEvent,
    fixtures,
    ids::{BookId, MemberId, RecordId},
    ledger::{self, LoanFilter},
    lending::{LoanStatus, LoanView},
    member::Member,
    observers::{EventLogger, LibraryObserver, NotificationService},
    store::{BookRepository, InMemoryStore, LendingRepository, MemberRepository},
};

/// Number of recent events kept for the activity feed.
pub const DEFAULT_ACTIVITY_SIZE: usize = 100;

/// Application root: owns the stores, the lending policy and the observers.
///
/// Every mutation returns the [`LibraryEvent`] it produced and hands the same
/// event to each registered observer.
pub struct Library<S = InMemoryStore> {
    /// Catalog, roster and ledger
    store: S,
    /// Loan period and fine rate
    policy: LendingPolicy,
    /// Registered change observers
    observers: Vec<Box<dyn LibraryObserver>>,
    /// Most recent events, oldest first
    activity: Vec<LibraryEvent>,
    /// Maximum number of events kept in `activity`
    max_activity_size: usize,
}

// Manual implementation of Debug for Library
impl<S: fmt::Debug> fmt::Debug for Library<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("store", &self.store)
            .field("policy", &self.policy)
            .field("observers_count", &self.observers.len())
            .field("activity", &self.activity)
            .field("max_activity_size", &self.max_activity_size)
            .finish()
    }
}

impl Library<InMemoryStore> {
    /// The built-in sample library with the standard observers attached
    #[must_use]
    pub fn sample(policy: LendingPolicy) -> Self {
        let mut library = Self::new(fixtures::sample(), policy);
        library.register_standard_observers();
        library
    }

    /// Build a library from configuration, seeding it from the configured
    /// fixture file or the built-in sample.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid policy and a fixture
    /// error if the fixture file cannot be loaded.
    pub fn from_config(config: &LibraryConfig) -> LibraryResult<Self> {
        config.lending.validate()?;
        let store = match &config.fixtures {
            Some(path) => fixtures::load(path)?,
            None => fixtures::sample(),
        };
        let mut library = Self::new(store, config.lending);
        library.register_standard_observers();
        Ok(library)
    }
}

impl<S> Library<S>
where
    S: BookRepository + MemberRepository + LendingRepository,
{
    /// Wrap an existing store; no observers are attached
    #[must_use]
    pub fn new(store: S, policy: LendingPolicy) -> Self {
        Self {
            store,
            policy,
            observers: Vec::new(),
            activity: Vec::new(),
            max_activity_size: DEFAULT_ACTIVITY_SIZE,
        }
    }

    /// Register an observer to be notified of changes
    pub fn register_observer(&mut self, observer: Box<dyn LibraryObserver>) {
        self.observers.push(observer);
    }

    /// Attach the event logger and the late-return notifier
    pub fn register_standard_observers(&mut self) {
        self.register_observer(Box::new(EventLogger));
        self.register_observer(Box::new(NotificationService));
    }

    /// Read access to the stores
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The policy loans are made under
    #[must_use]
    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Recent changes, oldest first
    #[must_use]
    pub fn recent_activity(&self) -> &[LibraryEvent] {
        &self.activity
    }

    /// Record an event and notify observers
    fn publish(&mut self, event: LibraryEvent) -> LibraryEvent {
        self.activity.push(event.clone());
        if self.activity.len() > self.max_activity_size {
            self.activity.remove(0); // Drop oldest entry
        }
        for observer in &self.observers {
            observer.on_event(&event);
        }
        event
    }

    /// Add a title to the catalog with every copy available
    pub fn add_book(&mut self, new_book: NewBook) -> LibraryEvent {
        let book = catalog::add_book(&mut self.store, new_book);
        self.publish(LibraryEvent::BookAdded(book))
    }

    /// Lend a copy of `book_id` to `member_id` on `now`
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidCheckout` if the book or member is
    /// unknown, the member is not active, or no copy is available. Nothing is
    /// changed in that case.
    pub fn checkout(
        &mut self,
        book_id: &BookId,
        member_id: &MemberId,
        now: NaiveDate,
    ) -> LibraryResult<LibraryEvent> {
        match ledger::checkout(&mut self.store, &self.policy, book_id, member_id, now) {
            Ok(record) => Ok(self.publish(LibraryEvent::CheckedOut(record))),
            Err(e) => {
                tracing::warn!(%book_id, %member_id, error = %e, "checkout rejected");
                Err(e)
            }
        }
    }

    /// Take back the copy lent under `record_id` on `now`
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidReturn` if the record is unknown or
    /// already returned. Nothing is changed in that case.
    pub fn return_book(&mut self, record_id: &RecordId, now: NaiveDate) -> LibraryResult<LibraryEvent> {
        match ledger::return_book(&mut self.store, &self.policy, record_id, now) {
            Ok(record) => Ok(self.publish(LibraryEvent::Returned(record))),
            Err(e) => {
                tracing::warn!(%record_id, error = %e, "return rejected");
                Err(e)
            }
        }
    }

    /// Look up a book
    #[must_use]
    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.store.book(id)
    }

    /// Look up a member
    #[must_use]
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.store.member(id)
    }

    /// Catalog search over title, author and ISBN with an optional category
    #[must_use]
    pub fn search_books(&self, term: &str, category: Option<Category>) -> Vec<&Book> {
        catalog::search_books(&self.store, term, category)
    }

    /// Roster search over name and e-mail
    #[must_use]
    pub fn search_members(&self, term: &str) -> Vec<&Member> {
        catalog::search_members(&self.store, term)
    }

    /// Ledger entries evaluated on `now`, newest first
    #[must_use]
    pub fn loans(&self, now: NaiveDate) -> Vec<LoanView<'_>> {
        ledger::list(&self.store, &self.policy, now)
    }

    /// Ledger entries evaluated on `now` that pass `filter`
    #[must_use]
    pub fn query_loans(&self, now: NaiveDate, filter: &LoanFilter) -> Vec<LoanView<'_>> {
        ledger::query(&self.store, &self.policy, now, filter)
    }

    /// Ledger entries with the given derived status on `now`
    #[must_use]
    pub fn loans_with_status(&self, now: NaiveDate, status: LoanStatus) -> Vec<LoanView<'_>> {
        ledger::filter_by_status(&self.store, &self.policy, now, status)
    }

    /// Ledger entries whose title or borrower contains `term`
    #[must_use]
    pub fn search_loans(&self, now: NaiveDate, term: &str) -> Vec<LoanView<'_>> {
        ledger::search(&self.store, &self.policy, now, term)
    }

    /// Copies `member_id` still has out
    #[must_use]
    pub fn open_loans_for_member(&self, now: NaiveDate, member_id: &MemberId) -> Vec<LoanView<'_>> {
        ledger::open_loans_for_member(&self.store, &self.policy, now, member_id)
    }

    /// Every loan of `book_id`
    #[must_use]
    pub fn book_history(&self, now: NaiveDate, book_id: &BookId) -> Vec<LoanView<'_>> {
        ledger::history_for_book(&self.store, &self.policy, now, book_id)
    }

    /// Dashboard figures as of `now`
    #[must_use]
    pub fn stats(&self, now: NaiveDate) -> LibraryStats {
        analytics::compute(&self.store, &self.policy, now)
    }
}

// Implementing display for nicer output
impl<S> fmt::Display for Library<S>
where
    S: BookRepository + MemberRepository + LendingRepository,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = self.store.records().filter(|record| record.is_open()).count();
        write!(
            f,
            "{} titles, {} members, {} open loans",
            self.store.books().count(),
            self.store.members().count(),
            open
        )
    }
}
