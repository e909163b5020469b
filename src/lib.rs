//! Catalog, membership and lending ledger for a small lending library.
//!
//! This crate provides checkout and return operations over in-memory stores,
//! with loan status and fines derived from the current date at read time.

pub mod analytics;
pub mod book;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod ids;
pub mod ledger;
pub mod lending;
pub mod library;
pub mod member;
pub mod money;
pub mod observers;
pub mod report;
pub mod store;

pub use analytics::LibraryStats;
pub use book::{Book, Category, NewBook};
pub use config::{LendingPolicy, LibraryConfig};
pub use error::{CheckoutRejection, LibraryError, LibraryResult, ReturnRejection};
pub use events::LibraryEvent;
pub use ids::{BookId, MemberId, RecordId};
pub use ledger::LoanFilter;
pub use lending::{LendingRecord, LoanStatus, LoanView};
pub use library::Library;
pub use member::{Member, MemberStatus};
pub use money::Money;
pub use report::Report;
pub use store::InMemoryStore;
