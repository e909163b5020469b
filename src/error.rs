use thiserror::Error;

use crate::ids::{BookId, MemberId, RecordId};

/// Why a checkout was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutRejection {
    /// No catalog entry has this id
    #[error("unknown book {0}")]
    UnknownBook(BookId),
    /// No member has this id
    #[error("unknown member {0}")]
    UnknownMember(MemberId),
    /// Every copy is already lent out
    #[error("no copies of book {0} are available")]
    NoCopiesAvailable(BookId),
    /// The member's borrowing privileges are suspended
    #[error("member {0} is not active")]
    MemberNotActive(MemberId),
}

/// Why a return was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnRejection {
    /// No lending record has this id
    #[error("unknown lending record {0}")]
    UnknownRecord(RecordId),
    /// The record was closed earlier
    #[error("lending record {0} was already returned")]
    AlreadyReturned(RecordId),
    /// The record points at a book the catalog no longer holds
    #[error("lending record {record} refers to unknown book {book}")]
    UnknownBook {
        /// The record being returned
        record: RecordId,
        /// The dangling book reference
        book: BookId,
    },
}

/// Errors produced by the library
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A checkout was refused; nothing was changed
    #[error("invalid checkout: {0}")]
    InvalidCheckout(#[from] CheckoutRejection),
    /// A return was refused; nothing was changed
    #[error("invalid return: {0}")]
    InvalidReturn(#[from] ReturnRejection),
    /// A fixture file could not be read
    #[error("failed to read fixtures: {0}")]
    FixtureIo(#[from] std::io::Error),
    /// A fixture file is not valid JSON for the expected shape
    #[error("failed to parse fixtures: {0}")]
    FixtureFormat(#[from] serde_json::Error),
    /// Fixture data breaks a store invariant
    #[error("inconsistent fixtures: {0}")]
    FixtureIntegrity(String),
    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the crate
pub type LibraryResult<T> = Result<T, LibraryError>;
