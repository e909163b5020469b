use serde::{Deserialize, Serialize};

use crate::{book::Book, lending::LendingRecord};

/// A change applied to the stores, reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum LibraryEvent {
    /// A title was added to the catalog
    BookAdded(Book),
    /// A copy was lent out
    CheckedOut(LendingRecord),
    /// A copy came back; the record carries the final fine
    Returned(LendingRecord),
}

impl LibraryEvent {
    /// Short human-readable summary
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::BookAdded(book) => format!("New book added: \"{}\"", book.title),
            Self::CheckedOut(record) => format!(
                "\"{}\" checked out by {} until {}",
                record.book_title, record.member_name, record.due_date
            ),
            Self::Returned(record) if record.fine.is_zero() => {
                format!("Book returned: \"{}\"", record.book_title)
            }
            Self::Returned(record) => {
                format!("Book returned: \"{}\" with a fine of {}", record.book_title, record.fine)
            }
        }
    }
}
