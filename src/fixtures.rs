//! Seed data for the stores.
//!
//! A fixture file is a JSON object with `books`, `members` and `records`
//! arrays, in the same shape the model types serialize to. A dashboard export
//! with camelCase `books`, `users` and `transactions` arrays and decimal
//! `fineAmount` values is accepted as well. Loading validates references
//! between the collections; nothing is ever written back.

use std::{collections::HashSet, fs, hash::Hash, path::Path};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    book::{Book, Category},
    error::{LibraryError, LibraryResult},
    ids::{BookId, MemberId, RecordId},
    lending::{LendingRecord, RecordState},
    member::{Member, MemberStatus},
    money::Money,
    store::{BookRepository, InMemoryStore, LendingRepository, MemberRepository},
};

/// Read and validate a fixture file
///
/// # Errors
///
/// Returns `LibraryError::FixtureIo` if the file cannot be read,
/// `LibraryError::FixtureFormat` if it is not valid fixture JSON, and
/// `LibraryError::FixtureIntegrity` if the data breaks a store invariant.
pub fn load(path: &Path) -> LibraryResult<InMemoryStore> {
    tracing::debug!(path = %path.display(), "loading fixtures");
    let contents = fs::read_to_string(path)?;
    from_json(&contents)
}

/// Parse and validate fixture JSON
///
/// # Errors
///
/// Returns `LibraryError::FixtureFormat` for malformed JSON and
/// `LibraryError::FixtureIntegrity` for inconsistent data.
pub fn from_json(contents: &str) -> LibraryResult<InMemoryStore> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    let store = if value.get("transactions").is_some() || value.get("users").is_some() {
        serde_json::from_value::<DashboardExport>(value)?.into_store()?
    } else {
        serde_json::from_value::<InMemoryStore>(value)?
    };
    validate(&store)?;
    tracing::debug!(
        books = store.books().count(),
        members = store.members().count(),
        records = store.records().count(),
        "fixtures loaded"
    );
    Ok(store)
}

/// Dashboard export layout
#[derive(Debug, Deserialize)]
struct DashboardExport {
    /// Catalog entries
    #[serde(default)]
    books: Vec<Book>,
    /// Members, called users in the export
    #[serde(default)]
    users: Vec<Member>,
    /// Lending records
    #[serde(default)]
    transactions: Vec<ExportedTransaction>,
}

impl DashboardExport {
    /// Convert into the native store layout
    fn into_store(self) -> LibraryResult<InMemoryStore> {
        let records = self
            .transactions
            .into_iter()
            .map(ExportedTransaction::into_record)
            .collect::<LibraryResult<Vec<_>>>()?;
        Ok(InMemoryStore::from_parts(self.books, self.users, records))
    }
}

/// A lending record as the dashboard exports it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportedTransaction {
    /// Record id
    id: RecordId,
    /// Borrowed title
    book_id: BookId,
    /// Borrower
    user_id: MemberId,
    /// Title snapshot
    book_title: String,
    /// Borrower name snapshot
    user_name: String,
    /// Day the copy left the shelf
    checkout_date: NaiveDate,
    /// Last day without a fine
    due_date: NaiveDate,
    /// Day the copy came back
    #[serde(default)]
    return_date: Option<NaiveDate>,
    /// Stored status; `overdue` reads as borrowed
    #[serde(default)]
    status: RecordState,
    /// Fine in dollars
    #[serde(default)]
    fine_amount: f64,
}

impl ExportedTransaction {
    /// Convert into a ledger record. Only returned records keep their fine;
    /// open ones are reassessed from the due date.
    fn into_record(self) -> LibraryResult<LendingRecord> {
        let fine = match self.status {
            RecordState::Returned => Money::from_dollars(self.fine_amount).ok_or_else(|| {
                LibraryError::FixtureIntegrity(format!(
                    "lending record {} has an invalid fine {}",
                    self.id, self.fine_amount
                ))
            })?,
            RecordState::Borrowed => Money::ZERO,
        };
        Ok(LendingRecord {
            id: self.id,
            book_id: self.book_id,
            member_id: self.user_id,
            book_title: self.book_title,
            member_name: self.user_name,
            checkout_date: self.checkout_date,
            due_date: self.due_date,
            return_date: self.return_date,
            state: self.status,
            fine,
        })
    }
}

/// Check the invariants the ledger relies on
///
/// # Errors
///
/// Returns `LibraryError::FixtureIntegrity` describing the first violation.
pub fn validate<S>(store: &S) -> LibraryResult<()>
where
    S: BookRepository + MemberRepository + LendingRepository,
{
    ensure_unique(store.books().map(|book| &book.id), "book")?;
    ensure_unique(store.members().map(|member| &member.id), "member")?;
    ensure_unique(store.records().map(|record| &record.id), "lending record")?;

    if let Some(book) = store.books().find(|book| book.available_copies > book.total_copies) {
        return Err(LibraryError::FixtureIntegrity(format!(
            "book {} has {} available copies but only {} in total",
            book.id, book.available_copies, book.total_copies
        )));
    }

    for record in store.records() {
        if store.book(&record.book_id).is_none() {
            return Err(LibraryError::FixtureIntegrity(format!(
                "lending record {} refers to unknown book {}",
                record.id, record.book_id
            )));
        }
        if store.member(&record.member_id).is_none() {
            return Err(LibraryError::FixtureIntegrity(format!(
                "lending record {} refers to unknown member {}",
                record.id, record.member_id
            )));
        }
        if record.state == RecordState::Returned && record.return_date.is_none() {
            return Err(LibraryError::FixtureIntegrity(format!(
                "lending record {} is returned but has no return date",
                record.id
            )));
        }
    }

    Ok(())
}

/// Fail on the first id seen twice
fn ensure_unique<'a, I, T>(ids: I, kind: &str) -> LibraryResult<()>
where
    I: Iterator<Item = &'a T>,
    T: Eq + Hash + std::fmt::Display + 'a,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(LibraryError::FixtureIntegrity(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(())
}

/// Build a date that is known to be valid
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Build a catalog entry
#[allow(clippy::too_many_arguments)]
fn book(
    id: &str,
    title: &str,
    author: &str,
    isbn: &str,
    category: Category,
    publication_year: i32,
    copies: (u32, u32),
    description: &str,
) -> Book {
    let (total_copies, available_copies) = copies;
    Book {
        id: BookId::new(id),
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        category,
        publication_year,
        description: description.to_string(),
        total_copies,
        available_copies,
    }
}

/// Build a member with a shared placeholder address
fn member(id: &str, name: &str, phone: &str, since: NaiveDate, status: MemberStatus, street: &str) -> Member {
    let email = format!("{}@email.com", name.to_lowercase().replace(' ', "."));
    Member {
        id: MemberId::new(id),
        name: name.to_string(),
        email,
        phone: phone.to_string(),
        membership_date: since,
        status,
        address: format!("{street}, City, State 12345"),
    }
}

/// The sample library: five titles, three members (one suspended) and three
/// loans, one open, one returned and one past due.
#[must_use]
pub fn sample() -> InMemoryStore {
    let books = vec![
        book(
            "1",
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "978-0-7432-7356-5",
            Category::Fiction,
            1925,
            (5, 3),
            "A classic American novel about the Jazz Age and the American Dream.",
        ),
        book(
            "2",
            "To Kill a Mockingbird",
            "Harper Lee",
            "978-0-06-112008-4",
            Category::Fiction,
            1960,
            (4, 2),
            "A gripping tale of racial injustice and childhood innocence in the American South.",
        ),
        book(
            "3",
            "Introduction to Algorithms",
            "Thomas H. Cormen",
            "978-0-262-03384-8",
            Category::ComputerScience,
            2009,
            (3, 1),
            "Comprehensive introduction to algorithms and data structures.",
        ),
        book(
            "4",
            "Clean Code",
            "Robert C. Martin",
            "978-0-13-235088-4",
            Category::ComputerScience,
            2008,
            (6, 4),
            "A handbook of agile software craftsmanship.",
        ),
        book(
            "5",
            "Pride and Prejudice",
            "Jane Austen",
            "978-0-14-143951-8",
            Category::ClassicLiterature,
            1813,
            (3, 3),
            "A romantic novel about manners, upbringing, morality, and marriage.",
        ),
    ];

    let members = vec![
        member("1", "John Smith", "(555) 123-4567", ymd(2023, 1, 15), MemberStatus::Active, "123 Main St"),
        member("2", "Emily Johnson", "(555) 987-6543", ymd(2023, 3, 22), MemberStatus::Active, "456 Oak Ave"),
        member(
            "3",
            "Michael Brown",
            "(555) 555-0123",
            ymd(2022, 11, 8),
            MemberStatus::Suspended,
            "789 Pine Rd",
        ),
    ];

    let records = vec![
        LendingRecord {
            id: RecordId::new("1"),
            book_id: BookId::new("1"),
            member_id: MemberId::new("1"),
            book_title: "The Great Gatsby".to_string(),
            member_name: "John Smith".to_string(),
            checkout_date: ymd(2024, 1, 10),
            due_date: ymd(2024, 1, 24),
            return_date: None,
            state: RecordState::Borrowed,
            fine: Money::ZERO,
        },
        LendingRecord {
            id: RecordId::new("2"),
            book_id: BookId::new("2"),
            member_id: MemberId::new("2"),
            book_title: "To Kill a Mockingbird".to_string(),
            member_name: "Emily Johnson".to_string(),
            checkout_date: ymd(2024, 1, 5),
            due_date: ymd(2024, 1, 19),
            return_date: Some(ymd(2024, 1, 18)),
            state: RecordState::Returned,
            fine: Money::ZERO,
        },
        LendingRecord {
            id: RecordId::new("3"),
            book_id: BookId::new("3"),
            member_id: MemberId::new("3"),
            book_title: "Introduction to Algorithms".to_string(),
            member_name: "Michael Brown".to_string(),
            checkout_date: ymd(2023, 12, 20),
            due_date: ymd(2024, 1, 3),
            return_date: None,
            state: RecordState::Borrowed,
            fine: Money::ZERO,
        },
    ];

    InMemoryStore::from_parts(books, members, records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_sample_is_consistent() {
        let store = sample();
        assert!(validate(&store).is_ok());
        assert_eq!(store.books().count(), 5);
        assert_eq!(store.members().count(), 3);
        assert_eq!(store.records().count(), 3);
        assert_eq!(
            store.member(&MemberId::new("2")).map(|m| m.email.as_str()),
            Some("emily.johnson@email.com")
        );
    }

    #[test]
    fn test_sample_round_trips_through_json() -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(&sample())?;
        assert_eq!(from_json(&json)?, sample());
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{
                "books": [{{
                    "id": "b1", "title": "Dune", "author": "Frank Herbert", "isbn": "x",
                    "category": "Fiction", "publication_year": 1965,
                    "total_copies": 2, "available_copies": 1
                }}],
                "members": [{{
                    "id": "m1", "name": "Ada", "email": "ada@example.com", "phone": "1",
                    "membership_date": "2023-01-01", "status": "active", "address": "here"
                }}],
                "records": [{{
                    "id": "r1", "book_id": "b1", "member_id": "m1",
                    "book_title": "Dune", "member_name": "Ada",
                    "checkout_date": "2024-01-01", "due_date": "2024-01-15",
                    "state": "overdue"
                }}]
            }}"#
        )?;

        let store = load(file.path())?;
        let record = store.record(&RecordId::new("r1")).ok_or("record missing")?;
        assert_eq!(record.state, RecordState::Borrowed);
        assert_eq!(record.fine, Money::ZERO);
        Ok(())
    }

    #[test]
    fn test_dashboard_export_is_accepted() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"{
            "books": [{"id": "1", "title": "Dune", "author": "Frank Herbert", "isbn": "x",
                       "category": "Fiction", "publicationYear": 1965, "description": "Sand",
                       "totalCopies": 3, "availableCopies": 1}],
            "users": [{"id": "1", "name": "Ada", "email": "ada@example.com",
                       "phoneNumber": "1", "membershipDate": "2023-01-01",
                       "status": "active", "address": "here"}],
            "transactions": [
                {"id": "1", "bookId": "1", "userId": "1", "bookTitle": "Dune", "userName": "Ada",
                 "checkoutDate": "2023-12-20", "dueDate": "2024-01-03",
                 "status": "overdue", "fineAmount": 15.50},
                {"id": "2", "bookId": "1", "userId": "1", "bookTitle": "Dune", "userName": "Ada",
                 "checkoutDate": "2023-11-01", "dueDate": "2023-11-15", "returnDate": "2023-11-20",
                 "status": "returned", "fineAmount": 2.5}
            ]
        }"#;

        let store = from_json(json)?;
        assert_eq!(store.book(&BookId::new("1")).map(|book| book.total_copies), Some(3));
        assert_eq!(store.member(&MemberId::new("1")).map(|member| member.phone.as_str()), Some("1"));

        let open = store.record(&RecordId::new("1")).ok_or("record 1 missing")?;
        assert_eq!((open.state, open.fine), (RecordState::Borrowed, Money::ZERO));

        let returned = store.record(&RecordId::new("2")).ok_or("record 2 missing")?;
        assert_eq!((returned.state, returned.fine), (RecordState::Returned, Money::from_cents(250)));
        Ok(())
    }

    #[test]
    fn test_dashboard_export_with_negative_fine_is_rejected() {
        let json = r#"{"users": [], "transactions": [
            {"id": "1", "bookId": "1", "userId": "1", "bookTitle": "Dune", "userName": "Ada",
             "checkoutDate": "2023-11-01", "dueDate": "2023-11-15", "returnDate": "2023-11-20",
             "status": "returned", "fineAmount": -1}
        ]}"#;
        assert!(matches!(from_json(json), Err(LibraryError::FixtureIntegrity(_))));
    }

    #[test]
    fn test_dangling_member_is_rejected() {
        let json = r#"{
            "books": [{"id": "b1", "title": "Dune", "author": "F", "isbn": "x",
                       "category": "Fiction", "publication_year": 1965,
                       "total_copies": 1, "available_copies": 0}],
            "records": [{"id": "r1", "book_id": "b1", "member_id": "ghost",
                         "book_title": "Dune", "member_name": "Ghost",
                         "checkout_date": "2024-01-01", "due_date": "2024-01-15"}]
        }"#;
        assert!(matches!(from_json(json), Err(LibraryError::FixtureIntegrity(_))));
    }

    #[test]
    fn test_too_many_available_copies_is_rejected() {
        let json = r#"{"books": [{"id": "b1", "title": "Dune", "author": "F", "isbn": "x",
                       "category": "Fiction", "publication_year": 1965,
                       "total_copies": 1, "available_copies": 2}]}"#;
        assert!(matches!(from_json(json), Err(LibraryError::FixtureIntegrity(_))));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() -> Result<(), serde_json::Error> {
        let mut store = sample();
        let duplicate = serde_json::from_str::<Member>(
            r#"{"id": "1", "name": "Twin", "email": "t@e", "phone": "0",
                "membership_date": "2024-01-01", "status": "active", "address": "a"}"#,
        )?;
        store.insert_member(duplicate);
        assert!(matches!(validate(&store), Err(LibraryError::FixtureIntegrity(_))));
        Ok(())
    }

    #[test]
    fn test_malformed_json_is_a_format_error() {
        assert!(matches!(from_json("{"), Err(LibraryError::FixtureFormat(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        assert!(matches!(load(Path::new("/nonexistent/fixtures.json")), Err(LibraryError::FixtureIo(_))));
    }
}
