//! Repository traits for the three stores and their in-memory implementation.

use serde::{Deserialize, Serialize};

use crate::{
    book::Book,
    ids::{BookId, MemberId, RecordId},
    lending::LendingRecord,
    member::Member,
};

/// Access to the catalog
pub trait BookRepository {
    /// Look up a book by id
    fn book(&self, id: &BookId) -> Option<&Book>;
    /// Look up a book by id for modification
    fn book_mut(&mut self, id: &BookId) -> Option<&mut Book>;
    /// Append a book to the catalog
    fn insert_book(&mut self, book: Book);
    /// Every book, in catalog order
    fn books(&self) -> impl Iterator<Item = &Book>;
}

/// Access to the membership roster
pub trait MemberRepository {
    /// Look up a member by id
    fn member(&self, id: &MemberId) -> Option<&Member>;
    /// Every member, in roster order
    fn members(&self) -> impl Iterator<Item = &Member>;
}

/// Access to the lending ledger
pub trait LendingRepository {
    /// Look up a record by id
    fn record(&self, id: &RecordId) -> Option<&LendingRecord>;
    /// Look up a record by id for modification
    fn record_mut(&mut self, id: &RecordId) -> Option<&mut LendingRecord>;
    /// Append a record to the ledger
    fn append_record(&mut self, record: LendingRecord);
    /// Every record, oldest first
    fn records(&self) -> impl Iterator<Item = &LendingRecord>;
}

/// All three stores held in memory.
///
/// Contents live for as long as the value does; nothing is written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InMemoryStore {
    /// Catalog entries
    #[serde(default)]
    books: Vec<Book>,
    /// Registered members
    #[serde(default)]
    members: Vec<Member>,
    /// Ledger entries, oldest first
    #[serde(default)]
    records: Vec<LendingRecord>,
}

impl InMemoryStore {
    /// An empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the given collections
    #[must_use]
    pub fn from_parts(
        books: Vec<Book>,
        members: Vec<Member>,
        records: Vec<LendingRecord>,
    ) -> Self {
        Self { books, members, records }
    }

    /// Register a member
    pub fn insert_member(&mut self, member: Member) {
        self.members.push(member);
    }
}

impl BookRepository for InMemoryStore {
    fn book(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|book| &book.id == id)
    }

    fn book_mut(&mut self, id: &BookId) -> Option<&mut Book> {
        self.books.iter_mut().find(|book| &book.id == id)
    }

    fn insert_book(&mut self, book: Book) {
        self.books.push(book);
    }

    fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }
}

impl MemberRepository for InMemoryStore {
    fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }
}

impl LendingRepository for InMemoryStore {
    fn record(&self, id: &RecordId) -> Option<&LendingRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    fn record_mut(&mut self, id: &RecordId) -> Option<&mut LendingRecord> {
        self.records.iter_mut().find(|record| &record.id == id)
    }

    fn append_record(&mut self, record: LendingRecord) {
        self.records.push(record);
    }

    fn records(&self) -> impl Iterator<Item = &LendingRecord> {
        self.records.iter()
    }
}
