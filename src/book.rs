use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ids::BookId;

/// Shelf categories a book can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Category {
    /// Novels and short stories
    Fiction,
    /// Programming, algorithms and the like
    #[serde(rename = "Computer Science")]
    ComputerScience,
    /// Older literary works
    #[serde(rename = "Classic Literature")]
    ClassicLiterature,
    /// Natural sciences
    Science,
    /// History and biography
    History,
}

impl Category {
    /// Every category, in shelf order
    pub const ALL: [Self; 5] = [
        Self::Fiction,
        Self::ComputerScience,
        Self::ClassicLiterature,
        Self::Science,
        Self::History,
    ];

    /// The label shown to patrons
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::ComputerScience => "Computer Science",
            Self::ClassicLiterature => "Classic Literature",
            Self::Science => "Science",
            Self::History => "History",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        Self::ALL
            .into_iter()
            .find(|category| {
                let label: String = category.label().chars().filter(|c| !c.is_whitespace()).collect();
                label.eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A title held by the library, with its copy counts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Unique identifier
    pub id: BookId,
    /// Title as printed
    pub title: String,
    /// Author display name
    pub author: String,
    /// ISBN, not checksum-validated
    pub isbn: String,
    /// Shelf category
    pub category: Category,
    /// Year of publication
    #[serde(alias = "publicationYear")]
    pub publication_year: i32,
    /// Short blurb
    #[serde(default)]
    pub description: String,
    /// Copies owned by the library
    #[serde(alias = "totalCopies")]
    pub total_copies: u32,
    /// Copies currently on the shelf
    #[serde(alias = "availableCopies")]
    pub available_copies: u32,
}

impl Book {
    /// Copies currently lent out
    #[must_use]
    pub fn copies_on_loan(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    /// Whether at least one copy can be lent
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Take one copy off the shelf. Returns `false` if none is left.
    pub(crate) fn take_copy(&mut self) -> bool {
        let Some(left) = self.available_copies.checked_sub(1) else {
            return false;
        };
        self.available_copies = left;
        true
    }

    /// Put one copy back on the shelf, never exceeding the total
    pub(crate) fn restore_copy(&mut self) {
        self.available_copies = self.available_copies.saturating_add(1).min(self.total_copies);
    }

    /// Case-insensitive substring match over title, author and ISBN.
    ///
    /// An empty term matches every book.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [&self.title, &self.author, &self.isbn]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// The details needed to add a title to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewBook {
    /// Title as printed
    pub title: String,
    /// Author display name
    pub author: String,
    /// ISBN, not checksum-validated
    pub isbn: String,
    /// Shelf category
    pub category: Category,
    /// Year of publication
    pub publication_year: i32,
    /// Short blurb
    #[serde(default)]
    pub description: String,
    /// Copies owned by the library
    pub total_copies: u32,
}

impl NewBook {
    /// Turn the request into a catalog entry with every copy on the shelf
    #[must_use]
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            category: self.category,
            publication_year: self.publication_year,
            description: self.description,
            available_copies: self.total_copies,
            total_copies: self.total_copies,
        }
    }
}
