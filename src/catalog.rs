//! Catalog and roster operations.

use crate::{
    book::{Book, Category, NewBook},
    ids::BookId,
    member::Member,
    store::{BookRepository, MemberRepository},
};

/// Add a title with every copy on the shelf and return the stored entry
pub fn add_book<S>(store: &mut S, new_book: NewBook) -> Book
where
    S: BookRepository,
{
    let book = new_book.into_book(BookId::generate());
    store.insert_book(book.clone());
    book
}

/// Books matching `term` over title, author and ISBN, optionally limited to
/// one category. An empty term keeps every book.
#[must_use]
pub fn search_books<'a, S>(store: &'a S, term: &str, category: Option<Category>) -> Vec<&'a Book>
where
    S: BookRepository,
{
    store
        .books()
        .filter(|book| category.is_none_or(|wanted| book.category == wanted))
        .filter(|book| book.matches(term))
        .collect()
}

/// The fixed set of categories a title can be filed under
#[must_use]
pub fn categories() -> &'static [Category] {
    &Category::ALL
}

/// Members whose name or e-mail contains `term`, ignoring case
#[must_use]
pub fn search_members<'a, S>(store: &'a S, term: &str) -> Vec<&'a Member>
where
    S: MemberRepository,
{
    store.members().filter(|member| member.matches(term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, store::InMemoryStore};

    fn new_book(title: &str, copies: u32) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Anon".to_string(),
            isbn: "000".to_string(),
            category: Category::History,
            publication_year: 2001,
            description: String::new(),
            total_copies: copies,
        }
    }

    #[test]
    fn test_add_sets_available_to_total() {
        let mut store = InMemoryStore::new();
        let book = add_book(&mut store, new_book("Postwar", 4));

        assert_eq!(book.available_copies, 4);
        assert_eq!(store.book(&book.id), Some(&book));
    }

    #[test]
    fn test_added_books_get_distinct_ids() {
        let mut store = InMemoryStore::new();
        let a = add_book(&mut store, new_book("A", 1));
        let b = add_book(&mut store, new_book("B", 1));
        assert_ne!(a.id, b.id);
        assert_eq!(store.books().count(), 2);
    }

    #[test]
    fn test_search_combines_term_and_category() {
        let store = fixtures::sample();

        let fiction = search_books(&store, "", Some(Category::Fiction));
        assert_eq!(fiction.len(), 2);

        let by_author = search_books(&store, "cormen", None);
        assert_eq!(by_author.len(), 1);

        let mismatch = search_books(&store, "cormen", Some(Category::Fiction));
        assert!(mismatch.is_empty());

        assert_eq!(search_books(&store, "", None).len(), 5);
    }

    #[test]
    fn test_categories_are_fixed() {
        assert_eq!(categories().len(), 5);
        assert!(categories().contains(&Category::ComputerScience));
    }

    #[test]
    fn test_member_search() {
        let store = fixtures::sample();
        let found = search_members(&store, "emily");
        assert_eq!(found.len(), 1);
        assert!(search_members(&store, "nobody").is_empty());
    }
}
