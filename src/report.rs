use std::fmt::Write;

use crate::{
    analytics::LibraryStats,
    book::Book,
    events::LibraryEvent,
    lending::{LoanStatus, LoanView},
    member::Member,
};

/// Text renderings of the stores for terminals and markdown documents
#[derive(Debug)]
pub struct Report;

impl Report {
    /// Markdown table of ledger entries
    #[must_use]
    pub fn loans_table(loans: &[LoanView<'_>]) -> String {
        if loans.is_empty() {
            return "No lending records found.".to_string();
        }

        let mut table = String::from("| Record | Book | Member | Checkout | Due | Returned | Status | Fine |\n");
        table.push_str("|--------|------|--------|----------|-----|----------|--------|------|\n");

        for view in loans {
            let record = view.record;
            let returned = record.return_date.as_ref().map_or_else(|| "-".to_string(), ToString::to_string);
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                record.id,
                record.book_title,
                record.member_name,
                record.checkout_date,
                record.due_date,
                returned,
                Self::format_status(view.status),
                view.fine
            );
        }

        table
    }

    /// Markdown table of catalog entries
    #[must_use]
    pub fn books_table(books: &[&Book]) -> String {
        if books.is_empty() {
            return "No books found.".to_string();
        }

        let mut table = String::from("| Id | Title | Author | ISBN | Category | Year | Available |\n");
        table.push_str("|----|-------|--------|------|----------|------|-----------|\n");

        for book in books {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} | {} | {}/{} |",
                book.id,
                book.title,
                book.author,
                book.isbn,
                book.category,
                book.publication_year,
                book.available_copies,
                book.total_copies
            );
        }

        table
    }

    /// Markdown table of members
    #[must_use]
    pub fn members_table(members: &[&Member]) -> String {
        if members.is_empty() {
            return "No members found.".to_string();
        }

        let mut table = String::from("| Id | Name | Email | Phone | Since | Status |\n");
        table.push_str("|----|------|-------|-------|-------|--------|\n");

        for member in members {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} | {} |",
                member.id, member.name, member.email, member.phone, member.membership_date, member.status
            );
        }

        table
    }

    /// Dashboard summary with the category breakdown
    #[must_use]
    pub fn dashboard(stats: &LibraryStats) -> String {
        let mut out = String::from("=== Library Dashboard ===\n");
        let _ = writeln!(out, "Total books:       {}", stats.total_books);
        let _ = writeln!(out, "Available copies:  {}", stats.available_books);
        let _ = writeln!(out, "Members:           {}", stats.total_members);
        let _ = writeln!(out, "Books checked out: {}", stats.books_checked_out);
        let _ = writeln!(out, "Overdue books:     {}", stats.overdue_books);
        let _ = writeln!(out, "Fines:             {}", stats.outstanding_fines);

        out.push_str("\n=== Books by Category ===\n");
        let widest = stats.copies_by_category.values().copied().max().unwrap_or(0);
        for (category, count) in &stats.copies_by_category {
            let _ = writeln!(out, "{:<20} {:>3} {}", category.label(), count, Self::bar(*count, widest));
        }

        out
    }

    /// Recent activity feed, newest first
    #[must_use]
    pub fn activity(events: &[LibraryEvent]) -> String {
        if events.is_empty() {
            return "No activity recorded yet.".to_string();
        }

        let mut out = String::new();
        for event in events.iter().rev() {
            let _ = writeln!(out, "- {}", event.describe());
        }
        out
    }

    /// Status label with a marker
    fn format_status(status: LoanStatus) -> String {
        match status {
            LoanStatus::Borrowed => "[out] borrowed".to_string(),
            LoanStatus::Returned => "[ok] returned".to_string(),
            LoanStatus::Overdue => "[!!] overdue".to_string(),
        }
    }

    /// Horizontal bar scaled against the widest value
    fn bar(count: u64, widest: u64) -> String {
        /// Width of the longest bar
        const WIDTH: u64 = 30;
        let len = count.saturating_mul(WIDTH).checked_div(widest).unwrap_or(0);
        "#".repeat(usize::try_from(len).unwrap_or(0))
    }
}
