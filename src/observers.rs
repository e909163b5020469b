use std::{cell::RefCell, rc::Rc};

use crate::events::LibraryEvent;

/// Trait for observing changes to the library
pub trait LibraryObserver {
    /// Called after a change has been applied
    fn on_event(&self, event: &LibraryEvent);
}

/// Logs every change through `tracing`
#[derive(Debug)]
pub struct EventLogger;

impl LibraryObserver for EventLogger {
    fn on_event(&self, event: &LibraryEvent) {
        match event {
            LibraryEvent::BookAdded(book) => {
                tracing::info!(book_id = %book.id, title = %book.title, copies = book.total_copies, "book added");
            }
            LibraryEvent::CheckedOut(record) => tracing::info!(
                record_id = %record.id,
                book_id = %record.book_id,
                member_id = %record.member_id,
                due = %record.due_date,
                "book checked out"
            ),
            LibraryEvent::Returned(record) => tracing::info!(
                record_id = %record.id,
                book_id = %record.book_id,
                fine = %record.fine,
                "book returned"
            ),
        }
    }
}

/// Flags returns that left a fine to collect
#[derive(Debug)]
pub struct NotificationService;

impl LibraryObserver for NotificationService {
    fn on_event(&self, event: &LibraryEvent) {
        if let LibraryEvent::Returned(record) = event {
            if record.fine.is_zero() {
                return;
            }
            tracing::warn!(
                member_id = %record.member_id,
                member = %record.member_name,
                fine = %record.fine,
                "late return, fine owed"
            );
        }
    }
}

/// Keeps every event it sees; handy for presentation layers and tests
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    /// Events in arrival order
    events: Rc<RefCell<Vec<LibraryEvent>>>,
}

impl EventRecorder {
    /// A recorder with no events
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event seen so far
    #[must_use]
    pub fn events(&self) -> Vec<LibraryEvent> {
        self.events.borrow().clone()
    }
}

impl LibraryObserver for EventRecorder {
    fn on_event(&self, event: &LibraryEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
