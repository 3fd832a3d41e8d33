//! # Kanban Core
//!
//! Board state model and drag/drop reconciliation for a three-column kanban
//! board (`To Do`, `In Progress`, `Done`).
//!
//! The crate exposes a pure state-transition API: a rendering layer reads
//! [`Board`] snapshots and routes create/edit/delete and drag events through
//! a [`Kanban`] container, which writes every new snapshot through to a
//! pluggable [`StorageBackend`].

pub mod config;
pub mod domain;
pub mod error;
pub mod kanban;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::KanbanConfig;
pub use domain::{
    board::Board,
    drag::{DragSession, DropOutcome, DropTarget, Reconciler, UnresolvedReason},
    search::search,
    ticket::{Priority, Ticket, TicketDraft, TicketId, TicketPatch, TicketStatus},
};
pub use error::{FieldError, KanbanError, Result, TicketField};
pub use kanban::Kanban;
#[cfg(feature = "file-storage")]
pub use storage::file_storage::FileStorage;
pub use storage::{memory_storage::MemoryStorage, BoardPersistence, StorageBackend};
pub use store::TicketStore;
