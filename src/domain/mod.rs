pub mod board;
pub mod drag;
pub mod search;
pub mod ticket;

pub use board::Board;
pub use drag::{DragSession, DropOutcome, DropTarget, Reconciler, UnresolvedReason};
pub use ticket::{Priority, Ticket, TicketDraft, TicketId, TicketPatch, TicketStatus};
