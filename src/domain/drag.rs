//! Drag/drop reconciliation.
//!
//! The input layer reports drag gestures as structured events. The
//! [`Reconciler`] tracks the gesture in a [`DragSession`] and, when the
//! gesture ends, turns it into the next [`Board`] snapshot:
//!
//! * the destination column is the hovered column, or else the column of
//!   the hovered ticket; anything else leaves the board unchanged
//! * dropping inside the source column moves the ticket to the hovered
//!   ticket's index (or to the end when a column was hovered)
//! * dropping into another column appends the ticket to its tail
//!
//! Every unresolved drop is a silent no-op; the session always resets.

use crate::domain::{
    board::Board,
    ticket::{TicketId, TicketStatus},
};
use std::str::FromStr;

/// A droppable element as described by the input layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(TicketStatus),
    Ticket(TicketId),
}

impl DropTarget {
    /// Maps a raw element identifier to a drop target.
    ///
    /// Column names win over ticket ids.
    pub fn from_raw(raw: &str) -> Self {
        match TicketStatus::from_str(raw) {
            Ok(status) => Self::Column(status),
            Err(_) => Self::Ticket(TicketId::new(raw)),
        }
    }

    /// Resolves the column this target belongs to on the given board
    pub fn column(&self, board: &Board) -> Option<TicketStatus> {
        match self {
            Self::Column(status) => Some(*status),
            Self::Ticket(id) => board.locate(id).map(|(status, _)| status),
        }
    }
}

impl From<TicketStatus> for DropTarget {
    fn from(status: TicketStatus) -> Self {
        Self::Column(status)
    }
}

impl From<TicketId> for DropTarget {
    fn from(id: TicketId) -> Self {
        Self::Ticket(id)
    }
}

/// State of an in-progress drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub ticket_id: TicketId,
    /// Column the ticket was in when the drag started
    pub source: TicketStatus,
    /// Last target reported by a drag-over event
    pub hover: Option<DropTarget>,
}

/// Why a drop left the board as it was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No drag was in progress
    NoSession,
    /// The gesture ended over nothing droppable
    NoTarget,
    /// The hovered ticket is not on the board
    UnknownTarget,
    /// The dragged ticket left its source column during the drag
    TicketMissing,
    /// The ticket was dropped where it already is
    SamePosition,
}

/// Result of ending a drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Same-column move from one index to another
    Reordered {
        board: Board,
        column: TicketStatus,
        from: usize,
        to: usize,
    },
    /// Cross-column transfer to the tail of the destination
    Moved {
        board: Board,
        from: TicketStatus,
        to: TicketStatus,
    },
    Unchanged(UnresolvedReason),
}

impl DropOutcome {
    /// The next board snapshot, if the drop changed anything
    pub fn into_board(self) -> Option<Board> {
        match self {
            Self::Reordered { board, .. } | Self::Moved { board, .. } => Some(board),
            Self::Unchanged(_) => None,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }
}

/// Drag session state machine: Idle -> Dragging -> Idle
#[derive(Debug, Default)]
pub struct Reconciler {
    session: Option<DragSession>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active drag, if any
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a drag. Unknown tickets leave the reconciler idle.
    pub fn on_drag_start(&mut self, board: &Board, ticket_id: &TicketId) -> bool {
        match board.locate(ticket_id) {
            Some((source, _)) => {
                tracing::debug!("Drag started for {} in '{}'", ticket_id, source);
                self.session = Some(DragSession {
                    ticket_id: ticket_id.clone(),
                    source,
                    hover: None,
                });
                true
            }
            None => {
                tracing::debug!("Ignoring drag start for unknown ticket {}", ticket_id);
                self.session = None;
                false
            }
        }
    }

    /// Records the hovered target. Never touches the board.
    pub fn on_drag_over(&mut self, target: Option<DropTarget>) {
        if let Some(session) = self.session.as_mut() {
            session.hover = target;
        }
    }

    /// Column to highlight for the current hover target
    pub fn highlighted_column(&self, board: &Board) -> Option<TicketStatus> {
        self.session
            .as_ref()
            .and_then(|session| session.hover.as_ref())
            .and_then(|target| target.column(board))
    }

    /// Abandons the drag without touching the board
    pub fn on_drag_cancel(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("Drag cancelled for {}", session.ticket_id);
        }
    }

    /// Ends the drag and computes the next board. The session is cleared
    /// whatever the outcome.
    pub fn on_drag_end(&mut self, board: &Board, target: Option<&DropTarget>) -> DropOutcome {
        let Some(session) = self.session.take() else {
            return DropOutcome::Unchanged(UnresolvedReason::NoSession);
        };

        let outcome = resolve_drop(board, &session, target);
        if let DropOutcome::Unchanged(reason) = &outcome {
            tracing::debug!("Drop of {} left board unchanged: {:?}", session.ticket_id, reason);
        }
        outcome
    }
}

fn resolve_drop(board: &Board, session: &DragSession, target: Option<&DropTarget>) -> DropOutcome {
    let Some(target) = target else {
        return DropOutcome::Unchanged(UnresolvedReason::NoTarget);
    };
    let Some(destination) = target.column(board) else {
        return DropOutcome::Unchanged(UnresolvedReason::UnknownTarget);
    };
    let Some(from) = board.position_in(session.source, &session.ticket_id) else {
        return DropOutcome::Unchanged(UnresolvedReason::TicketMissing);
    };

    if destination == session.source {
        reorder(board, session.source, from, target)
    } else {
        transfer(board, session, destination)
    }
}

fn reorder(board: &Board, column: TicketStatus, from: usize, target: &DropTarget) -> DropOutcome {
    let len = board.column(column).len();
    let to = match target {
        DropTarget::Ticket(id) => board.position_in(column, id).unwrap_or(len - 1),
        DropTarget::Column(_) => len - 1,
    };
    if to == from {
        return DropOutcome::Unchanged(UnresolvedReason::SamePosition);
    }

    let mut next = board.clone();
    let tickets = next.column_mut(column);
    let ticket = tickets.remove(from);
    tickets.insert(to, ticket);

    tracing::debug!("Reordered '{}' from {} to {}", column, from, to);
    DropOutcome::Reordered {
        board: next,
        column,
        from,
        to,
    }
}

fn transfer(board: &Board, session: &DragSession, destination: TicketStatus) -> DropOutcome {
    let mut next = board.clone();
    let Some(mut ticket) = next.remove_from(session.source, &session.ticket_id) else {
        return DropOutcome::Unchanged(UnresolvedReason::TicketMissing);
    };
    ticket.relocate(destination);
    next.push(ticket);

    tracing::debug!(
        "Moved {} from '{}' to '{}'",
        session.ticket_id,
        session.source,
        destination
    );
    DropOutcome::Moved {
        board: next,
        from: session.source,
        to: destination,
    }
}
