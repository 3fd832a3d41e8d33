use crate::domain::ticket::{Ticket, TicketId, TicketStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kanban board state: one ordered ticket sequence per fixed column.
///
/// Position within a column is display order. Each column is stored under its
/// display name, so the serialized shape is
/// `{ "To Do": [...], "In Progress": [...], "Done": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "To Do", default)]
    to_do: Vec<Ticket>,
    #[serde(rename = "In Progress", default)]
    in_progress: Vec<Ticket>,
    #[serde(rename = "Done", default)]
    done: Vec<Ticket>,
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets of one column in display order
    pub fn column(&self, status: TicketStatus) -> &[Ticket] {
        match status {
            TicketStatus::ToDo => &self.to_do,
            TicketStatus::InProgress => &self.in_progress,
            TicketStatus::Done => &self.done,
        }
    }

    pub(crate) fn column_mut(&mut self, status: TicketStatus) -> &mut Vec<Ticket> {
        match status {
            TicketStatus::ToDo => &mut self.to_do,
            TicketStatus::InProgress => &mut self.in_progress,
            TicketStatus::Done => &mut self.done,
        }
    }

    /// All columns in display order
    pub fn columns(&self) -> impl Iterator<Item = (TicketStatus, &[Ticket])> {
        TicketStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    /// All tickets, column by column
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.columns().flat_map(|(_, tickets)| tickets.iter())
    }

    /// Finds the column and index currently holding a ticket
    pub fn locate(&self, id: &TicketId) -> Option<(TicketStatus, usize)> {
        self.columns().find_map(|(status, tickets)| {
            tickets
                .iter()
                .position(|t| &t.id == id)
                .map(|index| (status, index))
        })
    }

    /// Index of a ticket within one specific column
    pub fn position_in(&self, status: TicketStatus, id: &TicketId) -> Option<usize> {
        self.column(status).iter().position(|t| &t.id == id)
    }

    pub fn find(&self, id: &TicketId) -> Option<&Ticket> {
        self.locate(id)
            .map(|(status, index)| &self.column(status)[index])
    }

    pub fn contains(&self, id: &TicketId) -> bool {
        self.locate(id).is_some()
    }

    /// Total number of tickets across all columns
    pub fn len(&self) -> usize {
        self.to_do.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a ticket to the tail of the column named by its status
    pub(crate) fn push(&mut self, ticket: Ticket) {
        self.column_mut(ticket.status).push(ticket);
    }

    /// Removes a ticket from a column, returning it if it was there
    pub(crate) fn remove_from(&mut self, status: TicketStatus, id: &TicketId) -> Option<Ticket> {
        let index = self.position_in(status, id)?;
        Some(self.column_mut(status).remove(index))
    }

    /// Checks that every ticket's status names its column and no id repeats
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        self.columns().all(|(status, tickets)| {
            tickets
                .iter()
                .all(|t| t.status == status && seen.insert(t.id.clone()))
        })
    }

    /// Repairs a board read from storage so that it satisfies the column invariants.
    ///
    /// Returns the number of tickets that had to be fixed or dropped.
    pub(crate) fn normalize(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut repaired = 0;
        for status in TicketStatus::ALL {
            let column = self.column_mut(status);
            let before = column.len();
            column.retain(|t| seen.insert(t.id.clone()));
            repaired += before - column.len();

            for ticket in column.iter_mut().filter(|t| t.status != status) {
                tracing::warn!(
                    "Ticket {} stored in '{}' with status '{}'; restamping",
                    ticket.id,
                    status,
                    ticket.status
                );
                ticket.status = status;
                repaired += 1;
            }
        }
        repaired
    }
}
