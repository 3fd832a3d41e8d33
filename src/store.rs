use crate::{
    config::KanbanConfig,
    domain::{search, Board, Ticket, TicketDraft, TicketId, TicketPatch, TicketStatus},
    error::{KanbanError, Result},
    storage::{BoardPersistence, StorageBackend},
};

/// Owner of the current board and the only place it is mutated.
///
/// Every mutation builds the next snapshot, writes it through to storage and
/// only then replaces the in-memory board, so a failed write leaves both
/// sides on the previous state.
#[derive(Debug)]
pub struct TicketStore<B> {
    board: Board,
    persistence: BoardPersistence<B>,
    config: KanbanConfig,
}

impl<B: StorageBackend> TicketStore<B> {
    /// Opens the store, loading the board saved under the configured key
    pub fn open(backend: B, config: KanbanConfig) -> Result<Self> {
        config.validate()?;
        let persistence = BoardPersistence::new(backend, config.storage_key.clone());
        let board = persistence.load();
        Ok(Self {
            board,
            persistence,
            config,
        })
    }

    /// Read-only view of the current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &KanbanConfig {
        &self.config
    }

    pub fn persistence(&self) -> &BoardPersistence<B> {
        &self.persistence
    }

    /// Creates a ticket at the tail of its target column
    pub fn create(&mut self, draft: TicketDraft) -> Result<&Board> {
        let ticket = Ticket::from_draft(self.fresh_id(), draft)?;
        tracing::debug!("Creating ticket {} in '{}'", ticket.id, ticket.status);

        let mut next = self.board.clone();
        next.push(ticket);
        self.commit(next)?;
        Ok(&self.board)
    }

    /// Applies an edit. The edited ticket is re-appended to the tail of the
    /// column named by its (possibly new) status.
    pub fn update(&mut self, id: &TicketId, patch: TicketPatch) -> Result<&Board> {
        let (status, _) = self
            .board
            .locate(id)
            .ok_or_else(|| KanbanError::TicketNotFound(id.to_string()))?;

        let mut next = self.board.clone();
        let current = next
            .remove_from(status, id)
            .ok_or_else(|| KanbanError::TicketNotFound(id.to_string()))?;
        let merged = current.merged(patch)?;
        tracing::debug!("Updating ticket {} ('{}' -> '{}')", id, status, merged.status);

        next.push(merged);
        self.commit(next)?;
        Ok(&self.board)
    }

    /// Removes a ticket from the named column.
    ///
    /// Returns `false` without writing anything when the ticket is not there.
    pub fn delete(&mut self, id: &TicketId, status: TicketStatus) -> Result<bool> {
        let mut next = self.board.clone();
        if next.remove_from(status, id).is_none() {
            tracing::debug!("Delete of {} in '{}' ignored: not found", id, status);
            return Ok(false);
        }

        tracing::debug!("Deleting ticket {} from '{}'", id, status);
        self.commit(next)?;
        Ok(true)
    }

    /// Resets to three empty columns
    pub fn clear(&mut self) -> Result<&Board> {
        tracing::info!("Clearing board ({} tickets)", self.board.len());
        self.commit(Board::default())?;
        Ok(&self.board)
    }

    /// Writes `next` through to storage and makes it the current board.
    ///
    /// A snapshot that breaks the column invariants is repaired first.
    pub(crate) fn commit(&mut self, mut next: Board) -> Result<()> {
        let repaired = next.normalize();
        if repaired > 0 {
            tracing::warn!("Repaired {repaired} inconsistent tickets before commit");
        }
        self.persistence.save(&next)?;
        self.board = next;
        Ok(())
    }

    /// Tickets matching `query`, capped at the configured limit
    pub fn search(&self, query: &str) -> Vec<&Ticket> {
        search::search(&self.board, query, self.config.search_limit)
    }

    fn fresh_id(&self) -> TicketId {
        loop {
            let id = TicketId::generate();
            if !self.board.contains(&id) {
                return id;
            }
        }
    }
}
