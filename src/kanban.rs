use crate::{
    config::KanbanConfig,
    domain::{
        Board, DragSession, DropOutcome, DropTarget, Reconciler, Ticket, TicketDraft, TicketId,
        TicketPatch, TicketStatus,
    },
    error::Result,
    store::TicketStore,
    storage::StorageBackend,
};

/// Root state container for one board.
///
/// Owns the ticket store and the drag reconciler; the rendering layer holds
/// one of these and routes every input event through it.
#[derive(Debug)]
pub struct Kanban<B> {
    store: TicketStore<B>,
    reconciler: Reconciler,
}

impl<B: StorageBackend> Kanban<B> {
    pub fn open(backend: B, config: KanbanConfig) -> Result<Self> {
        Ok(Self {
            store: TicketStore::open(backend, config)?,
            reconciler: Reconciler::new(),
        })
    }

    pub fn board(&self) -> &Board {
        self.store.board()
    }

    pub fn store(&self) -> &TicketStore<B> {
        &self.store
    }

    pub fn create(&mut self, draft: TicketDraft) -> Result<&Board> {
        self.store.create(draft)
    }

    pub fn update(&mut self, id: &TicketId, patch: TicketPatch) -> Result<&Board> {
        self.store.update(id, patch)
    }

    pub fn delete(&mut self, id: &TicketId, status: TicketStatus) -> Result<bool> {
        self.store.delete(id, status)
    }

    pub fn clear(&mut self) -> Result<&Board> {
        self.store.clear()
    }

    pub fn search(&self, query: &str) -> Vec<&Ticket> {
        self.store.search(query)
    }

    /// The active drag, if any
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.reconciler.session()
    }

    /// Column the current drag is hovering, for drop-zone highlighting
    pub fn highlighted_column(&self) -> Option<TicketStatus> {
        self.reconciler.highlighted_column(self.store.board())
    }

    pub fn drag_start(&mut self, ticket_id: &TicketId) -> bool {
        self.reconciler.on_drag_start(self.store.board(), ticket_id)
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.reconciler.on_drag_over(target);
    }

    pub fn drag_cancel(&mut self) {
        self.reconciler.on_drag_cancel();
    }

    /// Ends the drag and commits the resulting board, if any.
    ///
    /// Unresolved drops return `Unchanged` and are not errors; only a failed
    /// write is.
    pub fn drag_end(&mut self, target: Option<&DropTarget>) -> Result<DropOutcome> {
        let outcome = self.reconciler.on_drag_end(self.store.board(), target);
        if let DropOutcome::Reordered { board, .. } | DropOutcome::Moved { board, .. } = &outcome {
            self.store.commit(board.clone())?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::UnresolvedReason, storage::memory_storage::MemoryStorage};

    fn open() -> Kanban<MemoryStorage> {
        Kanban::open(MemoryStorage::new(), KanbanConfig::default()).unwrap()
    }

    fn add(kanban: &mut Kanban<MemoryStorage>, title: &str) -> TicketId {
        let board = kanban.create(TicketDraft::new(title, "Alice", 1)).unwrap();
        board.column(TicketStatus::ToDo).last().unwrap().id.clone()
    }

    fn titles(kanban: &Kanban<MemoryStorage>, status: TicketStatus) -> Vec<&str> {
        kanban
            .board()
            .column(status)
            .iter()
            .map(|t| t.title.as_str())
            .collect()
    }

    #[test]
    fn test_drag_to_other_column() {
        let mut kanban = open();
        let t = add(&mut kanban, "T");

        assert!(kanban.drag_start(&t));
        kanban.drag_over(Some(DropTarget::from_raw("In Progress")));
        assert_eq!(kanban.highlighted_column(), Some(TicketStatus::InProgress));

        let outcome = kanban
            .drag_end(Some(&DropTarget::from_raw("In Progress")))
            .unwrap();
        assert!(!outcome.is_unchanged());

        assert!(titles(&kanban, TicketStatus::ToDo).is_empty());
        assert_eq!(titles(&kanban, TicketStatus::InProgress), vec!["T"]);
        assert_eq!(kanban.board().find(&t).unwrap().status, TicketStatus::InProgress);
        assert!(kanban.drag_session().is_none());
        assert_eq!(&kanban.store().persistence().load(), kanban.board());
    }

    #[test]
    fn test_drag_reorder_within_column() {
        let mut kanban = open();
        let a = add(&mut kanban, "A");
        add(&mut kanban, "B");
        let c = add(&mut kanban, "C");

        kanban.drag_start(&a);
        kanban
            .drag_end(Some(&DropTarget::Ticket(c)))
            .unwrap();

        assert_eq!(titles(&kanban, TicketStatus::ToDo), vec!["B", "C", "A"]);
        assert_eq!(&kanban.store().persistence().load(), kanban.board());
    }

    #[test]
    fn test_drag_unknown_ticket_changes_nothing() {
        let mut kanban = open();
        add(&mut kanban, "A");
        let before = kanban.board().clone();

        assert!(!kanban.drag_start(&TicketId::new("X")));
        assert!(kanban.drag_session().is_none());

        let outcome = kanban
            .drag_end(Some(&DropTarget::Column(TicketStatus::Done)))
            .unwrap();
        assert_eq!(outcome, DropOutcome::Unchanged(UnresolvedReason::NoSession));
        assert_eq!(kanban.board(), &before);
    }

    #[test]
    fn test_drag_end_over_nothing_resets_session() {
        let mut kanban = open();
        let a = add(&mut kanban, "A");
        let before = kanban.board().clone();

        kanban.drag_start(&a);
        let outcome = kanban.drag_end(None).unwrap();

        assert!(outcome.is_unchanged());
        assert!(kanban.drag_session().is_none());
        assert_eq!(kanban.board(), &before);
    }

    #[test]
    fn test_drag_cancel_leaves_board() {
        let mut kanban = open();
        let a = add(&mut kanban, "A");
        let before = kanban.board().clone();

        kanban.drag_start(&a);
        kanban.drag_over(Some(DropTarget::Column(TicketStatus::Done)));
        kanban.drag_cancel();

        assert!(kanban.drag_session().is_none());
        assert_eq!(kanban.board(), &before);
    }

    #[test]
    fn test_delete_mid_drag_aborts_drop() {
        let mut kanban = open();
        let a = add(&mut kanban, "A");
        add(&mut kanban, "B");

        kanban.drag_start(&a);
        kanban.delete(&a, TicketStatus::ToDo).unwrap();
        let outcome = kanban
            .drag_end(Some(&DropTarget::Column(TicketStatus::Done)))
            .unwrap();

        assert_eq!(outcome, DropOutcome::Unchanged(UnresolvedReason::TicketMissing));
        assert_eq!(titles(&kanban, TicketStatus::ToDo), vec!["B"]);
        assert!(titles(&kanban, TicketStatus::Done).is_empty());
    }

    #[test]
    fn test_invariants_hold_through_mixed_operations() {
        let mut kanban = open();
        let ids: Vec<TicketId> = (0..5).map(|i| add(&mut kanban, &format!("T{i}"))).collect();

        kanban.drag_start(&ids[0]);
        kanban.drag_end(Some(&DropTarget::Column(TicketStatus::Done))).unwrap();
        kanban.drag_start(&ids[3]);
        kanban.drag_end(Some(&DropTarget::Ticket(ids[1].clone()))).unwrap();
        kanban
            .update(&ids[2], TicketPatch::default().status(TicketStatus::InProgress))
            .unwrap();
        kanban.drag_start(&ids[4]);
        kanban.drag_end(Some(&DropTarget::Ticket(ids[0].clone()))).unwrap();
        kanban.delete(&ids[1], TicketStatus::ToDo).unwrap();

        assert!(kanban.board().is_consistent());
        assert_eq!(kanban.board().len(), 4);
        assert_eq!(titles(&kanban, TicketStatus::Done), vec!["T0", "T4"]);
        assert_eq!(titles(&kanban, TicketStatus::ToDo), vec!["T3"]);
        assert_eq!(&kanban.store().persistence().load(), kanban.board());
    }

    #[test]
    fn test_search_through_root() {
        let mut kanban = open();
        kanban
            .create(TicketDraft::new("Fix bug", "Alice Smith", 3))
            .unwrap();

        let results = kanban.search("alice");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].assigned_to, "Alice Smith");
        assert!(kanban.search("").is_empty());
    }
}
