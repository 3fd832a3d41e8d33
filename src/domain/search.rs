use crate::domain::{board::Board, ticket::Ticket};

/// Default cap on the number of search hits
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Finds tickets whose id, title, description or assignee contains `query`.
///
/// Matching is case-insensitive. Results follow column order, then position
/// within the column, and are capped at `limit`. A blank query matches nothing;
/// otherwise the query is matched as given, surrounding whitespace included.
///
/// # Examples
/// ```
/// use kanban_core::domain::{search::search, Board};
///
/// let board = Board::new();
/// assert!(search(&board, "anything", 10).is_empty());
/// ```
pub fn search<'a>(board: &'a Board, query: &str, limit: usize) -> Vec<&'a Ticket> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    board
        .tickets()
        .filter(|ticket| ticket.matches(&needle))
        .take(limit)
        .collect()
}
