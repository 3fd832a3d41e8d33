use crate::error::{FieldError, KanbanError, Result, TicketField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Opaque unique identifier for a ticket (e.g., 1718000000000-3f9a1c2e)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Wraps an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh identifier from the current timestamp.
    ///
    /// The random suffix keeps ids created within the same millisecond apart.
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..8]))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Column a ticket lives in. The set of columns is fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TicketStatus {
    /// All columns in display order
    pub const ALL: [TicketStatus; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// The column name as shown on the board and stored on disk
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::ToDo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TicketStatus {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.name().to_lowercase() == normalized || status.slug() == normalized)
            .ok_or_else(|| KanbanError::InvalidStatus(s.to_string()))
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// A kanban ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTicket")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    /// Estimated effort in hours
    pub tentative_time: u32,
    pub priority: Priority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// On-disk shape of a ticket. Older boards were written without `updatedAt`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTicket {
    id: TicketId,
    title: String,
    #[serde(default)]
    description: String,
    assigned_to: String,
    tentative_time: u32,
    #[serde(default)]
    priority: Priority,
    status: TicketStatus,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<StoredTicket> for Ticket {
    fn from(stored: StoredTicket) -> Self {
        Self {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            assigned_to: stored.assigned_to,
            tentative_time: stored.tentative_time,
            priority: stored.priority,
            status: stored.status,
            created_at: stored.created_at,
            updated_at: stored.updated_at.unwrap_or(stored.created_at),
        }
    }
}

impl Ticket {
    /// Builds a ticket from a validated draft, stamping both timestamps with now
    pub fn from_draft(id: TicketId, draft: TicketDraft) -> Result<Self> {
        draft.validate()?;
        let now = Utc::now();
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            assigned_to: draft.assigned_to,
            tentative_time: draft.tentative_time,
            priority: draft.priority,
            status: draft.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges the patch into a copy of this ticket and re-stamps `updated_at`.
    ///
    /// `created_at` and `id` are never touched.
    pub fn merged(&self, patch: TicketPatch) -> Result<Self> {
        patch.validate()?;
        let mut ticket = self.clone();
        if let Some(title) = patch.title {
            ticket.title = title;
        }
        if let Some(description) = patch.description {
            ticket.description = description;
        }
        if let Some(assigned_to) = patch.assigned_to {
            ticket.assigned_to = assigned_to;
        }
        if let Some(tentative_time) = patch.tentative_time {
            ticket.tentative_time = tentative_time;
        }
        if let Some(priority) = patch.priority {
            ticket.priority = priority;
        }
        if let Some(status) = patch.status {
            ticket.status = status;
        }
        ticket.updated_at = Utc::now();
        Ok(ticket)
    }

    /// Moves the ticket into another column
    pub fn relocate(&mut self, status: TicketStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match over id, title, description and assignee.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        [
            self.id.as_str(),
            self.title.as_str(),
            self.description.as_str(),
            self.assigned_to.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Input for creating a ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    pub tentative_time: u32,
    pub priority: Priority,
    /// Target column; `To Do` when absent
    pub status: Option<TicketStatus>,
}

impl TicketDraft {
    pub fn new(title: impl Into<String>, assigned_to: impl Into<String>, tentative_time: u32) -> Self {
        Self {
            title: title.into(),
            assigned_to: assigned_to.into(),
            tentative_time,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Checks the required-field constraints, reporting every failing field
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_required(&mut errors, TicketField::Title, &self.title);
        check_required(&mut errors, TicketField::AssignedTo, &self.assigned_to);
        check_hours(&mut errors, self.tentative_time);
        into_result(errors)
    }
}

/// Partial update for an existing ticket; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub tentative_time: Option<u32>,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
}

impl TicketPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    pub fn tentative_time(mut self, hours: u32) -> Self {
        self.tentative_time = Some(hours);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            check_required(&mut errors, TicketField::Title, title);
        }
        if let Some(assigned_to) = &self.assigned_to {
            check_required(&mut errors, TicketField::AssignedTo, assigned_to);
        }
        if let Some(hours) = self.tentative_time {
            check_hours(&mut errors, hours);
        }
        into_result(errors)
    }
}

fn check_required(errors: &mut Vec<FieldError>, field: TicketField, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}

fn check_hours(errors: &mut Vec<FieldError>, hours: u32) {
    if hours == 0 {
        errors.push(FieldError::new(
            TicketField::TentativeTime,
            "must be a positive number of hours",
        ));
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(KanbanError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ticket {
        Ticket::from_draft(
            TicketId::new("t1"),
            TicketDraft::new("Fix bug", "Alice", 3).with_description("Crash on save"),
        )
        .unwrap()
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = TicketId::generate();
        let b = TicketId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().split('-').next().unwrap().parse::<i64>().is_ok());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(TicketStatus::from_str("To Do").unwrap(), TicketStatus::ToDo);
        assert_eq!(TicketStatus::from_str("in progress").unwrap(), TicketStatus::InProgress);
        assert_eq!(TicketStatus::from_str("in-progress").unwrap(), TicketStatus::InProgress);
        assert_eq!(TicketStatus::from_str("DONE").unwrap(), TicketStatus::Done);
        assert!(TicketStatus::from_str("Blocked").is_err());
    }

    #[test]
    fn test_status_serializes_as_column_name() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }

    #[test]
    fn test_from_draft_defaults() {
        let ticket = sample();
        assert_eq!(ticket.status, TicketStatus::ToDo);
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(ticket.created_at, ticket.updated_at);
    }

    #[test]
    fn test_draft_validation_reports_all_fields() {
        let err = TicketDraft::new("  ", "", 0).validate().unwrap_err();
        let fields: Vec<TicketField> = err.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![TicketField::Title, TicketField::AssignedTo, TicketField::TentativeTime]
        );
    }

    #[test]
    fn test_merged_updates_fields_and_timestamp() {
        let ticket = sample();
        std::thread::sleep(std::time::Duration::from_millis(10));

        let merged = ticket
            .merged(TicketPatch::default().title("Fix crash").priority(Priority::High))
            .unwrap();

        assert_eq!(merged.title, "Fix crash");
        assert_eq!(merged.priority, Priority::High);
        assert_eq!(merged.assigned_to, "Alice");
        assert_eq!(merged.created_at, ticket.created_at);
        assert!(merged.updated_at > ticket.updated_at);
    }

    #[test]
    fn test_merged_rejects_blank_title() {
        let ticket = sample();
        let result = ticket.merged(TicketPatch::default().title(""));
        assert!(matches!(result, Err(KanbanError::Validation(_))));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let ticket = sample();
        assert!(ticket.matches("crash"));
        assert!(ticket.matches("alice"));
        assert!(ticket.matches("t1"));
        assert!(!ticket.matches("bob"));
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["assignedTo"], "Alice");
        assert_eq!(json["tentativeTime"], 3);
        assert_eq!(json["status"], "To Do");
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_backwards_compatibility_missing_updated_at() {
        let old_json = r#"{
        "id": "1700000000000",
        "title": "Old Ticket",
        "description": "",
        "assignedTo": "Bob",
        "tentativeTime": 2,
        "priority": "Low",
        "status": "Done",
        "createdAt": "2024-01-01T00:00:00Z"
    }"#;

        let ticket: Ticket = serde_json::from_str(old_json).unwrap();
        assert_eq!(ticket.id.as_str(), "1700000000000");
        assert_eq!(ticket.status, TicketStatus::Done);
        assert_eq!(ticket.updated_at, ticket.created_at);
    }
}
