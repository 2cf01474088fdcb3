use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A longer anecdote shared with or about a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: Uuid,
    pub dossier_id: String,
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Story {
    pub fn new(dossier_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            dossier_id,
            date: None,
            title: None,
            content: None,
            created_at: Utc::now(),
        }
    }
}
