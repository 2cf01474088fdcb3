use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated fact about a person ("moved to Berlin", "allergic to nuts").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: Uuid,
    pub dossier_id: String,
    pub date: Option<String>,
    pub title: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Fact {
    pub fn new(dossier_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            dossier_id,
            date: None,
            title: None,
            note: None,
            created_at: Utc::now(),
        }
    }
}
