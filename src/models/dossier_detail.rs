use serde::{Deserialize, Serialize};

use super::{Dossier, Fact, Story};

/// A dossier together with its child records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DossierDetail {
    pub dossier: Dossier,
    pub facts: Vec<Fact>,
    pub stories: Vec<Story>,
}

impl DossierDetail {
    pub fn without_children(dossier: Dossier) -> Self {
        Self {
            dossier,
            facts: Vec::new(),
            stories: Vec::new(),
        }
    }

    /// Most recent dated entry across facts and stories, if any
    pub fn latest_entry_date(&self) -> Option<&str> {
        self.facts
            .iter()
            .filter_map(|f| f.date.as_deref())
            .chain(self.stories.iter().filter_map(|s| s.date.as_deref()))
            .max()
    }
}
