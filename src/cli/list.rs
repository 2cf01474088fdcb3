use anyhow::Result;
use std::cmp::Ordering;

use crate::cli::display::list_line;
use crate::models::Dossier;
use crate::store::DossierStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    NameAsc,
    NameDesc,
    #[default]
    UpdatedDesc,
    FriendDesc,
}

/// List filters; the default filter matches everything
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub query: Option<String>,
    /// 0 disables the threshold
    pub min_friendliness: u8,
    pub with_photo: bool,
}

impl ListFilter {
    /// Query matches the name, any tag, or the relation (case-insensitive)
    pub fn matches(&self, d: &Dossier) -> bool {
        if let Some(ref query) = self.query {
            let q = query.trim().to_lowercase();
            if !q.is_empty() {
                let hit = d.full_name.to_lowercase().contains(&q)
                    || d.tags.iter().any(|t| t.to_lowercase().contains(&q))
                    || d.relation
                        .as_deref()
                        .is_some_and(|r| r.to_lowercase().contains(&q));
                if !hit {
                    return false;
                }
            }
        }
        if self.min_friendliness > 0 && d.friendliness_level.unwrap_or(0) < self.min_friendliness {
            return false;
        }
        if self.with_photo && !d.has_photo() {
            return false;
        }
        true
    }
}

pub fn sort_dossiers(dossiers: &mut [Dossier], order: SortOrder) {
    match order {
        SortOrder::NameAsc => dossiers.sort_by(|a, b| compare_names(a, b)),
        SortOrder::NameDesc => dossiers.sort_by(|a, b| compare_names(b, a)),
        SortOrder::UpdatedDesc => dossiers.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::FriendDesc => dossiers.sort_by(|a, b| {
            b.friendliness_level
                .unwrap_or(0)
                .cmp(&a.friendliness_level.unwrap_or(0))
        }),
    }
}

fn compare_names(a: &Dossier, b: &Dossier) -> Ordering {
    a.full_name
        .to_lowercase()
        .cmp(&b.full_name.to_lowercase())
        .then_with(|| a.full_name.cmp(&b.full_name))
}

/// Filter then sort; the store's order is kept for ties
pub fn select_dossiers(all: Vec<Dossier>, filter: &ListFilter, order: SortOrder) -> Vec<Dossier> {
    let mut out: Vec<Dossier> = all.into_iter().filter(|d| filter.matches(d)).collect();
    sort_dossiers(&mut out, order);
    out
}

/// Execute the list command
pub fn run_list(store: &dyn DossierStore, filter: &ListFilter, order: SortOrder) -> Result<()> {
    let total = store.load()?;
    let total_len = total.len();
    let shown = select_dossiers(total, filter, order);

    if shown.is_empty() {
        if total_len == 0 {
            println!("No dossiers yet.");
        } else {
            println!("No matches.");
        }
        return Ok(());
    }

    for d in &shown {
        println!("{}", list_line(d));
    }

    if shown.len() < total_len {
        println!("\n{} of {}", shown.len(), total_len);
    }
    Ok(())
}
