//! Id-keyed reconciliation of two dossier collections.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{clamp_friendliness, Dossier};

/// Counts describing what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Incoming records that matched an existing id
    pub updated: usize,
    /// Incoming records with a new id
    pub inserted: usize,
    /// Base records with no incoming counterpart
    pub retained: usize,
}

/// Merge `incoming` into `base`, stamping updates with the current time.
pub fn merge(base: Vec<Dossier>, incoming: Vec<Dossier>) -> Vec<Dossier> {
    merge_at(base, incoming, Utc::now()).0
}

/// Merge `incoming` into `base`.
///
/// Matched records take every non-empty incoming field and get
/// `updated_at = now`. Unmatched incoming records are appended as they are.
/// Output keeps base order first, then new ids in incoming order; a repeated
/// id always lands on the slot of its first occurrence.
pub fn merge_at(
    base: Vec<Dossier>,
    incoming: Vec<Dossier>,
    now: DateTime<Utc>,
) -> (Vec<Dossier>, MergeSummary) {
    let mut out: Vec<Dossier> = Vec::with_capacity(base.len() + incoming.len());
    let mut by_id: HashMap<String, usize> = HashMap::with_capacity(base.len() + incoming.len());

    for dossier in base {
        match by_id.get(&dossier.id) {
            Some(&slot) => out[slot] = dossier,
            None => {
                by_id.insert(dossier.id.clone(), out.len());
                out.push(dossier);
            }
        }
    }
    let base_len = out.len();

    let mut touched = vec![false; base_len];
    let mut summary = MergeSummary::default();

    for mut dossier in incoming {
        if let Some(level) = dossier.friendliness_level {
            dossier.friendliness_level = Some(clamp_friendliness(i64::from(level)));
        }
        match by_id.get(&dossier.id) {
            Some(&slot) => {
                out[slot].overlay(&dossier, now);
                if slot < base_len {
                    touched[slot] = true;
                }
                summary.updated += 1;
            }
            None => {
                by_id.insert(dossier.id.clone(), out.len());
                out.push(dossier);
                summary.inserted += 1;
            }
        }
    }

    summary.retained = touched.iter().filter(|t| !**t).count();
    log::debug!(
        "merge: {} updated, {} inserted, {} retained",
        summary.updated,
        summary.inserted,
        summary.retained
    );
    (out, summary)
}
