use anyhow::Result;
use crossterm::terminal;
use inquire::ui::RenderConfig;
use inquire::{Confirm, Select};

use crate::models::Dossier;
use crate::store::DossierStore;

// ============================================================================
// Terminal helpers
// ============================================================================

/// Rows available for a selection list
pub fn visible_lines() -> usize {
    let (_, height) = terminal::size().unwrap_or((80, 24));
    (height as usize).saturating_sub(4).max(5) // At least 5 lines of content
}

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Yes/no prompt defaulting to no. A cancelled prompt counts as no.
pub fn confirm(prompt: &str) -> bool {
    Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

// ============================================================================
// Dossier lookup
// ============================================================================

/// One-line label used in selection lists
pub fn select_label(d: &Dossier) -> String {
    match &d.relation {
        Some(relation) => format!("{} ({}) [{}]", d.full_name, relation, short_id(&d.id)),
        None => format!("{} [{}]", d.full_name, short_id(&d.id)),
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Let the user pick one of several matches
pub fn select_dossier(dossiers: &[Dossier]) -> Result<Option<Dossier>> {
    if dossiers.is_empty() {
        return Ok(None);
    }

    // Single match goes directly through (no selection needed)
    if dossiers.len() == 1 {
        return Ok(Some(dossiers[0].clone()));
    }

    let options: Vec<String> = dossiers.iter().map(select_label).collect();

    let result = Select::new("Select:", options.clone())
        .with_render_config(minimal_render_config())
        .with_page_size(visible_lines())
        .with_vim_mode(true)
        .prompt_skippable()?;

    match result {
        Some(selected) => {
            let idx = options.iter().position(|o| *o == selected).unwrap_or(0);
            Ok(Some(dossiers[idx].clone()))
        }
        None => Ok(None),
    }
}

/// Find a dossier by exact id, falling back to a name search.
/// Several name matches open a selection prompt.
pub fn find_dossier(store: &dyn DossierStore, identifier: &str) -> Result<Option<Dossier>> {
    let identifier = identifier.trim();
    if let Some(dossier) = store.get(identifier)? {
        return Ok(Some(dossier));
    }

    let matches = store.find_by_name(identifier)?;
    select_dossier(&matches)
}
