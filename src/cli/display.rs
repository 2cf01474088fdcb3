use chrono::Local;

use crate::models::{Dossier, DossierDetail, FRIENDLINESS_MAX};

/// "4/5", or "—" when the level was never set
pub fn friendly(level: Option<u8>) -> String {
    match level {
        Some(n) => format!("{}/{}", n, FRIENDLINESS_MAX),
        None => "—".to_string(),
    }
}

/// Photo column: the URL for remote photos, a size hint for inline data
pub fn photo_summary(photo: &str) -> String {
    if photo.starts_with("data:") {
        format!("inline image ({} KB)", photo.len() / 1024)
    } else {
        photo.to_string()
    }
}

/// Truncate to `max_len` characters, ending with an ellipsis
pub fn truncate(text: &str, max_len: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.chars().count() <= max_len && !text.trim().contains('\n') {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated.trim_end())
    }
}

/// One line for list output
pub fn list_line(d: &Dossier) -> String {
    let mut line = format!("{}  {}", d.full_name, friendly(d.friendliness_level));
    if let Some(ref relation) = d.relation {
        line.push_str(&format!("  {}", relation));
    }
    if !d.tags.is_empty() {
        let tags: Vec<String> = d.tags.iter().take(3).map(|t| format!("#{}", t)).collect();
        line.push_str(&format!("  {}", tags.join(" ")));
    }
    line
}

fn field(label: &str, value: &Option<String>) {
    if let Some(v) = value {
        if !v.is_empty() {
            if v.contains('\n') {
                println!("  {}:", label);
                for l in v.lines() {
                    println!("    {}", l);
                }
            } else {
                println!("  {}: {}", label, v);
            }
        }
    }
}

/// "last entry 2024-05-10" from the newest dated fact or story
fn last_entry_line(detail: &DossierDetail) -> Option<String> {
    detail.latest_entry_date().map(|date| format!("last entry {}", date))
}

/// Print a full dossier with clean formatting (only non-empty fields)
pub fn print_dossier(detail: &DossierDetail) {
    let d = &detail.dossier;

    // Header - just the name
    println!("{}\n", d.full_name);

    println!("  friendliness: {}", friendly(d.friendliness_level));
    field("relation", &d.relation);
    field("born", &d.dob);
    field("parents", &d.parents);
    field("last contact", &d.last_contact_date);
    field("communication", &d.communication_style);
    field("habits", &d.habits);
    field("history", &d.history);
    field("traumas", &d.traumas);
    if let Some(ref photo) = d.photo {
        if !photo.is_empty() {
            println!("  photo: {}", photo_summary(photo));
        }
    }
    if !d.tags.is_empty() {
        println!("  tags: {}", d.tags.join(", "));
    }

    if !detail.facts.is_empty() {
        println!("\n  Facts");
        for f in &detail.facts {
            let date = f.date.as_deref().unwrap_or("----------");
            let title = f.title.as_deref().unwrap_or("");
            match f.note.as_deref() {
                Some(note) if !note.is_empty() => {
                    println!("    {}  {} — {}", date, title, truncate(note, 50))
                }
                _ => println!("    {}  {}", date, title),
            }
        }
    }

    if !detail.stories.is_empty() {
        println!("\n  Stories");
        for s in &detail.stories {
            let date = s.date.as_deref().unwrap_or("----------");
            println!("    {}  {}", date, s.title.as_deref().unwrap_or("(untitled)"));
            if let Some(ref content) = s.content {
                println!("      {}", truncate(content, 60));
            }
        }
    }

    if let Some(line) = last_entry_line(detail) {
        println!("\n  {}", line);
    }

    let updated = d.updated_at.with_timezone(&Local);
    println!("\n  updated {}  [{}]", updated.format("%Y-%m-%d %H:%M"), d.id);
}
