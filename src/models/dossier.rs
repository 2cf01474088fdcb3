use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used when an imported record carries no name.
pub const PLACEHOLDER_NAME: &str = "Unnamed";

pub const FRIENDLINESS_MIN: u8 = 0;
pub const FRIENDLINESS_MAX: u8 = 5;

/// One tracked person.
///
/// Serialized field names match the CSV header, so JSON exports and CSV
/// exports use the same vocabulary (`photoDataUrl` included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dossier {
    pub id: String,
    pub full_name: String,
    pub dob: Option<String>,
    pub parents: Option<String>,
    pub history: Option<String>,
    pub traumas: Option<String>,
    pub habits: Option<String>,
    pub communication_style: Option<String>,
    pub friendliness_level: Option<u8>,
    pub relation: Option<String>,
    pub last_contact_date: Option<String>,
    #[serde(rename = "photoDataUrl")]
    pub photo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dossier {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), full_name, Utc::now())
    }

    /// Build an empty dossier with a known id and timestamp.
    pub fn with_id(id: impl Into<String>, full_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let full_name = full_name.into();
        Self {
            id: id.into(),
            full_name: if full_name.trim().is_empty() {
                PLACEHOLDER_NAME.to_string()
            } else {
                full_name
            },
            dob: None,
            parents: None,
            history: None,
            traumas: None,
            habits: None,
            communication_style: None,
            friendliness_level: None,
            relation: None,
            last_contact_date: None,
            photo: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_photo(&self) -> bool {
        self.photo.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Copy every non-empty field of `incoming` onto `self`, then stamp
    /// `updated_at` with `now`. Empty strings, `None` and empty tag lists
    /// leave the current value alone. The id is never changed.
    pub fn overlay(&mut self, incoming: &Dossier, now: DateTime<Utc>) {
        if !incoming.full_name.is_empty() {
            self.full_name = incoming.full_name.clone();
        }
        overlay_text(&mut self.dob, &incoming.dob);
        overlay_text(&mut self.parents, &incoming.parents);
        overlay_text(&mut self.history, &incoming.history);
        overlay_text(&mut self.traumas, &incoming.traumas);
        overlay_text(&mut self.habits, &incoming.habits);
        overlay_text(&mut self.communication_style, &incoming.communication_style);
        if let Some(level) = incoming.friendliness_level {
            self.friendliness_level = Some(clamp_friendliness(i64::from(level)));
        }
        overlay_text(&mut self.relation, &incoming.relation);
        overlay_text(&mut self.last_contact_date, &incoming.last_contact_date);
        overlay_text(&mut self.photo, &incoming.photo);
        if !incoming.tags.is_empty() {
            self.tags = incoming.tags.clone();
        }
        self.created_at = incoming.created_at;
        self.updated_at = now;
    }
}

fn overlay_text(target: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = incoming {
        if !value.is_empty() {
            *target = Some(value.clone());
        }
    }
}

pub fn clamp_friendliness(value: i64) -> u8 {
    value.clamp(i64::from(FRIENDLINESS_MIN), i64::from(FRIENDLINESS_MAX)) as u8
}

/// Lenient numeric parse: surrounding whitespace is ignored, a fractional
/// part is truncated, anything non-numeric counts as 0. The result is clamped.
pub fn parse_friendliness(raw: &str) -> u8 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FRIENDLINESS_MIN;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => clamp_friendliness(n.trunc() as i64),
        _ => FRIENDLINESS_MIN,
    }
}

/// Split a `|`-joined tag cell into trimmed, non-empty tags.
pub fn split_tags(raw: &str, separator: &str) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_placeholder_for_blank_name() {
        let d = Dossier::new("   ");
        assert_eq!(d.full_name, PLACEHOLDER_NAME);
        assert!(Uuid::parse_str(&d.id).is_ok());
        assert_eq!(d.created_at, d.updated_at);
    }

    #[test]
    fn test_parse_friendliness_clamps() {
        assert_eq!(parse_friendliness("-3"), 0);
        assert_eq!(parse_friendliness("99"), 5);
        assert_eq!(parse_friendliness(" 4 "), 4);
        assert_eq!(parse_friendliness("3.7"), 3);
        assert_eq!(parse_friendliness("abc"), 0);
        assert_eq!(parse_friendliness(""), 0);
        assert_eq!(parse_friendliness("NaN"), 0);
    }

    #[test]
    fn test_split_tags_trims_and_drops_empty() {
        assert_eq!(split_tags(" school | |work|", "|"), vec!["school", "work"]);
        assert!(split_tags("", "|").is_empty());
    }

    #[test]
    fn test_overlay_keeps_fields_missing_on_incoming() {
        let now = Utc::now();
        let mut base = Dossier::with_id("1", "A", now);
        base.relation = Some("x".to_string());
        base.tags = vec!["old".to_string()];

        let mut incoming = Dossier::with_id("1", "A2", now);
        incoming.relation = Some(String::new());

        let later = now + chrono::Duration::seconds(5);
        base.overlay(&incoming, later);

        assert_eq!(base.full_name, "A2");
        assert_eq!(base.relation.as_deref(), Some("x"));
        assert_eq!(base.tags, vec!["old"]);
        assert_eq!(base.updated_at, later);
    }

    #[test]
    fn test_has_photo() {
        let mut d = Dossier::new("A");
        assert!(!d.has_photo());
        d.photo = Some(String::new());
        assert!(!d.has_photo());
        d.photo = Some("https://example.com/a.jpg".to_string());
        assert!(d.has_photo());
    }
}
