//! Dossier → CSV text.

use chrono::{DateTime, SecondsFormat, Utc};

use super::tokenizer::{FIELD_DELIMITER, QUOTE};
use super::{HEADER, TAG_SEPARATOR};
use crate::models::Dossier;

/// Render dossiers as CSV: the fixed header, then one row per dossier in
/// input order. Rows are joined with `\n`, without a trailing newline.
pub fn to_csv(dossiers: &[Dossier]) -> String {
    let mut lines = Vec::with_capacity(dossiers.len() + 1);
    lines.push(HEADER.join(","));
    for dossier in dossiers {
        lines.push(render_row(dossier));
    }
    lines.join("\n")
}

fn render_row(d: &Dossier) -> String {
    let tags = d.tags.join(TAG_SEPARATOR);
    let friendliness = d.friendliness_level.unwrap_or(0).to_string();
    let created_at = format_timestamp(&d.created_at);
    let updated_at = format_timestamp(&d.updated_at);

    let cells: [&str; 15] = [
        d.id.as_str(),
        d.full_name.as_str(),
        text(&d.dob),
        text(&d.parents),
        text(&d.history),
        text(&d.traumas),
        text(&d.habits),
        text(&d.communication_style),
        friendliness.as_str(),
        text(&d.relation),
        text(&d.last_contact_date),
        text(&d.photo),
        tags.as_str(),
        created_at.as_str(),
        updated_at.as_str(),
    ];

    cells
        .iter()
        .map(|c| escape_field(c))
        .collect::<Vec<_>>()
        .join(",")
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// RFC 3339, UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Quote a field only when it contains a delimiter, a quote or a line break
/// (`\n` or `\r`, since the tokenizer ends rows on either).
pub fn escape_field(s: &str) -> String {
    if s.contains([FIELD_DELIMITER, QUOTE, '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plain_cells_are_left_alone() {
        assert_eq!(escape_field("Ann Lee"), "Ann Lee");
        assert_eq!(escape_field("school|work"), "school|work");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_quoting_of_dossier_text() {
        assert_eq!(escape_field("Lee, Ann"), "\"Lee, Ann\"");
        assert_eq!(escape_field("calls me \"boss\""), "\"calls me \"\"boss\"\"\"");
        assert_eq!(escape_field("moved\nback"), "\"moved\nback\"");
        assert_eq!(escape_field("a\rb"), "\"a\rb\"");
    }

    #[test]
    fn test_carriage_return_survives_reimport() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut d = Dossier::with_id("1", "A", ts);
        d.history = Some("one\rtwo".to_string());
        d.habits = Some("tea\r\ncoffee".to_string());

        let back = crate::transfer::csv_to_dossiers(&to_csv(&[d]), ts);
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].history.as_deref(), Some("one\rtwo"));
        assert_eq!(back[0].habits.as_deref(), Some("tea\r\ncoffee"));
    }

    #[test]
    fn test_header_only_for_empty_list() {
        assert_eq!(to_csv(&[]), HEADER.join(","));
    }

    #[test]
    fn test_row_layout() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut d = Dossier::with_id("1", "Ann, the Second", ts);
        d.friendliness_level = Some(4);
        d.tags = vec!["x".to_string(), "y".to_string()];
        d.relation = Some("neighbour".to_string());

        let csv = to_csv(&[d]);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "1,\"Ann, the Second\",,,,,,,4,neighbour,,,x|y,2025-01-01T00:00:00.000Z,2025-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_missing_friendliness_renders_zero() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let d = Dossier::with_id("1", "A", ts);
        let csv = to_csv(&[d]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row.split(',').nth(8), Some("0"));
    }
}
