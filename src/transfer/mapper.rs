//! Parsed CSV rows → dossiers.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::tokenizer::Row;
use super::TAG_SEPARATOR;
use crate::models::{parse_friendliness, split_tags, Dossier, PLACEHOLDER_NAME};

/// Column lookup by header name.
struct Columns<'a> {
    index: HashMap<&'a str, usize>,
}

impl<'a> Columns<'a> {
    fn new(header: &'a Row) -> Self {
        let mut index = HashMap::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            // Last occurrence wins for duplicated header names
            index.insert(name.trim(), i);
        }
        Self { index }
    }

    /// Cell for `name`, or "" when the column or the cell is missing.
    fn get<'r>(&self, row: &'r Row, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn optional(&self, row: &Row, name: &str) -> Option<String> {
        let value = self.get(row, name);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Map a header row plus data rows to dossiers.
///
/// Rows with fewer than two cells are dropped before the header is picked.
/// `now` stands in for missing creation times and always becomes
/// `updated_at`, since importing counts as a mutation.
pub fn records_from_rows(rows: Vec<Row>, now: DateTime<Utc>) -> Vec<Dossier> {
    let total = rows.len();
    let rows: Vec<Row> = rows.into_iter().filter(|r| r.len() > 1).collect();
    if rows.len() < total {
        log::debug!("dropped {} row(s) with fewer than two cells", total - rows.len());
    }

    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let columns = Columns::new(header);

    let dossiers: Vec<Dossier> = data.iter().map(|row| map_row(&columns, row, now)).collect();
    log::debug!("mapped {} dossier(s) from {} column(s)", dossiers.len(), header.len());
    dossiers
}

fn map_row(columns: &Columns<'_>, row: &Row, now: DateTime<Utc>) -> Dossier {
    let id = match columns.get(row, "id") {
        "" => Uuid::new_v4().to_string(),
        id => id.to_string(),
    };
    let full_name = match columns.get(row, "full_name") {
        "" => PLACEHOLDER_NAME.to_string(),
        name => name.to_string(),
    };

    Dossier {
        id,
        full_name,
        dob: columns.optional(row, "dob"),
        parents: columns.optional(row, "parents"),
        history: columns.optional(row, "history"),
        traumas: columns.optional(row, "traumas"),
        habits: columns.optional(row, "habits"),
        communication_style: columns.optional(row, "communication_style"),
        friendliness_level: Some(parse_friendliness(columns.get(row, "friendliness_level"))),
        relation: columns.optional(row, "relation"),
        last_contact_date: columns.optional(row, "last_contact_date"),
        photo: columns.optional(row, "photoDataUrl"),
        tags: split_tags(columns.get(row, "tags"), TAG_SEPARATOR),
        created_at: parse_timestamp(columns.get(row, "created_at")).unwrap_or(now),
        updated_at: now,
    }
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some(ts) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Some(ts.and_utc());
    }
    log::warn!("unparseable timestamp {:?}, using import time", raw);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::parse_rows;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap()
    }

    fn map(text: &str) -> Vec<Dossier> {
        records_from_rows(parse_rows(text), now())
    }

    #[test]
    fn test_empty_rows_yield_no_records() {
        assert!(records_from_rows(Vec::new(), now()).is_empty());
        assert!(map("").is_empty());
    }

    #[test]
    fn test_header_only() {
        assert!(map("id,full_name,relation\n").is_empty());
    }

    #[test]
    fn test_columns_are_looked_up_by_name() {
        let d = map("relation,full_name,id\nfriend,Ann,42");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].id, "42");
        assert_eq!(d[0].full_name, "Ann");
        assert_eq!(d[0].relation.as_deref(), Some("friend"));
        assert!(d[0].dob.is_none());
    }

    #[test]
    fn test_defaults_for_missing_values() {
        let d = map("id,full_name,friendliness_level,tags\n,,,");
        assert_eq!(d.len(), 1);
        assert!(Uuid::parse_str(&d[0].id).is_ok());
        assert_eq!(d[0].full_name, PLACEHOLDER_NAME);
        assert_eq!(d[0].friendliness_level, Some(0));
        assert!(d[0].tags.is_empty());
        assert_eq!(d[0].created_at, now());
        assert_eq!(d[0].updated_at, now());
    }

    #[test]
    fn test_friendliness_is_clamped() {
        let d = map("id,friendliness_level\n1,-3\n2,99\n3,abc\n4,4");
        let levels: Vec<_> = d.iter().map(|d| d.friendliness_level).collect();
        assert_eq!(levels, vec![Some(0), Some(5), Some(0), Some(4)]);
    }

    #[test]
    fn test_tags_split_on_pipe() {
        let d = map("id,tags\n1, school | project ||neighbour ");
        assert_eq!(d[0].tags, vec!["school", "project", "neighbour"]);
    }

    #[test]
    fn test_updated_at_is_always_fresh() {
        let d = map("id,created_at,updated_at\n1,2020-02-02T10:00:00Z,2020-02-03T10:00:00Z");
        assert_eq!(
            d[0].created_at,
            Utc.with_ymd_and_hms(2020, 2, 2, 10, 0, 0).unwrap()
        );
        assert_eq!(d[0].updated_at, now());
    }

    #[test]
    fn test_date_only_created_at() {
        let d = map("id,created_at\n1,2025-01-01");
        assert_eq!(d[0].created_at, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_bad_created_at_falls_back_to_now() {
        let d = map("id,created_at\n1,yesterday");
        assert_eq!(d[0].created_at, now());
    }

    #[test]
    fn test_single_cell_rows_are_dropped() {
        // The stray single-cell lines disappear, even before the header.
        let d = map("junk\nid,full_name\nlonely\n1,Ann");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].full_name, "Ann");
    }

    #[test]
    fn test_short_rows_leave_missing_columns_absent() {
        let d = map("id,full_name,relation,habits\n1,Ann");
        assert_eq!(d[0].full_name, "Ann");
        assert!(d[0].relation.is_none());
        assert!(d[0].habits.is_none());
    }

    #[test]
    fn test_quoted_values_survive_mapping() {
        let d = map("id,full_name,history\n1,\"Doe, Jane\",\"said \"\"hi\"\"\nand left\"");
        assert_eq!(d[0].full_name, "Doe, Jane");
        assert_eq!(d[0].history.as_deref(), Some("said \"hi\"\nand left"));
    }
}
