use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{InteractionEvent, InteractionKind};

#[derive(Debug)]
pub enum InteractionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, message: String },
}

impl std::fmt::Display for InteractionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionImportError::Io(err) => {
                write!(f, "failed to read interaction export: {}", err)
            }
            InteractionImportError::Csv(err) => write!(f, "invalid interaction CSV data: {}", err),
            InteractionImportError::Row { line, message } => {
                write!(f, "interaction export line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for InteractionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InteractionImportError::Io(err) => Some(err),
            InteractionImportError::Csv(err) => Some(err),
            InteractionImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for InteractionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for InteractionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads interaction events from CSV exports.
///
/// Accepts either the snake_case column names (`actor_id,target_id,kind,occurred_at`)
/// or the camelCase names used by the mini-app feed (`userId,postId,type,createdAt`).
pub struct InteractionImporter;

impl InteractionImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<InteractionEvent>, InteractionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<InteractionEvent>, InteractionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut events = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or_default();
            let row: InteractionRow = record.deserialize(Some(&headers))?;
            events.push(row.into_event(line)?);
        }

        debug!(events = events.len(), "imported interaction export");
        Ok(events)
    }
}

#[derive(Debug, Deserialize)]
struct InteractionRow {
    #[serde(alias = "userId")]
    actor_id: String,
    #[serde(alias = "postId")]
    target_id: String,
    #[serde(alias = "type")]
    kind: String,
    #[serde(alias = "createdAt")]
    occurred_at: String,
}

impl InteractionRow {
    fn into_event(self, line: u64) -> Result<InteractionEvent, InteractionImportError> {
        if self.actor_id.is_empty() || self.target_id.is_empty() {
            return Err(InteractionImportError::Row {
                line,
                message: "actor and target ids are required".to_string(),
            });
        }

        let kind = self
            .kind
            .parse::<InteractionKind>()
            .map_err(|err| InteractionImportError::Row {
                line,
                message: err.to_string(),
            })?;

        let occurred_at =
            parse_timestamp(&self.occurred_at).ok_or_else(|| InteractionImportError::Row {
                line,
                message: format!("unrecognized timestamp '{}'", self.occurred_at),
            })?;

        Ok(InteractionEvent {
            actor_id: self.actor_id,
            target_id: self.target_id,
            kind,
            occurred_at,
        })
    }
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC), or bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Cursor;

    #[test]
    fn parse_timestamp_supports_rfc3339_naive_and_dates() {
        let expected = Utc
            .with_ymd_and_hms(2025, 9, 24, 10, 0, 0)
            .single()
            .expect("valid");
        assert_eq!(parse_timestamp("2025-09-24T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-09-24T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-09-24 10:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-09-24"),
            Utc.with_ymd_and_hms(2025, 9, 24, 0, 0, 0).single()
        );
        assert!(parse_timestamp("  ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn importer_accepts_feed_column_names() {
        let csv = "userId,postId,type,createdAt\n12345,post1,like,2025-09-24T10:00:00Z\n";
        let events = InteractionImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor_id, "12345");
        assert_eq!(events[0].target_id, "post1");
        assert_eq!(events[0].kind, InteractionKind::Like);
    }

    #[test]
    fn importer_reports_line_of_bad_kind() {
        let csv = "actor_id,target_id,kind,occurred_at\n\
a,p1,like,2025-09-24\n\
a,p2,follow,2025-09-24\n";
        let error = InteractionImporter::from_reader(Cursor::new(csv)).expect_err("bad kind");
        match error {
            InteractionImportError::Row { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("follow"));
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_blank_actor() {
        let csv = "actor_id,target_id,kind,occurred_at\n ,p1,like,2025-09-24\n";
        assert!(matches!(
            InteractionImporter::from_reader(Cursor::new(csv)),
            Err(InteractionImportError::Row { line: 2, .. })
        ));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = InteractionImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        assert!(matches!(error, InteractionImportError::Io(_)));
    }
}
