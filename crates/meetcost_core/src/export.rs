//! CSV export of the meeting history.
//!
//! One row per entry in insertion order. Free-text fields are quoted with
//! doubled internal quotes so a name like `Q3 "Sync"` stays one field.

use crate::inputs::format_hms;
use crate::model::meeting::MeetingHistoryEntry;

/// File name offered for the export artifact.
pub const EXPORT_FILE_NAME: &str = "meeting_history.csv";

pub const CSV_HEADER: &str =
    "Name,Date,Cost (EUR),Duration (HH:MM:SS),Rating (1-5),Participants Count";

/// A rendered export, ready to hand to whatever does the writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// Renders `entries` into the export document.
///
/// Costs are rounded to cents, durations rendered as `HH:MM:SS`, dates as
/// `YYYY-MM-DD`. Callers decide what "no entries" means; this renders a
/// header-only document for an empty slice.
pub fn render_csv(entries: &[MeetingHistoryEntry]) -> CsvExport {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for entry in entries {
        lines.push(
            [
                quote_field(&entry.name),
                entry.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", entry.cost),
                format_hms(entry.duration_in_seconds),
                entry.rating.to_string(),
                entry.participants_count.to_string(),
            ]
            .join(","),
        );
    }
    CsvExport {
        file_name: EXPORT_FILE_NAME.to_string(),
        content: lines.join("\n"),
    }
}

/// Wraps a free-text field in quotes, doubling internal quotes.
fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
