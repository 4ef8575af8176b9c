use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::AppError;
use crate::models::Quote;

/// Separator between tags inside the single `tags` column.
pub const TAG_DELIMITER: &str = "; ";

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 6] = ["id", "text", "author", "tags", "page", "collected_at"];

/// Serialize quotes to CSV, in the order given.
pub fn to_csv(quotes: &[Quote]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_records(&mut writer, quotes)?;
    writer
        .into_inner()
        .map_err(|e| AppError::ExportError(e.to_string()))
}

/// Write quotes as CSV to a file, creating or truncating it.
pub fn write_csv(quotes: &[Quote], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::ExportError(format!("{}: {e}", path.display())))?;
    write_records(&mut writer, quotes)?;
    writer
        .flush()
        .map_err(|e| AppError::ExportError(format!("{}: {e}", path.display())))
}

fn write_records<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    quotes: &[Quote],
) -> Result<(), AppError> {
    let to_export_err = |e: csv::Error| AppError::ExportError(e.to_string());

    writer.write_record(CSV_HEADER).map_err(to_export_err)?;
    for quote in quotes {
        writer
            .write_record([
                quote.id.to_string(),
                quote.text.clone(),
                quote.author.clone(),
                join_tags(&quote.tags),
                quote.page.to_string(),
                quote
                    .collected_at
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ])
            .map_err(to_export_err)?;
    }
    Ok(())
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(TAG_DELIMITER)
}

/// Inverse of [`join_tags`]. An empty field means no tags.
pub fn split_tags(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(TAG_DELIMITER).map(str::to_string).collect()
}

/// Download/file name for an export generated at `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("quotes_export_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
