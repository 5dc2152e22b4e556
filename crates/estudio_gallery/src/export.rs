//! Export of gallery entities as JSON or CSV.

use estudio_core::Character;
use estudio_error::{EstudioResult, StorageError, StorageErrorKind};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Comma-separated values (characters only)
    Csv,
}

/// Pretty-printed JSON of an entity or a collection.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> EstudioResult<String> {
    Ok(serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::new(StorageErrorKind::Export(e.to_string())))?)
}

/// Characters as CSV, one row per character.
pub fn characters_to_csv(characters: &[Character]) -> EstudioResult<String> {
    let rows = characters
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::new(StorageErrorKind::Export(e.to_string())))?;
    Ok(format_as_csv(&rows))
}

/// Format JSON objects as CSV.
///
/// Columns come from the first row's field names. Strings containing a
/// comma, quote or newline are quoted with inner quotes doubled; nested
/// values are written as JSON; nulls are empty.
///
/// # Examples
///
/// ```
/// use estudio_gallery::format_as_csv;
/// use serde_json::json;
///
/// let csv = format_as_csv(&[json!({"name": "Luna", "bio": "Moda, estilo"})]);
/// assert_eq!(csv, "name,bio\nLuna,\"Moda, estilo\"\n");
/// ```
pub fn format_as_csv(rows: &[Value]) -> String {
    let Some(first) = rows.first().and_then(Value::as_object) else {
        return String::new();
    };
    let columns: Vec<&String> = first.keys().collect();

    let mut output = String::new();
    output.push_str(
        &columns
            .iter()
            .map(|column| escape(column))
            .collect::<Vec<_>>()
            .join(","),
    );
    output.push('\n');

    for row in rows.iter().filter_map(Value::as_object) {
        let values: Vec<String> = columns
            .iter()
            .map(|column| match row.get(column.as_str()) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => escape(s),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                Some(nested) => escape(&nested.to_string()),
            })
            .collect();
        output.push_str(&values.join(","));
        output.push('\n');
    }
    output
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write export contents to a caller-chosen path.
#[tracing::instrument(skip(contents), fields(path = %path.display()))]
pub fn write_export(path: &Path, contents: &str) -> EstudioResult<()> {
    std::fs::write(path, contents).map_err(|e| {
        StorageError::new(StorageErrorKind::Export(format!("{}: {}", path.display(), e)))
    })?;
    info!(bytes = contents.len(), "Export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_quotes_and_flattens() {
        let csv = format_as_csv(&[
            json!({"name": "Luna", "quote": "ela disse \"oi\"", "tags": ["a", "b"], "extra": null}),
            json!({"name": "Kai", "quote": "linha1\nlinha2", "tags": [], "extra": 3}),
        ]);
        let lines: Vec<&str> = csv.splitn(2, '\n').collect();
        assert_eq!(lines[0], "name,quote,tags,extra");
        assert!(csv.contains("Luna,\"ela disse \"\"oi\"\"\",\"[\"\"a\"\",\"\"b\"\"]\","));
        assert!(csv.contains("Kai,\"linha1\nlinha2\",[],3"));
    }

    #[test]
    fn test_empty_rows_give_empty_csv() {
        assert_eq!(format_as_csv(&[]), "");
    }
}
