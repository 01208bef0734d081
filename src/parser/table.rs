use serde_json::Value;

use crate::error::{FeedError, FeedResult};
use crate::model::RawRow;

/// Positional column contract of the JSON table export. The sheet declares no
/// schema, so cell `i` always maps to `JSON_COLUMNS[i]`.
pub const JSON_COLUMNS: [&str; 20] = [
    "id",
    "title",
    "description",
    "image",
    "tags",
    "detailImages",
    "longDescription",
    "year",
    "client",
    "duration",
    "teamSize",
    "role",
    "challenge",
    "solution",
    "results",
    "metrics",
    "category",
    "featured",
    "status",
    "shopifyButton",
];

const TITLE_CELL: usize = 1;

/// Parse CSV text into rows keyed by the header row.
///
/// The quote flag carries across line breaks, so a quoted field may hold
/// literal newlines. Rows whose fields are all empty are dropped, which also
/// drops blank lines and the trailing newline.
pub fn parse_csv(text: &str) -> Vec<RawRow> {
    let records = split_records(text);
    let Some((header, data)) = records.split_first() else {
        return Vec::new();
    };

    data.iter()
        .map(|record| {
            header
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), record.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// Tokenize CSV text into records of trimmed fields.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for line in text.split('\n') {
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes && chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => row.push(std::mem::take(&mut field).trim().to_string()),
                _ => field.push(c),
            }
        }

        if in_quotes {
            field.push('\n');
        } else {
            row.push(std::mem::take(&mut field).trim().to_string());
            push_record(&mut records, std::mem::take(&mut row));
        }
    }

    // Unterminated quote at end of input.
    if !row.is_empty() || !field.is_empty() {
        if !field.is_empty() {
            row.push(field.trim().to_string());
        }
        push_record(&mut records, row);
    }

    records
}

fn push_record(records: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|f| !f.is_empty()) {
        records.push(row);
    }
}

/// Strip the visualization API's JSONP wrapper, leaving the outermost object.
pub fn strip_jsonp(text: &str) -> FeedResult<&str> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&text[s..=e]),
        _ => Err(FeedError::Shape("no json object in response".to_string())),
    }
}

/// Convert a `{table: {rows: [{c: [{v}]}]}}` payload into rows keyed by the
/// positional column contract, each paired with its index in `table.rows`.
/// Rows without a title cell are skipped but still count toward the index.
pub fn parse_json_table(json: &Value) -> FeedResult<Vec<(usize, RawRow)>> {
    let table = json
        .get("table")
        .ok_or_else(|| FeedError::Shape("missing `table`".to_string()))?;
    let rows = table
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| FeedError::Shape("missing `table.rows`".to_string()))?;

    if let Some(cols) = table.get("cols").and_then(Value::as_array) {
        check_width(cols.len())?;
    }

    let mut out = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let Some(cells) = row.get("c").and_then(Value::as_array) else {
            continue;
        };
        check_width(cells.len())?;

        if cell_text(cells, TITLE_CELL).is_none() {
            continue;
        }

        let record: RawRow = JSON_COLUMNS
            .iter()
            .enumerate()
            .filter_map(|(i, name)| cell_text(cells, i).map(|v| (name.to_string(), v)))
            .collect();
        out.push((index, record));
    }

    Ok(out)
}

fn check_width(found: usize) -> FeedResult<()> {
    if found > JSON_COLUMNS.len() {
        return Err(FeedError::ColumnMismatch {
            found,
            expected: JSON_COLUMNS.len(),
        });
    }
    Ok(())
}

/// Cell `v` as text; `None` for a missing, null or empty cell.
fn cell_text(cells: &[Value], index: usize) -> Option<String> {
    let text = match cells.get(index)?.get("v")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
