use chrono::Datelike;

use crate::model::{Project, RawRow, SourceKind};
use crate::parser::{fields, markup};

const DEFAULT_CATEGORY: &str = "Design";
const DEFAULT_STATUS: &str = "completed";

/// Build a Project from one raw row. `None` when the title is blank.
///
/// `id` is always `index + 1`; whatever id the sheet carries is kept only as
/// `original_id`.
pub fn build(row: &RawRow, index: usize, kind: SourceKind) -> Option<Project> {
    let title = field(row, "title");
    if title.is_empty() {
        return None;
    }

    let description = field(row, "description").to_string();
    let tags = fields::split_list(field(row, "tags"));

    let category = match field(row, "category") {
        "" => tags
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        c => c.to_string(),
    };

    Some(Project {
        id: index as u32 + 1,
        original_id: original_id(row, kind),
        title: title.to_string(),
        description_html: markup::to_html(&description),
        description,
        image: fields::resolve_image_url(field(row, "image")),
        tags,
        detail_images: fields::split_image_list(field(row, "detailImages")),
        long_description: markup::to_html(field(row, "longDescription")),
        year: or_default(field(row, "year"), current_year),
        client: field(row, "client").to_string(),
        duration: field(row, "duration").to_string(),
        team_size: field(row, "teamSize").to_string(),
        role: field(row, "role").to_string(),
        challenge: field(row, "challenge").to_string(),
        solution: field(row, "solution").to_string(),
        results: field(row, "results").to_string(),
        metrics: fields::parse_metrics(field(row, "metrics")),
        category,
        featured: field(row, "featured").eq_ignore_ascii_case("true"),
        status: or_default(field(row, "status"), || DEFAULT_STATUS.to_string()),
        shopify_button: field(row, "shopifyButton").to_string(),
    })
}

/// Trimmed cell, empty when the column is absent.
fn field<'a>(row: &'a RawRow, key: &str) -> &'a str {
    row.get(key).map(|v| v.trim()).unwrap_or("")
}

fn or_default(value: &str, fallback: impl FnOnce() -> String) -> String {
    if value.is_empty() {
        fallback()
    } else {
        value.to_string()
    }
}

fn current_year() -> String {
    chrono::Local::now().year().to_string()
}

/// CSV sheets may carry a `yearid` ahead of `id`; the JSON table only has
/// the positional id cell.
fn original_id(row: &RawRow, kind: SourceKind) -> Option<i64> {
    match kind {
        SourceKind::Csv => leading_int(field(row, "yearid")).or_else(|| leading_int(field(row, "id"))),
        SourceKind::Json => leading_int(field(row, "id")),
    }
}

/// Integer prefix of `s` (`"12abc"` -> 12, `"3.0"` -> 3).
fn leading_int(s: &str) -> Option<i64> {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}
