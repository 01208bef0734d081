use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One parsed spreadsheet row: column name -> cell value.
pub type RawRow = HashMap<String, String>;

/// Which serialization a row came from. Only affects where the source's own
/// id is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Json,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Csv => "csv",
            SourceKind::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub value: String,
    pub label: String,
}

/// Display-ready case study.
///
/// Static fallback files are deserialized straight into this type and may be
/// hand-written, so every field is defaulted and scalars are read loosely:
/// numbers and booleans become text, a string list may be a comma string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "loose::id")]
    pub id: u32,
    #[serde(default, deserialize_with = "loose::int")]
    pub original_id: Option<i64>,
    #[serde(default, deserialize_with = "loose::text")]
    pub title: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub description: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub description_html: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub image: String,
    #[serde(default, deserialize_with = "loose::list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "loose::list")]
    pub detail_images: Vec<String>,
    #[serde(default, deserialize_with = "loose::text")]
    pub long_description: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub year: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub client: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub duration: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub team_size: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub role: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub challenge: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub solution: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub results: String,
    #[serde(default, deserialize_with = "loose::metrics")]
    pub metrics: Vec<Metric>,
    #[serde(default, deserialize_with = "loose::text")]
    pub category: String,
    #[serde(default, deserialize_with = "loose::flag")]
    pub featured: bool,
    #[serde(default, deserialize_with = "loose::text")]
    pub status: String,
    #[serde(default, deserialize_with = "loose::text")]
    pub shopify_button: String,
}

const CARD_SUMMARY_MAX: usize = 150;

impl Project {
    /// Short preview for project cards: first sentence of the description,
    /// with newlines and list markers flattened.
    pub fn card_summary(&self) -> String {
        if self.description.is_empty() {
            return String::new();
        }

        let clean = self
            .description
            .split('\n')
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let clean = strip_list_markers(&clean);
        let clean = clean.trim();

        let first = clean.split('.').next().unwrap_or("");
        if first.chars().count() > CARD_SUMMARY_MAX {
            let cut: String = first.chars().take(CARD_SUMMARY_MAX - 3).collect();
            return format!("{}...", cut);
        }
        if clean.contains('.') {
            format!("{}.", first)
        } else {
            first.to_string()
        }
    }
}

/// Drops every `-`/`*` that is followed by whitespace, along with the
/// whitespace run.
fn strip_list_markers(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if (c == '-' || c == '*') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Tolerant field readers for hand-edited project files. None of them fail:
/// a value of the wrong shape reads as the field's empty value.
mod loose {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Metric;

    fn scalar(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(scalar(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Zero when missing or unusable; the loader assigns a position id then.
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(int(d)?.and_then(|n| u32::try_from(n).ok()).unwrap_or(0))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }

    pub fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(scalar).collect(),
            Value::String(s) => crate::parser::fields::split_list(&s),
            _ => Vec::new(),
        })
    }

    pub fn metrics<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Metric>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| {
                    let mut obj = match item {
                        Value::Object(obj) => obj,
                        _ => return None,
                    };
                    Some(Metric {
                        value: obj.remove("value").and_then(scalar)?,
                        label: obj.remove("label").and_then(scalar)?,
                    })
                })
                .collect(),
            Value::String(s) => crate::parser::fields::parse_metrics(&s),
            _ => Vec::new(),
        })
    }
}
