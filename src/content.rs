use std::collections::BTreeMap;

use serde::Serialize;

use crate::defaults;
use crate::model::RawRow;

/// Flat dotted-key → text mapping for static page copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SiteContent {
    entries: BTreeMap<String, String>,
}

impl SiteContent {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Build from `key,value` rows. Rows with a blank key are skipped.
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let entries = rows
            .iter()
            .filter_map(|row| {
                let key = row.get("key").map(|k| k.trim()).unwrap_or("");
                if key.is_empty() {
                    return None;
                }
                let value = row.get("value").map(|v| v.trim()).unwrap_or("");
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Value for `key`, falling back to the built-in default copy.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .or_else(|| defaults::site_content_value(key))
    }

    /// Values of every `prefix.*` key not in `exclude`, ordered by key. When
    /// the sheet has none, the default copy for that section is used.
    pub fn section(&self, prefix: &str, exclude: &[&str]) -> Vec<String> {
        let own = section_values(self.entries.iter(), prefix, exclude);
        if !own.is_empty() {
            return own;
        }
        let fallback = defaults::site_content();
        section_values(fallback.entries.iter(), prefix, exclude)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn section_values<'a>(
    entries: impl Iterator<Item = (&'a String, &'a String)>,
    prefix: &str,
    exclude: &[&str],
) -> Vec<String> {
    let dotted = format!("{}.", prefix);
    entries
        .filter(|(k, _)| k.starts_with(&dotted) && !exclude.contains(&k.as_str()))
        .map(|(_, v)| v.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLink {
    pub text: String,
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FooterLinks {
    pub work: Vec<FooterLink>,
    pub connect: Vec<FooterLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FooterData {
    pub content: BTreeMap<String, String>,
    pub links: FooterLinks,
}

impl FooterData {
    /// Build from `type,key,value,url,section` rows. `content` rows fill the
    /// text map, `link` rows are filed under their section. Anything else is
    /// ignored.
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let mut footer = FooterData::default();

        for row in rows {
            let get = |k: &str| row.get(k).map(|v| v.trim()).unwrap_or("");
            let (kind, key) = (get("type").to_lowercase(), get("key"));
            if kind.is_empty() || key.is_empty() {
                continue;
            }

            match kind.as_str() {
                "content" => {
                    footer.content.insert(key.to_string(), get("value").to_string());
                }
                "link" => {
                    let link = FooterLink {
                        text: get("value").to_string(),
                        url: get("url").to_string(),
                        key: key.to_string(),
                    };
                    match get("section").to_lowercase().as_str() {
                        "work" => footer.links.work.push(link),
                        "connect" => footer.links.connect.push(link),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        footer
    }

    pub fn cta_disabled(&self) -> bool {
        self.content.get("cta.disabled").is_some_and(|v| v == "true")
    }
}
