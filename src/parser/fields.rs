use tracing::{debug, warn};

use crate::model::Metric;

pub const PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/600x400/f8f9fa/495057?text=Add+Image";

const DRIVE_VIEW_URL: &str = "https://drive.google.com/uc?export=view&id=";

/// Turn a share link into a directly loadable image URL.
pub fn resolve_image_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return PLACEHOLDER_IMAGE.to_string();
    }

    if url.contains("drive.google.com") {
        return match drive_file_id(url) {
            Some(id) => format!("{}{}", DRIVE_VIEW_URL, id),
            None => {
                warn!("Could not extract a file id from Drive link {}", url);
                url.to_string()
            }
        };
    }

    if url.contains("photos.google.com") || url.contains("photos.app.goo.gl") {
        warn!("Google Photos links are usually not directly loadable: {}", url);
        return url.to_string();
    }

    if url.contains("dropbox.com") && !url.contains("raw=1") {
        let sep = if url.contains('?') { '&' } else { '?' };
        return format!("{}{}raw=1", url, sep);
    }

    url.to_string()
}

/// File id from `/file/d/{id}/...` or an `id=` query parameter.
fn drive_file_id(url: &str) -> Option<&str> {
    let id = match (url.split_once("/file/d/"), url.split_once("id=")) {
        (Some((_, rest)), _) => rest.split('/').next(),
        (None, Some((_, rest))) => rest.split('&').next(),
        (None, None) => None,
    };
    id.filter(|id| !id.is_empty())
}

/// Comma-split, trimmed, empties dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_image_list(raw: &str) -> Vec<String> {
    split_list(raw)
        .iter()
        .map(|u| resolve_image_url(u))
        .collect()
}

/// Parse `"150% Engagement, 40% Time Saved"` into value/label pairs. Segments
/// without both a value and a label are dropped.
pub fn parse_metrics(raw: &str) -> Vec<Metric> {
    raw.split(',')
        .filter_map(|segment| {
            let mut parts = segment.split_whitespace();
            let value = parts.next()?;
            let label = parts.collect::<Vec<_>>().join(" ");
            if label.is_empty() {
                if !segment.trim().is_empty() {
                    debug!("Dropping metric segment without label: {:?}", segment);
                }
                return None;
            }
            Some(Metric {
                value: value.to_string(),
                label,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_file_path() {
        assert_eq!(
            resolve_image_url("https://drive.google.com/file/d/ABC123/view"),
            "https://drive.google.com/uc?export=view&id=ABC123"
        );
    }

    #[test]
    fn drive_id_param() {
        assert_eq!(
            resolve_image_url("https://drive.google.com/open?id=XYZ&usp=sharing"),
            "https://drive.google.com/uc?export=view&id=XYZ"
        );
    }

    #[test]
    fn drive_without_id_passes_through() {
        let url = "https://drive.google.com/drive/folders";
        assert_eq!(resolve_image_url(url), url);
    }

    #[test]
    fn blank_is_placeholder() {
        assert_eq!(resolve_image_url(""), PLACEHOLDER_IMAGE);
        assert_eq!(resolve_image_url("   "), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn dropbox_gets_raw() {
        assert_eq!(
            resolve_image_url("https://www.dropbox.com/s/abc/img.png"),
            "https://www.dropbox.com/s/abc/img.png?raw=1"
        );
        assert_eq!(
            resolve_image_url("https://www.dropbox.com/s/abc/img.png?dl=0"),
            "https://www.dropbox.com/s/abc/img.png?dl=0&raw=1"
        );
        let already = "https://www.dropbox.com/s/abc/img.png?raw=1";
        assert_eq!(resolve_image_url(already), already);
    }

    #[test]
    fn other_urls_unchanged() {
        let url = "https://i.imgur.com/abc.png";
        assert_eq!(resolve_image_url(url), url);
        let photos = "https://photos.app.goo.gl/xyz";
        assert_eq!(resolve_image_url(photos), photos);
    }

    #[test]
    fn list_split() {
        assert_eq!(split_list(" Audio, ,Hardware ,"), vec!["Audio", "Hardware"]);
        assert!(split_list("").is_empty());
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn image_list_resolves() {
        let imgs = split_image_list("https://drive.google.com/file/d/A1/view, ,https://x.com/b.png");
        assert_eq!(
            imgs,
            vec!["https://drive.google.com/uc?export=view&id=A1", "https://x.com/b.png"]
        );
    }

    #[test]
    fn metrics() {
        let m = parse_metrics("150% Engagement, 40% Time Saved");
        assert_eq!(
            m,
            vec![
                Metric { value: "150%".into(), label: "Engagement".into() },
                Metric { value: "40%".into(), label: "Time Saved".into() },
            ]
        );
    }

    #[test]
    fn metrics_drop_bad_segments() {
        let m = parse_metrics("15, 99.99% Signal Reliability,");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].label, "Signal Reliability");
        assert!(parse_metrics("").is_empty());
    }

    #[test]
    fn metrics_collapse_whitespace_runs() {
        let m = parse_metrics("40%  Time\tSaved");
        assert_eq!(m, vec![Metric { value: "40%".into(), label: "Time Saved".into() }]);
    }
}
