use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{ExportFormat, FeedConfig};
use crate::content::{FooterData, SiteContent};
use crate::defaults;
use crate::error::{FeedError, FeedResult};
use crate::model::{Project, SourceKind};
use crate::parser::{self, table};

/// Everything the site needs, loaded in one go.
#[derive(Debug)]
pub struct SiteData {
    pub projects: Vec<Project>,
    pub content: SiteContent,
    pub footer: FooterData,
}

/// Fetches the spreadsheet feeds, falling back tier by tier. Loads never
/// fail: the last tier is always a built-in default.
pub struct FeedLoader {
    client: reqwest::Client,
    config: FeedConfig,
}

impl FeedLoader {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Project chain: remote JSON → remote CSV → static file → defaults.
    pub async fn load_projects(&self) -> Vec<Project> {
        match self.projects_from_json().await {
            Ok(projects) => {
                info!(count = projects.len(), "Projects loaded from sheet (json)");
                return projects;
            }
            Err(e) => warn!(tier = "json", code = e.code(), "Project feed failed: {}", e),
        }

        match self.projects_from_csv().await {
            Ok(projects) => {
                info!(count = projects.len(), "Projects loaded from sheet (csv)");
                return projects;
            }
            Err(e) => warn!(tier = "csv", code = e.code(), "Project feed failed: {}", e),
        }

        match read_static_projects(&self.config.static_projects).await {
            Ok(projects) => {
                info!(
                    count = projects.len(),
                    path = %self.config.static_projects.display(),
                    "Projects loaded from static file"
                );
                return projects;
            }
            Err(e) => warn!(tier = "static", code = e.code(), "Project feed failed: {}", e),
        }

        warn!("All project tiers failed, using built-in projects");
        defaults::projects()
    }

    /// Content chain: remote CSV → defaults.
    pub async fn load_site_content(&self) -> SiteContent {
        let url = self
            .config
            .export_url(&self.config.content_sheet, ExportFormat::Csv);
        match self.fetch_text(&url).await {
            Ok(text) => {
                let content = SiteContent::from_rows(&table::parse_csv(&text));
                info!(keys = content.len(), "Site content loaded from sheet");
                content
            }
            Err(e) => {
                warn!(code = e.code(), "Site content feed failed, using defaults: {}", e);
                defaults::site_content()
            }
        }
    }

    /// Footer chain: remote CSV → defaults.
    pub async fn load_footer(&self) -> FooterData {
        let url = self
            .config
            .export_url(&self.config.footer_sheet, ExportFormat::Csv);
        match self.fetch_text(&url).await {
            Ok(text) => {
                let footer = FooterData::from_rows(&table::parse_csv(&text));
                info!(
                    content = footer.content.len(),
                    links = footer.links.work.len() + footer.links.connect.len(),
                    "Footer loaded from sheet"
                );
                footer
            }
            Err(e) => {
                warn!(code = e.code(), "Footer feed failed, using defaults: {}", e);
                defaults::footer()
            }
        }
    }

    /// Run all three chains side by side.
    pub async fn load_all(&self) -> SiteData {
        let (projects, content, footer) = tokio::join!(
            self.load_projects(),
            self.load_site_content(),
            self.load_footer()
        );
        SiteData {
            projects,
            content,
            footer,
        }
    }

    async fn projects_from_json(&self) -> FeedResult<Vec<Project>> {
        let url = self
            .config
            .export_url(&self.config.projects_sheet, ExportFormat::Json);
        let text = self.fetch_text(&url).await?;
        let json: serde_json::Value = serde_json::from_str(table::strip_jsonp(&text)?)?;
        let rows = table::parse_json_table(&json)?;
        let projects =
            tokio::task::spawn_blocking(move || parser::build_positioned(&rows, SourceKind::Json))
                .await?;
        Ok(projects)
    }

    async fn projects_from_csv(&self) -> FeedResult<Vec<Project>> {
        let url = self
            .config
            .export_url(&self.config.projects_sheet, ExportFormat::Csv);
        let text = self.fetch_text(&url).await?;
        let projects = tokio::task::spawn_blocking(move || {
            parser::build_projects(&table::parse_csv(&text), SourceKind::Csv)
        })
        .await?;
        Ok(projects)
    }

    async fn fetch_text(&self, url: &str) -> FeedResult<String> {
        info!("Fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Static fallback file, taken as-is with no normalization. Entries are read
/// loosely; one that is not an object is skipped, and a missing id becomes
/// the entry's position.
async fn read_static_projects(path: &Path) -> FeedResult<Vec<Project>> {
    let text = tokio::fs::read_to_string(path).await?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&text)?;

    let projects = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<Project>(entry) {
            Ok(mut project) => {
                if project.id == 0 {
                    project.id = i as u32 + 1;
                }
                Some(project)
            }
            Err(e) => {
                warn!(entry = i, "Skipping static project entry: {}", e);
                None
            }
        })
        .collect();
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GVIZ_PATH: &str = "/spreadsheets/d/test-sheet/gviz/tq";

    fn config_for(server: &MockServer) -> FeedConfig {
        FeedConfig {
            base_url: server.uri(),
            sheet_id: "test-sheet".to_string(),
            static_projects: "tests/fixtures/does_not_exist.json".into(),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    async fn mount(server: &MockServer, format: &str, sheet: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(GVIZ_PATH))
            .and(query_param("tqx", format!("out:{}", format)))
            .and(query_param("sheet", sheet))
            .respond_with(response)
            .mount(server)
            .await;
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
    }

    #[tokio::test]
    async fn json_tier_wins() {
        let server = MockServer::start().await;
        mount(&server, "json", "Sheet1", ResponseTemplate::new(200).set_body_string(fixture("projects_gviz.txt"))).await;

        let loader = FeedLoader::new(config_for(&server)).unwrap();
        let projects = loader.load_projects().await;
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Trail Mounts");
        assert_eq!(projects[0].image, "https://drive.google.com/uc?export=view&id=XYZ");
    }

    #[tokio::test]
    async fn malformed_json_falls_back_to_csv() {
        let server = MockServer::start().await;
        mount(&server, "json", "Sheet1", ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;
        mount(&server, "csv", "Sheet1", ResponseTemplate::new(200).set_body_string(fixture("projects.csv"))).await;

        let loader = FeedLoader::new(config_for(&server)).unwrap();
        let projects = loader.load_projects().await;
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Trail Mounts", "Modular Lamp"]);
    }

    #[tokio::test]
    async fn too_wide_json_table_falls_back_to_csv() {
        let server = MockServer::start().await;
        let cells: Vec<_> = (0..21).map(|i| serde_json::json!({"v": format!("c{}", i)})).collect();
        let body = serde_json::json!({"table": {"rows": [{"c": cells}]}}).to_string();
        mount(&server, "json", "Sheet1", ResponseTemplate::new(200).set_body_string(body)).await;
        mount(&server, "csv", "Sheet1", ResponseTemplate::new(200).set_body_string("title\nFrom CSV\n")).await;

        let loader = FeedLoader::new(config_for(&server)).unwrap();
        let projects = loader.load_projects().await;
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "From CSV");
    }

    #[tokio::test]
    async fn static_file_tier() {
        let server = MockServer::start().await;
        mount(&server, "json", "Sheet1", ResponseTemplate::new(500)).await;
        mount(&server, "csv", "Sheet1", ResponseTemplate::new(404)).await;

        let cfg = FeedConfig {
            static_projects: "tests/fixtures/static_projects.json".into(),
            ..config_for(&server)
        };
        let loader = FeedLoader::new(cfg).unwrap();
        let projects = loader.load_projects().await;
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Static Shelf");
        // Used verbatim: no placeholder image, no markup conversion.
        assert_eq!(projects[0].image, "");
        assert_eq!(projects[0].description_html, "");
    }

    #[tokio::test]
    async fn static_file_with_loose_fields() {
        let server = MockServer::start().await;
        mount(&server, "json", "Sheet1", ResponseTemplate::new(500)).await;
        mount(&server, "csv", "Sheet1", ResponseTemplate::new(500)).await;

        let cfg = FeedConfig {
            static_projects: "tests/fixtures/static_projects_loose.json".into(),
            ..config_for(&server)
        };
        let loader = FeedLoader::new(cfg).unwrap();
        let projects = loader.load_projects().await;
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Shelf", "Bench"]);
        assert_eq!(projects[0].year, "2022");
        assert_eq!(projects[0].id, 1);
        assert_eq!(projects[1].id, 3);
    }

    #[tokio::test]
    async fn slow_json_tier_times_out_to_csv() {
        let server = MockServer::start().await;
        mount(
            &server,
            "json",
            "Sheet1",
            ResponseTemplate::new(200)
                .set_body_string(fixture("projects_gviz.txt"))
                .set_delay(Duration::from_secs(3)),
        )
        .await;
        mount(&server, "csv", "Sheet1", ResponseTemplate::new(200).set_body_string(fixture("projects.csv"))).await;

        let cfg = FeedConfig {
            timeout_secs: 1,
            ..config_for(&server)
        };
        let loader = FeedLoader::new(cfg).unwrap();
        let projects = loader.load_projects().await;
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Trail Mounts", "Modular Lamp"]);
    }

    #[tokio::test]
    async fn all_tiers_fail_returns_defaults() {
        let server = MockServer::start().await;
        mount(&server, "json", "Sheet1", ResponseTemplate::new(503)).await;
        mount(&server, "csv", "Sheet1", ResponseTemplate::new(503)).await;

        let loader = FeedLoader::new(config_for(&server)).unwrap();
        assert_eq!(loader.load_projects().await, defaults::projects());
    }

    #[tokio::test]
    async fn unreachable_host_returns_defaults() {
        let cfg = FeedConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            static_projects: "tests/fixtures/does_not_exist.json".into(),
            timeout_secs: 1,
            ..Default::default()
        };
        let loader = FeedLoader::new(cfg).unwrap();
        assert_eq!(loader.load_projects().await, defaults::projects());
        assert_eq!(loader.load_site_content().await, defaults::site_content());
        assert_eq!(loader.load_footer().await, defaults::footer());
    }

    #[tokio::test]
    async fn site_content_from_sheet() {
        let server = MockServer::start().await;
        let csv = "key,value\nhero.title,\"Objects, interfaces\"\nabout.paragraph1,First\n";
        mount(&server, "csv", "Content", ResponseTemplate::new(200).set_body_string(csv)).await;

        let loader = FeedLoader::new(config_for(&server)).unwrap();
        let content = loader.load_site_content().await;
        assert_eq!(content.len(), 2);
        assert_eq!(content.get("hero.title"), Some("Objects, interfaces"));
        assert_eq!(content.get("nav.work"), Some("Work"));
    }

    #[tokio::test]
    async fn site_content_failure_uses_defaults() {
        let server = MockServer::start().await;
        mount(&server, "csv", "Content", ResponseTemplate::new(403)).await;

        let loader = FeedLoader::new(config_for(&server)).unwrap();
        assert_eq!(loader.load_site_content().await, defaults::site_content());
    }

    #[tokio::test]
    async fn load_all_runs_every_chain() {
        let server = MockServer::start().await;
        mount(&server, "json", "Sheet1", ResponseTemplate::new(200).set_body_string(fixture("projects_gviz.txt"))).await;
        mount(&server, "csv", "Content", ResponseTemplate::new(200).set_body_string("key,value\nhero.title,Hi\n")).await;
        mount(
            &server,
            "csv",
            "Footer",
            ResponseTemplate::new(200).set_body_string("type,key,value,url,section\nlink,gh,GitHub,https://github.com/x,connect\n"),
        )
        .await;

        let loader = FeedLoader::new(config_for(&server)).unwrap();
        let data = loader.load_all().await;
        assert_eq!(data.projects.len(), 2);
        assert_eq!(data.content.get("hero.title"), Some("Hi"));
        assert_eq!(data.footer.links.connect.len(), 1);
        assert!(data.footer.links.work.is_empty());
    }
}
