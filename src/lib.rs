//! Content feed for the portfolio site: fetches the project and copy sheets,
//! parses CSV / JSON table exports, and normalizes rows into display-ready
//! records for the rendering layer.

pub mod config;
pub mod content;
pub mod defaults;
pub mod error;
pub mod feed;
pub mod model;
pub mod parser;

pub use config::FeedConfig;
pub use content::{FooterData, SiteContent};
pub use error::FeedError;
pub use feed::{FeedLoader, SiteData};
pub use model::{Metric, Project, RawRow, SourceKind};
