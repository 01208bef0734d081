use thiserror::Error;

/// Why a single fallback tier failed. Never escapes the feed loader.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected payload shape: {0}")]
    Shape(String),
    #[error("table has {found} columns, expected at most {expected}")]
    ColumnMismatch { found: usize, expected: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("row builder task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl FeedError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "HTTP",
            Self::Status { .. } => "STATUS",
            Self::Json(_) => "JSON",
            Self::Shape(_) => "SHAPE",
            Self::ColumnMismatch { .. } => "COLUMN_MISMATCH",
            Self::Io(_) => "IO",
            Self::Task(_) => "TASK",
        }
    }
}

pub type FeedResult<T> = Result<T, FeedError>;
