//! Roster dataset loading
//!
//! The roster is a JSON array of Senator records (`senators_metadata.json`).
//! It can be read from disk or fetched over HTTP; both go through
//! [`RosterSource`] so sessions don't care where it lives.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::Senator;

/// Errors that can occur while loading the roster
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dataset request returned status {0}")]
    Status(u16),

    #[error("Dataset is not a valid senator list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dataset contains no senators")]
    Empty,

    #[error("Dataset lists senator {0} more than once")]
    DuplicateId(String),

    #[error("Loading dataset timed out after {0:?}")]
    Timeout(Duration),
}

/// Where the raw roster JSON comes from
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Read the raw JSON document
    async fn fetch(&self) -> Result<String, DatasetError>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

/// Roster stored on the local filesystem
pub struct FileRosterSource {
    path: PathBuf,
}

impl FileRosterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterSource for FileRosterSource {
    async fn fetch(&self) -> Result<String, DatasetError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Roster served over HTTP
pub struct HttpRosterSource {
    url: String,
    client: reqwest::Client,
}

impl HttpRosterSource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RosterSource for HttpRosterSource {
    async fn fetch(&self) -> Result<String, DatasetError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(DatasetError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source from a configured location: URLs go over HTTP, anything else is a path
pub fn source_for(location: &str) -> Box<dyn RosterSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpRosterSource::new(location.to_string()))
    } else {
        Box::new(FileRosterSource::new(location))
    }
}

/// Parse and validate a roster document
pub fn parse_roster(json: &str) -> Result<Vec<Senator>, DatasetError> {
    let roster: Vec<Senator> = serde_json::from_str(json)?;

    if roster.is_empty() {
        return Err(DatasetError::Empty);
    }

    let mut ids = HashSet::with_capacity(roster.len());
    for senator in &roster {
        if !ids.insert(senator.id.as_str()) {
            return Err(DatasetError::DuplicateId(senator.id.clone()));
        }
    }

    Ok(roster)
}

/// Fetch and parse the roster, giving up after `timeout`
pub async fn load_roster(
    source: &dyn RosterSource,
    timeout: Duration,
) -> Result<Vec<Senator>, DatasetError> {
    let start = std::time::Instant::now();

    let json = tokio::time::timeout(timeout, source.fetch())
        .await
        .map_err(|_| DatasetError::Timeout(timeout))??;
    let roster = parse_roster(&json)?;

    tracing::info!(
        "Loaded {} senators from {} in {}ms",
        roster.len(),
        source.location(),
        start.elapsed().as_millis()
    );
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Party;
    use std::io::Write;

    const ROSTER: &str = r#"[
        {"bioguide_id": "S000033", "name": "Bernard Sanders", "first_name": "Bernard",
         "last_name": "Sanders", "state": "VT", "party": "Independent", "image_file": "S000033.jpg"},
        {"bioguide_id": "C001098", "name": "Ted Cruz", "first_name": "Ted",
         "last_name": "Cruz", "state": "TX", "party": "Republican", "image_file": "C001098.jpg"}
    ]"#;

    struct SlowSource;

    #[async_trait]
    impl RosterSource for SlowSource {
        async fn fetch(&self) -> Result<String, DatasetError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ROSTER.to_string())
        }

        fn location(&self) -> String {
            "slow".to_string()
        }
    }

    #[test]
    fn test_parse_roster() {
        let roster = parse_roster(ROSTER).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].party, Party::Independent);
        assert_eq!(roster[1].state, "TX");
    }

    #[test]
    fn test_parse_rejects_empty_roster() {
        assert!(matches!(parse_roster("[]"), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_roster("{\"not\": \"a list\"}"),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let json = r#"[
            {"bioguide_id": "A1", "name": "A", "first_name": "A", "last_name": "A",
             "state": "AK", "party": "Democrat", "image_file": "A1.jpg"},
            {"bioguide_id": "A1", "name": "B", "first_name": "B", "last_name": "B",
             "state": "AL", "party": "Republican", "image_file": "B.jpg"}
        ]"#;
        assert!(matches!(
            parse_roster(json),
            Err(DatasetError::DuplicateId(id)) if id == "A1"
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROSTER.as_bytes()).unwrap();

        let source = FileRosterSource::new(file.path());
        let roster = load_roster(&source, Duration::from_secs(5)).await.unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileRosterSource::new(dir.path().join("missing.json"));

        let result = load_roster(&source, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_times_out() {
        let result = load_roster(&SlowSource, Duration::from_secs(2)).await;
        assert!(matches!(result, Err(DatasetError::Timeout(d)) if d == Duration::from_secs(2)));
    }

    /// Serve the roster at `/senators.json` and a 404 at `/gone.json`
    async fn spawn_roster_server() -> std::net::SocketAddr {
        use axum::{http::StatusCode, routing::get, Router};

        let app = Router::new()
            .route("/senators.json", get(|| async { ROSTER }))
            .route("/gone.json", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let addr = spawn_roster_server().await;

        let source = source_for(&format!("http://{}/senators.json", addr));
        let roster = load_roster(source.as_ref(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].id, "C001098");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let addr = spawn_roster_server().await;

        let source = HttpRosterSource::new(format!("http://{}/gone.json", addr));
        let result = load_roster(&source, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(DatasetError::Status(404))));
    }

    #[test]
    fn test_source_for_picks_transport() {
        assert_eq!(
            source_for("https://senatordle.com/senators_metadata.json").location(),
            "https://senatordle.com/senators_metadata.json"
        );
        assert_eq!(
            source_for("static/senators_metadata.json").location(),
            "static/senators_metadata.json"
        );
    }
}
