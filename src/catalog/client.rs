//! Open Library client. Every operation is read-only and degrades on
//! failure: transport errors and bad statuses are logged, then surfaced as
//! "no results" or "no details" so the UI never has to branch on catalog
//! errors.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{BookRecord, WorkDetails};

/// Search endpoint; the query text travels in the `q` parameter.
const SEARCH_URL: &str = "https://openlibrary.org/search.json";
/// Per-work detail endpoint; the work id is appended as `{olid}.json`.
const WORKS_URL: &str = "https://openlibrary.org/works";
/// Base for cover images derived from numeric cover ids.
const COVER_URL: &str = "https://covers.openlibrary.org/b/id";
/// Placeholder shown when the catalog has no cover for a work.
const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/128x192?text=No+Cover";
/// Upper bound on search results surfaced to the UI.
const MAX_RESULTS: usize = 20;
/// How long to wait on the catalog before giving up. A hung request must not
/// wedge the worker thread forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures that can occur while talking to the catalog. These never escape
/// the client: both operations log them and degrade.
#[derive(Debug, Error)]
enum CatalogError {
    #[error("catalog request failed")]
    Transport(#[from] reqwest::Error),
    #[error("catalog request returned status {0}")]
    Status(StatusCode),
}

/// Shape of the search endpoint's response body. Only the fields we
/// normalize are declared; everything else is ignored.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchDoc {
    key: String,
    title: Option<String>,
    author_name: Option<Vec<String>>,
    cover_i: Option<i64>,
    first_publish_year: Option<i64>,
    subject: Option<Vec<String>>,
}

/// Shape of the per-work detail response body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkResponse {
    title: Option<String>,
    description: Option<Description>,
    subjects: Option<Vec<String>>,
    covers: Option<Vec<i64>>,
}

/// Work descriptions arrive either as a bare string or wrapped in a
/// `{"value": ...}` object depending on how the record was edited upstream.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(String),
    Wrapped { value: String },
}

impl Description {
    fn into_text(self) -> String {
        match self {
            Description::Text(text) => text,
            Description::Wrapped { value } => value,
        }
    }
}

/// Blocking HTTP client for the catalog. Lives on the worker thread; the UI
/// never calls it directly.
pub struct CatalogClient {
    http: Client,
}

impl CatalogClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http })
    }

    /// Search the catalog for free text. A blank query never hits the
    /// network; any failure is logged and comes back as "no results". At
    /// most twenty normalized records are returned.
    pub fn search(&self, query: &str) -> Vec<BookRecord> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.fetch_search(query) {
            Ok(response) => normalize_results(response),
            Err(err) => {
                warn!(query, error = %err, "catalog search failed");
                Vec::new()
            }
        }
    }

    /// Fetch expanded details for a work. Absent on any failure, which the
    /// modal renders as a retryable error body.
    pub fn get_details(&self, olid: &str) -> Option<WorkDetails> {
        match self.fetch_details(olid) {
            Ok(work) => Some(normalize_details(work)),
            Err(err) => {
                warn!(olid, error = %err, "catalog detail fetch failed");
                None
            }
        }
    }

    fn fetch_search(&self, query: &str) -> Result<SearchResponse, CatalogError> {
        let response = self.http.get(SEARCH_URL).query(&[("q", query)]).send()?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }
        Ok(response.json()?)
    }

    fn fetch_details(&self, olid: &str) -> Result<WorkResponse, CatalogError> {
        let url = format!("{WORKS_URL}/{olid}.json");
        let response = self.http.get(&url).send()?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }
        Ok(response.json()?)
    }
}

fn cover_url(cover_id: i64, size: char) -> String {
    format!("{COVER_URL}/{cover_id}-{size}.jpg")
}

/// Cap and normalize a search response. Separated from the HTTP call so the
/// fallback rules can be tested against canned payloads.
fn normalize_results(response: SearchResponse) -> Vec<BookRecord> {
    response
        .docs
        .into_iter()
        .take(MAX_RESULTS)
        .map(normalize_doc)
        .collect()
}

/// Turn one raw search doc into a display-ready record. Every optional
/// upstream field gets a documented fallback value. An author or subject
/// list that is present but empty counts as missing too, so the record shows
/// the fallback text instead of a blank field.
fn normalize_doc(doc: SearchDoc) -> BookRecord {
    let olid = doc.key.trim_start_matches("/works/").to_string();
    BookRecord {
        olid,
        id: doc.key,
        title: doc.title.unwrap_or_else(|| "Unknown Title".to_string()),
        authors: doc
            .author_name
            .filter(|names| !names.is_empty())
            .map(|names| names.join(", "))
            .unwrap_or_else(|| "Unknown Author".to_string()),
        description: "Click for more details".to_string(),
        cover_image: doc
            .cover_i
            .map(|id| cover_url(id, 'M'))
            .unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
        published_date: doc
            .first_publish_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "Unknown date".to_string()),
        subject: doc
            .subject
            .filter(|subjects| !subjects.is_empty())
            .map(|subjects| {
                subjects
                    .into_iter()
                    .take(3)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|| "Not specified".to_string()),
        status: None,
    }
}

/// Fill in fallbacks for a work's detail page. As in [`normalize_doc`], an
/// empty subject list is treated the same as a missing one.
fn normalize_details(work: WorkResponse) -> WorkDetails {
    WorkDetails {
        title: work.title.unwrap_or_else(|| "Unknown Title".to_string()),
        description: work
            .description
            .map(Description::into_text)
            .unwrap_or_else(|| "No description available".to_string()),
        subjects: work
            .subjects
            .filter(|subjects| !subjects.is_empty())
            .map(|subjects| subjects.join(", "))
            .unwrap_or_else(|| "Not specified".to_string()),
        cover_image: work
            .covers
            .and_then(|covers| covers.into_iter().next())
            .map(|id| cover_url(id, 'L'))
            .unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_query_short_circuits_without_network() {
        let client = CatalogClient::new().unwrap();
        assert!(client.search("").is_empty());
        assert!(client.search("   \t ").is_empty());
    }

    #[test]
    fn normalizes_fully_populated_doc() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"docs":[{
                "key":"/works/OL123W",
                "title":"Dune",
                "author_name":["Frank Herbert","Someone Else"],
                "cover_i":99,
                "first_publish_year":1965,
                "subject":["Science fiction","Deserts","Politics","Extra"]
            }]}"#,
        )
        .unwrap();

        let records = normalize_results(response);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "/works/OL123W");
        assert_eq!(record.olid, "OL123W");
        assert_eq!(record.title, "Dune");
        assert_eq!(record.authors, "Frank Herbert, Someone Else");
        assert_eq!(record.description, "Click for more details");
        assert_eq!(
            record.cover_image,
            "https://covers.openlibrary.org/b/id/99-M.jpg"
        );
        assert_eq!(record.published_date, "1965");
        // Only the first three subjects survive.
        assert_eq!(record.subject, "Science fiction, Deserts, Politics");
        assert_eq!(record.status, None);
    }

    #[test]
    fn normalizes_sparse_doc_with_fallbacks() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"docs":[{"key":"/works/OL9W"}]}"#).unwrap();

        let record = &normalize_results(response)[0];
        assert_eq!(record.title, "Unknown Title");
        assert_eq!(record.authors, "Unknown Author");
        assert_eq!(record.cover_image, PLACEHOLDER_COVER);
        assert_eq!(record.published_date, "Unknown date");
        assert_eq!(record.subject, "Not specified");
    }

    #[test]
    fn empty_author_and_subject_lists_use_fallbacks() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"docs":[{"key":"/works/OL9W","author_name":[],"subject":[]}]}"#,
        )
        .unwrap();

        let record = &normalize_results(response)[0];
        assert_eq!(record.authors, "Unknown Author");
        assert_eq!(record.subject, "Not specified");

        let work: WorkResponse = serde_json::from_str(r#"{"subjects":[]}"#).unwrap();
        assert_eq!(normalize_details(work).subjects, "Not specified");
    }

    #[test]
    fn caps_results_at_twenty() {
        let docs: Vec<String> = (0..30)
            .map(|i| format!(r#"{{"key":"/works/OL{i}W"}}"#))
            .collect();
        let body = format!(r#"{{"docs":[{}]}}"#, docs.join(","));
        let response: SearchResponse = serde_json::from_str(&body).unwrap();

        assert_eq!(normalize_results(response).len(), 20);
    }

    #[test]
    fn missing_docs_array_is_no_results() {
        let response: SearchResponse = serde_json::from_str(r#"{"numFound":0}"#).unwrap();
        assert!(normalize_results(response).is_empty());
    }

    #[test]
    fn detail_description_as_bare_string() {
        let work: WorkResponse = serde_json::from_str(
            r#"{"title":"Dune","description":"A desert planet.","subjects":["SF"],"covers":[7,8]}"#,
        )
        .unwrap();

        let details = normalize_details(work);
        assert_eq!(details.description, "A desert planet.");
        assert_eq!(details.subjects, "SF");
        assert_eq!(
            details.cover_image,
            "https://covers.openlibrary.org/b/id/7-L.jpg"
        );
    }

    #[test]
    fn detail_description_as_value_object() {
        let work: WorkResponse = serde_json::from_str(
            r#"{"title":"Dune","description":{"value":"Wrapped text."}}"#,
        )
        .unwrap();

        let details = normalize_details(work);
        assert_eq!(details.description, "Wrapped text.");
        assert_eq!(details.subjects, "Not specified");
        assert_eq!(details.cover_image, PLACEHOLDER_COVER);
    }

    #[test]
    fn detail_fallbacks_for_empty_work() {
        let details = normalize_details(WorkResponse::default());
        assert_eq!(details.title, "Unknown Title");
        assert_eq!(details.description, "No description available");
        assert_eq!(details.subjects, "Not specified");
        assert_eq!(details.cover_image, PLACEHOLDER_COVER);
    }
}
