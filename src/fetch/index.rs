//! IETF datatracker index client.
//!
//! Thin typed wrapper over the datatracker's JSON API (`/api/v1/`), used for
//! draft version resolution, keyword search, and working-group membership.
//! Only the fields the catalog services consume are modeled; everything else
//! in the upstream payload is ignored.

use std::sync::Arc;

use serde::Deserialize;

use crate::config::ServerConfig;
use crate::error::{Error, FetchFailure, Result};

use super::client::HttpClient;

/// One page of index results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexPage {
    /// Matching documents.
    #[serde(default)]
    pub objects: Vec<IndexDoc>,
}

/// A document entry as the index reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexDoc {
    /// Canonical document name (`rfc9110`, `draft-ietf-httpbis-http2-17`).
    #[serde(default)]
    pub name: String,
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// Last-update timestamp.
    #[serde(default)]
    pub time: Option<String>,
    /// Intended standards level.
    #[serde(default)]
    pub intended_std_level: Option<String>,
    /// Abstract text.
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Owning group reference.
    #[serde(default)]
    pub group: Option<String>,
    /// Document states; upstream mixes plain strings and `{name: …}` objects.
    #[serde(default)]
    pub states: Vec<serde_json::Value>,
    /// Author entries, when expanded.
    #[serde(default)]
    pub authors: Vec<serde_json::Value>,
}

impl IndexDoc {
    /// Flattens the mixed-shape `states` field into lowercase state names.
    #[must_use]
    pub fn state_names(&self) -> Vec<String> {
        self.states
            .iter()
            .filter_map(|state| match state {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(map) => map
                    .get("name")
                    .and_then(serde_json::Value::as_str)
                    .map(String::from),
                _ => None,
            })
            .collect()
    }

    /// Returns `true` unless any state marks the document inactive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        const INACTIVE: &[&str] = &["expired", "replaced", "withdrawn", "dead"];
        !self.state_names().iter().any(|state| {
            let lower = state.to_lowercase();
            INACTIVE.iter().any(|marker| lower.contains(marker))
        })
    }

    /// Flattens the mixed-shape `authors` field into names.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|author| match author {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(map) => map
                    .get("person")
                    .and_then(|p| p.get("name"))
                    .or_else(|| map.get("name"))
                    .and_then(serde_json::Value::as_str)
                    .map(String::from),
                _ => None,
            })
            .collect()
    }
}

/// A working-group entry from the group index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexGroup {
    /// Full group name.
    #[serde(default)]
    pub name: String,
    /// Group acronym.
    #[serde(default)]
    pub acronym: String,
    /// Charter description.
    #[serde(default)]
    pub description: String,
    /// Group state reference.
    #[serde(default)]
    pub state: Option<String>,
    /// Group type reference.
    #[serde(default, rename = "type")]
    pub group_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GroupPage {
    #[serde(default)]
    objects: Vec<IndexGroup>,
}

/// Client for the datatracker document and group indexes.
pub struct IndexClient {
    http: Arc<dyn HttpClient>,
    base: String,
}

impl IndexClient {
    /// Creates an index client over a shared HTTP client.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, config: &ServerConfig) -> Self {
        Self {
            http,
            base: config.datatracker_base.clone(),
        }
    }

    async fn get_page(&self, query: &[(&str, &str)]) -> Result<IndexPage> {
        let url = format!("{}/api/v1/doc/document/", self.base);
        let response = self.http.get(&url, query).await?;
        if !(200..300).contains(&response.status) {
            return Err(Error::fetch(
                FetchFailure::NetworkFailure,
                format!("document index returned status {}", response.status),
            ));
        }
        serde_json::from_str(&response.body).map_err(|e| Error::Fetch {
            kind: FetchFailure::NetworkFailure,
            message: "document index returned unusable JSON".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Lists draft documents whose name starts with `base_name` (all versions).
    pub async fn drafts_by_prefix(&self, base_name: &str, limit: usize) -> Result<Vec<IndexDoc>> {
        let limit = limit.to_string();
        let page = self
            .get_page(&[
                ("format", "json"),
                ("type", "draft"),
                ("name__startswith", base_name),
                ("limit", &limit),
            ])
            .await?;
        Ok(page.objects)
    }

    /// Keyword search over draft names.
    pub async fn search_drafts_by_name(&self, query: &str, limit: usize) -> Result<Vec<IndexDoc>> {
        let limit = limit.to_string();
        let page = self
            .get_page(&[
                ("format", "json"),
                ("type", "draft"),
                ("name__icontains", query),
                ("limit", &limit),
            ])
            .await?;
        Ok(page.objects)
    }

    /// Keyword search over draft titles.
    pub async fn search_drafts_by_title(&self, query: &str, limit: usize) -> Result<Vec<IndexDoc>> {
        let limit = limit.to_string();
        let page = self
            .get_page(&[
                ("format", "json"),
                ("type", "draft"),
                ("title__icontains", query),
                ("limit", &limit),
            ])
            .await?;
        Ok(page.objects)
    }

    /// Keyword search over RFC titles.
    pub async fn search_rfcs_by_title(&self, query: &str, limit: usize) -> Result<Vec<IndexDoc>> {
        let limit = limit.to_string();
        let page = self
            .get_page(&[
                ("format", "json"),
                ("type", "rfc"),
                ("title__icontains", query),
                ("limit", &limit),
            ])
            .await?;
        Ok(page.objects)
    }

    /// RFCs whose name mentions the given fragment (working-group listing).
    pub async fn rfcs_by_name_fragment(
        &self,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<IndexDoc>> {
        let limit = limit.to_string();
        let page = self
            .get_page(&[
                ("format", "json"),
                ("type", "rfc"),
                ("name__icontains", fragment),
                ("limit", &limit),
            ])
            .await?;
        Ok(page.objects)
    }

    /// Unfiltered recent slice of the index, for local fallback ranking.
    pub async fn recent_documents(&self, doc_type: &str, limit: usize) -> Result<Vec<IndexDoc>> {
        let limit = limit.to_string();
        let page = self
            .get_page(&[("format", "json"), ("type", doc_type), ("limit", &limit)])
            .await?;
        Ok(page.objects)
    }

    /// Exact document lookup by canonical name.
    pub async fn document_by_name(&self, name: &str) -> Result<Option<IndexDoc>> {
        let url = format!("{}/api/v1/doc/document/{name}/", self.base);
        let response = self.http.get(&url, &[("format", "json")]).await?;
        if response.status == 404 {
            return Ok(None);
        }
        if !(200..300).contains(&response.status) {
            return Err(Error::fetch(
                FetchFailure::NetworkFailure,
                format!("document lookup returned status {}", response.status),
            ));
        }
        let doc: IndexDoc = serde_json::from_str(&response.body).map_err(|e| Error::Fetch {
            kind: FetchFailure::NetworkFailure,
            message: "document lookup returned unusable JSON".to_string(),
            source: Some(Box::new(e)),
        })?;
        Ok((!doc.name.is_empty()).then_some(doc))
    }

    /// Working-group metadata lookup by acronym.
    pub async fn group_by_acronym(&self, acronym: &str) -> Result<Option<IndexGroup>> {
        let url = format!("{}/api/v1/group/group/", self.base);
        let response = self
            .http
            .get(&url, &[("format", "json"), ("acronym", acronym)])
            .await?;
        if !(200..300).contains(&response.status) {
            return Err(Error::fetch(
                FetchFailure::NetworkFailure,
                format!("group index returned status {}", response.status),
            ));
        }
        let page: GroupPage = serde_json::from_str(&response.body).map_err(|e| Error::Fetch {
            kind: FetchFailure::NetworkFailure,
            message: "group index returned unusable JSON".to_string(),
            source: Some(Box::new(e)),
        })?;
        Ok(page.objects.into_iter().next())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::client::FakeHttpClient;
    use super::*;
    use crate::config::ServerConfig;

    fn client(fake: FakeHttpClient) -> IndexClient {
        IndexClient::new(Arc::new(fake), &ServerConfig::default())
    }

    #[tokio::test]
    async fn test_page_decoding() {
        let body = r#"{"objects":[{"name":"draft-ietf-quic-http-34","title":"HTTP/3","time":"2021-02-02","intended_std_level":"ps","states":[{"name":"Active"},"wg-doc"]}]}"#;
        let fake = FakeHttpClient::new().route("name__startswith=draft-ietf-quic-http", 200, body);
        let docs = client(fake)
            .drafts_by_prefix("draft-ietf-quic-http", 50)
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "HTTP/3");
        assert_eq!(docs[0].state_names(), vec!["Active", "wg-doc"]);
        assert!(docs[0].is_active());
    }

    #[tokio::test]
    async fn test_inactive_state_detection() {
        let doc = IndexDoc {
            states: vec![serde_json::json!({"name": "Expired"})],
            ..IndexDoc::default()
        };
        assert!(!doc.is_active());

        let doc = IndexDoc {
            states: vec![serde_json::json!("Replaced by rfc9000")],
            ..IndexDoc::default()
        };
        assert!(!doc.is_active());
    }

    #[tokio::test]
    async fn test_author_name_flattening() {
        let doc = IndexDoc {
            authors: vec![
                serde_json::json!({"person": {"name": "M. Belshe"}}),
                serde_json::json!({"name": "R. Peon"}),
                serde_json::json!("M. Thomson"),
            ],
            ..IndexDoc::default()
        };
        assert_eq!(doc.author_names(), vec!["M. Belshe", "R. Peon", "M. Thomson"]);
    }

    #[tokio::test]
    async fn test_unusable_json_is_network_failure() {
        let fake = FakeHttpClient::new().route("/api/v1/doc/document/", 200, "<html>error</html>");
        let err = client(fake)
            .search_rfcs_by_title("http", 10)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "fetch_network_failure");
    }

    #[tokio::test]
    async fn test_exact_lookup_missing_is_none() {
        let fake = FakeHttpClient::new();
        let doc = client(fake)
            .document_by_name("draft-nobody-nothing-00")
            .await
            .unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_group_lookup() {
        let body = r#"{"objects":[{"name":"Web Authorization Protocol","acronym":"oauth","description":"OAuth WG","state":"active","type":"wg"}]}"#;
        let fake = FakeHttpClient::new().route("acronym=oauth", 200, body);
        let group = client(fake).group_by_acronym("oauth").await.unwrap().unwrap();
        assert_eq!(group.name, "Web Authorization Protocol");
        assert_eq!(group.acronym, "oauth");
    }
}
