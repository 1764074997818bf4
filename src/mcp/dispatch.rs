//! Operation dispatch.
//!
//! The dispatcher owns the three catalog services and maps operation names
//! to them. It is transport-agnostic: the MCP server hands it an operation
//! name plus raw JSON arguments and gets back a JSON payload or a taxonomy
//! error. Argument normalization accepts both the flat parameter object and
//! the same fields wrapped under a single named key.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::DocumentCache;
use crate::catalog::{DraftCatalog, RfcCatalog, SpecCatalog};
use crate::config::ServerConfig;
use crate::document::DocFormat;
use crate::error::{Error, Result};
use crate::fetch::index::IndexClient;
use crate::fetch::{Fetcher, HttpClient, ReqwestClient};

use super::params::{
    GetInternetDraftParams, GetInternetDraftSectionParams, GetRfcParams, GetRfcSectionParams,
    GetSpecParams, GetSpecSectionParams, GetWorkingGroupDocumentsParams, SearchInternetDraftsParams,
    SearchRfcsParams, SearchSpecsParams,
};

/// One entry of the fixed operation catalog.
pub struct Operation {
    /// Operation name, as exposed over MCP `tools/list`.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema generator for the parameter object.
    pub schema: fn() -> Value,
}

fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| Value::Object(Default::default()))
}

/// The fixed, enumerable operation catalog.
#[must_use]
pub fn operations() -> Vec<Operation> {
    vec![
        Operation {
            name: "get_rfc",
            description: "Fetch an RFC by number. Returns metadata, a section tree, and the \
                          full text, or a projection of those per the format parameter.",
            schema: schema_of::<GetRfcParams>,
        },
        Operation {
            name: "search_rfcs",
            description: "Search RFCs by keyword against titles.",
            schema: schema_of::<SearchRfcsParams>,
        },
        Operation {
            name: "get_rfc_section",
            description: "Extract one section of an RFC by title or numeric label.",
            schema: schema_of::<GetRfcSectionParams>,
        },
        Operation {
            name: "get_internet_draft",
            description: "Fetch an Internet Draft by name. A versionless name resolves to the \
                          latest version first.",
            schema: schema_of::<GetInternetDraftParams>,
        },
        Operation {
            name: "search_internet_drafts",
            description: "Search Internet Drafts by keyword. A full draft name is looked up \
                          exactly before the general search.",
            schema: schema_of::<SearchInternetDraftsParams>,
        },
        Operation {
            name: "get_internet_draft_section",
            description: "Extract one section of an Internet Draft by title or numeric label.",
            schema: schema_of::<GetInternetDraftSectionParams>,
        },
        Operation {
            name: "get_working_group_documents",
            description: "List an IETF working group's RFCs and active Internet Drafts with \
                          group metadata and summary counts.",
            schema: schema_of::<GetWorkingGroupDocumentsParams>,
        },
        Operation {
            name: "get_spec",
            description: "Fetch a foundation specification (OpenID, W3C, OASIS) from the \
                          built-in catalog by key or alias.",
            schema: schema_of::<GetSpecParams>,
        },
        Operation {
            name: "search_specs",
            description: "Search the built-in foundation specification catalog by keyword.",
            schema: schema_of::<SearchSpecsParams>,
        },
        Operation {
            name: "get_spec_section",
            description: "Extract one section of a foundation specification by title or label.",
            schema: schema_of::<GetSpecSectionParams>,
        },
    ]
}

/// Unwraps the single-key parameter envelope, if present.
///
/// Both `{"number": "2616"}` and `{"params": {"number": "2616"}}` are
/// accepted for every operation; an object with exactly one key whose value
/// is itself an object is treated as wrapped. Pure function, applied before
/// schema validation.
#[must_use]
pub fn normalize_args(raw: Value) -> Value {
    if let Value::Object(map) = &raw
        && map.len() == 1
        && let Some(inner) = map.values().next()
        && inner.is_object()
    {
        return inner.clone();
    }
    raw
}

fn parse_params<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| Error::Validation(format!("invalid parameters: {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Parse(format!("failed to encode result: {e}")))
}

/// Routes operation calls to the catalog services.
pub struct Dispatcher {
    rfc: RfcCatalog,
    draft: DraftCatalog,
    spec: SpecCatalog,
}

impl Dispatcher {
    /// Creates a dispatcher with the production HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot initialize.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(&config)?);
        Ok(Self::with_http(http, config))
    }

    /// Creates a dispatcher over an injected HTTP client. All catalog
    /// services share one cache and one fetcher.
    #[must_use]
    pub fn with_http(http: Arc<dyn HttpClient>, config: ServerConfig) -> Self {
        let cache = Arc::new(DocumentCache::new(&config));
        let fetcher = Arc::new(Fetcher::new(http.clone(), config.clone()));
        let index = Arc::new(IndexClient::new(http, &config));
        Self {
            rfc: RfcCatalog::new(cache.clone(), fetcher.clone(), index.clone(), config.clone()),
            draft: DraftCatalog::new(cache.clone(), fetcher.clone(), index, config),
            spec: SpecCatalog::new(cache, fetcher),
        }
    }

    /// Dispatches one operation call.
    ///
    /// # Errors
    ///
    /// [`Error::MethodNotFound`] for an unknown operation name,
    /// [`Error::Validation`] for arguments that fail the schema, and the
    /// catalog taxonomy for everything downstream.
    pub async fn dispatch(&self, method: &str, args: Value) -> Result<Value> {
        let args = normalize_args(args);
        match method {
            "get_rfc" => {
                let p: GetRfcParams = parse_params(args)?;
                let format = DocFormat::parse(&p.format)?;
                let doc = self.rfc.get(&p.number).await?;
                to_json(&doc.view(format))
            }
            "search_rfcs" => {
                let p: SearchRfcsParams = parse_params(args)?;
                to_json(&self.rfc.search(&p.query, p.limit).await?)
            }
            "get_rfc_section" => {
                let p: GetRfcSectionParams = parse_params(args)?;
                to_json(&self.rfc.section(&p.number, &p.section).await?)
            }
            "get_internet_draft" => {
                let p: GetInternetDraftParams = parse_params(args)?;
                let format = DocFormat::parse(&p.format)?;
                let doc = self.draft.get(&p.name).await?;
                to_json(&doc.view(format))
            }
            "search_internet_drafts" => {
                let p: SearchInternetDraftsParams = parse_params(args)?;
                to_json(&self.draft.search(&p.query, p.limit).await?)
            }
            "get_internet_draft_section" => {
                let p: GetInternetDraftSectionParams = parse_params(args)?;
                to_json(&self.draft.section(&p.name, &p.section).await?)
            }
            "get_working_group_documents" => {
                let p: GetWorkingGroupDocumentsParams = parse_params(args)?;
                to_json(
                    &self
                        .draft
                        .working_group(&p.working_group, p.include_rfcs, p.include_drafts, p.limit)
                        .await?,
                )
            }
            "get_spec" => {
                let p: GetSpecParams = parse_params(args)?;
                let format = DocFormat::parse(&p.format)?;
                let doc = self.spec.get(&p.name).await?;
                to_json(&doc.view(format))
            }
            "search_specs" => {
                let p: SearchSpecsParams = parse_params(args)?;
                to_json(&self.spec.search(&p.query, p.limit)?)
            }
            "get_spec_section" => {
                let p: GetSpecSectionParams = parse_params(args)?;
                to_json(&self.spec.section(&p.name, &p.section).await?)
            }
            other => Err(Error::MethodNotFound(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fetch::client::FakeHttpClient;
    use serde_json::json;

    const RFC_TEXT: &str = "\
Network Working Group                                          A. Author
Request for Comments: 2616
Category: Standards Track
                                                               June 1999

                 Hypertext Transfer Protocol -- HTTP/1.1

Abstract

   The abstract.

1.  Introduction

   Intro body.
";

    fn dispatcher(fake: FakeHttpClient) -> Dispatcher {
        Dispatcher::with_http(Arc::new(fake), ServerConfig::default())
    }

    #[test]
    fn test_operation_catalog_is_complete() {
        let ops = operations();
        assert_eq!(ops.len(), 10);
        let get_rfc = ops.iter().find(|op| op.name == "get_rfc").unwrap();
        let schema = (get_rfc.schema)();
        assert_eq!(schema["properties"]["number"]["type"], "string");
        assert!(
            schema["required"]
                .as_array()
                .unwrap()
                .contains(&json!("number"))
        );
    }

    #[test]
    fn test_normalize_args_unwraps_single_key_envelope() {
        let flat = json!({"number": "2616", "format": "full"});
        assert_eq!(normalize_args(flat.clone()), flat);

        let wrapped = json!({"params": {"number": "2616", "format": "full"}});
        assert_eq!(normalize_args(wrapped), flat);

        // A single-key object whose value is not an object stays flat.
        let single = json!({"number": "2616"});
        assert_eq!(normalize_args(single.clone()), single);
    }

    #[tokio::test]
    async fn test_dispatch_metadata_projection() {
        let fake = FakeHttpClient::new().route("/rfc/rfc2616.txt", 200, RFC_TEXT);
        let d = dispatcher(fake);

        let result = d
            .dispatch("get_rfc", json!({"number": "2616", "format": "metadata"}))
            .await
            .unwrap();
        assert_eq!(result["title"], "Hypertext Transfer Protocol -- HTTP/1.1");
        assert_eq!(result["status"], "Standards Track");
        assert!(result.get("rawText").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_accepts_wrapped_args() {
        let fake = FakeHttpClient::new().route("/rfc/rfc2616.txt", 200, RFC_TEXT);
        let d = dispatcher(fake);

        let result = d
            .dispatch(
                "get_rfc",
                json!({"arguments": {"number": "2616", "format": "sections"}}),
            )
            .await
            .unwrap();
        assert!(result.as_array().is_some());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_rfc_is_not_found_kind() {
        let d = dispatcher(FakeHttpClient::new());
        let err = d
            .dispatch("get_rfc", json!({"number": "999999999", "format": "full"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "fetch_not_found");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_method() {
        let d = dispatcher(FakeHttpClient::new());
        let err = d.dispatch("no_such_tool", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), "method_not_found");
    }

    #[tokio::test]
    async fn test_dispatch_bad_format_is_validation() {
        let d = dispatcher(FakeHttpClient::new());
        let err = d
            .dispatch("get_rfc", json!({"number": "2616", "format": "everything"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[tokio::test]
    async fn test_dispatch_missing_required_field_is_validation() {
        let d = dispatcher(FakeHttpClient::new());
        let err = d.dispatch("search_rfcs", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }
}
