//! HTTP client for the course catalog.
//!
//! All four operations are read-only GETs against the catalog's OData
//! surface and none of them retries: a transport failure belongs to the
//! caller, who decides whether the session can continue (it cannot).

use crate::catalog::error::CatalogError;
use crate::catalog::query::CatalogQuery;
use crate::catalog::types::{Course, Page, Subject};
use crate::term::TermCode;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Base URL for the catalog's OData endpoint.
pub const CATALOG_BASE_URL: &str = "https://api.purdue.io/odata/";

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the OData endpoint.
    pub base_url: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Skip TLS certificate verification. Never enabled by default; exists
    /// for deployments stuck behind an intercepting proxy and is logged
    /// loudly when on.
    pub accept_invalid_certs: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: CATALOG_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: concat!("seatwatch/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_invalid_certs: false,
        }
    }
}

/// Read-only view of the course catalog consumed by the resolver.
///
/// Every operation is idempotent and side-effect-free, so callers may issue
/// them in any order; implementations must not retry on their own.
#[async_trait]
pub trait CourseCatalog {
    /// True iff the catalog lists at least one subject whose abbreviation
    /// equals `abbreviation` exactly (callers normalize case first).
    async fn find_subject(&self, abbreviation: &str) -> Result<bool, CatalogError>;

    /// Course summaries for a subject, classes narrowed to the term with
    /// sections and meetings expanded beneath, ordered by number ascending.
    /// Records with no class in the term still appear; display and
    /// selection filter on [`Course::is_offered`].
    async fn list_courses(
        &self,
        term: &TermCode,
        subject: &str,
    ) -> Result<Vec<Course>, CatalogError>;

    /// Detail records for an exact course number within the subject and
    /// term, fully expanded. More than one record means the number is
    /// cross-listed.
    async fn list_course_classes(
        &self,
        term: &TermCode,
        subject: &str,
        number: &str,
    ) -> Result<Vec<Course>, CatalogError>;

    /// The separately-selectable course records sharing a cross-listed
    /// number; each is presented by title and credit hours before its
    /// sections are listed.
    async fn load_course_alternatives(
        &self,
        term: &TermCode,
        subject: &str,
        number: &str,
    ) -> Result<Vec<Course>, CatalogError>;
}

/// Client for the live catalog service.
pub struct CatalogClient {
    http: Client,
    base: Url,
}

impl CatalogClient {
    /// Creates a client with default configuration.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_config(CatalogConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: CatalogConfig) -> Result<Self, CatalogError> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is DISABLED for catalog requests");
        }

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| CatalogError::Unavailable {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        // A base without a trailing slash would make Url::join replace the
        // endpoint's last path segment instead of appending the resource.
        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)?;

        Ok(Self { http, base })
    }

    /// Issues one query and decodes the `value` page. Non-success statuses
    /// are unavailability; undecodable bodies are malformed responses.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        query: CatalogQuery,
    ) -> Result<Vec<T>, CatalogError> {
        let url = query.into_url(&self.base)?;
        let started = Instant::now();
        debug!(url = %url, "catalog query");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable {
                message: format!("catalog answered {status} for {url}"),
            });
        }

        let body = response.text().await?;
        let page: Page<T> = serde_json::from_str(&body)?;

        debug!(
            url = %url,
            records = page.value.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog answered"
        );
        Ok(page.value)
    }
}

#[async_trait]
impl CourseCatalog for CatalogClient {
    async fn find_subject(&self, abbreviation: &str) -> Result<bool, CatalogError> {
        let subjects: Vec<Subject> = self.fetch_page(CatalogQuery::subject(abbreviation)).await?;
        Ok(!subjects.is_empty())
    }

    async fn list_courses(
        &self,
        term: &TermCode,
        subject: &str,
    ) -> Result<Vec<Course>, CatalogError> {
        self.fetch_page(CatalogQuery::courses_for_subject(term, subject))
            .await
    }

    async fn list_course_classes(
        &self,
        term: &TermCode,
        subject: &str,
        number: &str,
    ) -> Result<Vec<Course>, CatalogError> {
        self.fetch_page(CatalogQuery::courses_by_number(term, subject, number))
            .await
    }

    async fn load_course_alternatives(
        &self,
        term: &TermCode,
        subject: &str,
        number: &str,
    ) -> Result<Vec<Course>, CatalogError> {
        // Same wire query as the detail fetch; it stands alone because
        // callers use it specifically to enumerate cross-listings.
        self.list_course_classes(term, subject, number).await
    }
}
