// # OCI Network Inventory
//
// This crate implements `NetworkInventory` over the OCI Identity and Core
// (Virtual Network) REST APIs.
//
// ## Architectural Constraints
//
// ### Trust Level: Untrusted (Inventory Provider)
//
// **Allowed Capabilities**:
// - ✅ Perform signed HTTPS GET requests to the Identity and Core endpoints
// - ✅ Parse OCI JSON list responses and the `opc-next-page` header
//
// **Forbidden Capabilities**:
// - ❌ Retry or back off (a failed call fails its branch once)
// - ❌ Spawn tasks or threads
// - ❌ Cache listings beyond a single request
// - ❌ Touch the hosts file
//
// ## Security Requirements
//
// - The private key NEVER appears in logs or Debug output
// - Encrypted keys are rejected at load time
//
// ## API Reference
//
// - Identity: GET `/20160918/compartments?compartmentId=..&compartmentIdInSubtree=..`
// - Core: GET `/20160918/vcns`, `/20160918/subnets`, `/20160918/privateIps`
// - Pagination: `page` query parameter, `opc-next-page` response header

pub mod config;
pub mod signer;

pub use config::{OciConfig, OciProfile};
pub use signer::RequestSigner;

use async_trait::async_trait;
use oci_hosts_core::traits::{Compartment, NetworkInventory, Page, PrivateIp, Subnet, Vcn};
use oci_hosts_core::{Error, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// API version path shared by Identity and Core
const API_VERSION: &str = "20160918";

/// Page size requested for compartment listings
const COMPARTMENT_PAGE_LIMIT: &str = "100";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Response header carrying the next page cursor
const NEXT_PAGE_HEADER: &str = "opc-next-page";

/// Response header carrying the request id, quoted in errors
const REQUEST_ID_HEADER: &str = "opc-request-id";

/// Base URLs of the two services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Identity service, e.g. `https://identity.eu-frankfurt-1.oraclecloud.com`
    pub identity: String,
    /// Core service, e.g. `https://iaas.eu-frankfurt-1.oraclecloud.com`
    pub iaas: String,
}

impl Endpoints {
    /// Public OCI endpoints for a region
    pub fn for_region(region: &str) -> Self {
        Self {
            identity: format!("https://identity.{}.oraclecloud.com", region),
            iaas: format!("https://iaas.{}.oraclecloud.com", region),
        }
    }

    /// Explicit base URLs
    pub fn new(identity: impl Into<String>, iaas: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            iaas: iaas.into(),
        }
    }
}

/// OCI inventory over signed REST calls
///
/// # Trust Level: Untrusted
///
/// Every listing is one GET request. Errors propagate to the walker, which
/// decides whether they are fatal or isolated to a branch.
#[derive(Debug)]
pub struct OciInventory {
    signer: RequestSigner,
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl OciInventory {
    /// Create an inventory with a signer and explicit endpoints
    pub fn new(signer: RequestSigner, endpoints: Endpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            signer,
            endpoints,
            client,
        })
    }

    /// Create an inventory for a config profile
    ///
    /// Reads the profile's key file and targets the profile's region.
    pub fn from_profile(profile: &OciProfile) -> Result<Self> {
        let signer = RequestSigner::from_profile(profile)?;
        tracing::debug!(
            "Using OCI profile {} in region {}",
            profile.name,
            profile.region
        );
        Self::new(signer, Endpoints::for_region(&profile.region))
    }

    /// Endpoints this inventory talks to
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch one page of a list resource
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /20160918/<resource>?<params>[&page=<cursor>]
    /// date: <RFC 1123>
    /// authorization: Signature version="1",...
    /// ```
    async fn get_page<T: DeserializeOwned>(
        &self,
        base: &str,
        resource: &str,
        params: &[(&str, &str)],
        page: Option<&str>,
    ) -> Result<Page<T>> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            API_VERSION,
            resource
        ))
        .map_err(|e| Error::config(format!("Invalid endpoint {}: {}", base, e)))?;

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(cursor) = page {
                query.append_pair("page", cursor);
            }
        }

        let signed = self.signer.sign_get(&url)?;

        tracing::trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("date", &signed.date)
            .header("authorization", &signed.authorization)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("Request for {} failed: {}", resource, e)))?;

        let status = response.status();
        if !status.is_success() {
            let request_id = response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), resource, &request_id, &body));
        }

        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let items: Vec<T> = response.json().await.map_err(|e| {
            Error::provider("oci", format!("Failed to parse {} response: {}", resource, e))
        })?;

        Ok(Page {
            items,
            next_page: next_page.filter(|c| !c.is_empty()),
        })
    }
}

/// Service error body, `{"code": "...", "message": "..."}`
#[derive(Debug, serde::Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Map a non-2xx status to an error
fn map_status(status: u16, resource: &str, request_id: &str, body: &str) -> Error {
    let detail = match serde_json::from_str::<ServiceError>(body) {
        Ok(e) if !e.code.is_empty() => format!("{}: {}", e.code, e.message),
        _ if body.is_empty() => "no response body".to_string(),
        _ => body.to_string(),
    };
    let context = format!(
        "listing {} returned {} ({}) [opc-request-id: {}]",
        resource, status, detail, request_id
    );

    match status {
        401 | 403 => Error::auth(format!(
            "Invalid key or insufficient permissions: {}",
            context
        )),
        404 => Error::not_found(context),
        429 => Error::rate_limited(context),
        500..=599 => Error::provider("oci", format!("OCI server error (transient): {}", context)),
        _ => Error::provider("oci", context),
    }
}

#[async_trait]
impl NetworkInventory for OciInventory {
    async fn list_compartments(
        &self,
        parent: &str,
        subtree: bool,
        page: Option<&str>,
    ) -> Result<Page<Compartment>> {
        let subtree = if subtree { "true" } else { "false" };
        self.get_page(
            &self.endpoints.identity,
            "compartments",
            &[
                ("compartmentId", parent),
                ("compartmentIdInSubtree", subtree),
                ("limit", COMPARTMENT_PAGE_LIMIT),
            ],
            page,
        )
        .await
    }

    async fn list_vcns(&self, compartment_id: &str, page: Option<&str>) -> Result<Page<Vcn>> {
        self.get_page(
            &self.endpoints.iaas,
            "vcns",
            &[("compartmentId", compartment_id)],
            page,
        )
        .await
    }

    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        page: Option<&str>,
    ) -> Result<Page<Subnet>> {
        self.get_page(
            &self.endpoints.iaas,
            "subnets",
            &[("compartmentId", compartment_id), ("vcnId", vcn_id)],
            page,
        )
        .await
    }

    async fn list_private_ips(&self, subnet_id: &str, page: Option<&str>) -> Result<Page<PrivateIp>> {
        self.get_page(
            &self.endpoints.iaas,
            "privateIps",
            &[("subnetId", subnet_id)],
            page,
        )
        .await
    }

    fn provider_name(&self) -> &'static str {
        "oci"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_endpoints() {
        let endpoints = Endpoints::for_region("eu-frankfurt-1");
        assert_eq!(endpoints.identity, "https://identity.eu-frankfurt-1.oraclecloud.com");
        assert_eq!(endpoints.iaas, "https://iaas.eu-frankfurt-1.oraclecloud.com");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(map_status(401, "vcns", "-", ""), Error::Authentication(_)));
        assert!(matches!(map_status(403, "vcns", "-", ""), Error::Authentication(_)));
        assert!(matches!(map_status(404, "vcns", "-", ""), Error::NotFound(_)));
        assert!(matches!(map_status(429, "vcns", "-", ""), Error::RateLimited(_)));
        assert!(matches!(map_status(503, "vcns", "-", ""), Error::Provider { .. }));
        assert!(matches!(map_status(400, "vcns", "-", ""), Error::Provider { .. }));
    }

    #[test]
    fn service_error_detail_is_quoted() {
        let err = map_status(
            404,
            "subnets",
            "req-1",
            r#"{"code":"NotAuthorizedOrNotFound","message":"Authorization failed or requested resource not found."}"#,
        );
        let text = err.to_string();
        assert!(text.contains("NotAuthorizedOrNotFound"));
        assert!(text.contains("req-1"));
        assert!(text.contains("subnets"));
    }
}
