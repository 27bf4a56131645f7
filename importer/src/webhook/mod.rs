//! Webhook destination for the widget's hosted backend.
//!
//! The external service POSTs validated results to our backend on its own,
//! so the URL must be publicly reachable. Loopback and private origins are
//! allowed (local development) but flagged with a warning.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use url::{Host, Url};

use crate::error::{ConfigResult, ConfigurationError};
use crate::models::TableType;

/// Default path the backend mounts import webhooks under.
pub const DEFAULT_WEBHOOK_PATH: &str = "/api/webhooks/import";

/// Origin settings used to build webhook URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEnv {
    /// Public origin of the backend
    pub base_origin: String,
    /// Local-tunnel origin; wins over `base_origin` when set
    pub tunnel_origin: Option<String>,
    /// Path prefix, table slug is appended
    pub path_prefix: String,
}

impl WebhookEnv {
    pub fn new(base_origin: impl Into<String>) -> Self {
        Self {
            base_origin: base_origin.into(),
            tunnel_origin: None,
            path_prefix: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }

    pub fn with_tunnel(mut self, tunnel_origin: impl Into<String>) -> Self {
        self.tunnel_origin = Some(tunnel_origin.into());
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Origin actually used.
    pub fn effective_origin(&self) -> &str {
        match self.tunnel_origin.as_deref() {
            Some(tunnel) if !tunnel.trim().is_empty() => tunnel,
            _ => &self.base_origin,
        }
    }
}

/// Where and how the widget backend should POST results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTarget {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// False when the host looks like loopback/private space
    pub publicly_reachable: bool,
}

/// Build the webhook URL and headers for a table.
///
/// `credential` is the caller's session token, sent as a bearer token.
pub fn resolve(
    table_type: &TableType,
    env: &WebhookEnv,
    credential: Option<&str>,
) -> ConfigResult<WebhookTarget> {
    let origin = env.effective_origin().trim();
    let mut url = Url::parse(origin).map_err(|e| ConfigurationError::InvalidOrigin {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigurationError::InvalidOrigin {
            origin: origin.to_string(),
            message: "not a base URL".to_string(),
        });
    }

    let base_path = url.path().trim_end_matches('/').to_string();
    let prefix = env.path_prefix.trim_matches('/');
    let path = if prefix.is_empty() {
        format!("{}/{}", base_path, table_type.slug())
    } else {
        format!("{}/{}/{}", base_path, prefix, table_type.slug())
    };
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);

    let publicly_reachable = url.host().map(|h| is_public_host(&h)).unwrap_or(false);
    if !publicly_reachable {
        log::warn!(
            "Webhook origin {} is not publicly reachable; the import service cannot deliver to it. \
             Set IMPORT_WEBHOOK_TUNNEL to a public tunnel URL for local development.",
            origin
        );
    }

    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    match credential.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        None => log::warn!("No session credential available; webhook will be sent unauthenticated"),
    }
    headers.insert("X-Table-Type".to_string(), table_type.slug().to_string());

    Ok(WebhookTarget {
        url: url.to_string(),
        headers,
        publicly_reachable,
    })
}

/// Whether the external service could plausibly reach this host.
pub fn is_public_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => {
            let domain = domain.to_ascii_lowercase();
            !(domain == "localhost" || domain.ends_with(".localhost") || domain.ends_with(".local"))
        }
        Host::Ipv4(ip) => is_public_ipv4(ip),
        Host::Ipv6(ip) => is_public_ipv6(ip),
    }
}

fn is_public_ipv4(ip: &Ipv4Addr) -> bool {
    !(ip.is_loopback() || ip.is_private() || ip.is_unspecified() || ip.is_link_local())
}

fn is_public_ipv6(ip: &Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_ipv4(&v4);
    }
    let first = ip.segments()[0];
    // fc00::/7 unique local, fe80::/10 link local
    let unique_local = first & 0xfe00 == 0xfc00;
    let link_local = first & 0xffc0 == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
}
