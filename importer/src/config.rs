//! Import configuration.
//!
//! Loaded from the environment (a `.env` file is honored) or from any
//! key lookup, which keeps tests away from process-global state.
//!
//! | Variable                        | Default                  |
//! |---------------------------------|--------------------------|
//! | `DROMO_LICENSE_KEY`             | none (required)          |
//! | `DROMO_TEMPLATE_ID`             | none                     |
//! | `DROMO_TEMPLATE_ID_<TABLE>`     | falls back to the above  |
//! | `DROMO_BACKEND_KEY`             | none                     |
//! | `IMPORT_API_URL`                | `http://localhost:3000`  |
//! | `IMPORT_WEBHOOK_ORIGIN`         | `IMPORT_API_URL`         |
//! | `IMPORT_WEBHOOK_TUNNEL`         | none                     |
//! | `IMPORT_WEBHOOK_PATH`           | `/api/webhooks/import`   |
//! | `IMPORT_COMPLETION_MODE`        | `hybrid`                 |
//! | `IMPORT_DEVELOPMENT_MODE`       | `false`                  |
//! | `IMPORT_INIT_TIMEOUT_SECS`      | `10`                     |
//! | `IMPORT_PREVIEW_MAX_ROWS`       | `800`                    |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigResult, ConfigurationError};
use crate::models::TableType;
use crate::webhook::{WebhookEnv, DEFAULT_WEBHOOK_PATH};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Widget initialization deadline.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rows shown in the preview table.
pub const DEFAULT_PREVIEW_MAX_ROWS: usize = 800;

/// Which completion paths a session accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionMode {
    /// Manual confirm and webhook completion both live; first success wins.
    #[default]
    Hybrid,
    /// Only the webhook `onComplete` path; confirm is rejected.
    Webhook,
    /// Only the direct import request; webhook events are ignored.
    Direct,
}

impl CompletionMode {
    pub fn accepts_confirm(&self) -> bool {
        !matches!(self, CompletionMode::Webhook)
    }

    pub fn accepts_webhook(&self) -> bool {
        !matches!(self, CompletionMode::Direct)
    }

    /// Value passed to the widget's `mode` setting.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionMode::Hybrid => "hybrid",
            CompletionMode::Webhook => "webhook",
            CompletionMode::Direct => "direct",
        }
    }
}

impl FromStr for CompletionMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "hybrid" => Ok(CompletionMode::Hybrid),
            "webhook" | "public" => Ok(CompletionMode::Webhook),
            "direct" => Ok(CompletionMode::Direct),
            other => Err(ConfigurationError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a session needs from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    pub license_key: Option<String>,
    pub default_template_id: Option<String>,
    /// Per-table template overrides, keyed by table slug
    pub table_templates: Vec<(String, String)>,
    pub backend_key: Option<String>,
    pub api_base_url: String,
    pub webhook: WebhookEnv,
    pub completion_mode: CompletionMode,
    pub development_mode: bool,
    pub init_timeout: Duration,
    pub preview_max_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            license_key: None,
            default_template_id: None,
            table_templates: Vec::new(),
            backend_key: None,
            api_base_url: DEFAULT_API_URL.to_string(),
            webhook: WebhookEnv::new(DEFAULT_API_URL),
            completion_mode: CompletionMode::default(),
            development_mode: false,
            init_timeout: DEFAULT_INIT_TIMEOUT,
            preview_max_rows: DEFAULT_PREVIEW_MAX_ROWS,
        }
    }
}

impl ImportConfig {
    /// Load from process environment (after reading `.env` if present).
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = get("IMPORT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let mut webhook = WebhookEnv::new(get("IMPORT_WEBHOOK_ORIGIN").unwrap_or_else(|| api_base_url.clone()));
        if let Some(tunnel) = get("IMPORT_WEBHOOK_TUNNEL") {
            webhook = webhook.with_tunnel(tunnel);
        }
        webhook = webhook.with_path_prefix(get("IMPORT_WEBHOOK_PATH").unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string()));

        let table_templates = TableType::all()
            .iter()
            .filter_map(|table| {
                let key = format!("DROMO_TEMPLATE_ID_{}", table.slug().to_uppercase());
                get(&key).map(|id| (table.slug().to_string(), id))
            })
            .collect();

        let completion_mode = match get("IMPORT_COMPLETION_MODE") {
            Some(mode) => mode.parse()?,
            None => CompletionMode::default(),
        };

        let init_timeout = match get("IMPORT_INIT_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(parse_number("IMPORT_INIT_TIMEOUT_SECS", &secs)?),
            None => DEFAULT_INIT_TIMEOUT,
        };

        let preview_max_rows = match get("IMPORT_PREVIEW_MAX_ROWS") {
            Some(rows) => parse_number("IMPORT_PREVIEW_MAX_ROWS", &rows)? as usize,
            None => DEFAULT_PREVIEW_MAX_ROWS,
        };

        Ok(Self {
            license_key: get("DROMO_LICENSE_KEY"),
            default_template_id: get("DROMO_TEMPLATE_ID"),
            table_templates,
            backend_key: get("DROMO_BACKEND_KEY"),
            api_base_url,
            webhook,
            completion_mode,
            development_mode: get("IMPORT_DEVELOPMENT_MODE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
            init_timeout,
            preview_max_rows,
        })
    }

    /// Template for a table: per-table override, else the default.
    pub fn template_for(&self, table_type: &TableType) -> Option<String> {
        self.table_templates
            .iter()
            .find(|(slug, _)| slug == table_type.slug())
            .map(|(_, id)| id.clone())
            .or_else(|| self.default_template_id.clone())
    }
}

fn parse_number(key: &str, value: &str) -> ConfigResult<u64> {
    value.parse::<u64>().map_err(|e| ConfigurationError::InvalidSetting {
        key: key.to_string(),
        message: e.to_string(),
    })
}
