//! Per-session settings, resolved once from [`ImportConfig`].

use std::time::Duration;

use crate::config::{CompletionMode, ImportConfig, DEFAULT_INIT_TIMEOUT};
use crate::error::{ConfigResult, ConfigurationError};
use crate::models::TableType;
use crate::schema;
use crate::webhook::{self, WebhookTarget};
use crate::widget::{WidgetRequest, WidgetSettings, WidgetUser};

/// What a session needs to build widget requests and submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub table_type: TableType,
    pub license_key: Option<String>,
    pub template_id: Option<String>,
    pub backend_key: Option<String>,
    pub completion_mode: CompletionMode,
    pub development_mode: bool,
    pub init_timeout: Duration,
    pub webhook: Option<WebhookTarget>,
    /// Webhook resolution error, raised on launch
    pub webhook_error: Option<ConfigurationError>,
}

impl SessionSettings {
    /// Settings with no license, template or webhook.
    pub fn new(table_type: TableType) -> Self {
        Self {
            table_type,
            license_key: None,
            template_id: None,
            backend_key: None,
            completion_mode: CompletionMode::Direct,
            development_mode: false,
            init_timeout: DEFAULT_INIT_TIMEOUT,
            webhook: None,
            webhook_error: None,
        }
    }

    /// Resolve settings for `table_type`.
    ///
    /// `credential` is the operator's session token; it authenticates the
    /// webhook the import service calls back on.
    pub fn from_config(config: &ImportConfig, table_type: TableType, credential: Option<&str>) -> Self {
        let (webhook, webhook_error) = if config.completion_mode.accepts_webhook() {
            match webhook::resolve(&table_type, &config.webhook, credential) {
                Ok(target) => (Some(target), None),
                Err(e) => {
                    log::error!("Webhook for {} could not be resolved: {}", table_type, e);
                    (None, Some(e))
                }
            }
        } else {
            (None, None)
        };

        Self {
            license_key: config.license_key.clone(),
            template_id: config.template_for(&table_type),
            backend_key: config.backend_key.clone(),
            completion_mode: config.completion_mode,
            development_mode: config.development_mode,
            init_timeout: config.init_timeout,
            webhook,
            webhook_error,
            table_type,
        }
    }

    pub fn with_license(mut self, license_key: impl Into<String>) -> Self {
        self.license_key = Some(license_key.into());
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_mode(mut self, mode: CompletionMode) -> Self {
        self.completion_mode = mode;
        self
    }

    pub fn with_webhook(mut self, target: WebhookTarget) -> Self {
        self.webhook = Some(target);
        self
    }

    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// Build the constructor arguments, or the configuration error that
    /// prevents launching.
    pub fn widget_request(&self, user: WidgetUser) -> ConfigResult<WidgetRequest> {
        let license_key = self
            .license_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigurationError::MissingLicense)?;
        let template_id = self
            .template_id
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigurationError::MissingTemplate(self.table_type.slug().to_string()))?;
        if let Some(ref e) = self.webhook_error {
            return Err(e.clone());
        }

        let webhook = self
            .webhook
            .as_ref()
            .filter(|_| self.completion_mode.accepts_webhook());

        Ok(WidgetRequest {
            license_key,
            fields: schema::fields_for(&self.table_type).to_vec(),
            settings: WidgetSettings {
                import_identifier: template_id,
                development_mode: Some(self.development_mode),
                mode: Some(self.completion_mode.as_str().to_string()),
                webhook_url: webhook.map(|w| w.url.clone()),
                webhook_headers: webhook.map(|w| w.headers.clone()),
            },
            user,
        })
    }
}
