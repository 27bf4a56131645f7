//! Application configuration.
//!
//! The browser has no process environment, so the import settings are
//! baked in at compile time from the same variables the CLI reads at
//! runtime (`DROMO_LICENSE_KEY`, `IMPORT_API_URL`, ...).

use vetimport::config::DEFAULT_API_URL;
use vetimport::ImportConfig;

/// Application name shown in the header.
pub const APP_NAME: &str = "Vetfield";

/// `localStorage` key holding the signed-in operator's session.
pub const SESSION_STORAGE_KEY: &str = "vetfield.session";

/// Backend API base URL.
pub const BACKEND_URL: &str = match option_env!("IMPORT_API_URL") {
    Some(url) => url,
    None => DEFAULT_API_URL,
};

/// Compile-time value of an import variable.
pub fn build_var(key: &str) -> Option<&'static str> {
    match key {
        "DROMO_LICENSE_KEY" => option_env!("DROMO_LICENSE_KEY"),
        "DROMO_TEMPLATE_ID" => option_env!("DROMO_TEMPLATE_ID"),
        "DROMO_TEMPLATE_ID_CLIENTS" => option_env!("DROMO_TEMPLATE_ID_CLIENTS"),
        "DROMO_TEMPLATE_ID_ANIMALS" => option_env!("DROMO_TEMPLATE_ID_ANIMALS"),
        "DROMO_TEMPLATE_ID_VACCINATIONS" => option_env!("DROMO_TEMPLATE_ID_VACCINATIONS"),
        "DROMO_TEMPLATE_ID_PARASITE_CONTROL" => option_env!("DROMO_TEMPLATE_ID_PARASITE_CONTROL"),
        "DROMO_TEMPLATE_ID_LABORATORY" => option_env!("DROMO_TEMPLATE_ID_LABORATORY"),
        "DROMO_TEMPLATE_ID_EQUINE" => option_env!("DROMO_TEMPLATE_ID_EQUINE"),
        "DROMO_TEMPLATE_ID_INVENTORY" => option_env!("DROMO_TEMPLATE_ID_INVENTORY"),
        "DROMO_BACKEND_KEY" => option_env!("DROMO_BACKEND_KEY"),
        "IMPORT_API_URL" => option_env!("IMPORT_API_URL"),
        "IMPORT_WEBHOOK_ORIGIN" => option_env!("IMPORT_WEBHOOK_ORIGIN"),
        "IMPORT_WEBHOOK_TUNNEL" => option_env!("IMPORT_WEBHOOK_TUNNEL"),
        "IMPORT_WEBHOOK_PATH" => option_env!("IMPORT_WEBHOOK_PATH"),
        "IMPORT_COMPLETION_MODE" => option_env!("IMPORT_COMPLETION_MODE"),
        "IMPORT_DEVELOPMENT_MODE" => option_env!("IMPORT_DEVELOPMENT_MODE"),
        "IMPORT_INIT_TIMEOUT_SECS" => option_env!("IMPORT_INIT_TIMEOUT_SECS"),
        "IMPORT_PREVIEW_MAX_ROWS" => option_env!("IMPORT_PREVIEW_MAX_ROWS"),
        _ => None,
    }
}

/// Import configuration for this build.
///
/// A malformed build value is logged and replaced by the defaults, so the
/// dialog still renders and reports the missing pieces on launch.
pub fn import_config() -> ImportConfig {
    match ImportConfig::from_lookup(|key| build_var(key).map(str::to_string)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid build configuration: {}", e);
            ImportConfig::default()
        }
    }
}
