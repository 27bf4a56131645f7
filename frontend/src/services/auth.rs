//! Signed-in operator, as stored by the host application.
//!
//! The host keeps `{ token, user: { id, name, email } }` under
//! [`SESSION_STORAGE_KEY`] in `localStorage`. Without it the dialog still
//! works, but the webhook and the import request go out unauthenticated.

use serde::Deserialize;
use vetimport::WidgetUser;

use crate::config::SESSION_STORAGE_KEY;

/// Operator id used when nobody is signed in.
pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub token: Option<String>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthSession {
    pub fn widget_user(&self) -> WidgetUser {
        WidgetUser {
            id: self.user.id.clone(),
            name: self.user.name.clone(),
            email: self.user.email.clone(),
        }
    }
}

/// Parse a stored session. Returns `None` for anything malformed.
pub fn parse_session(raw: &str) -> Option<AuthSession> {
    match serde_json::from_str::<AuthSession>(raw) {
        Ok(session) if !session.user.id.trim().is_empty() => Some(session),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Ignoring stored session: {}", e);
            None
        }
    }
}

/// Session from `localStorage`, if any.
pub fn current_session() -> Option<AuthSession> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let raw = storage.get_item(SESSION_STORAGE_KEY).ok()??;
    parse_session(&raw)
}

/// Widget user for the current operator.
pub fn current_user(session: Option<&AuthSession>) -> WidgetUser {
    session
        .map(AuthSession::widget_user)
        .unwrap_or_else(|| WidgetUser::new(ANONYMOUS_USER))
}
