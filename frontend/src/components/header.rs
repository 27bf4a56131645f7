use leptos::*;

use crate::config::APP_NAME;
use crate::services::AuthSession;

#[component]
pub fn Header(
    /// Signed-in operator, if any
    session: Option<AuthSession>,
) -> impl IntoView {
    let operator = session
        .as_ref()
        .map(|s| s.user.name.clone().unwrap_or_else(|| s.user.id.clone()));
    let signed_in = operator.is_some();

    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">{APP_NAME.to_uppercase()}</a>
                <span class="badge">"Bulk import"</span>
            </div>
            <div class="header-right">
                <div class="operator-status" class:connected=signed_in>
                    <span class="operator-dot" class:connected=signed_in></span>
                    <span>{operator.unwrap_or_else(|| "Not signed in".to_string())}</span>
                </div>
            </div>
        </header>
    }
}
