//! Maps dispatcher responses and faults onto HTTP.

use axum::Json;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response as HttpResponse};
use serde_json::json;

use opkit::{Flash, Halt, Response};
use opkit_auth::{PolicyName, SecurityContext};
use opkit_ui::View;
use portal::Realm;
use portal::components::shared;

/// Flash transport on redirects; the session layer is an external concern.
pub const FLASH_NOTICE_HEADER: &str = "x-flash-notice";
pub const FLASH_ALERT_HEADER: &str = "x-flash-alert";

/// Shared page chrome around a rendered view.
#[derive(Clone, Debug)]
pub struct Chrome {
    pub navbar: View,
    pub sidebar: Option<View>,
}

/// Build the chrome for the current principal and location.
#[must_use]
pub fn chrome(ctx: &SecurityContext, realm: Option<Realm>, current_path: &str) -> Chrome {
    Chrome {
        navbar: shared::navbar(ctx, current_path),
        sidebar: realm.map(|realm| shared::sidebar(ctx, realm, current_path)),
    }
}

fn flash_headers(flash: &Flash) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(notice) = &flash.notice
        && let Ok(value) = HeaderValue::from_str(notice)
    {
        headers.insert(FLASH_NOTICE_HEADER, value);
    }
    if let Some(alert) = &flash.alert
        && let Ok(value) = HeaderValue::from_str(alert)
    {
        headers.insert(FLASH_ALERT_HEADER, value);
    }
    headers
}

fn redirect(path: &str, flash: &Flash) -> HttpResponse {
    let mut headers = flash_headers(flash);
    if let Ok(location) = HeaderValue::from_str(path) {
        headers.insert(header::LOCATION, location);
    }
    (StatusCode::SEE_OTHER, headers).into_response()
}

/// Serialize a view with its chrome for the external template renderer.
fn render(view: &View, flash: &Flash, chrome: &Chrome) -> HttpResponse {
    Json(json!({
        "flash": flash,
        "view": view,
        "chrome": {
            "navbar": chrome.navbar,
            "sidebar": chrome.sidebar,
        },
    }))
    .into_response()
}

/// Map a dispatcher response onto HTTP.
#[must_use]
pub fn into_http(response: Response, chrome: &Chrome) -> HttpResponse {
    match response {
        Response::Redirect { path, flash } => redirect(&path, &flash),
        Response::Render { view, flash } => render(&view, &flash, chrome),
        Response::Script(script) => Json(json!({ "script": script })).into_response(),
        Response::Search(payload) => Json(payload).into_response(),
    }
}

/// Render a bare view outside the operation protocol (static pages).
#[must_use]
pub fn render_view(view: &View, chrome: &Chrome) -> HttpResponse {
    render(view, &Flash::default(), chrome)
}

/// The centralized fault handler.
///
/// Authorization denials branch on the rejecting rule set: CRM-gate
/// rejections go to the site root, screener-gate rejections to the CRM
/// root, everything else back where the request came from with an alert.
/// Missing records become 404; anything unexpected is a 500.
#[must_use]
pub fn halt_to_http(halt: &Halt, request_headers: &HeaderMap) -> HttpResponse {
    match halt {
        Halt::NotAuthorized(denial) => {
            tracing::debug!(policy = ?denial.policy, action = %denial.action, "request rejected");
            match denial.policy {
                PolicyName::CrmAccess => redirect("/", &Flash::default()),
                PolicyName::ScreenerAccess => redirect("/crm", &Flash::default()),
                _ => {
                    let back = request_headers
                        .get(header::REFERER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("/");
                    let alert = denial
                        .message
                        .clone()
                        .unwrap_or_else(|| {
                            "You are not authorized to perform this action.".to_owned()
                        });
                    redirect(
                        back,
                        &Flash {
                            notice: None,
                            alert: Some(alert),
                        },
                    )
                }
            }
        }
        Halt::NotFound { kind, .. } => {
            (StatusCode::NOT_FOUND, format!("{kind} not found")).into_response()
        }
        Halt::Internal(message) => {
            tracing::error!(error = %message, "unexpected fault");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
