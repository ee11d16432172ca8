//! Route table and handlers for the three realms.
//!
//! Handlers are thin: authenticate (middleware), gate the realm, then hand
//! off to the `endpoint` dispatcher with explicit parameters.

use std::collections::BTreeMap;

use axum::extract::{Extension, Form, Path, Query, State};
use axum::http::HeaderMap;
use axum::middleware;
use axum::response::Response as HttpResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use opkit::{
    Component, ComponentInput, EndpointCall, Halt, InputData, Field, Operation, Params,
    ResponseFormat, endpoint,
};
use opkit_auth::SecurityContext;
use portal::components::{admin as admin_components, crm as crm_components};
use portal::components::registration::SignupForm;
use portal::components::screener::home::Home;
use portal::operations::{admin, crm, registration, screener};
use portal::{PortalEnv, PortalPolicies, Realm, Record};

use crate::authn::authn_middleware;
use crate::respond;
use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(screener_home))
        .route("/screener", get(screener_home))
        .route("/crm", get(crm_dashboard))
        .route("/crm/company/edit", get(crm_company_edit))
        .route("/admin", get(admin_dashboard))
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/users", get(admin_users_index))
        .route("/admin/users/{id}", get(admin_users_show))
        .route("/users/sign_up", get(signup_new))
        .route("/users", post(registration_create))
        .route("/up", get(health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authn_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

struct HandlerCall<'a> {
    state: &'a AppState,
    ctx: &'a SecurityContext,
    headers: &'a HeaderMap,
    params: Params,
    realm: Option<Realm>,
    current_path: &'a str,
}

impl HandlerCall<'_> {
    /// Gate the realm, run the endpoint, map the outcome.
    fn dispatch<O, C>(
        &self,
        op: &O,
        component: &C,
        action: &str,
        fallback_path: &str,
    ) -> HttpResponse
    where
        O: Operation<Env = PortalEnv>,
        C: Component<Entity = Record>,
    {
        let outcome = self.gate().and_then(|()| {
            let call = EndpointCall::new(
                action,
                ResponseFormat::from_param(self.params.get("format")),
                fallback_path,
            );
            endpoint(op, component, &self.state.env, &self.params, self.ctx, &call)
        });
        match outcome {
            Ok(response) => respond::into_http(
                response,
                &respond::chrome(self.ctx, self.realm, self.current_path),
            ),
            Err(halt) => respond::halt_to_http(&halt, self.headers),
        }
    }

    fn gate(&self) -> Result<(), Halt> {
        if let Some(realm) = self.realm {
            PortalPolicies::ensure_realm_access(self.ctx, realm).map_err(Halt::NotAuthorized)?;
        }
        Ok(())
    }
}

// ── Screener realm ──────────────────────────────────────────────────

async fn screener_home(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> HttpResponse {
    HandlerCall {
        state: &state,
        ctx: &ctx,
        headers: &headers,
        params: query.into_iter().collect(),
        realm: Some(Realm::Screener),
        current_path: "/screener",
    }
    .dispatch(&screener::home::Index, &Home, "index", "/screener")
}

// ── CRM realm ───────────────────────────────────────────────────────

async fn crm_dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> HttpResponse {
    HandlerCall {
        state: &state,
        ctx: &ctx,
        headers: &headers,
        params: query.into_iter().collect(),
        realm: Some(Realm::Crm),
        current_path: "/crm",
    }
    .dispatch(
        &crm::dashboard::Index,
        &crm_components::dashboard::Index,
        "index",
        "/crm",
    )
}

async fn crm_company_edit(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> HttpResponse {
    HandlerCall {
        state: &state,
        ctx: &ctx,
        headers: &headers,
        params: query.into_iter().collect(),
        realm: Some(Realm::Crm),
        current_path: "/crm/company/edit",
    }
    .dispatch(
        &crm::company::Edit,
        &crm_components::company::EditForm,
        "edit",
        "/crm",
    )
}

// ── Admin realm ─────────────────────────────────────────────────────

async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> HttpResponse {
    HandlerCall {
        state: &state,
        ctx: &ctx,
        headers: &headers,
        params: query.into_iter().collect(),
        realm: Some(Realm::Admin),
        current_path: "/admin/dashboard",
    }
    .dispatch(
        &admin::dashboard::Index,
        &admin_components::dashboard::Index,
        "index",
        "/admin",
    )
}

async fn admin_users_index(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> HttpResponse {
    HandlerCall {
        state: &state,
        ctx: &ctx,
        headers: &headers,
        params: query.into_iter().collect(),
        realm: Some(Realm::Admin),
        current_path: "/admin/users",
    }
    .dispatch(
        &admin::user::Index,
        &admin_components::user::UsersTable,
        "index",
        "/admin/users",
    )
}

async fn admin_users_show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> HttpResponse {
    let mut params: Params = query.into_iter().collect();
    params.insert("id", id);
    HandlerCall {
        state: &state,
        ctx: &ctx,
        headers: &headers,
        params,
        realm: Some(Realm::Admin),
        current_path: "/admin/users",
    }
    .dispatch(
        &admin::user::Show,
        &admin_components::user::UserCard,
        "show",
        "/admin/users",
    )
}

// ── Registration ────────────────────────────────────────────────────

async fn signup_new(
    Extension(ctx): Extension<SecurityContext>,
    Query(query): Query<BTreeMap<String, String>>,
) -> HttpResponse {
    // Static form render: no operation behind the sign-up page itself.
    let params: Params = query.into_iter().collect();
    let input = ComponentInput::new(
        InputData::Keyed {
            key: "user",
            value: Field::Record(None),
        },
        params,
    );
    respond::render_view(
        &SignupForm.build(&input),
        &respond::chrome(&ctx, None, "/users/sign_up"),
    )
}

async fn registration_create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SecurityContext>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
    Form(form): Form<BTreeMap<String, String>>,
) -> HttpResponse {
    let mut params: Params = query.into_iter().collect();
    for (key, value) in form {
        params.insert(key, value);
    }
    HandlerCall {
        state: &state,
        ctx: &ctx,
        headers: &headers,
        params,
        realm: None,
        current_path: "/users",
    }
    .dispatch(&registration::Create, &SignupForm, "create", "/")
}
