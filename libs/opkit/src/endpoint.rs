//! The dispatcher: runs an operation and selects a response shape from its
//! result, the requested format, and the controller action.
//!
//! ## Response matrix (HTML)
//!
//! | action | outcome | response |
//! |---|---|---|
//! | create/update/destroy | success | redirect (result path or fallback) |
//! | destroy | failure | redirect anyway (idempotent-delete convention) |
//! | create/update | failure | re-render component with errors |
//! | index/show/new/edit/other | any | render component |
//!
//! Script format maps mutation success to a location change and everything
//! else to a modal-content replacement. The data-interchange format returns
//! a normalized search payload.

use serde::{Deserialize, Serialize};

use opkit_auth::SecurityContext;
use opkit_ui::View;

use crate::component::{Component, ComponentInput, InputData};
use crate::operation::{Entity, Halt, OpEnv, Operation, ResourceName, run};
use crate::params::Params;
use crate::result::{Field, Listing, Model, OpResult, SearchHit};

/// The controller action name, with its dispatch classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionName(String);

/// How the dispatcher treats an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    /// Matched by substring: any action containing `destroy`. Inherited
    /// behavior; renaming an action away from the substring silently
    /// changes its dispatch, so destroy-like actions must keep the word.
    Destroy,
    Index,
    Show,
    New,
    Edit,
    Other,
}

impl ActionKind {
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Destroy)
    }
}

impl ActionName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the action for dispatch.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self.0.as_str() {
            "create" => ActionKind::Create,
            "update" => ActionKind::Update,
            name if name.contains("destroy") => ActionKind::Destroy,
            "index" => ActionKind::Index,
            "show" => ActionKind::Show,
            "new" => ActionKind::New,
            "edit" => ActionKind::Edit,
            _ => ActionKind::Other,
        }
    }
}

/// The response format the client asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Html,
    /// Script directive for modal workflows.
    Script,
    /// Data-interchange payload for search widgets.
    Json,
    /// Anything else; rendered like a listing read.
    Other,
}

impl ResponseFormat {
    /// Parse the `format` request parameter.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None | Some("html") => Self::Html,
            Some("js" | "script") => Self::Script,
            Some("json") => Self::Json,
            Some(_) => Self::Other,
        }
    }
}

/// Flash-style feedback accompanying a response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub notice: Option<String>,
    pub alert: Option<String>,
}

impl Flash {
    fn from_result<E: Entity>(result: &OpResult<E>) -> Self {
        let alert = Some(result.error_message()).filter(|m| !m.is_empty());
        let notice = result.message().map(ToOwned::to_owned);
        Self { notice, alert }
    }

    fn alert_only<E: Entity>(result: &OpResult<E>) -> Self {
        Self {
            notice: None,
            alert: Some(result.error_message()).filter(|m| !m.is_empty()),
        }
    }
}

/// Script-format directive: navigate, or replace the open modal's content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Script {
    Navigate { path: String },
    ReplaceModal { view: View },
}

/// Normalized search payload for typeahead widgets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub result: Vec<SearchHit>,
    pub pagination: Pagination,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub more: bool,
}

/// A selected response shape. Mapping to HTTP is the server's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Redirect { path: String, flash: Flash },
    Render { view: View, flash: Flash },
    Script(Script),
    Search(SearchPayload),
}

/// Everything the dispatcher needs to know about the current call.
#[derive(Clone, Debug)]
pub struct EndpointCall {
    pub action: ActionName,
    pub format: ResponseFormat,
    /// Redirect target when the result does not set one.
    pub fallback_path: String,
}

impl EndpointCall {
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        format: ResponseFormat,
        fallback_path: impl Into<String>,
    ) -> Self {
        Self {
            action: ActionName::new(action),
            format,
            fallback_path: fallback_path.into(),
        }
    }
}

/// The authorization invariant: every successful result must show that
/// authorization and scoping were performed or explicitly skipped. A failed
/// result implicitly satisfies both, since its errors already explain the
/// rejection.
#[must_use]
pub fn guard_satisfied<E: Entity>(result: &OpResult<E>) -> bool {
    result.is_failure() || (result.authorization_checked() && result.scope_checked())
}

/// Programmer-error check, not a security boundary: catches operations that
/// called none of authorize / policy-scope / skip.
fn enforce_guard<E: Entity>(result: &OpResult<E>, action: &ActionName) {
    if !guard_satisfied(result) {
        tracing::error!(
            action = action.as_str(),
            "operation finished without authorization/scope bookkeeping"
        );
        debug_assert!(
            false,
            "operation for action `{}` performed neither an authorization nor a scope call",
            action.as_str()
        );
    }
}

/// Run an operation and map its result to a response.
pub fn endpoint<O, C>(
    op: &O,
    component: &C,
    env: &O::Env,
    params: &Params,
    ctx: &SecurityContext,
    call: &EndpointCall,
) -> Result<Response, Halt>
where
    O: Operation,
    C: Component<Entity = <O::Env as OpEnv>::Entity>,
{
    let result = run(op, env, params, ctx)?;
    enforce_guard(&result, &call.action);
    Ok(respond(op.resource(), component, params, call, result))
}

/// Response-shape selection, separated from the run for direct testing.
pub(crate) fn respond<E, C>(
    resource: ResourceName,
    component: &C,
    params: &Params,
    call: &EndpointCall,
    mut result: OpResult<E>,
) -> Response
where
    E: Entity,
    C: Component<Entity = E>,
{
    let kind = call.action.kind();
    let success = result.is_success();

    match call.format {
        ResponseFormat::Html => {
            if kind.is_mutating() {
                if success || kind == ActionKind::Destroy {
                    Response::Redirect {
                        flash: Flash::from_result(&result),
                        path: redirect_target(&result, call),
                    }
                } else {
                    // Re-render the originating form with errors attached.
                    let flash = Flash::alert_only(&result);
                    let input = component_input(result.take_model(), resource, false, params);
                    Response::Render {
                        view: component.build(&input),
                        flash,
                    }
                }
            } else {
                let flash = Flash::from_result(&result);
                let plural = kind == ActionKind::Index;
                let input = component_input(result.take_model(), resource, plural, params);
                Response::Render {
                    view: component.build(&input),
                    flash,
                }
            }
        }
        ResponseFormat::Script => {
            if success && kind.is_mutating() {
                Response::Script(Script::Navigate {
                    path: redirect_target(&result, call),
                })
            } else {
                let input = component_input(result.take_model(), resource, false, params);
                Response::Script(Script::ReplaceModal {
                    view: component.build(&input),
                })
            }
        }
        ResponseFormat::Json => {
            let listing = search_listing(result.take_model(), resource);
            Response::Search(SearchPayload {
                result: listing.items.iter().map(Entity::search_hit).collect(),
                pagination: Pagination {
                    more: listing.has_more,
                },
            })
        }
        ResponseFormat::Other => {
            let flash = Flash::from_result(&result);
            let input = component_input(result.take_model(), resource, true, params);
            Response::Render {
                view: component.build(&input),
                flash,
            }
        }
    }
}

fn redirect_target<E>(result: &OpResult<E>, call: &EndpointCall) -> String {
    result
        .redirect_path()
        .unwrap_or(&call.fallback_path)
        .to_owned()
}

/// Build the component input from the result model.
///
/// Named-fields models pass through; single records and listings are keyed
/// by the operation's resource name — plural for listing-shaped responses.
fn component_input<E: Entity>(
    model: Model<E>,
    resource: ResourceName,
    plural: bool,
    params: &Params,
) -> ComponentInput<E> {
    let key = if plural {
        resource.plural
    } else {
        resource.singular
    };
    let data = match model {
        Model::Fields(fields) => InputData::Fields(fields),
        Model::Record(record) => InputData::Keyed {
            key,
            value: Field::Record(Some(record)),
        },
        Model::Listing(listing) => InputData::Keyed {
            key,
            value: Field::Listing(listing),
        },
        Model::None => InputData::Keyed {
            key,
            value: Field::Record(None),
        },
    };
    ComponentInput::new(data, params.clone())
}

/// Extract the collection behind a search response.
fn search_listing<E: Entity>(model: Model<E>, resource: ResourceName) -> Listing<E> {
    match model {
        Model::Listing(listing) => listing,
        Model::Fields(fields) => fields
            .into_iter()
            .find(|(name, _)| *name == resource.plural)
            .and_then(|(_, field)| match field {
                Field::Listing(listing) => Some(listing),
                Field::Record(record) => record.map(|r| Listing::new(vec![r])),
            })
            .unwrap_or_default(),
        Model::Record(record) => Listing::new(vec![record]),
        Model::None => Listing::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{Exec, PerformError};
    use crate::result::NoticeLevel;
    use crate::tests_support::{TestEnv, Widget};
    use opkit_ui::TitleRowConfig;

    const RESOURCE: ResourceName = ResourceName::new("widget", "widgets");

    /// Component that records which keys resolved.
    struct Probe;

    impl Component for Probe {
        type Entity = Widget;

        fn build(&self, input: &ComponentInput<Widget>) -> View {
            let title = if input.record("widget").is_some() {
                "record:widget"
            } else if !input.listing("widgets").is_empty() {
                "listing:widgets"
            } else {
                "empty"
            };
            View::TitleRow(TitleRowConfig::new(title))
        }
    }

    fn title_of(view: &View) -> &str {
        match view {
            View::TitleRow(config) => config.title.as_deref().unwrap_or(""),
            _ => panic!("expected title row"),
        }
    }

    struct Configured {
        model: Model<Widget>,
        fail: bool,
        redirect: Option<&'static str>,
    }

    impl Configured {
        fn success(model: Model<Widget>) -> Self {
            Self {
                model,
                fail: false,
                redirect: None,
            }
        }

        fn failing(model: Model<Widget>) -> Self {
            Self {
                model,
                fail: true,
                redirect: None,
            }
        }
    }

    impl Operation for Configured {
        type Env = TestEnv;

        fn resource(&self) -> ResourceName {
            RESOURCE
        }

        fn perform(
            &self,
            x: &mut Exec<'_, TestEnv>,
            _params: &Params,
        ) -> Result<(), PerformError> {
            x.skip_authorize();
            x.skip_policy_scope();
            x.set_model(self.model.clone());
            if let Some(path) = self.redirect {
                x.set_redirect_path(path);
            }
            x.notice("Done", NoticeLevel::Notice);
            if self.fail {
                return Err(PerformError::invalid("Save failed"));
            }
            Ok(())
        }
    }

    fn dispatch(op: &Configured, action: &str, format: ResponseFormat) -> Response {
        let env = TestEnv::allow_all();
        let call = EndpointCall::new(action, format, "/widgets");
        endpoint(
            op,
            &Probe,
            &env,
            &Params::new(),
            &SecurityContext::anonymous(),
            &call,
        )
        .expect("no halt")
    }

    // ── Action classification ───────────────────────────────────────

    #[test]
    fn classify_actions() {
        assert_eq!(ActionName::new("create").kind(), ActionKind::Create);
        assert_eq!(ActionName::new("update").kind(), ActionKind::Update);
        assert_eq!(ActionName::new("destroy").kind(), ActionKind::Destroy);
        // substring containment, inherited behavior
        assert_eq!(ActionName::new("destroy_all").kind(), ActionKind::Destroy);
        assert_eq!(ActionName::new("index").kind(), ActionKind::Index);
        assert_eq!(ActionName::new("show").kind(), ActionKind::Show);
        assert_eq!(ActionName::new("custom").kind(), ActionKind::Other);
        assert!(ActionKind::Destroy.is_mutating());
        assert!(!ActionKind::Edit.is_mutating());
    }

    #[test]
    fn parse_format_param() {
        assert_eq!(ResponseFormat::from_param(None), ResponseFormat::Html);
        assert_eq!(ResponseFormat::from_param(Some("js")), ResponseFormat::Script);
        assert_eq!(ResponseFormat::from_param(Some("json")), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_param(Some("turbo")), ResponseFormat::Other);
    }

    // ── HTML format ─────────────────────────────────────────────────

    #[test]
    fn create_success_redirects_with_notice() {
        let op = Configured {
            redirect: Some("/crm"),
            ..Configured::success(Model::Record(Widget::new("w")))
        };
        match dispatch(&op, "create", ResponseFormat::Html) {
            Response::Redirect { path, flash } => {
                assert_eq!(path, "/crm");
                assert_eq!(flash.notice.as_deref(), Some("Done"));
                assert_eq!(flash.alert, None);
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn create_success_falls_back_to_default_path() {
        let op = Configured::success(Model::Record(Widget::new("w")));
        match dispatch(&op, "create", ResponseFormat::Html) {
            Response::Redirect { path, .. } => assert_eq!(path, "/widgets"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn create_failure_rerenders_with_alert() {
        let op = Configured::failing(Model::Record(Widget::new("w")));
        match dispatch(&op, "create", ResponseFormat::Html) {
            Response::Render { view, flash } => {
                assert_eq!(title_of(&view), "record:widget");
                assert!(flash.alert.as_deref().unwrap_or("").contains("Save failed"));
                assert_eq!(flash.notice, None);
            }
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn destroy_failure_still_redirects() {
        let op = Configured::failing(Model::None);
        match dispatch(&op, "destroy", ResponseFormat::Html) {
            Response::Redirect { path, flash } => {
                assert_eq!(path, "/widgets");
                assert!(flash.alert.is_some());
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn index_renders_under_plural_key() {
        let op = Configured::success(Model::Listing(Listing::new(vec![Widget::new("a")])));
        match dispatch(&op, "index", ResponseFormat::Html) {
            Response::Render { view, .. } => assert_eq!(title_of(&view), "listing:widgets"),
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn show_renders_under_singular_key() {
        let op = Configured::success(Model::Record(Widget::new("a")));
        match dispatch(&op, "show", ResponseFormat::Html) {
            Response::Render { view, .. } => assert_eq!(title_of(&view), "record:widget"),
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn fields_model_passes_through() {
        let op = Configured::success(Model::fields(vec![(
            "widget",
            Field::record(Widget::new("a")),
        )]));
        match dispatch(&op, "edit", ResponseFormat::Html) {
            Response::Render { view, .. } => assert_eq!(title_of(&view), "record:widget"),
            other => panic!("expected render, got {other:?}"),
        }
    }

    // ── Script format ───────────────────────────────────────────────

    #[test]
    fn script_mutation_success_navigates() {
        let op = Configured {
            redirect: Some("/crm"),
            ..Configured::success(Model::None)
        };
        match dispatch(&op, "update", ResponseFormat::Script) {
            Response::Script(Script::Navigate { path }) => assert_eq!(path, "/crm"),
            other => panic!("expected navigate, got {other:?}"),
        }
    }

    #[test]
    fn script_failure_replaces_modal() {
        let op = Configured::failing(Model::Record(Widget::new("w")));
        match dispatch(&op, "update", ResponseFormat::Script) {
            Response::Script(Script::ReplaceModal { view }) => {
                assert_eq!(title_of(&view), "record:widget");
            }
            other => panic!("expected modal replacement, got {other:?}"),
        }
    }

    #[test]
    fn script_read_replaces_modal_even_on_success() {
        let op = Configured::success(Model::Record(Widget::new("w")));
        match dispatch(&op, "new", ResponseFormat::Script) {
            Response::Script(Script::ReplaceModal { .. }) => {}
            other => panic!("expected modal replacement, got {other:?}"),
        }
    }

    // ── Data-interchange format ─────────────────────────────────────

    #[test]
    fn json_builds_search_payload_from_listing() {
        let widgets = vec![Widget::new("alpha"), Widget::new("beta")];
        let op = Configured::success(Model::Listing(
            Listing::new(widgets.clone()).with_more(true),
        ));
        match dispatch(&op, "index", ResponseFormat::Json) {
            Response::Search(payload) => {
                assert_eq!(payload.result.len(), 2);
                assert_eq!(payload.result[0].text, "alpha");
                assert!(payload.pagination.more);
            }
            other => panic!("expected search payload, got {other:?}"),
        }
    }

    #[test]
    fn json_resolves_plural_field_from_fields_model() {
        let op = Configured::success(Model::fields(vec![(
            "widgets",
            Field::listing(vec![Widget::new("a")]),
        )]));
        match dispatch(&op, "index", ResponseFormat::Json) {
            Response::Search(payload) => {
                assert_eq!(payload.result.len(), 1);
                assert!(!payload.pagination.more);
            }
            other => panic!("expected search payload, got {other:?}"),
        }
    }

    // ── Authorization guard ─────────────────────────────────────────

    #[test]
    fn guard_flags_operation_that_skipped_nothing() {
        // A successful result whose operation never touched the
        // authorization helpers violates the invariant...
        let result: OpResult<Widget> = OpResult::new();
        assert!(result.is_success());
        assert!(!guard_satisfied(&result));

        // ...wiring the explicit skips satisfies it...
        let mut skipped: OpResult<Widget> = OpResult::new();
        skipped.mark_authorized();
        skipped.mark_scoped();
        assert!(guard_satisfied(&skipped));

        // ...and a failed result implicitly satisfies both checks.
        let mut failed: OpResult<Widget> = OpResult::new();
        failed.add_base_error("rejected");
        assert!(guard_satisfied(&failed));
    }

    #[test]
    fn guard_requires_both_flags() {
        let mut auth_only: OpResult<Widget> = OpResult::new();
        auth_only.mark_authorized();
        assert!(!guard_satisfied(&auth_only));

        let mut scope_only: OpResult<Widget> = OpResult::new();
        scope_only.mark_scoped();
        assert!(!guard_satisfied(&scope_only));
    }
}
