//! HTTP routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/` | table of contents |
//! | GET | `/read/:id?tab=` | reader |
//! | GET/POST | `/login` | login form / credential check |
//! | POST | `/logout` | clear the editor flag, drop the session |
//! | GET | `/admin?volume=&tab=` | dashboard |
//! | POST | `/admin/edit` | record input, run a toolbar command |
//! | POST | `/admin/save` | record input and save |
//! | POST | `/admin/assist` | confirm, then generate a draft |
//!
//! Every admin route is gated through [`Route::resolve`]; without the editor
//! flag it answers `303 See Other` to `/login`.

use crate::error::ServerError;
use crate::render;
use crate::session::{
    expired_session_cookie, session_cookie, EditorSession, SharedSession, SESSION_COOKIE,
};
use crate::state::AppState;
use huayang_assist::ASSIST_UNAVAILABLE;
use huayang_core::auth;
use huayang_core::{
    home_entries, AssistOutcome, AssistRequest, DashboardError, FormatCommand, LoginError,
    ReaderOutcome, ReaderView, Rendition, Resolution, Route, Selection, VolumeId,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use warp::http::{header, StatusCode};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Largest accepted form body
const FORM_LIMIT: u64 = 4 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct TabQuery {
    tab: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdminQuery {
    volume: Option<String>,
    tab: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct EditForm {
    content: Option<String>,
    command: Option<String>,
    url: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveForm {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistForm {
    confirm: Option<String>,
}

/// The full route table
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let home = warp::path::end()
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(home);

    let reader = warp::path!("read" / String)
        .and(warp::get())
        .and(warp::query::<TabQuery>())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(reader);

    let login_form = warp::path!("login")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(login_form);

    let login = warp::path!("login")
        .and(warp::post())
        .and(form::<LoginForm>())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(login);

    let logout = warp::path!("logout")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(logout);

    let admin = warp::path!("admin")
        .and(warp::get())
        .and(warp::query::<AdminQuery>())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(admin);

    let edit = warp::path!("admin" / "edit")
        .and(warp::post())
        .and(form::<EditForm>())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(edit);

    let save = warp::path!("admin" / "save")
        .and(warp::post())
        .and(form::<SaveForm>())
        .and(with_state(state.clone()))
        .and(cookie())
        .and_then(save);

    let assist = warp::path!("admin" / "assist")
        .and(warp::post())
        .and(form::<AssistForm>())
        .and(with_state(state))
        .and(cookie())
        .and_then(assist);

    home.or(reader)
        .or(login_form)
        .or(login)
        .or(logout)
        .or(admin)
        .or(edit)
        .or(save)
        .or(assist)
        .with(warp::trace::request())
        .recover(recover)
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn cookie() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::cookie::optional(SESSION_COOKIE)
}

fn form<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    warp::body::content_length_limit(FORM_LIMIT).and(warp::body::form::<T>())
}

async fn recover(rejection: Rejection) -> Result<Response, Infallible> {
    let status = if rejection.is_not_found() {
        StatusCode::NOT_FOUND
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        StatusCode::METHOD_NOT_ALLOWED
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        tracing::debug!(?rejection, "request rejected");
        StatusCode::BAD_REQUEST
    };
    let message = status.canonical_reason().unwrap_or("error");
    Ok(page(render::error_page(message), status))
}

// ============================================================================
// Response helpers
// ============================================================================

fn page(html: String, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::html(html), status).into_response()
}

fn see_other(route: &Route) -> Response {
    warp::reply::with_header(StatusCode::SEE_OTHER, header::LOCATION, route.path()).into_response()
}

fn with_cookie(response: Response, value: String) -> Response {
    warp::reply::with_header(response, header::SET_COOKIE, value).into_response()
}

fn respond(result: Result<Response, ServerError>) -> Result<Response, Infallible> {
    Ok(result.unwrap_or_else(|err| {
        tracing::error!(error = %err, "request failed");
        page(render::error_page(&err.to_string()), err.status())
    }))
}

/// Display name when the cookie names a logged-in session
async fn editor_name(state: &AppState, cookie: Option<&str>) -> Option<String> {
    if state.sessions.is_editor(cookie).await {
        Some(state.auth.display_name().to_string())
    } else {
        None
    }
}

/// The session for an admin request, or the redirect the route table dictates
async fn gate(state: &AppState, cookie: Option<&str>) -> Result<SharedSession, Response> {
    let session = state.sessions.find(cookie).map(|(_, s)| s);
    let is_editor = match &session {
        Some(s) => s.lock().await.session.is_editor(),
        None => false,
    };
    match (Route::Admin.resolve(is_editor), session) {
        (Resolution::Render(_), Some(session)) => Ok(session),
        (Resolution::Redirect(to), _) => Err(see_other(&to)),
        (Resolution::Render(_), None) => Err(see_other(&Route::Login)),
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn home(state: AppState, cookie: Option<String>) -> Result<Response, Infallible> {
    let volumes = state.store.list().await;
    let editor = editor_name(&state, cookie.as_deref()).await;
    Ok(page(
        render::home_page(&home_entries(&volumes), editor.as_deref()),
        StatusCode::OK,
    ))
}

async fn reader(
    id: String,
    query: TabQuery,
    state: AppState,
    cookie: Option<String>,
) -> Result<Response, Infallible> {
    let volumes = state.store.list().await;
    let mut view = match ReaderView::open(&volumes, &VolumeId::new(id)) {
        ReaderOutcome::Show(view) => view,
        ReaderOutcome::Redirect(to) => return Ok(see_other(&to)),
    };
    if let Some(tab) = query.tab.as_deref() {
        match tab.parse::<Rendition>() {
            Ok(tab) => view.select(tab),
            Err(err) => tracing::debug!(error = %err, "ignoring tab"),
        }
    }
    let editor = editor_name(&state, cookie.as_deref()).await;
    Ok(page(render::reader_page(&view, editor.as_deref()), StatusCode::OK))
}

async fn login_form(state: AppState, cookie: Option<String>) -> Result<Response, Infallible> {
    let editor = editor_name(&state, cookie.as_deref()).await;
    Ok(page(render::login_page(None, editor.as_deref()), StatusCode::OK))
}

async fn login(
    form: LoginForm,
    state: AppState,
    cookie: Option<String>,
) -> Result<Response, Infallible> {
    respond(login_inner(form, &state, cookie.as_deref()).await)
}

async fn login_inner(
    form: LoginForm,
    state: &AppState,
    cookie: Option<&str>,
) -> Result<Response, ServerError> {
    let existing = state.sessions.find(cookie);
    let shared = match &existing {
        Some((_, session)) => Arc::clone(session),
        None => Arc::new(Mutex::new(EditorSession::open().await?)),
    };

    let result = {
        let mut guard = shared.lock().await;
        auth::login(
            state.auth.as_ref(),
            &mut guard.session,
            &form.username,
            &form.password,
        )
        .await
    };

    match result {
        Ok(route) => match existing {
            Some(_) => Ok(see_other(&route)),
            None => {
                let id = state.sessions.insert(shared);
                Ok(with_cookie(see_other(&route), session_cookie(&id)))
            }
        },
        Err(err @ LoginError::InvalidCredentials) => {
            let editor = editor_name(state, cookie).await;
            Ok(page(
                render::login_page(Some(&err.to_string()), editor.as_deref()),
                StatusCode::OK,
            ))
        }
        Err(err) => Err(err.into()),
    }
}

async fn logout(state: AppState, cookie: Option<String>) -> Result<Response, Infallible> {
    respond(logout_inner(&state, cookie.as_deref()).await)
}

async fn logout_inner(state: &AppState, cookie: Option<&str>) -> Result<Response, ServerError> {
    let Some((id, shared)) = state.sessions.find(cookie) else {
        return Ok(see_other(&Route::Home));
    };
    let route = {
        let mut guard = shared.lock().await;
        let route = auth::logout(&mut guard.session).await?;
        guard.dashboard = None;
        guard.notice = None;
        route
    };
    state.sessions.remove(&id);
    Ok(with_cookie(see_other(&route), expired_session_cookie()))
}

async fn admin(
    query: AdminQuery,
    state: AppState,
    cookie: Option<String>,
) -> Result<Response, Infallible> {
    let shared = match gate(&state, cookie.as_deref()).await {
        Ok(shared) => shared,
        Err(redirect) => return Ok(redirect),
    };
    respond(admin_inner(query, &state, &shared).await)
}

async fn admin_inner(
    query: AdminQuery,
    state: &AppState,
    shared: &SharedSession,
) -> Result<Response, ServerError> {
    let volumes = state.store.list().await;
    let mut guard = shared.lock().await;
    let dashboard = guard.dashboard(&volumes, state.save_indicator)?;

    if let Some(volume) = query.volume.map(VolumeId::new) {
        if &volume != dashboard.selected_id() {
            match dashboard.select_volume(&volumes, &volume) {
                Ok(()) => {}
                Err(DashboardError::VolumeNotFound(_)) => return Ok(see_other(&Route::Admin)),
                Err(err) => return Err(err.into()),
            }
        }
    }
    if let Some(tab) = query.tab.as_deref() {
        match tab.parse::<Rendition>() {
            Ok(tab) if tab != dashboard.tab() => dashboard.select_tab(&volumes, tab)?,
            Ok(_) => {}
            Err(_) => return Ok(see_other(&Route::Admin)),
        }
    }

    let guard = &mut *guard;
    let notice = guard.notice.take();
    let Some(dashboard) = guard.dashboard.as_ref() else {
        return Ok(see_other(&Route::Admin));
    };
    let html = render::admin_page(
        &volumes,
        dashboard,
        notice.as_deref(),
        Some(state.auth.display_name()),
        Instant::now(),
    );
    Ok(page(html, StatusCode::OK))
}

async fn edit(form: EditForm, state: AppState, cookie: Option<String>) -> Result<Response, Infallible> {
    let shared = match gate(&state, cookie.as_deref()).await {
        Ok(shared) => shared,
        Err(redirect) => return Ok(redirect),
    };
    respond(edit_inner(form, &state, &shared).await)
}

/// `name` or `name:arg`, with the image URL taken from its own field
fn parse_command(value: &str, url: Option<&str>) -> Result<FormatCommand, DashboardError> {
    let (name, arg) = match value.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (value, None),
    };
    let arg = if name == "insertImage" { url.or(arg) } else { arg };
    Ok(FormatCommand::parse(name, arg)?)
}

fn parse_selection(from: Option<&str>, to: Option<&str>) -> Selection {
    let parse = |field: Option<&str>| field.and_then(|s| s.trim().parse::<usize>().ok());
    let start = parse(from).unwrap_or(0);
    let end = parse(to).unwrap_or(start + 1);
    Selection::new(start, end)
}

async fn edit_inner(
    form: EditForm,
    state: &AppState,
    shared: &SharedSession,
) -> Result<Response, ServerError> {
    let volumes = state.store.list().await;
    let mut guard = shared.lock().await;
    let dashboard = guard.dashboard(&volumes, state.save_indicator)?;

    if let Some(content) = form.content {
        dashboard.edit(content);
    }
    let outcome = match form.command.as_deref().filter(|c| !c.is_empty()) {
        Some(value) => parse_command(value, form.url.as_deref()).map(|command| {
            let selection = parse_selection(form.from.as_deref(), form.to.as_deref());
            dashboard.format(&command, selection)
        }),
        None => Ok(false),
    };
    dashboard.blur();

    if let Err(err) = outcome {
        tracing::debug!(error = %err, "format command rejected");
        guard.notice = Some(err.to_string());
    }
    Ok(see_other(&Route::Admin))
}

async fn save(form: SaveForm, state: AppState, cookie: Option<String>) -> Result<Response, Infallible> {
    let shared = match gate(&state, cookie.as_deref()).await {
        Ok(shared) => shared,
        Err(redirect) => return Ok(redirect),
    };
    respond(save_inner(form, &state, &shared).await)
}

async fn save_inner(
    form: SaveForm,
    state: &AppState,
    shared: &SharedSession,
) -> Result<Response, ServerError> {
    let volumes = state.store.list().await;
    let mut guard = shared.lock().await;
    let dashboard = guard.dashboard(&volumes, state.save_indicator)?;

    if let Some(content) = form.content {
        dashboard.edit(content);
    }
    dashboard.blur();
    let updated = dashboard.save(&volumes)?;
    state.store.update(updated).await?;
    Ok(see_other(&Route::Admin))
}

async fn assist(
    form: AssistForm,
    state: AppState,
    cookie: Option<String>,
) -> Result<Response, Infallible> {
    let shared = match gate(&state, cookie.as_deref()).await {
        Ok(shared) => shared,
        Err(redirect) => return Ok(redirect),
    };
    respond(assist_inner(form, &state, &shared).await)
}

async fn assist_inner(
    form: AssistForm,
    state: &AppState,
    shared: &SharedSession,
) -> Result<Response, ServerError> {
    let confirmed = form.confirm.as_deref() == Some("yes");
    let volumes = state.store.list().await;

    let request = {
        let mut guard = shared.lock().await;
        let dashboard = guard.dashboard(&volumes, state.save_indicator)?;
        let (selected, tab) = (dashboard.selected_id().clone(), dashboard.tab());
        match dashboard.begin_assist(&volumes, confirmed) {
            Ok(request) => request,
            Err(DashboardError::NotConfirmed) => {
                let title = volumes
                    .iter()
                    .find(|v| v.id == selected)
                    .map(|v| v.title.as_str())
                    .unwrap_or_default();
                let html = render::confirm_assist_page(title, tab, Some(state.auth.display_name()));
                return Ok(page(html, StatusCode::OK));
            }
            Err(DashboardError::AssistInFlight) => return Ok(see_other(&Route::Admin)),
            Err(err) if err.is_assist_refusal() => {
                guard.notice = Some(err.to_string());
                return Ok(see_other(&Route::Admin));
            }
            Err(err) => return Err(err.into()),
        }
    };

    // Detached so the request settles even if the client goes away
    let task = tokio::spawn(draft(state.clone(), Arc::clone(shared), request.clone()));
    if let Err(err) = task.await {
        tracing::error!(error = %err, "AI assist task failed");
        settle(shared, &request, Err(ASSIST_UNAVAILABLE.to_string())).await;
    }
    Ok(see_other(&Route::Admin))
}

async fn draft(state: AppState, shared: SharedSession, request: AssistRequest) {
    let result = state
        .assist
        .generate(&request.original, request.target)
        .await
        .map_err(|e| e.user_message().to_string());
    settle(&shared, &request, result).await;
}

/// Hand a generation result to the session's dashboard
async fn settle(shared: &SharedSession, request: &AssistRequest, result: Result<String, String>) {
    let mut guard = shared.lock().await;
    let session = &mut *guard;
    let Some(dashboard) = session.dashboard.as_mut() else {
        tracing::debug!("session logged out during generation, dropping draft");
        return;
    };
    match dashboard.finish_assist(request, result) {
        Ok(AssistOutcome::Applied) => {}
        Ok(AssistOutcome::Failed(message)) => session.notice = Some(message),
        Err(err) => tracing::debug!(error = %err, "AI draft not applied"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_values() {
        assert_eq!(parse_command("bold", None).unwrap(), FormatCommand::Bold);
        assert_eq!(
            parse_command("formatBlock:H3", None).unwrap(),
            FormatCommand::Heading(3)
        );
        assert_eq!(
            parse_command("insertImage", Some("https://img/a.png")).unwrap(),
            FormatCommand::InsertImage(Some("https://img/a.png".into()))
        );
        assert!(matches!(
            parse_command("fontSize:7", None),
            Err(DashboardError::Format(_))
        ));
    }

    #[test]
    fn selection_defaults_to_one_block() {
        assert_eq!(parse_selection(None, None), Selection::new(0, 1));
        assert_eq!(parse_selection(Some("2"), Some("")), Selection::new(2, 3));
        assert_eq!(parse_selection(Some("1"), Some("4")), Selection::new(1, 4));
        assert_eq!(parse_selection(Some("x"), None), Selection::new(0, 1));
    }
}
