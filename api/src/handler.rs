use axum::http::{header, HeaderMap};
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

use crate::app::AppState;
use crate::db::{self, PredictionRepository, UserRepository};
use crate::error::Result;
use crate::schema::{
    CredentialsForm, FieldErrors, PredictionForm, ACCOUNT_EXISTS, FORM_REQUIRED, LOGIN_FAILED, REGISTERED,
};
use crate::session::{self, Session};
use crate::views;

/// Resolve the visitor's session, or the redirect to send when login is
/// required and there is none.
async fn visitor(state: &AppState, headers: &HeaderMap) -> std::result::Result<Option<Session>, Response> {
    let current = state.sessions.current(headers).await;
    if state.require_login && current.is_none() {
        return Err(Redirect::to("/login").into_response());
    }
    Ok(current)
}

pub async fn show_index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match visitor(&state, &headers).await {
        Ok(user) => Html(views::index_page(
            &PredictionForm::default(),
            &FieldErrors::new(),
            None,
            user.as_ref(),
        ))
        .into_response(),
        Err(redirect) => redirect,
    }
}

pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PredictionForm>,
) -> Result<Response> {
    let user = match visitor(&state, &headers).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            info!(fields = ?errors.keys().collect::<Vec<_>>(), "Rejected prediction input");
            return Ok(Html(views::index_page(&form, &errors, None, user.as_ref())).into_response());
        }
    };

    let prediction = state.model.predict(&input.features())?;
    let record = PredictionRepository::create(&state.db, &input, prediction).await?;
    info!(id = record.id, hasil_panen = record.hasil_panen, "Stored prediction");

    Ok(Html(views::index_page(&form, &FieldErrors::new(), Some(prediction), user.as_ref())).into_response())
}

pub async fn history(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let user = match visitor(&state, &headers).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    let records = PredictionRepository::list_all(&state.db).await?;
    Ok(Html(views::history_page(&records, user.as_ref())).into_response())
}

pub async fn show_login() -> Html<String> {
    Html(views::login_page(""))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let Some((username, password)) = form.pair() else {
        return Ok(Html(views::login_page(FORM_REQUIRED)).into_response());
    };

    match UserRepository::find_by_credentials(&state.db, username, password).await? {
        Some(user) => {
            // logging in again from the same browser replaces its session
            if let Some(previous) = session::session_id(&headers) {
                state.sessions.remove(&previous).await;
            }
            let id = state.sessions.create(Session::for_user(&user)).await;
            info!(user_id = user.id, username = %user.username, "Login succeeded");
            Ok((
                [(header::SET_COOKIE, session::session_cookie(id))],
                Redirect::to("/"),
            )
                .into_response())
        }
        None => {
            warn!(username = %username, "Login failed");
            Ok(Html(views::login_page(LOGIN_FAILED)).into_response())
        }
    }
}

pub async fn show_register() -> Html<String> {
    Html(views::register_page("", ""))
}

pub async fn register(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Result<Html<String>> {
    let Some((username, _)) = form.pair() else {
        return Ok(Html(views::register_page(FORM_REQUIRED, "")));
    };

    // a taken username wins over every format rule
    if !username.is_empty() && UserRepository::find_by_username(&state.db, username).await?.is_some() {
        return Ok(Html(views::register_page(ACCOUNT_EXISTS, "")));
    }

    let (username, password) = match form.validate_registration() {
        Ok(pair) => pair,
        Err(msg) => return Ok(Html(views::register_page(msg, ""))),
    };

    match UserRepository::create(&state.db, username, password).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "Registered account");
            Ok(Html(views::register_page("", REGISTERED)))
        }
        // lost a race against a concurrent registration of the same name
        Err(e) if db::is_unique_violation(&e) => Ok(Html(views::register_page(ACCOUNT_EXISTS, ""))),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session::session_id(&headers) {
        if let Some(ended) = state.sessions.remove(&id).await {
            info!(user_id = ended.user_id, "Logged out");
        }
    }

    (
        [(header::SET_COOKIE, session::expired_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}
