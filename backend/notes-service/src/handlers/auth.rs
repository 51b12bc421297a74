/// Google OAuth handlers - login redirect and provider callback
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::metrics::record_oauth_login;
use crate::services::OAuthService;

/// Query parameters Google sends back to the callback endpoint.
///
/// Everything is optional: a cancelled consent screen arrives with `error`
/// set and no `code`.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Start the Google login flow
#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "Auth",
    responses(
        (status = 302, description = "Redirect to the Google consent screen")
    )
)]
pub async fn google_login(oauth: web::Data<OAuthService>) -> Result<HttpResponse, AppError> {
    let url = oauth.start_flow()?;
    Ok(redirect_to(&url))
}

/// Handle the Google callback
///
/// Every failure path lands back on the login page; only a fully completed
/// exchange redirects to the frontend with a session token.
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "Auth",
    responses(
        (status = 302, description = "Redirect to the frontend success page, or to / on failure")
    )
)]
pub async fn google_callback(
    oauth: web::Data<OAuthService>,
    config: web::Data<Config>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    if let Some(err) = query.error.as_deref() {
        tracing::warn!(error = %err, "google login rejected at consent screen");
        record_oauth_login(false);
        return redirect_to("/");
    }

    let (code, state) = match (query.code.as_deref(), query.state.as_deref()) {
        (Some(code), Some(state)) => (code, state),
        _ => {
            tracing::warn!("google callback missing code or state");
            record_oauth_login(false);
            return redirect_to("/");
        }
    };

    match oauth.complete_flow(code, state).await {
        Ok(login) => {
            let target = format!(
                "{}/auth-success?token={}",
                config.app.frontend_url,
                urlencoding::encode(&login.access_token)
            );
            redirect_to(&target)
        }
        Err(err) => {
            tracing::warn!("google login failed: {}", err);
            record_oauth_login(false);
            redirect_to("/")
        }
    }
}
