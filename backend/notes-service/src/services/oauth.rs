/// Google OAuth login flow
///
/// `start_flow` hands the browser to Google's consent screen carrying a signed
/// state token; `complete_flow` verifies that token, exchanges the returned
/// code for an access token, fetches the profile, and resolves it to a local
/// user. The whole round trip is stateless on the server side.
use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::metrics::record_oauth_login;
use crate::models::User;
use crate::security::jwt;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// The profile scope is all the login needs: an external id and a name.
const GOOGLE_SCOPE: &str = "profile";

#[derive(Clone)]
pub struct OAuthService {
    config: Config,
    db: sqlx::PgPool,
    http: Client,
}

/// Outcome of a completed login
pub struct OAuthLogin {
    pub user_id: Uuid,
    pub access_token: String,
    pub is_new_user: bool,
}

/// Fields used from Google's userinfo response
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    name: Option<String>,
}

impl OAuthService {
    pub fn new(config: Config, db: sqlx::PgPool) -> Self {
        Self {
            config,
            db,
            http: Client::new(),
        }
    }

    /// Build the consent-screen URL for a fresh login attempt
    pub fn start_flow(&self) -> Result<String> {
        let state = jwt::generate_state_token(&self.config.auth.jwt_secret)
            .map_err(|e| AppError::OAuth(format!("Failed to mint login state: {}", e)))?;
        self.google_authorize_url(&state)
    }

    /// Handle the provider callback: verify state, exchange the code, and
    /// resolve the profile to a local user with a session token.
    pub async fn complete_flow(&self, code: &str, state: &str) -> Result<OAuthLogin> {
        jwt::validate_state_token(state, &self.config.auth.jwt_secret)
            .map_err(|e| AppError::OAuth(format!("Invalid login state: {}", e)))?;

        let profile = self.exchange_google(code).await?;

        let (user, is_new_user) = self.resolve_user(&profile).await?;

        let access_token = jwt::generate_access_token(user.id, &self.config.auth.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to mint session token: {}", e)))?;

        record_oauth_login(true);
        if is_new_user {
            tracing::info!(user_id = %user.id, "created user on first Google login");
        }

        Ok(OAuthLogin {
            user_id: user.id,
            access_token,
            is_new_user,
        })
    }

    fn google_authorize_url(&self, state: &str) -> Result<String> {
        if self.config.google.client_id.is_empty() {
            return Err(AppError::OAuth("Google client ID missing".into()));
        }

        let mut url = reqwest::Url::parse(GOOGLE_AUTH_URL).expect("valid google auth url");
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.google.client_id)
            .append_pair("redirect_uri", &self.config.google.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", GOOGLE_SCOPE)
            .append_pair("state", state);
        Ok(url.to_string())
    }

    async fn exchange_google(&self, code: &str) -> Result<GoogleProfile> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        if self.config.google.client_secret.is_empty() {
            return Err(AppError::OAuth("Google client secret missing".into()));
        }

        let mut params = HashMap::new();
        params.insert("code", code.to_string());
        params.insert("client_id", self.config.google.client_id.clone());
        params.insert("client_secret", self.config.google.client_secret.clone());
        params.insert("redirect_uri", self.config.google.redirect_uri.clone());
        params.insert("grant_type", "authorization_code".to_string());

        let token_resp = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Google token request failed: {}", e)))?;

        if !token_resp.status().is_success() {
            return Err(AppError::OAuth(format!(
                "Google token request failed with status {}",
                token_resp.status()
            )));
        }

        let token: TokenResponse = token_resp.json().await.map_err(|e| {
            AppError::OAuth(format!("Failed to parse Google token response: {}", e))
        })?;

        let user_resp = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to fetch Google profile: {}", e)))?;

        if !user_resp.status().is_success() {
            return Err(AppError::OAuth(format!(
                "Google userinfo failed with status {}",
                user_resp.status()
            )));
        }

        user_resp
            .json()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to parse Google profile: {}", e)))
    }

    /// Find the user for this Google identity, creating one on first sight
    async fn resolve_user(&self, profile: &GoogleProfile) -> Result<(User, bool)> {
        if let Some(user) = user_repo::find_by_google_id(&self.db, &profile.id).await? {
            return Ok((user, false));
        }

        let name = profile.name.as_deref().unwrap_or("Unknown");
        let user = user_repo::create_user(&self.db, &profile.id, name).await?;
        Ok((user, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, GoogleConfig};
    use sqlx::postgres::PgPoolOptions;

    fn test_config() -> Config {
        Config {
            app: AppConfig {
                env: "development".to_string(),
                host: "127.0.0.1".to_string(),
                port: 5000,
                public_url: "http://localhost:5000".to_string(),
                frontend_url: "http://localhost:5000".to_string(),
            },
            cors: CorsConfig {
                allowed_origins: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/notes".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
            },
            google: GoogleConfig {
                client_id: "client-123.apps.googleusercontent.com".to_string(),
                client_secret: "shhh".to_string(),
                redirect_uri: "http://localhost:5000/auth/google/callback".to_string(),
            },
        }
    }

    fn test_service(config: Config) -> OAuthService {
        // Lazy pool, never actually connected by these tests
        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy("postgresql://localhost/notes")
            .expect("lazy pool");
        OAuthService::new(config, db)
    }

    #[tokio::test]
    async fn test_authorize_url_contains_required_params() {
        let service = test_service(test_config());

        let url = service.start_flow().expect("authorize url");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123.apps.googleusercontent.com"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=profile"));
        assert!(url.contains("state="));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A5000%2Fauth%2Fgoogle%2Fcallback"
        ));
    }

    #[tokio::test]
    async fn test_authorize_url_requires_client_id() {
        let mut config = test_config();
        config.google.client_id = String::new();
        let service = test_service(config);

        assert!(service.start_flow().is_err());
    }

    #[test]
    fn test_google_profile_deserializes_without_name() {
        let profile: GoogleProfile =
            serde_json::from_str(r#"{"id": "108177", "picture": "https://x"}"#).unwrap();
        assert_eq!(profile.id, "108177");
        assert!(profile.name.is_none());
    }

    #[tokio::test]
    async fn test_forged_state_is_rejected_before_the_code_exchange() {
        let service = test_service(test_config());

        // State check happens first, so no token request ever leaves the
        // process for this call.
        let result = service.complete_flow("code-from-google", "forged-state").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_access_token_is_not_accepted_as_login_state() {
        let config = test_config();
        let token = jwt::generate_access_token(Uuid::new_v4(), &config.auth.jwt_secret)
            .expect("access token");
        let service = test_service(config);

        let result = service.complete_flow("code-from-google", &token).await;
        assert!(result.is_err());
    }
}
