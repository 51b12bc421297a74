/// Configuration management for the notes service
///
/// All settings are read once at startup from environment variables, with
/// development defaults. Production mode tightens the CORS and secret rules.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Session token settings
    pub auth: AuthConfig,
    /// Google OAuth client settings
    pub google: GoogleConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Externally visible origin of this service (used for the OAuth redirect URI)
    pub public_url: String,
    /// Base URL the login flow redirects back to with the issued token
    pub frontend_url: String,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Session token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for session and login-state tokens
    pub jwt_secret: String,
}

/// Google OAuth client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client id; login routes fail until this is set
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with Google
    pub redirect_uri: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5000),
                frontend_url: std::env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| public_url.clone())
                    .trim_end_matches('/')
                    .to_string(),
                public_url: public_url.clone(),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/notes".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: {
                let jwt_secret =
                    std::env::var("JWT_SECRET").unwrap_or_else(|_| "".to_string());
                if app_env.eq_ignore_ascii_case("production")
                    && (jwt_secret.trim().is_empty() || jwt_secret == "dev-secret")
                {
                    return Err(
                        "JWT_SECRET must be set to a non-default value in production".to_string()
                    );
                }

                AuthConfig {
                    jwt_secret: if jwt_secret.is_empty() {
                        "dev-secret".to_string()
                    } else {
                        jwt_secret
                    },
                }
            },
            google: GoogleConfig {
                client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_else(|_| "".to_string()),
                client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                    .unwrap_or_else(|_| "".to_string()),
                redirect_uri: std::env::var("GOOGLE_REDIRECT_URI")
                    .unwrap_or_else(|_| format!("{}/auth/google/callback", public_url)),
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    /// Address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "HOST",
            "PORT",
            "PUBLIC_URL",
            "FRONTEND_URL",
            "CORS_ALLOWED_ORIGINS",
            "DATABASE_URL",
            "DATABASE_MAX_CONNECTIONS",
            "JWT_SECRET",
            "GOOGLE_CLIENT_ID",
            "GOOGLE_CLIENT_SECRET",
            "GOOGLE_REDIRECT_URI",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().expect("default config should load");
        assert_eq!(config.app.port, 5000);
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.frontend_url, "http://localhost:5000");
        assert_eq!(
            config.google.redirect_uri,
            "http://localhost:5000/auth/google/callback"
        );
        assert_eq!(config.auth.jwt_secret, "dev-secret");
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("PUBLIC_URL", "https://notes.example.com/");
        std::env::set_var("FRONTEND_URL", "https://app.example.com");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.public_url, "https://notes.example.com");
        assert_eq!(config.app.frontend_url, "https://app.example.com");
        assert_eq!(
            config.google.redirect_uri,
            "https://notes.example.com/auth/google/callback"
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_secret() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://app.example.com");

        let err = Config::from_env().expect_err("production without JWT_SECRET must fail");
        assert!(err.contains("JWT_SECRET"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_rejects_wildcard_cors() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        std::env::set_var("JWT_SECRET", "a-real-secret");

        let err = Config::from_env().expect_err("wildcard CORS must fail in production");
        assert!(err.contains("CORS_ALLOWED_ORIGINS"));

        clear_env();
    }
}
