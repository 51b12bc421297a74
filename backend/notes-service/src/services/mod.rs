pub mod oauth;

pub use oauth::{OAuthLogin, OAuthService};
