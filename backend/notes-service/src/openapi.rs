use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::posts::{CreatePostRequest, DeleteResponse, UpdatePostRequest};
use crate::models::Post;

/// OpenAPI document covering the REST endpoints exposed by notes-service
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::google_login,
        crate::handlers::auth::google_callback,
        crate::handlers::posts::list_posts,
        crate::handlers::posts::create_post,
        crate::handlers::posts::update_post,
        crate::handlers::posts::delete_post
    ),
    components(schemas(Post, CreatePostRequest, UpdatePostRequest, DeleteResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Google login flow"),
        (name = "Posts", description = "Per-user post CRUD")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
