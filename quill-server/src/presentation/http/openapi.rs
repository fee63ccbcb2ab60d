use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::app_error::ErrorBody;
use crate::presentation::http::handlers::auth::{
    AuthResponseDto, ChangePasswordDto, LoginDto, RegisterDto, UpdateProfileDto, UserDto,
};
use crate::presentation::http::handlers::health::HealthDto;
use crate::presentation::http::handlers::paragraphs::{ParagraphDto, ParagraphInputDto};
use crate::presentation::http::handlers::posts::{
    CreatePostDto, PostDetailDto, PostDto, UpdatePostDto,
};
use crate::presentation::http::handlers::topics::{CreateTopicDto, TopicDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::health::healthz,
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::auth::check,
        crate::presentation::http::handlers::auth::update_profile,
        crate::presentation::http::handlers::auth::change_password,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::search_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::posts::like_post,
        crate::presentation::http::handlers::paragraphs::append_paragraph,
        crate::presentation::http::handlers::paragraphs::delete_paragraph,
        crate::presentation::http::handlers::topics::list_topics,
        crate::presentation::http::handlers::topics::get_topic,
        crate::presentation::http::handlers::topics::create_topic,
        crate::presentation::http::handlers::users::get_user,
        crate::presentation::http::handlers::users::my_posts,
        crate::presentation::http::handlers::users::my_topics
    ),
    components(
        schemas(
            ErrorBody,
            HealthDto,
            RegisterDto,
            LoginDto,
            UpdateProfileDto,
            ChangePasswordDto,
            AuthResponseDto,
            UserDto,
            CreatePostDto,
            UpdatePostDto,
            PostDto,
            PostDetailDto,
            ParagraphInputDto,
            ParagraphDto,
            CreateTopicDto,
            TopicDto
        )
    ),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "auth", description = "Registration, login and account settings"),
        (name = "posts", description = "Posts, search and likes"),
        (name = "paragraphs", description = "Post content blocks"),
        (name = "topics", description = "Topic catalog"),
        (name = "users", description = "Profiles and per-user listings")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_lists_every_route_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/auth/register",
            "/api/posts",
            "/api/posts/{uuid}",
            "/api/posts/{uuid}/like",
            "/api/paragraphs/{uuid}",
            "/api/topics/{url}",
            "/api/users/me/posts",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components must be present");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
