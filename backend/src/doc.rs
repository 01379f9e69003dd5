//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound HTTP layer plus the
//! session cookie security scheme. Response schemas are collected from the
//! `utoipa::path` annotations; the shared domain types are listed explicitly
//! so they appear even when only referenced through generics.
//!
//! The document backs Swagger UI at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::Availability;
use crate::domain::{Error, ErrorCode, FollowOutcome, Note, Role, Study, Tag, User, UserProfile};
use crate::inbound::http::users::{FollowResponse, PublicUser};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie established by the authentication flow.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Noteshare API",
        description = "Study notes feed, studies, tags and user profiles.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::notes::list_notes,
        crate::inbound::http::studies::create_study,
        crate::inbound::http::studies::list_studies,
        crate::inbound::http::studies::search_studies,
        crate::inbound::http::studies::get_study,
        crate::inbound::http::studies::update_study,
        crate::inbound::http::tags::create_tag,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::search_tags,
        crate::inbound::http::tags::get_tag,
        crate::inbound::http::tags::update_tag,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_account,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::check_availability,
        crate::inbound::http::users::toggle_follow,
        crate::inbound::http::users::get_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Note,
        Study,
        Tag,
        User,
        UserProfile,
        Role,
        PublicUser,
        Availability,
        FollowOutcome,
        FollowResponse,
    )),
    tags(
        (name = "notes", description = "Note feed"),
        (name = "studies", description = "Subjects notes are filed under"),
        (name = "tags", description = "Labels attached to notes"),
        (name = "users", description = "Accounts, profiles and follows"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/notes")]
    #[case("/api/v1/studies/search")]
    #[case("/api/v1/tags/{tagId}")]
    #[case("/api/v1/users/follow/{userId}")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_schema_exposes_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "message");
    }

    #[rstest]
    fn public_user_schema_hides_email() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user = schemas.get("PublicUser").expect("PublicUser schema");

        assert_object_schema_has_field(user, "username");
        match user {
            RefOr::T(Schema::Object(obj)) => assert!(!obj.properties.contains_key("email")),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
