//! The published OpenAPI document covers every REST route.

use noteshare::ApiDoc;
use rstest::rstest;
use utoipa::OpenApi;

#[rstest]
#[case("/api/v1/notes", "get", "listNotes")]
#[case("/api/v1/studies", "post", "createStudy")]
#[case("/api/v1/studies/{studyId}", "patch", "updateStudy")]
#[case("/api/v1/tags/search", "get", "searchTags")]
#[case("/api/v1/users/check-user-availability", "post", "checkUserAvailability")]
#[case("/api/v1/users/profile", "get", "currentUserProfile")]
fn operations_are_published(#[case] path: &str, #[case] method: &str, #[case] operation: &str) {
    let json = serde_json::to_value(ApiDoc::openapi()).expect("serialise document");

    let found = &json["paths"][path][method]["operationId"];
    assert_eq!(found, operation, "{method} {path}");
}
