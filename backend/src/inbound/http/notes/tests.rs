//! Tests for the note feed endpoint.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::ports::MockNotesQuery;
use crate::domain::{ContentCategory, InteractionFlag, NoteId, Role, UserId};
use crate::inbound::http::test_utils::{FixtureWorld, login_as, session_cookie, test_session_middleware};

fn note(owner: &UserId, private: bool, minutes_ago: i64, upvotes: u32) -> Note {
    let at = Utc::now() - Duration::minutes(minutes_ago);
    Note {
        id: NoteId::random(),
        user_id: owner.clone(),
        study_id: None,
        title: format!("note {minutes_ago}"),
        description: None,
        is_private: private,
        upvoted_count: upvotes,
        downvoted_count: 0,
        created_at: at,
        updated_at: at,
    }
}

macro_rules! feed_app {
    ($state:expr) => {
        test::init_service(
            App::new().wrap(test_session_middleware()).service(
                web::scope("/api/v1")
                    .app_data(web::Data::new($state))
                    .service(list_notes)
                    .route("/test-login/{id}", web::post().to(login_as)),
            ),
        )
        .await
    };
}

fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|n| n["title"].as_str().expect("title").to_owned())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn anonymous_home_feed_lists_public_notes_newest_first() {
    let world = FixtureWorld::new();
    let author = world.add_user("author", Role::User);
    world.notes.insert(note(&author, false, 30, 0)).expect("insert");
    world.notes.insert(note(&author, false, 10, 0)).expect("insert");
    world.notes.insert(note(&author, true, 5, 0)).expect("insert");
    let app = feed_app!(world.state.clone());

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/v1/notes").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;

    assert_eq!(titles(&body), ["note 10", "note 30"]);
    assert_eq!(body["totalData"], 2);
    assert_eq!(body["totalPage"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["order"], "new");
    assert_eq!(
        body["orderAvailable"],
        serde_json::json!(["new", "old", "best", "worst"])
    );
}

#[rstest]
#[actix_web::test]
async fn anonymous_saved_feed_is_empty() {
    let world = FixtureWorld::new();
    let author = world.add_user("author", Role::User);
    let saved = note(&author, false, 1, 0);
    world
        .notes
        .mark(saved.id, author.clone(), InteractionFlag::Saved)
        .expect("mark");
    world.notes.insert(saved).expect("insert");
    let app = feed_app!(world.state.clone());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/notes?category=saved")
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;

    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["totalPage"], 0);
}

#[rstest]
#[actix_web::test]
async fn logged_in_viewer_sees_own_private_notes_sorted_by_votes() {
    let world = FixtureWorld::new();
    let viewer = world.add_user("viewer", Role::User);
    let other = world.add_user("other", Role::User);
    world.notes.insert(note(&viewer, true, 3, 7)).expect("insert");
    world.notes.insert(note(&other, false, 2, 9)).expect("insert");
    world.notes.insert(note(&other, true, 1, 99)).expect("insert");
    let app = feed_app!(world.state.clone());

    let login = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/test-login/{viewer}"))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/notes?order=best")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;

    assert_eq!(titles(&body), ["note 2", "note 3"]);
    assert_eq!(body["order"], "best");
}

#[rstest]
#[actix_web::test]
async fn unknown_category_is_bad_request() {
    let mut notes = MockNotesQuery::new();
    notes.expect_feed().times(0);
    let mut state = FixtureWorld::new().state;
    state.notes = Arc::new(notes);
    let app = feed_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/notes?category=everything")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn malformed_paging_and_order_fall_back_to_defaults() {
    let mut notes = MockNotesQuery::new();
    notes
        .expect_feed()
        .withf(|request| {
            request.category == ContentCategory::Home
                && request.order == SortKey::New
                && request.page.page() == 1
                && request.page.limit() == 10
                && request.viewer.is_none()
        })
        .times(1)
        .return_once(|request| {
            Ok(pagination::paginate(
                Vec::new(),
                request.page.page(),
                request.page.limit(),
                0,
                Some(request.order.metadata()),
            ))
        });
    let mut state = FixtureWorld::new().state;
    state.notes = Arc::new(notes);
    let app = feed_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/notes?order=hot&page=zero&limit=-5")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}
