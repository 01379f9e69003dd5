//! End-to-end HTTP behaviour over the in-memory fixture repositories.
//!
//! The session cookie is normally issued by the external authentication
//! flow; these tests mount a `/test-login/{id}` route that stores the viewer
//! id the same way.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use chrono::{Duration, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use noteshare::Trace;
use noteshare::domain::ports::{
    FixtureNoteRepository, FixtureStudyRepository, FixtureTagRepository, FixtureUserRepository,
};
use noteshare::domain::{
    Email, Error, InteractionFlag, Note, NoteFeedService, NoteId, Role, StudyService, TagService,
    User, UserId, UserProfile, UserService, Username,
};
use noteshare::inbound::http::configure_api;
use noteshare::inbound::http::session::SessionContext;
use noteshare::inbound::http::state::{HttpState, HttpStatePorts};

struct World {
    notes: Arc<FixtureNoteRepository>,
    users: Arc<FixtureUserRepository>,
    state: web::Data<HttpState>,
}

impl World {
    fn add_user(&self, name: &str, role: Role) -> UserId {
        let id = UserId::random();
        self.users
            .insert(User {
                id: id.clone(),
                username: Username::new(name).expect("valid username"),
                email: Email::new(format!("{name}@example.com")).expect("valid email"),
                role,
                profile: UserProfile::default(),
                follower_count: 0,
                following_count: 0,
                created_at: Utc::now(),
            })
            .expect("insert user");
        id
    }

    fn add_note(&self, owner: &UserId, title: &str, private: bool, minutes_ago: i64) -> NoteId {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        let id = NoteId::random();
        self.notes
            .insert(Note {
                id,
                user_id: owner.clone(),
                study_id: None,
                title: title.to_owned(),
                description: None,
                is_private: private,
                upvoted_count: 0,
                downvoted_count: 0,
                created_at: at,
                updated_at: at,
            })
            .expect("insert note");
        id
    }
}

#[fixture]
fn world() -> World {
    let notes = Arc::new(FixtureNoteRepository::default());
    let studies = Arc::new(FixtureStudyRepository::default());
    let tags = Arc::new(FixtureTagRepository::default());
    let users = Arc::new(FixtureUserRepository::default());

    let study_service = Arc::new(StudyService::new(studies));
    let tag_service = Arc::new(TagService::new(tags, Arc::clone(&users)));
    let user_service = Arc::new(UserService::new(Arc::clone(&users)));
    let state = HttpState::new(HttpStatePorts {
        notes: Arc::new(NoteFeedService::new(Arc::clone(&notes))),
        studies: study_service.clone(),
        studies_command: study_service,
        tags: tag_service.clone(),
        tags_command: tag_service,
        users: user_service.clone(),
        users_command: user_service,
    });

    World {
        notes,
        users,
        state: web::Data::new(state),
    }
}

async fn login_as(
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::Ok().finish())
}

async fn api(
    world: &World,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new().app_data(world.state.clone()).wrap(Trace).service(
            web::scope("/api/v1")
                .wrap(session)
                .route("/test-login/{id}", web::get().to(login_as))
                .configure(configure_api),
        ),
    )
    .await
}

async fn login<S>(app: &S, id: &UserId) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/test-login/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

async fn json_of(res: ServiceResponse) -> Value {
    test::read_body_json(res).await
}

#[rstest]
#[actix_web::test]
async fn home_feed_depends_on_viewer(world: World) {
    let ada = world.add_user("ada", Role::User);
    let grace = world.add_user("grace", Role::User);
    world.add_note(&ada, "public", false, 3);
    world.add_note(&ada, "ada private", true, 2);
    let shared = world.add_note(&grace, "grace shared", true, 1);
    world.add_note(&grace, "grace secret", true, 0);
    world.notes.grant(shared, ada.clone()).expect("grant");
    let app = api(&world).await;

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/notes").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::OK);
    assert!(anonymous.headers().contains_key("trace-id"));
    let body = json_of(anonymous).await;
    assert_eq!(body["totalData"], 1);
    assert_eq!(body["data"][0]["title"], "public");

    let cookie = login(&app, &ada).await;
    let viewer = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/notes?order=new")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body = json_of(viewer).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|note| note["title"].as_str())
        .collect();
    assert_eq!(titles, ["grace shared", "ada private", "public"]);
    assert_eq!(body["order"], "new");
}

#[rstest]
#[actix_web::test]
async fn saved_feed_needs_a_viewer(world: World) {
    let ada = world.add_user("ada", Role::User);
    let note = world.add_note(&ada, "keeper", false, 0);
    world.add_note(&ada, "skipped", false, 1);
    world
        .notes
        .mark(note, ada.clone(), InteractionFlag::Saved)
        .expect("mark");
    let app = api(&world).await;

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/notes?category=saved")
            .to_request(),
    )
    .await;
    let body = json_of(anonymous).await;
    assert_eq!(body["totalData"], 0);
    assert_eq!(body["totalPage"], 0);

    let cookie = login(&app, &ada).await;
    let viewer = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/notes?category=saved")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body = json_of(viewer).await;
    assert_eq!(body["totalData"], 1);
    assert_eq!(body["data"][0]["title"], "keeper");
}

#[rstest]
#[actix_web::test]
async fn study_lifecycle(world: World) {
    let ada = world.add_user("ada", Role::User);
    let app = api(&world).await;
    let cookie = login(&app, &ada).await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/studies")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Linear Algebra", "description": "Vectors" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = json_of(created).await;
    assert_eq!(body["message"], "Create study successful");
    let id = body["data"]["id"].as_str().expect("study id").to_owned();

    let search = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/studies/search?name=algebra")
            .to_request(),
    )
    .await;
    assert_eq!(search.status(), StatusCode::OK);
    let body = json_of(search).await;
    assert_eq!(body["data"][0]["id"], id.as_str());
    assert_eq!(body["limit"], 5);

    let updated = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/studies/{id}"))
            .cookie(cookie)
            .set_json(json!({ "description": "Matrices" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let body = json_of(updated).await;
    assert_eq!(body["data"]["description"], "Matrices");
    assert_eq!(body["data"]["name"], "Linear Algebra");

    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/studies/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn creating_a_study_requires_a_session(world: World) {
    let app = api(&world).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/studies")
            .set_json(json!({ "name": "Physics" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json_of(res).await;
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[case(Role::User, StatusCode::FORBIDDEN)]
#[case(Role::Admin, StatusCode::OK)]
#[actix_web::test]
async fn tag_rename_is_admin_only(world: World, #[case] role: Role, #[case] expected: StatusCode) {
    let actor = world.add_user("actor", role);
    let app = api(&world).await;
    let cookie = login(&app, &actor).await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "rust" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = json_of(created).await["data"]["id"]
        .as_str()
        .expect("tag id")
        .to_owned();

    let renamed = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/tags/{id}"))
            .cookie(cookie)
            .set_json(json!({ "name": "rustlang" }))
            .to_request(),
    )
    .await;

    assert_eq!(renamed.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn follow_toggles_and_rejects_self(world: World) {
    let ada = world.add_user("ada", Role::User);
    let grace = world.add_user("grace", Role::User);
    let app = api(&world).await;
    let cookie = login(&app, &ada).await;

    let follow = |target: &UserId| {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/users/follow/{target}"))
            .cookie(cookie.clone())
            .to_request()
    };

    let first = json_of(test::call_service(&app, follow(&grace)).await).await;
    assert_eq!(first["message"], "Follow user successful");
    let second = json_of(test::call_service(&app, follow(&grace)).await).await;
    assert_eq!(second["message"], "Unfollow user successful");

    let own = test::call_service(&app, follow(&ada)).await;
    assert_eq!(own.status(), StatusCode::BAD_REQUEST);

    let profile = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{grace}"))
            .to_request(),
    )
    .await;
    let body = json_of(profile).await;
    assert_eq!(body["followerCount"], 0);
    assert!(body.get("email").is_none());
}

#[rstest]
#[actix_web::test]
async fn profile_route_wins_over_user_id(world: World) {
    let ada = world.add_user("ada", Role::User);
    let app = api(&world).await;
    let cookie = login(&app, &ada).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_of(res).await;
    assert_eq!(body["email"], "ada@example.com");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_error_payload(world: World) {
    let ada = world.add_user("ada", Role::User);
    let app = api(&world).await;
    let cookie = login(&app, &ada).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .cookie(cookie)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_of(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "invalid_body");
}
