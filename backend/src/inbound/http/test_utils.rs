//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::domain::ports::{
    FixtureNoteRepository, FixtureStudyRepository, FixtureTagRepository, FixtureUserRepository,
};
use crate::domain::{
    Email, Error, NoteFeedService, Role, StudyService, TagService, User, UserId, UserProfile,
    UserService, Username,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Route stand-in for the external login flow: `/test-login/{user_id}`.
pub async fn login_as(
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Build a user with the given handle and role.
pub fn sample_user(name: &str, role: Role) -> User {
    User {
        id: UserId::random(),
        username: Username::new(name).expect("valid username"),
        email: Email::new(format!("{name}@example.com")).expect("valid email"),
        role,
        profile: UserProfile::default(),
        follower_count: 0,
        following_count: 0,
        created_at: Utc::now(),
    }
}

/// Fixture repositories plus an [`HttpState`] whose services use them.
pub struct FixtureWorld {
    pub notes: Arc<FixtureNoteRepository>,
    pub studies: Arc<FixtureStudyRepository>,
    pub tags: Arc<FixtureTagRepository>,
    pub users: Arc<FixtureUserRepository>,
    pub state: HttpState,
}

impl FixtureWorld {
    pub fn new() -> Self {
        let notes = Arc::new(FixtureNoteRepository::default());
        let studies = Arc::new(FixtureStudyRepository::default());
        let tags = Arc::new(FixtureTagRepository::default());
        let users = Arc::new(FixtureUserRepository::default());

        let study_service = Arc::new(StudyService::new(Arc::clone(&studies)));
        let tag_service = Arc::new(TagService::new(Arc::clone(&tags), Arc::clone(&users)));
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

        Self {
            notes,
            studies,
            tags,
            users,
            state,
        }
    }

    /// Store a user and return its id.
    pub fn add_user(&self, name: &str, role: Role) -> UserId {
        let user = sample_user(name, role);
        let id = user.id.clone();
        self.users.insert(user).expect("insert user");
        id
    }
}
