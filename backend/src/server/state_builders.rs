//! Builders wiring repositories into services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use noteshare::domain::ports::{
    FixtureNoteRepository, FixtureStudyRepository, FixtureTagRepository, FixtureUserRepository,
    NoteRepository, StudyRepository, TagRepository, UserRepository,
};
use noteshare::domain::{NoteFeedService, StudyService, TagService, UserService};
use noteshare::inbound::http::state::{HttpState, HttpStatePorts};
use noteshare::outbound::persistence::{
    DbPool, DieselNoteRepository, DieselStudyRepository, DieselTagRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Repository handles shared by the services.
struct Repositories<N, S, T, U> {
    notes: Arc<N>,
    studies: Arc<S>,
    tags: Arc<T>,
    users: Arc<U>,
}

impl
    Repositories<
        DieselNoteRepository,
        DieselStudyRepository,
        DieselTagRepository,
        DieselUserRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            notes: Arc::new(DieselNoteRepository::new(pool.clone())),
            studies: Arc::new(DieselStudyRepository::new(pool.clone())),
            tags: Arc::new(DieselTagRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
        }
    }
}

impl
    Repositories<
        FixtureNoteRepository,
        FixtureStudyRepository,
        FixtureTagRepository,
        FixtureUserRepository,
    >
{
    fn fixtures() -> Self {
        Self {
            notes: Arc::new(FixtureNoteRepository::default()),
            studies: Arc::new(FixtureStudyRepository::default()),
            tags: Arc::new(FixtureTagRepository::default()),
            users: Arc::new(FixtureUserRepository::default()),
        }
    }
}

impl<N, S, T, U> Repositories<N, S, T, U>
where
    N: NoteRepository + 'static,
    S: StudyRepository + 'static,
    T: TagRepository + 'static,
    U: UserRepository + 'static,
{
    fn into_ports(self) -> HttpStatePorts {
        let Self {
            notes,
            studies,
            tags,
            users,
        } = self;
        let study_service = Arc::new(StudyService::new(studies));
        let tag_service = Arc::new(TagService::new(tags, Arc::clone(&users)));
        let user_service = Arc::new(UserService::new(users));
        HttpStatePorts {
            notes: Arc::new(NoteFeedService::new(notes)),
            studies: study_service.clone(),
            studies_command: study_service,
            tags: tag_service.clone(),
            tags_command: tag_service,
            users: user_service.clone(),
            users_command: user_service,
        }
    }
}

/// Build handler state, using Diesel adapters when a pool is configured and
/// in-memory fixtures otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => Repositories::diesel(pool).into_ports(),
        None => {
            info!("no database configured; serving from in-memory fixtures");
            Repositories::fixtures().into_ports()
        }
    };
    web::Data::new(HttpState::with_page_defaults(ports, config.page_defaults))
}
