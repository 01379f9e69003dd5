//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    NotesQuery, StudiesCommand, StudiesQuery, TagsCommand, TagsQuery, UsersCommand, UsersQuery,
};

/// Default `limit` values applied when a request omits or mangles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    /// Plain listings.
    pub list: u32,
    /// Name searches.
    pub search: u32,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            list: 10,
            search: 5,
        }
    }
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub notes: Arc<dyn NotesQuery>,
    pub studies: Arc<dyn StudiesQuery>,
    pub studies_command: Arc<dyn StudiesCommand>,
    pub tags: Arc<dyn TagsQuery>,
    pub tags_command: Arc<dyn TagsCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub notes: Arc<dyn NotesQuery>,
    pub studies: Arc<dyn StudiesQuery>,
    pub studies_command: Arc<dyn StudiesCommand>,
    pub tags: Arc<dyn TagsQuery>,
    pub tags_command: Arc<dyn TagsCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub page_defaults: PageDefaults,
}

impl HttpState {
    /// Construct state with the default page limits.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_page_defaults(ports, PageDefaults::default())
    }

    /// Construct state with explicit page limits.
    pub fn with_page_defaults(ports: HttpStatePorts, page_defaults: PageDefaults) -> Self {
        let HttpStatePorts {
            notes,
            studies,
            studies_command,
            tags,
            tags_command,
            users,
            users_command,
        } = ports;
        Self {
            notes,
            studies,
            studies_command,
            tags,
            tags_command,
            users,
            users_command,
            page_defaults,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
