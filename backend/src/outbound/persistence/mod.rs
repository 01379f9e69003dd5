//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and `bb8` connection pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types; no business logic resides here.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Every database failure is mapped onto the port's error enum.
//!
//! # Example
//!
//! ```no_run
//! use noteshare::outbound::persistence::{DbPool, DieselTagRepository, PoolConfig};
//!
//! # async fn build() -> Result<(), noteshare::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/noteshare")).await?;
//! let tags = DieselTagRepository::new(pool);
//! # let _ = tags;
//! # Ok(())
//! # }
//! ```

mod diesel_note_repository;
mod diesel_study_repository;
mod diesel_tag_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_note_repository::DieselNoteRepository;
pub use diesel_study_repository::DieselStudyRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
