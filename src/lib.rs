//! Pyrador: host inventory backend over a generic, statically described CRUD layer.

pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod response;
pub mod routes;
pub mod settings;
pub mod sql;
pub mod state;

pub use db::{Criterion, Crud, Entity, Field, Session, SessionFactory};
pub use error::{AppError, ConfigError, DatabaseError};
pub use models::{Host, HostBaseSchema, HostGroup, HostGroupBaseSchema, HostGroupSchema, HostSchema};
pub use routes::{app, common_routes, entity_routes};
pub use settings::{DatabaseSettings, Settings};
pub use state::AppState;
