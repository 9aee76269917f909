//! Data access: entity descriptors, sessions, and the generic CRUD capability.

mod crud;
mod entity;
mod session;

pub use crud::{generate_id, Crud};
pub use entity::{text_value, Criterion, Entity, Field, ID_COLUMN};
pub use session::{Session, SessionFactory};
