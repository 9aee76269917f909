//! Shared application state for all routes.

use crate::db::SessionFactory;

#[derive(Clone)]
pub struct AppState {
    /// Each request takes its own session from here.
    pub sessions: SessionFactory,
}
