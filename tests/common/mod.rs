//! Shared fixtures: an in-memory SQLite store behind the `Any` driver.

#![allow(dead_code)]

use pyrador::{DatabaseSettings, SessionFactory};

/// One pooled connection: every SQLite `:memory:` connection is its own database.
pub fn memory_settings() -> DatabaseSettings {
    DatabaseSettings {
        max_connections: 1,
        ..DatabaseSettings::new("sqlite::memory:")
    }
}

pub async fn factory_with(settings: DatabaseSettings) -> SessionFactory {
    let factory = SessionFactory::connect(&settings)
        .await
        .expect("failed to connect to in-memory SQLite");
    factory
        .create_tables()
        .await
        .expect("failed to create tables");
    factory
}

pub async fn factory() -> SessionFactory {
    factory_with(memory_settings()).await
}
