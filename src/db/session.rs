//! Session provider: one pool per process, one `Session` per operation or request.

use crate::db::Entity;
use crate::error::DatabaseError;
use crate::models::{Host, HostGroup};
use crate::settings::DatabaseSettings;
use crate::sql::{self, to_arguments, QueryBuf};
use sqlx::any::AnyPoolOptions;
use sqlx::{Any, AnyPool, Transaction};

/// Builds sessions bound to a shared pool. Cheap to clone.
#[derive(Clone, Debug)]
pub struct SessionFactory {
    pool: AnyPool,
    auto_flush: bool,
    auto_commit: bool,
}

impl SessionFactory {
    /// Install the PostgreSQL and SQLite drivers and connect to `settings.dsn`.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DatabaseError> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.dsn)
            .await?;
        tracing::info!(
            auto_flush = settings.auto_flush,
            auto_commit = settings.auto_commit,
            "database pool ready"
        );
        Ok(Self::from_pool(pool, settings))
    }

    pub fn from_pool(pool: AnyPool, settings: &DatabaseSettings) -> Self {
        SessionFactory {
            pool,
            auto_flush: settings.auto_flush,
            auto_commit: settings.auto_commit,
        }
    }

    /// A fresh session; nothing is shared with sessions handed out earlier.
    pub fn session(&self) -> Session {
        Session {
            pool: self.pool.clone(),
            tx: None,
            pending: Vec::new(),
            auto_flush: self.auto_flush,
            auto_commit: self.auto_commit,
        }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Create the table for one entity if it does not exist.
    pub async fn create_all<T: Entity>(&self) -> Result<(), DatabaseError> {
        let ddl = sql::create_table::<T>();
        tracing::debug!(sql = %ddl, "create table");
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    /// Create every table this crate defines.
    pub async fn create_tables(&self) -> Result<(), DatabaseError> {
        self.create_all::<Host>().await?;
        self.create_all::<HostGroup>().await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Scoped handle to a connection and (lazily begun) transaction.
///
/// Writes are queued until [`flush`](Self::flush). They become durable on
/// [`commit`](Self::commit), or at flush time when `auto_commit` is set.
/// Dropping a session with an open transaction rolls it back.
pub struct Session {
    pool: AnyPool,
    tx: Option<Transaction<'static, Any>>,
    pending: Vec<QueryBuf>,
    auto_flush: bool,
    auto_commit: bool,
}

impl Session {
    /// Queue a write for the next flush.
    pub(crate) fn add(&mut self, q: QueryBuf) {
        self.pending.push(q);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Execute every queued write, in order.
    ///
    /// A failed write rolls the whole session back: the open transaction and
    /// every write it already held are discarded.
    pub async fn flush(&mut self) -> Result<(), DatabaseError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending);
        tracing::debug!(count = pending.len(), "flushing");
        if let Err(e) = self.execute_all(&pending).await {
            tracing::warn!(error = %e, "flush failed, rolling back");
            self.rollback().await?;
            return Err(e);
        }
        Ok(())
    }

    async fn execute_all(&mut self, pending: &[QueryBuf]) -> Result<(), DatabaseError> {
        if self.auto_commit {
            for q in pending {
                tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
                sqlx::query_with(&q.sql, to_arguments(&q.params)?)
                    .execute(&self.pool)
                    .await?;
            }
            return Ok(());
        }
        if self.tx.is_none() {
            self.tx = Some(self.pool.begin().await?);
        }
        if let Some(tx) = self.tx.as_mut() {
            for q in pending {
                tracing::debug!(sql = %q.sql, params = ?q.params, "execute (tx)");
                sqlx::query_with(&q.sql, to_arguments(&q.params)?)
                    .execute(&mut **tx)
                    .await?;
            }
        }
        Ok(())
    }

    /// Flush, then commit the open transaction if there is one.
    pub async fn commit(&mut self) -> Result<(), DatabaseError> {
        self.flush().await?;
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            tracing::debug!("committed");
        }
        Ok(())
    }

    /// Drop queued writes and roll back the open transaction.
    pub async fn rollback(&mut self) -> Result<(), DatabaseError> {
        self.pending.clear();
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
            tracing::debug!("rolled back");
        }
        Ok(())
    }

    pub(crate) async fn fetch_all<T: Entity>(&mut self, q: &QueryBuf) -> Result<Vec<T>, DatabaseError> {
        if self.auto_flush {
            self.flush().await?;
        }
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let query = sqlx::query_as_with::<_, T, _>(&q.sql, to_arguments(&q.params)?);
        let rows = match self.tx.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await?,
            None => query.fetch_all(&self.pool).await?,
        };
        Ok(rows)
    }

    pub(crate) async fn fetch_optional<T: Entity>(
        &mut self,
        q: &QueryBuf,
    ) -> Result<Option<T>, DatabaseError> {
        if self.auto_flush {
            self.flush().await?;
        }
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let query = sqlx::query_as_with::<_, T, _>(&q.sql, to_arguments(&q.params)?);
        let row = match self.tx.as_mut() {
            Some(tx) => query.fetch_optional(&mut **tx).await?,
            None => query.fetch_optional(&self.pool).await?,
        };
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Crud;

    async fn factory(auto_flush: bool) -> SessionFactory {
        let settings = DatabaseSettings {
            auto_flush,
            max_connections: 1,
            ..DatabaseSettings::new("sqlite::memory:")
        };
        let factory = SessionFactory::connect(&settings).await.expect("connect");
        factory.create_tables().await.expect("create tables");
        factory
    }

    #[tokio::test]
    async fn queued_writes_wait_for_flush_without_auto_flush() {
        let factory = factory(false).await;
        let mut session = factory.session();
        let mut host = Host::new("web-01");
        host.save(&mut session).await.expect("save");
        let id = host.id.clone().expect("id");

        session.add(sql::delete::<Host>(&id));
        assert!(session.has_pending());
        assert!(Host::get(&id, &mut session).await.expect("get").is_some());

        session.flush().await.expect("flush");
        assert!(!session.has_pending());
        assert!(Host::get(&id, &mut session).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn reads_flush_first_with_auto_flush() {
        let factory = factory(true).await;
        let mut session = factory.session();
        let mut group = HostGroup::new("edge");
        group.save(&mut session).await.expect("save");
        let id = group.id.clone().expect("id");

        session.add(sql::delete::<HostGroup>(&id));
        assert!(HostGroup::get(&id, &mut session).await.expect("get").is_none());
        assert!(!session.has_pending());
        session.rollback().await.expect("rollback");
        assert!(HostGroup::get(&id, &mut session).await.expect("get").is_some());
    }

    #[tokio::test]
    async fn ping_reaches_the_store() {
        let factory = factory(true).await;
        factory.ping().await.expect("ping");
    }
}
