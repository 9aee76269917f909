//! Generic CRUD for every [`Entity`], executed through an explicit [`Session`].

use crate::db::{Criterion, Entity, Session, ID_COLUMN};
use crate::error::DatabaseError;
use crate::sql;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
pub trait Crud: Entity {
    /// Insert when the value has no id or no row carries its id, otherwise
    /// update every column. Always commits, then reloads from the stored row.
    async fn save(&mut self, session: &mut Session) -> Result<&mut Self, DatabaseError> {
        tracing::debug!("{}: saving #{}", Self::NAME, self.id().unwrap_or_default());
        let existing = match self.id() {
            Some(id) => Self::get(id, session).await?.is_some(),
            None => false,
        };
        let id = match self.id() {
            Some(id) => id.to_string(),
            None => {
                let id = generate_id();
                self.set_id(id.clone());
                id
            }
        };
        if existing {
            session.add(sql::update(&*self, &id));
        } else {
            tracing::debug!("{}: creating #{}", Self::NAME, id);
            session.add(sql::insert(&*self, &id));
        }
        session.commit().await?;
        let fresh = Self::get(&id, session)
            .await?
            .ok_or(DatabaseError::Sqlx(sqlx::Error::RowNotFound))?;
        *self = fresh;
        Ok(self)
    }

    /// Assign `changes` column by column, then [`save`](Crud::save).
    ///
    /// Every key is checked before anything is assigned: an unknown column,
    /// the id column, or a wrongly typed value leaves `self` untouched and
    /// writes nothing. When the save itself fails, `self` is restored to its
    /// previous value.
    async fn update(
        &mut self,
        changes: &Map<String, Value>,
        session: &mut Session,
    ) -> Result<&mut Self, DatabaseError> {
        let mut next = self.clone();
        for (key, value) in changes {
            if key == ID_COLUMN {
                return Err(DatabaseError::ImmutableColumn {
                    entity: Self::NAME,
                    column: key.clone(),
                });
            }
            if !Self::has_column(key) {
                return Err(DatabaseError::UnknownColumn {
                    entity: Self::NAME,
                    column: key.clone(),
                });
            }
            tracing::debug!(
                "{}: updating {} to {} on #{}",
                Self::NAME,
                key,
                value,
                self.id().unwrap_or_default()
            );
            next.set_field(key, value.clone())?;
        }
        let previous = std::mem::replace(self, next);
        if let Err(e) = self.save(session).await.map(|_| ()) {
            *self = previous;
            return Err(e);
        }
        Ok(self)
    }

    /// Delete the row and flush. Not committed: the caller decides.
    async fn delete(&self, session: &mut Session) -> Result<(), DatabaseError> {
        let id = self.id().ok_or(DatabaseError::Transient { entity: Self::NAME })?;
        tracing::debug!("{}: deleting #{}", Self::NAME, id);
        session.add(sql::delete::<Self>(id));
        session.flush().await
    }

    /// Every row, in whatever order the store returns them.
    async fn all(session: &mut Session) -> Result<Vec<Self>, DatabaseError> {
        tracing::debug!("{}: fetching all", Self::NAME);
        session.fetch_all(&sql::select_all::<Self>()).await
    }

    /// The row with this id, `None` when absent.
    async fn get(id: &str, session: &mut Session) -> Result<Option<Self>, DatabaseError> {
        tracing::debug!("{}: fetching #{}", Self::NAME, id);
        session.fetch_optional(&sql::select_by_id::<Self>(id)).await
    }

    async fn find_all(
        criterion: &Criterion,
        session: &mut Session,
    ) -> Result<Vec<Self>, DatabaseError> {
        tracing::debug!("{}: fetching all with filter {}", Self::NAME, criterion);
        let q = sql::select_where::<Self>(criterion, None)?;
        session.fetch_all(&q).await
    }

    async fn find_first(
        criterion: &Criterion,
        session: &mut Session,
    ) -> Result<Option<Self>, DatabaseError> {
        tracing::debug!("{}: fetching first with filter {}", Self::NAME, criterion);
        let q = sql::select_where::<Self>(criterion, Some(1))?;
        session.fetch_optional(&q).await
    }

    /// The only match, or `None`.
    ///
    /// More than one match is also `None`, not an error: callers that need
    /// to tell "missing" from "ambiguous" must use [`find_all`](Crud::find_all).
    async fn find_one(
        criterion: &Criterion,
        session: &mut Session,
    ) -> Result<Option<Self>, DatabaseError> {
        tracing::info!("{}: fetching one with filter", Self::NAME);
        let mut matches = Self::find_all(criterion, session).await?;
        match matches.len() {
            0 => {
                tracing::debug!("{}: no match found", Self::NAME);
                Ok(None)
            }
            1 => Ok(matches.pop()),
            n => {
                tracing::warn!("{}: too many matches found ({})", Self::NAME, n);
                Ok(None)
            }
        }
    }
}

impl<T: Entity> Crud for T {}
