//! Static entity descriptors and equality criteria.

use crate::error::DatabaseError;
use serde_json::{Map, Value};
use sqlx::any::AnyRow;
use sqlx::FromRow;

/// Name of the identifier column every entity table carries.
pub const ID_COLUMN: &str = "id";

/// One persisted column besides `id`. Stored as TEXT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub unique: bool,
    pub nullable: bool,
}

impl Field {
    pub const fn text(name: &'static str) -> Self {
        Field {
            name,
            unique: false,
            nullable: false,
        }
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A persistent row type: a name for its table plus a fixed field registry.
///
/// Implementors only describe themselves; every data operation comes from
/// [`Crud`](crate::db::Crud), which is implemented for all entities.
pub trait Entity: for<'r> FromRow<'r, AnyRow> + Clone + Send + Sync + Unpin + 'static {
    /// Type name used in logs and errors; the table is `t_` + its lowercase form.
    const NAME: &'static str;
    /// Columns other than `id`, in table order.
    const FIELDS: &'static [Field];

    fn table_name() -> String {
        format!("t_{}", Self::NAME.to_lowercase())
    }

    /// `id` followed by every field name.
    fn columns() -> Vec<&'static str> {
        std::iter::once(ID_COLUMN)
            .chain(Self::FIELDS.iter().map(|f| f.name))
            .collect()
    }

    fn has_column(name: &str) -> bool {
        name == ID_COLUMN || Self::FIELDS.iter().any(|f| f.name == name)
    }

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Current value of a field, `None` when `name` is not a field.
    fn field_value(&self, name: &str) -> Option<Value>;

    /// Assign a field from a JSON value. Callers check the name first.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), DatabaseError>;
}

/// Helper for `set_field` implementations on TEXT columns.
pub fn text_value<T: Entity>(column: &str, value: Value) -> Result<String, DatabaseError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(DatabaseError::InvalidValue {
            entity: T::NAME,
            column: column.to_string(),
            expected: "a string",
        }),
    }
}

/// Equality filter: every term must hold (AND). Empty matches all rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Criterion {
    terms: Vec<(String, Value)>,
}

impl Criterion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(String, Value)] {
        &self.terms
    }

    /// Fails on the first term naming a column `T` does not have.
    pub fn check<T: Entity>(&self) -> Result<(), DatabaseError> {
        match self.terms.iter().find(|(col, _)| !T::has_column(col)) {
            Some((col, _)) => Err(DatabaseError::UnknownColumn {
                entity: T::NAME,
                column: col.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        f.write_str(&parts.join(" and "))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Criterion {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Criterion {
            terms: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<Map<String, Value>> for Criterion {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}
