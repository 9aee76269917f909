//! Builds parameterized DDL, INSERT, SELECT, UPDATE, DELETE from entity descriptors.

use crate::db::{Criterion, Entity, ID_COLUMN};
use crate::error::DatabaseError;
use serde_json::Value;

/// Quote identifier (safe: names only come from static descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

fn select_column_list<T: Entity>() -> String {
    T::columns()
        .into_iter()
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// CREATE TABLE IF NOT EXISTS with a TEXT primary key `id` and one TEXT column per field.
pub fn create_table<T: Entity>() -> String {
    let mut defs = vec![format!("{} TEXT NOT NULL PRIMARY KEY", quoted(ID_COLUMN))];
    for f in T::FIELDS {
        let mut def = format!("{} TEXT", quoted(f.name));
        if !f.nullable {
            def.push_str(" NOT NULL");
        }
        if f.unique {
            def.push_str(" UNIQUE");
        }
        defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(&T::table_name()),
        defs.join(", ")
    )
}

/// SELECT every row. No ORDER BY: the store decides.
pub fn select_all<T: Entity>() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {}",
        select_column_list::<T>(),
        quoted(&T::table_name())
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id<T: Entity>(id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::String(id.to_string()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list::<T>(),
        quoted(&T::table_name()),
        quoted(ID_COLUMN),
        n
    );
    q
}

/// SELECT rows matching every criterion term, optional LIMIT. Unknown columns are an error.
pub fn select_where<T: Entity>(
    criterion: &Criterion,
    limit: Option<u32>,
) -> Result<QueryBuf, DatabaseError> {
    criterion.check::<T>()?;
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in criterion.terms() {
        let n = q.push_param(val.clone());
        where_parts.push(format!("{} = ${}", quoted(col), n));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{}{}",
        select_column_list::<T>(),
        quoted(&T::table_name()),
        where_clause,
        limit_clause
    );
    Ok(q)
}

/// INSERT every column; the entity must already carry an id.
pub fn insert<T: Entity>(entity: &T, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = vec![quoted(ID_COLUMN)];
    let mut placeholders = vec![format!("${}", q.push_param(Value::String(id.to_string())))];
    for f in T::FIELDS {
        let val = entity.field_value(f.name).unwrap_or(Value::Null);
        let n = q.push_param(val);
        cols.push(quoted(f.name));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(&T::table_name()),
        cols.join(", "),
        placeholders.join(", ")
    );
    q
}

/// UPDATE every non-id column by id.
pub fn update<T: Entity>(entity: &T, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for f in T::FIELDS {
        let val = entity.field_value(f.name).unwrap_or(Value::Null);
        let n = q.push_param(val);
        sets.push(format!("{} = ${}", quoted(f.name), n));
    }
    let id_param = q.push_param(Value::String(id.to_string()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(&T::table_name()),
        sets.join(", "),
        quoted(ID_COLUMN),
        id_param
    );
    q
}

/// DELETE by id.
pub fn delete<T: Entity>(id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::String(id.to_string()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(&T::table_name()),
        quoted(ID_COLUMN),
        n
    );
    q
}
