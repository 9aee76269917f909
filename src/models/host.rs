use crate::db::{text_value, Entity, Field};
use crate::error::{AppError, DatabaseError};
use crate::models::HostGroupBaseSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A machine known by its hostname. Hostnames are unique in the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Host {
    pub id: Option<String>,
    pub hostname: String,
}

impl Host {
    pub fn new(hostname: impl Into<String>) -> Self {
        Host {
            id: None,
            hostname: hostname.into(),
        }
    }
}

impl Entity for Host {
    const NAME: &'static str = "Host";
    const FIELDS: &'static [Field] = &[Field::text("hostname").unique()];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        match name {
            "hostname" => Some(Value::String(self.hostname.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), DatabaseError> {
        match name {
            "hostname" => self.hostname = text_value::<Self>(name, value)?,
            _ => {
                return Err(DatabaseError::UnknownColumn {
                    entity: Self::NAME,
                    column: name.to_string(),
                })
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBaseSchema {
    pub hostname: String,
}

impl HostBaseSchema {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require("hostname", &self.hostname)
    }
}

impl From<&Host> for HostBaseSchema {
    fn from(host: &Host) -> Self {
        HostBaseSchema {
            hostname: host.hostname.clone(),
        }
    }
}

impl From<HostBaseSchema> for Host {
    fn from(schema: HostBaseSchema) -> Self {
        Host::new(schema.hostname)
    }
}

/// Host with its groups. Groups use the base schema so nesting stops at one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSchema {
    pub hostname: String,
    #[serde(default)]
    pub groups: Vec<HostGroupBaseSchema>,
}

impl HostSchema {
    pub fn new<'a>(host: &Host, groups: impl IntoIterator<Item = &'a super::HostGroup>) -> Self {
        HostSchema {
            hostname: host.hostname.clone(),
            groups: groups.into_iter().map(HostGroupBaseSchema::from).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        super::require("hostname", &self.hostname)?;
        self.groups.iter().try_for_each(HostGroupBaseSchema::validate)
    }
}
