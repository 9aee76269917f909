use crate::db::{text_value, Entity, Field};
use crate::error::{AppError, DatabaseError};
use crate::models::{Host, HostBaseSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HostGroup {
    pub id: Option<String>,
    pub name: String,
}

impl HostGroup {
    pub fn new(name: impl Into<String>) -> Self {
        HostGroup {
            id: None,
            name: name.into(),
        }
    }
}

impl Entity for HostGroup {
    const NAME: &'static str = "HostGroup";
    const FIELDS: &'static [Field] = &[Field::text("name")];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::String(self.name.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), DatabaseError> {
        match name {
            "name" => self.name = text_value::<Self>(name, value)?,
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
pub struct HostGroupBaseSchema {
    pub name: String,
}

impl HostGroupBaseSchema {
    pub fn validate(&self) -> Result<(), AppError> {
        super::require("name", &self.name)
    }
}

impl From<&HostGroup> for HostGroupBaseSchema {
    fn from(group: &HostGroup) -> Self {
        HostGroupBaseSchema {
            name: group.name.clone(),
        }
    }
}

impl From<HostGroupBaseSchema> for HostGroup {
    fn from(schema: HostGroupBaseSchema) -> Self {
        HostGroup::new(schema.name)
    }
}

/// Group with its member hosts, each as a base schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostGroupSchema {
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<HostBaseSchema>,
}

impl HostGroupSchema {
    pub fn new<'a>(group: &HostGroup, hosts: impl IntoIterator<Item = &'a Host>) -> Self {
        HostGroupSchema {
            name: group.name.clone(),
            hosts: hosts.into_iter().map(HostBaseSchema::from).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        super::require("name", &self.name)?;
        self.hosts.iter().try_for_each(HostBaseSchema::validate)
    }
}
