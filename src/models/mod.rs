//! Persistent entities and their request/response schemas.

mod host;
mod host_group;

pub use host::{Host, HostBaseSchema, HostSchema};
pub use host_group::{HostGroup, HostGroupBaseSchema, HostGroupSchema};

use crate::error::AppError;

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
