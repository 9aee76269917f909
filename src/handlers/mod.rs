//! HTTP handlers for entity CRUD.

pub mod entity;
pub mod hosts;
pub use entity::*;
pub use hosts::*;
