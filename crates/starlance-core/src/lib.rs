//! Core types and definitions for the STARLANCE simulation kernel.
//!
//! This crate defines the vocabulary shared across all other crates:
//! entity ids, components, events, tuning and content tables.
//! It has no dependency on the ECS store or any presentation layer.

pub mod components;
pub mod content;
pub mod enums;
pub mod error;
pub mod events;
pub mod tuning;
pub mod types;
