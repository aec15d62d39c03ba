//! gwm core library: domain types, manifest loading, errors.
//!
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`ManifestError`], [`WorkspaceError`]
//! - [`manifest`]: load / validate the workflow manifest

pub mod error;
pub mod manifest;
pub mod types;

pub use error::{ManifestError, WorkspaceError};
pub use manifest::Manifest;
pub use types::{Language, RepositoryProfile, WorkflowDefinition, WorkflowFile, WorkflowName};
