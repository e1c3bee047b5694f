//! Shared test utilities for the pydist workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fakes`]: in-process download and unpack collaborators
//! - [`fixtures`]: managed-directory builders and tree snapshots

pub mod fakes;
pub mod fixtures;
