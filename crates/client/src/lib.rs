//! Client code for the todos workspace.
//!
//! This crate provides the PostgREST-backed implementation of
//! [`todos_core::Collection`] used by the server.

pub mod postgrest;

pub use postgrest::{PostgrestClient, PostgrestConfig, PostgrestError};
