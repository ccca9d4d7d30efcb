//! # Coursewright
//!
//! A course builder backend: authors create courses made of ordered sections
//! and activities, configure how they are presented, sold and accessed, and
//! publish them to their sites. Usable both as a standalone binary and as a
//! library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! coursewright = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use coursewright::server::{AppState, create_router};
//! use coursewright::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/coursewright.db")?;
//! store.initialize()?;
//!
//! let state = Arc::new(AppState::new(Arc::new(store), PathBuf::from("./data")));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! The authoring rules are plain functions over a [`store::Store`] and can be
//! driven without the HTTP layer:
//!
//! ```rust,ignore
//! use coursewright::authoring::CourseEditor;
//!
//! let mut editor = CourseEditor::open(&store, &course_id)?;
//! let section = editor.add_section("Getting started", "")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod auth;
pub mod authoring;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
