//! # docchat-core
//!
//! Core library for docchat - a terminal client for a document
//! question-answering service.
//!
//! This library provides:
//! - Domain types for documents, chat messages, answers and status regions
//! - The client state machine ([`Orchestrator`]) and its components
//! - An HTTP client for the backend and a dispatcher that runs it off-thread
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! State changes flow in one direction:
//! - **Actions:** user input calls an [`Orchestrator`] operation, which
//!   validates locally and returns a [`Request`]
//! - **Requests:** the [`Dispatcher`] runs each request against a [`Backend`]
//! - **Completions:** results come back as [`Completion`]s and are applied
//!   to the orchestrator on the UI thread
//!
//! ## Example
//!
//! ```rust,no_run
//! use docchat_core::{Config, Dispatcher, HttpBackend, Orchestrator};
//!
//! let config = Config::load().expect("failed to load config");
//! let backend = HttpBackend::new(&config.backend).expect("invalid backend config");
//! let (dispatcher, mut completions) = Dispatcher::new(backend).expect("runtime");
//!
//! let mut orch = Orchestrator::new();
//! orch.forms.website_url = "https://example.com".to_string();
//! if let Some(request) = orch.submit_website() {
//!     dispatcher.dispatch(request);
//! }
//! if let Some(completion) = completions.wait() {
//!     orch.apply(completion);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use client::{Backend, HttpBackend};
pub use config::Config;
pub use dispatch::{Completions, Dispatcher};
pub use error::{Error, Failure, Outcome, Result};
pub use orchestrator::{Completion, Operation, Orchestrator, Request};
pub use stats::SessionStats;
pub use types::*;

// Public modules
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod format;
pub mod logging;
pub mod markup;
pub mod orchestrator;
pub mod registry;
pub mod stats;
pub mod status;
pub mod transcript;
pub mod types;
