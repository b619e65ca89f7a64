//! Provider layer for Switchboard.
//!
//! One entry point, many text-completion backends. Callers hand a prompt to
//! the [`Router`] and always get a string back: the completion text, or a
//! single `[provider-error] <backend>: <category> - <message>` line.
//!
//! # Architecture
//!
//! - [`backend`] — the closed set of backend identifiers and their aliases
//! - [`registry`] — static credential/endpoint/model bindings per backend
//! - [`adapters`] — per-backend request builders and response extractors
//! - [`detect`] — environment-driven backend auto-detection
//! - [`transport::HttpTransport`] — bounded `reqwest` POST with JSON/text bodies
//! - [`router::Router`] — backend resolution, dispatch, and failure flattening
//! - [`advisor::Advisor`] — persona-prefixed prompts on top of the router

pub mod adapters;
pub mod advisor;
pub mod backend;
pub mod detect;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod router;
pub mod traits;
pub mod transport;

// Re-export main types for convenience
pub use adapters::adapter_for;
pub use advisor::Advisor;
pub use backend::{Backend, Selection};
pub use detect::detect;
pub use error::{ProviderError, ProviderFailure, TransportError, FAILURE_TAG};
pub use registry::{BackendSpec, BACKENDS, DETECTION_ORDER};
pub use router::{route, Router, PROVIDER_ENV};
pub use traits::{Adapter, CompletionOptions, CompletionRequest};
pub use transport::{Body, HttpRequest, HttpTransport, Transport};
