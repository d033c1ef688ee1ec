//! Card generation service.
//!
//! Loads the template registry once, then renders cards either
//! synchronously through [`Generator`] or from async code through
//! [`GenerationService`], which offloads each render to the blocking pool.

pub mod config;
pub mod pipeline;
pub mod request;
pub mod service;

pub use config::ServiceConfig;
pub use pipeline::Generator;
pub use request::{parse_jobs, GenerationRequest, JobSpec};
pub use service::GenerationService;

pub use card_common::{CardError, CardResult, FieldName, FieldValues};
pub use renderer::encode::OutputFormat;
