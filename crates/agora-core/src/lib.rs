//! # Agora Core
//!
//! The domain layer of the Agora forum backend: entities, the vote state
//! machine, the ports infrastructure must implement, and the interaction
//! engine that keeps the two embedded copies of every post in step.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::InteractionEngine;
