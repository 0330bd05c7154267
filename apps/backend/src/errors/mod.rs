//! Error handling for the Encore backend.

pub mod domain;

pub use domain::DomainError;
