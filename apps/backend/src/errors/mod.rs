//! Error handling for the game backend.

pub mod domain;
#[cfg(test)]
mod tests_error_mapping;

pub use domain::DomainError;
