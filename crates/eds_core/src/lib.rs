pub mod aggregate;
pub mod config;
pub mod documents;
pub mod domain;
pub mod error;
pub mod validate;
