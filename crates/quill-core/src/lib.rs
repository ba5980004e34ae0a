//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! Posts, comments and the rules around them live here, with zero
//! infrastructure dependencies. Storage and authentication are reached
//! through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::BlogService;
