//! # Quill Shared
//!
//! Request and response shapes shared by the blog server's handlers and views.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
