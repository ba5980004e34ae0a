//! Use-cases - the operations the HTTP layer exposes, expressed over ports.

mod accounts;
mod blog;

pub use accounts::AccountService;
pub use blog::{BlogService, PostDetail};
