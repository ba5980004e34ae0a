//! In-memory store - used when no database is configured, and in tests.

mod store;

pub use store::InMemoryBlogStore;
