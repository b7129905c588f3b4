//! Transactional store operations
//!
//! Synchronous functions over the shared redb handle; handlers call them
//! inside `tokio::task::spawn_blocking`. Every mutation is a single write
//! transaction, and write transactions serialize, so each operation is
//! atomic with respect to concurrent requests.

pub mod articles;
pub mod cooldown;
pub mod interactions;
pub mod users;
