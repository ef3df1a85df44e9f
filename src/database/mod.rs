pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{ResourceStore, UserStore};
