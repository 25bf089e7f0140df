pub mod lotes;
pub mod manager;
pub mod models;
pub mod usuarios;

pub use manager::{DatabaseError, DatabaseManager};
