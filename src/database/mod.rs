pub mod connection;
pub mod query;
pub mod store;
pub mod supabase;

pub use store::{DataStore, TransactionQuery};
