pub mod common;
pub mod memory;
pub mod postgres;
pub mod remote;
pub mod request_store;

pub use memory::InMemoryRequestStore;
pub use postgres::PgRequestStore;
pub use remote::RemoteRequestStore;
pub use request_store::{RequestStore, StoreError};

#[cfg(test)]
pub use request_store::MockRequestStore;
