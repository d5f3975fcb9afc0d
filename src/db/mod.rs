//! Database module: backend detection, catalog access and connection handling.
//!
//! Layout:
//! - `backend.rs`: supported engines and their dialect details
//! - `catalog.rs`: system catalog queries per object kind
//! - `schema.rs`: table DDL the bundled objects depend on
//! - `store.rs`: the `ObjectStore` seam the synchronizer runs against
//! - `backends/`: sqlx-backed stores per engine

pub mod backend;
pub mod backends;
pub mod catalog;
pub mod models;
pub mod pool;
pub mod schema;
pub mod scope;
pub mod store;

pub use backend::Backend;
pub use backends::{PgObjectStore, SqliteObjectStore};
pub use models::CatalogRow;
pub use pool::DbPool;
pub use schema::{POSTGRES_INIT, SQLITE_INIT};
pub use scope::ConnectionScope;
pub use store::ObjectStore;
