mod postgres;
mod sqlite;

pub use postgres::PgObjectStore;
pub use sqlite::SqliteObjectStore;
