use sqlx::pool::PoolConnection;
use sqlx::{Database, Pool};
use std::ops::{Deref, DerefMut};

/// A connection used for the duration of one sync.
///
/// `Borrowed` is a connection the caller already holds open; it is left exactly as it was.
/// `Acquired` was taken from the pool by the synchronizer and goes back when the scope drops.
pub enum ConnectionScope<'c, DB: Database> {
    Borrowed(&'c mut DB::Connection),
    Acquired(PoolConnection<DB>),
}

impl<DB: Database> ConnectionScope<'_, DB> {
    pub async fn acquire(pool: &Pool<DB>) -> Result<Self, sqlx::Error> {
        pool.acquire().await.map(ConnectionScope::Acquired)
    }
}

impl<DB: Database> Deref for ConnectionScope<'_, DB> {
    type Target = DB::Connection;

    fn deref(&self) -> &Self::Target {
        match self {
            ConnectionScope::Borrowed(conn) => &**conn,
            ConnectionScope::Acquired(conn) => &**conn,
        }
    }
}

impl<DB: Database> DerefMut for ConnectionScope<'_, DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            ConnectionScope::Borrowed(conn) => &mut **conn,
            ConnectionScope::Acquired(conn) => &mut **conn,
        }
    }
}
