//! Table DDL for the demo schema the bundled SQL objects are defined against.
//! Statements are `;`-separated and contain no routine bodies.

/// SQLite schema includes:
/// - `users` table (soft-deleted through `deleted_at`)
/// - `dashboards` table
/// - `user_dashboards` link table (one (user_id, dashboard_id) per row)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL DEFAULT 'User',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP, -- RFC3339
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS dashboards (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    deleted_at TEXT NULL
);

CREATE TABLE IF NOT EXISTS user_dashboards (
    user_id INTEGER NOT NULL REFERENCES users(id),
    dashboard_id INTEGER NOT NULL REFERENCES dashboards(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (user_id, dashboard_id)
);

CREATE INDEX IF NOT EXISTS idx_user_dashboards_dashboard ON user_dashboards(dashboard_id);
"#;

/// PostgreSQL flavour of [`SQLITE_INIT`].
pub const POSTGRES_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL DEFAULT 'User',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ NULL
);

CREATE TABLE IF NOT EXISTS dashboards (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ NULL
);

CREATE TABLE IF NOT EXISTS user_dashboards (
    user_id INTEGER NOT NULL REFERENCES users(id),
    dashboard_id INTEGER NOT NULL REFERENCES dashboards(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (user_id, dashboard_id)
);

CREATE INDEX IF NOT EXISTS idx_user_dashboards_dashboard ON user_dashboards(dashboard_id);
"#;
