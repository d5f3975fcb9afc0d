//! System catalog queries listing user-defined objects.
//!
//! Every query yields `schema_name` and `object_name` text columns. Objects owned by an extension
//! count as system-shipped and are left out.

pub const PG_PROCEDURES: &str = r#"
SELECT DISTINCT n.nspname::text AS schema_name, p.proname::text AS object_name
FROM pg_catalog.pg_proc p
JOIN pg_catalog.pg_namespace n ON n.oid = p.pronamespace
WHERE p.prokind = 'p'
  AND n.nspname NOT IN ('pg_catalog', 'information_schema')
  AND n.nspname NOT LIKE 'pg\_toast%'
  AND NOT EXISTS (
      SELECT 1 FROM pg_catalog.pg_depend d
      WHERE d.classid = 'pg_catalog.pg_proc'::regclass
        AND d.objid = p.oid
        AND d.deptype = 'e'
  )
ORDER BY schema_name, object_name
"#;

pub const PG_FUNCTIONS: &str = r#"
SELECT DISTINCT n.nspname::text AS schema_name, p.proname::text AS object_name
FROM pg_catalog.pg_proc p
JOIN pg_catalog.pg_namespace n ON n.oid = p.pronamespace
WHERE p.prokind = 'f'
  AND n.nspname NOT IN ('pg_catalog', 'information_schema')
  AND n.nspname NOT LIKE 'pg\_toast%'
  AND NOT EXISTS (
      SELECT 1 FROM pg_catalog.pg_depend d
      WHERE d.classid = 'pg_catalog.pg_proc'::regclass
        AND d.objid = p.oid
        AND d.deptype = 'e'
  )
ORDER BY schema_name, object_name
"#;

pub const PG_VIEWS: &str = r#"
SELECT n.nspname::text AS schema_name, c.relname::text AS object_name
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE c.relkind = 'v'
  AND n.nspname NOT IN ('pg_catalog', 'information_schema')
  AND NOT EXISTS (
      SELECT 1 FROM pg_catalog.pg_depend d
      WHERE d.classid = 'pg_catalog.pg_class'::regclass
        AND d.objid = c.oid
        AND d.deptype = 'e'
  )
ORDER BY schema_name, object_name
"#;

pub const SQLITE_VIEWS: &str = r#"
SELECT 'main' AS schema_name, name AS object_name
FROM sqlite_master
WHERE type = 'view'
  AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
ORDER BY name
"#;
