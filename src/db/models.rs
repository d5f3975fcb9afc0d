use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::sync::ObjectName;

/// One row of a catalog listing query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CatalogRow {
    pub schema_name: String,
    pub object_name: String,
}

impl From<CatalogRow> for ObjectName {
    fn from(row: CatalogRow) -> Self {
        ObjectName::new(row.schema_name, row.object_name)
    }
}
