use serde::{Deserialize, Serialize};

use crate::sync::ObjectKind;

/// Resource name prefix per object kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamespaceConfig {
    /// TOML: `namespaces.procedures`. Env: `SQLSYNC_NAMESPACES__PROCEDURES`.
    /// Default: `StoredProcedures`.
    #[serde(default = "default_procedures")]
    pub procedures: String,

    /// TOML: `namespaces.functions`. Default: `Functions`.
    #[serde(default = "default_functions")]
    pub functions: String,

    /// TOML: `namespaces.views`. Default: `Views`.
    #[serde(default = "default_views")]
    pub views: String,
}

impl NamespaceConfig {
    pub fn for_kind(&self, kind: ObjectKind) -> &str {
        match kind {
            ObjectKind::Procedure => &self.procedures,
            ObjectKind::Function => &self.functions,
            ObjectKind::View => &self.views,
        }
    }
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            procedures: default_procedures(),
            functions: default_functions(),
            views: default_views(),
        }
    }
}

fn default_procedures() -> String {
    ObjectKind::Procedure.default_namespace().to_string()
}

fn default_functions() -> String {
    ObjectKind::Function.default_namespace().to_string()
}

fn default_views() -> String {
    ObjectKind::View.default_namespace().to_string()
}
