use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Schema assumed for object names that do not spell one out.
pub const DEFAULT_SCHEMA: &str = "dbo";

/// The kinds of catalog objects the synchronizer manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Procedure,
    Function,
    View,
}

impl ObjectKind {
    /// Sync order for a full run.
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Procedure, ObjectKind::Function, ObjectKind::View];

    /// Singular name used in log lines.
    pub fn display_name(self) -> &'static str {
        match self {
            ObjectKind::Procedure => "stored procedure",
            ObjectKind::Function => "function",
            ObjectKind::View => "view",
        }
    }

    pub fn plural_name(self) -> &'static str {
        match self {
            ObjectKind::Procedure => "procedures",
            ObjectKind::Function => "functions",
            ObjectKind::View => "views",
        }
    }

    /// Resource name prefix used when no namespace is configured.
    pub fn default_namespace(self) -> &'static str {
        match self {
            ObjectKind::Procedure => "StoredProcedures",
            ObjectKind::Function => "Functions",
            ObjectKind::View => "Views",
        }
    }

    /// Regex fragment for the DDL keyword naming this kind.
    pub(crate) fn keyword_pattern(self) -> &'static str {
        match self {
            ObjectKind::Procedure => "PROC(?:EDURE)?",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::View => "VIEW",
        }
    }

    /// Keyword used in `DROP <keyword> IF EXISTS`.
    pub(crate) fn drop_keyword(self) -> &'static str {
        match self {
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::View => "VIEW",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    /// Accepts singular or plural names in any case, plus `proc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "procedure" | "procedures" | "proc" => Ok(ObjectKind::Procedure),
            "function" | "functions" => Ok(ObjectKind::Function),
            "view" | "views" => Ok(ObjectKind::View),
            other => Err(format!(
                "unknown object kind '{other}' (expected procedure, function or view)"
            )),
        }
    }
}

/// Schema-qualified object name. Equality is case-insensitive; the original spelling is kept for
/// display and for the statements issued against the database.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct ObjectName {
    pub schema: String,
    pub name: String,
}

impl ObjectName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Parses `schema.name` or a bare `name` (which gets `default_schema`).
    pub fn parse(qualified: &str, default_schema: &str) -> Option<Self> {
        let qualified = qualified.trim();
        let (schema, name) = match qualified.split_once('.') {
            Some((schema, name)) => (schema.trim(), name.trim()),
            None => (default_schema, qualified),
        };
        if schema.is_empty() || name.is_empty() || name.contains('.') {
            return None;
        }
        Some(Self::new(schema, name))
    }

    /// Lowercased `schema.name`, the comparison key for set operations.
    pub fn key(&self) -> String {
        format!(
            "{}.{}",
            self.schema.to_lowercase(),
            self.name.to_lowercase()
        )
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.schema.to_lowercase() == other.schema.to_lowercase()
            && self.name.to_lowercase() == other.name.to_lowercase()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_applies_default_schema_to_bare_names() {
        let name = ObjectName::parse("Process_Users", DEFAULT_SCHEMA).expect("bare name parses");
        assert_eq!(name.schema, "dbo");
        assert_eq!(name.name, "Process_Users");
        assert_eq!(name.to_string(), "dbo.Process_Users");
    }

    #[test]
    fn kind_parses_from_cli_spellings() {
        assert_eq!("Procedures".parse::<ObjectKind>(), Ok(ObjectKind::Procedure));
        assert_eq!("proc".parse::<ObjectKind>(), Ok(ObjectKind::Procedure));
        assert_eq!("VIEW".parse::<ObjectKind>(), Ok(ObjectKind::View));
        assert!("trigger".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn parse_rejects_empty_and_over_qualified_names() {
        assert!(ObjectName::parse("", DEFAULT_SCHEMA).is_none());
        assert!(ObjectName::parse("dbo.", DEFAULT_SCHEMA).is_none());
        assert!(ObjectName::parse("db.dbo.thing", DEFAULT_SCHEMA).is_none());
    }

    #[test]
    fn equality_and_key_ignore_case() {
        let a = ObjectName::new("DBO", "ActiveUsers");
        let b = ObjectName::new("dbo", "activeusers");
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.to_string(), "DBO.ActiveUsers");
    }
}
