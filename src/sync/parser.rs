//! DDL text handling: target-name extraction and batch splitting.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error as ThisError;

use super::object::{ObjectKind, ObjectName};

/// A line holding only `GO` (any case) separates independently executed batches.
static BATCH_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*GO[ \t]*\r?$").expect("valid batch separator pattern")
});

static EXTRACTORS: LazyLock<Vec<NameExtractor>> =
    LazyLock::new(|| ObjectKind::ALL.into_iter().map(NameExtractor::new).collect());

const CREATE_OR_ALTER: &str = r"\b(?:CREATE(?:\s+OR\s+(?:ALTER|REPLACE))?|ALTER)\s+";
const IDENTIFIER: &str = r#"\[\w+\]|"\w+"|\w+"#;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum NameError {
    #[error("no CREATE/ALTER {0} statement found")]
    MissingHeader(ObjectKind),

    #[error("identifier could not be read from the DDL or the resource name")]
    Unresolvable,
}

/// Reads the target object of a resource for one object kind.
#[derive(Debug)]
pub struct NameExtractor {
    kind: ObjectKind,
    header: Regex,
    identifier: Regex,
}

impl NameExtractor {
    pub fn new(kind: ObjectKind) -> Self {
        let keyword = kind.keyword_pattern();
        let header = Regex::new(&format!(r"(?i){CREATE_OR_ALTER}{keyword}\b"))
            .expect("valid DDL header pattern");
        let identifier = Regex::new(&format!(
            r"(?i){CREATE_OR_ALTER}{keyword}\s+(?:(?P<schema>{IDENTIFIER})\s*\.\s*)?(?P<name>{IDENTIFIER})(?:\s|\(|;|$)"
        ))
        .expect("valid DDL identifier pattern");

        Self {
            kind,
            header,
            identifier,
        }
    }

    /// Shared extractor for `kind`.
    pub fn for_kind(kind: ObjectKind) -> &'static NameExtractor {
        EXTRACTORS
            .iter()
            .find(|e| e.kind == kind)
            .expect("an extractor exists for every object kind")
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Extracts the target name from the DDL header, falling back to the resource naming
    /// convention when the header exists but its identifier cannot be read.
    ///
    /// A body without any `CREATE|ALTER <kind>` header is rejected outright.
    pub fn extract(
        &self,
        resource_name: &str,
        body: &str,
        namespace: &str,
        default_schema: &str,
    ) -> Result<ObjectName, NameError> {
        if !self.header.is_match(body) {
            return Err(NameError::MissingHeader(self.kind));
        }

        if let Some(caps) = self.identifier.captures(body) {
            let name = unquote(&caps["name"]);
            let schema = caps
                .name("schema")
                .map(|m| unquote(m.as_str()))
                .unwrap_or(default_schema);
            return Ok(ObjectName::new(schema, name));
        }

        name_from_resource(resource_name, namespace, default_schema).ok_or(NameError::Unresolvable)
    }
}

/// Derives `schema.name` from `<namespace>.<schema>.<name>.sql` or `<namespace>.<name>.sql`.
pub fn name_from_resource(
    resource_name: &str,
    namespace: &str,
    default_schema: &str,
) -> Option<ObjectName> {
    let rest = strip_prefix_ignore_case(resource_name, namespace).unwrap_or(resource_name);
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let stem = strip_suffix_ignore_case(rest, ".sql")?;
    ObjectName::parse(stem, default_schema)
}

/// Splits a resource body into batches on `GO` lines, dropping blank batches.
pub fn split_batches(sql: &str) -> Vec<&str> {
    BATCH_SEPARATOR
        .split(sql)
        .map(str::trim)
        .filter(|batch| !batch.is_empty())
        .collect()
}

fn unquote(ident: &str) -> &str {
    ident.trim_matches(|c| c == '[' || c == ']' || c == '"')
}

pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

pub(crate) fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let tail = s.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..split])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::object::DEFAULT_SCHEMA;

    fn extract(kind: ObjectKind, resource: &str, body: &str) -> Result<ObjectName, NameError> {
        NameExtractor::for_kind(kind).extract(
            resource,
            body,
            kind.default_namespace(),
            DEFAULT_SCHEMA,
        )
    }

    #[test]
    fn extracts_bracketed_schema_and_name() {
        let name = extract(
            ObjectKind::Procedure,
            "StoredProcedures.dbo.Process_Users.sql",
            "CREATE PROCEDURE [dbo].[Process_Users]\n    @Active bit\nAS\nBEGIN\n  SELECT 1\nEND",
        )
        .expect("name extracted");
        assert_eq!(name.to_string(), "dbo.Process_Users");
    }

    #[test]
    fn accepts_short_proc_keyword_and_create_or_alter() {
        let name = extract(
            ObjectKind::Procedure,
            "StoredProcedures.x.sql",
            "create or alter proc reporting.Rebuild AS SELECT 1",
        )
        .expect("name extracted");
        assert_eq!(name, ObjectName::new("reporting", "Rebuild"));
    }

    #[test]
    fn bare_name_gets_default_schema() {
        let name = extract(
            ObjectKind::View,
            "Views.ActiveUsers.sql",
            "CREATE VIEW ActiveUsers AS SELECT * FROM Users WHERE IsActive = 1",
        )
        .expect("name extracted");
        assert_eq!(name.to_string(), "dbo.ActiveUsers");
    }

    #[test]
    fn function_name_followed_by_parenthesis() {
        let name = extract(
            ObjectKind::Function,
            "Functions.public.dashboard_count.sql",
            "CREATE OR REPLACE FUNCTION public.dashboard_count(p_user integer) RETURNS integer",
        )
        .expect("name extracted");
        assert_eq!(name.to_string(), "public.dashboard_count");
    }

    #[test]
    fn header_for_another_kind_is_a_missing_header() {
        let err = extract(
            ObjectKind::View,
            "Views.dbo.Nope.sql",
            "CREATE PROCEDURE dbo.Nope AS SELECT 1",
        )
        .unwrap_err();
        assert_eq!(err, NameError::MissingHeader(ObjectKind::View));
    }

    #[test]
    fn unreadable_identifier_falls_back_to_resource_name() {
        let name = extract(
            ObjectKind::View,
            "Views.reporting.user_totals.sql",
            "CREATE VIEW \"user-totals\" AS SELECT 1",
        )
        .expect("fallback name");
        assert_eq!(name.to_string(), "reporting.user_totals");
    }

    #[test]
    fn fallback_without_schema_uses_default() {
        assert_eq!(
            name_from_resource("views.Totals.SQL", "Views", DEFAULT_SCHEMA),
            Some(ObjectName::new("dbo", "Totals"))
        );
        assert_eq!(name_from_resource("Views.Totals.txt", "Views", DEFAULT_SCHEMA), None);
    }

    #[test]
    fn split_batches_on_go_lines_only() {
        let sql = "DROP VIEW IF EXISTS v\nGO\n\ncreate view v as select 'GO' as go_column\n  go  \n\nGO\n";
        let batches = split_batches(sql);
        assert_eq!(
            batches,
            vec![
                "DROP VIEW IF EXISTS v",
                "create view v as select 'GO' as go_column"
            ]
        );
    }

    #[test]
    fn split_batches_handles_crlf() {
        let batches = split_batches("SELECT 1\r\nGO\r\nSELECT 2\r\n");
        assert_eq!(batches, vec!["SELECT 1", "SELECT 2"]);
    }
}
