use sqlparser::ast::{Query, SetExpr, Statement, Visit, Visitor};
use sqlparser::dialect::{Dialect, PostgreSqlDialect, dialect_from_str};
use sqlparser::parser::Parser;
use std::fmt;
use std::ops::ControlFlow;
use thiserror::Error;

/// Coarse class of a parsed statement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    /// Anything else: SET, COPY, GRANT, TRUNCATE, EXPLAIN, transaction control...
    Command,
}

impl StatementKind {
    pub fn of(statement: &Statement) -> Self {
        match statement {
            Statement::Query(_) => Self::Query,
            Statement::Insert(_) => Self::Insert,
            Statement::Update { .. } => Self::Update,
            Statement::Delete(_) => Self::Delete,
            Statement::CreateTable(_)
            | Statement::CreateView { .. }
            | Statement::CreateIndex(_)
            | Statement::CreateSchema { .. }
            | Statement::CreateDatabase { .. } => Self::Create,
            Statement::Drop { .. } | Statement::DropFunction { .. } => Self::Drop,
            Statement::AlterTable { .. }
            | Statement::AlterIndex { .. }
            | Statement::AlterView { .. } => Self::Alter,
            _ => Self::Command,
        }
    }

    pub fn is_read_only(self) -> bool {
        self == Self::Query
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Query => "query",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Create => "create",
            Self::Drop => "drop",
            Self::Alter => "alter",
            Self::Command => "command",
        };
        f.write_str(name)
    }
}

/// Why a candidate statement was not trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no SQL statement found in model output")]
    EmptyCandidate,
    #[error("SQL does not parse: {0}")]
    Parse(String),
    #[error("expected exactly one statement, found {0}")]
    MultipleStatements(usize),
    #[error("statement of class '{0}' is not an allowed query root")]
    DisallowedRoot(StatementKind),
    #[error("statement contains a nested '{0}' statement")]
    DisallowedNode(StatementKind),
    #[error("query root must be a SELECT, a parenthesized sub-query or a CTE")]
    QueryShape,
    #[error("SELECT ... INTO creates a table")]
    SelectInto,
}

/// SQL that passed [`SqlSafetyValidator::check`].
///
/// Only the validator constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSql(String);

impl ValidatedSql {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Visits every statement and query node of the tree, stopping at the first
// one outside the read-only vocabulary.
struct DenyListWalker;

impl Visitor for DenyListWalker {
    type Break = Rejection;

    fn pre_visit_statement(&mut self, statement: &Statement) -> ControlFlow<Self::Break> {
        let kind = StatementKind::of(statement);
        if kind.is_read_only() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(Rejection::DisallowedNode(kind))
        }
    }

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        match query.body.as_ref() {
            SetExpr::Select(select) if select.into.is_some() => {
                ControlFlow::Break(Rejection::SelectInto)
            }
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Accepts only single, read-only query statements.
#[derive(Debug, Clone)]
pub struct SqlSafetyValidator {
    dialect: String,
}

impl Default for SqlSafetyValidator {
    fn default() -> Self {
        Self {
            dialect: "postgres".to_string(),
        }
    }
}

impl SqlSafetyValidator {
    /// Validator for a dialect name such as "postgres", "duckdb" or "generic".
    /// Returns `None` for names the parser does not know.
    pub fn for_dialect(name: &str) -> Option<Self> {
        dialect_from_str(name).map(|_| Self {
            dialect: name.to_string(),
        })
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn check(&self, candidate: &str) -> Result<ValidatedSql, Rejection> {
        if candidate.trim().trim_end_matches(';').trim().is_empty() {
            return Err(Rejection::EmptyCandidate);
        }

        let dialect = dialect_from_str(&self.dialect)
            .unwrap_or_else(|| Box::new(PostgreSqlDialect {}) as Box<dyn Dialect>);
        let statements = Parser::parse_sql(dialect.as_ref(), candidate)
            .map_err(|e| Rejection::Parse(e.to_string()))?;

        let statement = match statements.as_slice() {
            [statement] => statement,
            other => return Err(Rejection::MultipleStatements(other.len())),
        };

        let Statement::Query(query) = statement else {
            return Err(Rejection::DisallowedRoot(StatementKind::of(statement)));
        };
        if query.with.is_none()
            && !matches!(query.body.as_ref(), SetExpr::Select(_) | SetExpr::Query(_))
        {
            return Err(Rejection::QueryShape);
        }

        if let ControlFlow::Break(rejection) = statement.visit(&mut DenyListWalker) {
            return Err(rejection);
        }

        Ok(ValidatedSql(candidate.to_string()))
    }

    /// `true` when [`check`](Self::check) accepts the candidate. Never panics.
    pub fn validate(&self, candidate: &str) -> bool {
        self.check(candidate).is_ok()
    }
}

/// Validates against the PostgreSQL dialect.
pub fn validate(candidate: &str) -> bool {
    SqlSafetyValidator::default().validate(candidate)
}
