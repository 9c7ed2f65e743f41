use super::RawResult;
use crate::error::{ExecError, ExecResult};

/// Statement verbs that produce an execution outcome.
///
/// Classification is a lexical prefix test on the trimmed text, not a parse:
/// leading comments, CTEs and multi-statement batches are not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Update,
    Delete,
    Insert,
    Replace,
}

/// What the outcome of a statement means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Number of rows changed.
    RowsAffected,
    /// Identifier generated by the statement.
    LastInsertId,
}

impl StatementKind {
    const KEYWORDS: [(&'static str, StatementKind); 4] = [
        ("update", StatementKind::Update),
        ("delete", StatementKind::Delete),
        ("insert", StatementKind::Insert),
        ("replace", StatementKind::Replace),
    ];

    /// Detect the statement kind from its leading keyword (case-insensitive).
    pub fn classify(sql: &str) -> Option<Self> {
        let trimmed = sql.trim();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| starts_with_keyword(trimmed, keyword))
            .map(|&(_, kind)| kind)
    }

    pub fn outcome(self) -> Outcome {
        match self {
            StatementKind::Update | StatementKind::Delete => Outcome::RowsAffected,
            StatementKind::Insert | StatementKind::Replace => Outcome::LastInsertId,
        }
    }
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}

/// Turn a driver result into the statement's outcome.
///
/// `update`/`delete` yield rows affected, `insert`/`replace` the generated
/// identifier. Any other verb fails with [`ExecError::UnsupportedStatementKind`].
pub fn interpret(sql: &str, result: &RawResult) -> ExecResult<i64> {
    let kind = StatementKind::classify(sql).ok_or_else(|| ExecError::unsupported_kind(sql))?;
    match kind.outcome() {
        Outcome::RowsAffected => result.rows_affected(),
        Outcome::LastInsertId => result.last_insert_id(),
    }
}
