use crate::core::ExecutionFailure;

/// Result of executing a Save or Delete statement.
///
/// Store-side failures (constraint violations, type mismatches, a broken
/// connection) end up here instead of in an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Applied(usize),
    Failed(ExecutionFailure),
}

impl ExecOutcome {
    /// Affected row count, or `-1` when the statement failed.
    pub fn affected_rows(&self) -> i64 {
        match self {
            Self::Applied(rows) => i64::try_from(*rows).unwrap_or(i64::MAX),
            Self::Failed(_) => -1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// True if the statement ran and touched at least one row.
    pub fn changed_rows(&self) -> bool {
        matches!(self, Self::Applied(rows) if *rows > 0)
    }

    pub fn failure(&self) -> Option<&ExecutionFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Applied(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert_eq!(ExecOutcome::Applied(2).affected_rows(), 2);
        assert!(!ExecOutcome::Applied(0).changed_rows());
        let failed = ExecOutcome::Failed(ExecutionFailure {
            sql: "DELETE FROM t WHERE id=:id".into(),
            message: "no such table: t".into(),
        });
        assert_eq!(failed.affected_rows(), -1);
        assert!(!failed.is_success());
        assert_eq!(failed.failure().map(|f| f.message.as_str()), Some("no such table: t"));
    }
}
