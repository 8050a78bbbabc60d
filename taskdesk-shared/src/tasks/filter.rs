/// Owner-scoped task query engine
///
/// A [`TaskFilter`] narrows a list query with an optional status and an
/// optional free-text search. The owner predicate is not part of the filter
/// value; it is a required argument of every evaluation, so no filter can
/// widen a query past the caller's own tasks.
///
/// Predicates compose conjunctively:
///
/// ```text
/// user_id = owner
///   AND status = S                                   -- if status is set
///   AND (title ILIKE %Q% OR description ILIKE %Q%)   -- if search is non-empty
/// ```
///
/// The same semantics are available in memory ([`TaskFilter::matches`]) and
/// as parameterized SQL ([`TaskFilter::push_predicates`]).

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::models::task::{Task, TaskStatus};

/// Optional status and search narrowing for a task list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Only tasks with this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Only tasks whose title or description contains this text (case-insensitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl TaskFilter {
    /// A filter matching every task of the owner
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to `status`
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to tasks mentioning `search`
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The effective search term; an empty string counts as no search
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Evaluates the full predicate, owner included, against a task
    pub fn matches(&self, owner_id: i64, task: &Task) -> bool {
        if task.user_id != owner_id {
            return false;
        }

        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        match self.search_term() {
            Some(term) => {
                let needle = fold_case(term);
                fold_case(&task.title).contains(&needle)
                    || fold_case(&task.description).contains(&needle)
            }
            None => true,
        }
    }

    /// Appends the `WHERE` clause for this filter to a query builder
    ///
    /// Every value is bound as a parameter. The search term has its LIKE
    /// metacharacters escaped so it matches literally, and is lowercased by
    /// the database so both sides of the comparison fold the same way.
    ///
    /// # Example
    ///
    /// ```
    /// use sqlx::{Postgres, QueryBuilder};
    /// use taskdesk_shared::models::task::TaskStatus;
    /// use taskdesk_shared::tasks::filter::TaskFilter;
    ///
    /// let filter = TaskFilter::new().with_status(TaskStatus::Done).with_search("milk");
    /// let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM tasks");
    /// filter.push_predicates(12, &mut builder);
    ///
    /// assert_eq!(
    ///     builder.sql(),
    ///     "SELECT * FROM tasks WHERE user_id = $1 AND status = $2 \
    ///      AND (LOWER(title) LIKE LOWER($3) ESCAPE '\\' OR LOWER(description) LIKE LOWER($4) ESCAPE '\\')"
    /// );
    /// ```
    pub fn push_predicates<'args>(&self, owner_id: i64, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push(" WHERE user_id = ");
        builder.push_bind(owner_id);

        if let Some(status) = self.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }

        if let Some(term) = self.search_term() {
            let pattern = format!("%{}%", escape_like(term));
            builder.push(" AND (LOWER(title) LIKE LOWER(");
            builder.push_bind(pattern.clone());
            builder.push(") ESCAPE '\\' OR LOWER(description) LIKE LOWER(");
            builder.push_bind(pattern);
            builder.push(") ESCAPE '\\')");
        }
    }
}

/// Lowercases each character independently of its position in a word
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Escapes `\`, `%` and `_` for use inside a LIKE pattern with `ESCAPE '\'`
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
