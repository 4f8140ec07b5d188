use serde_json::Value;

/// Field name that addresses the document identifier rather than a body field.
pub const ID_FIELD: &str = "_id";

/// A single filter condition. All conditions of a filter must hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A top-level body field equals the value, by text form or, for
    /// numeric values, numerically.
    Equals { field: String, value: String },
    /// A dotted path (`employees.employee`) reaches a string or number equal
    /// to the value. Arrays along the path match when any element does.
    PathEquals { path: Vec<String>, value: String },
    /// The document identifier equals the value.
    IdEquals(String),
    /// The document body contains the given JSON (Postgres `@>` semantics).
    Contains(Value),
}

/// Whether soft-deleted documents take part in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Live,
    WithDeleted,
}

impl Scope {
    pub fn includes_deleted(&self) -> bool {
        matches!(self, Scope::WithDeleted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Json(Value),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
