use std::collections::{BTreeMap, HashMap};

use serde_json::{json, Map, Value};

use super::error::FilterError;
use super::filter_match::FilterMatch;
use super::types::{Condition, Scope, SqlParam, SqlResult, ID_FIELD};
use crate::id::DocumentId;

/// Columns every collection table exposes, in `DocumentRow` order.
pub const DOCUMENT_COLUMNS: &str = "id, doc, created_at, updated_at, deleted_at";

/// Exact-match filter over stored documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Filter that matches every document in scope.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from `field=value` query-string pairs.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, FilterError> {
        // Sort for deterministic SQL
        let sorted: BTreeMap<&String, &String> = params.iter().collect();
        let mut filter = Self::all();
        for (field, value) in sorted {
            filter = filter.equals(field, value)?;
        }
        Ok(filter)
    }

    pub fn equals(mut self, field: &str, value: impl Into<String>) -> Result<Self, FilterError> {
        let value = value.into();
        if field == ID_FIELD {
            self.conditions.push(Condition::IdEquals(value));
            return Ok(self);
        }
        if field.contains('.') {
            let path: Vec<String> = field.split('.').map(str::to_string).collect();
            if !path.iter().all(|segment| Self::is_identifier(segment)) {
                return Err(FilterError::InvalidField(field.to_string()));
            }
            self.conditions.push(Condition::PathEquals { path, value });
            return Ok(self);
        }
        Self::validate_field_name(field)?;
        self.conditions.push(Condition::Equals { field: field.to_string(), value });
        Ok(self)
    }

    /// Require the document body to contain `fragment`, e.g.
    /// `{"employees": [{"employee": "<id>"}]}` for array membership.
    pub fn contains(mut self, fragment: Value) -> Result<Self, FilterError> {
        if !fragment.is_object() {
            return Err(FilterError::InvalidContainment("fragment must be a JSON object".to_string()));
        }
        self.conditions.push(Condition::Contains(fragment));
        Ok(self)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate against an in-process document.
    pub fn matches(&self, id: &DocumentId, body: &Map<String, Value>) -> bool {
        self.conditions.iter().all(|condition| FilterMatch::condition(condition, id, body))
    }

    /// Render a parameterized `SELECT` against a collection table.
    pub fn to_sql(&self, table_name: &str, scope: Scope) -> Result<SqlResult, FilterError> {
        Self::validate_table_name(table_name)?;

        let mut clauses = vec![];
        let mut params = vec![];
        if !scope.includes_deleted() {
            clauses.push("\"deleted_at\" IS NULL".to_string());
        }

        for condition in &self.conditions {
            match condition {
                Condition::Equals { field, value } => {
                    params.push(SqlParam::Text(field.clone()));
                    let field_index = params.len();
                    params.push(SqlParam::Text(value.clone()));
                    let value_index = params.len();
                    if FilterMatch::numeric(value).is_some() {
                        params.push(SqlParam::Text(value.clone()));
                        clauses.push(format!(
                            "(CASE WHEN jsonb_typeof(\"doc\" -> ${f}::text) = 'number' \
                             THEN (\"doc\" ->> ${f}::text)::numeric = ${n}::numeric \
                             ELSE (\"doc\" ->> ${f}::text) = ${v}::text END)",
                            f = field_index,
                            v = value_index,
                            n = params.len()
                        ));
                    } else {
                        clauses.push(format!("(\"doc\" ->> ${}::text) = ${}::text", field_index, value_index));
                    }
                }
                Condition::PathEquals { path, value } => {
                    let (jsonpath, vars) = Self::path_query(path, value);
                    params.push(SqlParam::Text(jsonpath));
                    let path_index = params.len();
                    params.push(SqlParam::Json(vars));
                    clauses.push(format!(
                        "jsonb_path_exists(\"doc\", ${}::jsonpath, ${}::jsonb)",
                        path_index,
                        params.len()
                    ));
                }
                Condition::IdEquals(value) => {
                    params.push(SqlParam::Text(value.clone()));
                    clauses.push(format!("\"id\" = ${}::text", params.len()));
                }
                Condition::Contains(fragment) => {
                    params.push(SqlParam::Json(fragment.clone()));
                    clauses.push(format!("\"doc\" @> ${}::jsonb", params.len()));
                }
            }
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let query = format!(
            "SELECT {} FROM \"{}\"{} ORDER BY \"id\" ASC",
            DOCUMENT_COLUMNS, table_name, where_clause
        );
        Ok(SqlResult { query, params })
    }

    /// Lax-mode jsonpath for a dotted field, with the compared value passed as
    /// a variable. Segments are already validated identifiers.
    fn path_query(path: &[String], value: &str) -> (String, Value) {
        let accessor: String = path.iter().map(|segment| format!(".\"{}\"", segment)).collect();
        match FilterMatch::numeric(value) {
            Some(number) => (
                format!("${} ? (@ == $value || @ == $number)", accessor),
                json!({ "value": value, "number": number }),
            ),
            None => (format!("${} ? (@ == $value)", accessor), json!({ "value": value })),
        }
    }

    pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() {
            return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string()));
        }
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    fn validate_field_name(name: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidField(name.to_string()));
        }
        Ok(())
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
