pub mod admin;
pub mod employee;
pub mod project;
pub mod record;
pub mod task;
pub mod timesheet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::database::DatabaseError;

pub use admin::{Admin, AdminPatch};
pub use employee::{Employee, EmployeePatch};
pub use project::{Assignment, Project, ProjectPatch};
pub use record::Record;
pub use task::{Task, TaskKind, TaskPatch};
pub use timesheet::{TimeSheet, TimeSheetPatch};

/// Every collection the service owns.
pub const COLLECTIONS: [&str; 5] = [
    Admin::COLLECTION,
    Employee::COLLECTION,
    Project::COLLECTION,
    Task::COLLECTION,
    TimeSheet::COLLECTION,
];

/// A document type stored in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Soft-deleted entities are flagged rather than removed.
    const SOFT_DELETE: bool = false;
}

/// Check a raw body against the schema of `collection` (used when seeding).
pub fn validate_document(collection: &str, body: &Map<String, Value>) -> Result<(), DatabaseError> {
    fn check<T: Entity>(body: &Map<String, Value>) -> Result<(), DatabaseError> {
        serde_json::from_value::<T>(Value::Object(body.clone()))
            .map(|_| ())
            .map_err(|e| DatabaseError::invalid_document(T::COLLECTION, e))
    }

    match collection {
        Admin::COLLECTION => check::<Admin>(body),
        Employee::COLLECTION => check::<Employee>(body),
        Project::COLLECTION => check::<Project>(body),
        Task::COLLECTION => check::<Task>(body),
        TimeSheet::COLLECTION => check::<TimeSheet>(body),
        other => Err(DatabaseError::InvalidCollection(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validates_documents_per_collection() {
        let task = json!({ "description": "BE" }).as_object().cloned().unwrap();
        assert!(validate_document("tasks", &task).is_ok());

        let bad_task = json!({ "description": "QA" }).as_object().cloned().unwrap();
        assert!(matches!(
            validate_document("tasks", &bad_task),
            Err(DatabaseError::InvalidDocument { .. })
        ));

        assert!(matches!(
            validate_document("payroll", &task),
            Err(DatabaseError::InvalidCollection(_))
        ));
    }
}
