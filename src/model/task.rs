use serde::{Deserialize, Serialize};

use super::Entity;

/// The closed set of task areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    #[serde(rename = "BE")]
    Backend,
    #[serde(rename = "FE")]
    Frontend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub description: TaskKind,
}

impl Entity for Task {
    const COLLECTION: &'static str = "tasks";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TaskKind>,
}
