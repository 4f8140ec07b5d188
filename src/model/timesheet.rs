use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::id::DocumentId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSheet {
    pub description: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub project: DocumentId,
    pub task: DocumentId,
    pub employee: DocumentId,
}

impl Entity for TimeSheet {
    const COLLECTION: &'static str = "timesheets";
    const SOFT_DELETE: bool = true;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSheetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<DocumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<DocumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<DocumentId>,
}
