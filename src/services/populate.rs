use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::database::{DatabaseError, DocumentStore, Repository};
use crate::id::DocumentId;
use crate::model::{Employee, Entity, Project, Record, Task, TimeSheet};

/// Project with every assignment resolved to its employee document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub client_name: String,
    pub employees: Vec<AssignmentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// `employee` is `null` when the referenced document no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentView {
    pub employee: Option<Record<Employee>>,
}

/// Time sheet with its project, task and employee resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSheetView {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub description: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub project: Option<Record<Project>>,
    pub task: Option<Record<Task>>,
    pub employee: Option<Record<Employee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Replaces stored reference ids with the referenced documents at read time.
///
/// References are collected across the whole result set and fetched with one
/// batched query per referenced collection. Soft-deleted targets still resolve.
pub struct PopulateService {
    store: Arc<dyn DocumentStore>,
}

impl PopulateService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn projects(&self, projects: Vec<Record<Project>>) -> Result<Vec<ProjectView>, DatabaseError> {
        let employee_ids = unique_ids(projects.iter().flat_map(|p| p.body.employees.iter().map(|a| a.employee)));
        let employees = self.lookup::<Employee>(&employee_ids).await?;

        Ok(projects
            .into_iter()
            .map(|record| {
                let Record { id, body, deleted_at } = record;
                ProjectView {
                    id,
                    name: body.name,
                    description: body.description,
                    start_date: body.start_date,
                    end_date: body.end_date,
                    client_name: body.client_name,
                    employees: body
                        .employees
                        .iter()
                        .map(|assignment| AssignmentView {
                            employee: employees.get(&assignment.employee).cloned(),
                        })
                        .collect(),
                    deleted_at,
                }
            })
            .collect())
    }

    pub async fn project(&self, project: Record<Project>) -> Result<ProjectView, DatabaseError> {
        let mut views = self.projects(vec![project]).await?;
        views.pop().ok_or_else(|| DatabaseError::invalid_document(Project::COLLECTION, "populate lost the project"))
    }

    pub async fn timesheets(&self, timesheets: Vec<Record<TimeSheet>>) -> Result<Vec<TimeSheetView>, DatabaseError> {
        let projects = self.lookup::<Project>(&unique_ids(timesheets.iter().map(|t| t.body.project))).await?;
        let tasks = self.lookup::<Task>(&unique_ids(timesheets.iter().map(|t| t.body.task))).await?;
        let employees = self.lookup::<Employee>(&unique_ids(timesheets.iter().map(|t| t.body.employee))).await?;

        Ok(timesheets
            .into_iter()
            .map(|record| {
                let Record { id, body, deleted_at } = record;
                TimeSheetView {
                    id,
                    description: body.description,
                    date: body.date,
                    hours: body.hours,
                    project: projects.get(&body.project).cloned(),
                    task: tasks.get(&body.task).cloned(),
                    employee: employees.get(&body.employee).cloned(),
                    deleted_at,
                }
            })
            .collect())
    }

    pub async fn timesheet(&self, timesheet: Record<TimeSheet>) -> Result<TimeSheetView, DatabaseError> {
        let mut views = self.timesheets(vec![timesheet]).await?;
        views.pop().ok_or_else(|| DatabaseError::invalid_document(TimeSheet::COLLECTION, "populate lost the time sheet"))
    }

    async fn lookup<T: Entity>(&self, ids: &[DocumentId]) -> Result<HashMap<DocumentId, Record<T>>, DatabaseError> {
        Repository::<T>::new(self.store.clone()).find_by_ids_with_deleted(ids).await
    }
}

fn unique_ids(ids: impl Iterator<Item = DocumentId>) -> Vec<DocumentId> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}
