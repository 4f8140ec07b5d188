pub mod populate;

pub use populate::{AssignmentView, PopulateService, ProjectView, TimeSheetView};
