// handlers/mod.rs - one handler set per resource
//
// Every set follows the same shape: validate the path id (if any), call the
// repository, and answer with that resource's envelope and status codes. The
// status codes are deliberately not uniform across resources; each module
// documents its own contract.

pub mod admins;
pub mod employees;
pub mod projects;
pub mod tasks;
pub mod timesheets;
pub mod utils;
