//! Local project planner: projects own tasks and journal entries, tasks may
//! recur, and an upcoming view expands recurring tasks into dated
//! occurrences.

pub mod config;
pub mod dashboard;
pub mod model;
pub mod recurrence;
pub mod storage;
pub mod utils;
pub mod views;
