//! Course Planner - weekly schedule planning over a remote planner document.
//!
//! This crate turns the course offers of a student's curriculum into a weekly
//! grid, detects overlapping time blocks, and keeps the planned set of courses
//! in sync with the remote planner through a debounced autosave.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
