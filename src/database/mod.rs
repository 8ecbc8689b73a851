// Database module
// This module handles SQLite storage for courses, chunks, and attempts

pub mod sqlite;

pub use sqlite::*;
