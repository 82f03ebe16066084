//! SeaORM entity definitions for the trendfeed database schema.

pub mod git_repository;
pub mod prelude;
