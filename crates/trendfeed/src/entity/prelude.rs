//! Common re-exports for convenient entity usage.

pub use super::git_repository::{
    ActiveModel as GitRepositoryActiveModel, Column as GitRepositoryColumn,
    Entity as GitRepository, Model as GitRepositoryModel,
};
