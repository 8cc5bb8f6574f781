//! Persistence layer.
//!
//! Repositories own SQL and document-codec details; services above them
//! only see domain types and [`history_repo::RepoError`].

pub mod history_repo;
