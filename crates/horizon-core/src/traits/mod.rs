//! Core traits shared by the persistence layer.

pub mod repository;

pub use repository::Repository;
