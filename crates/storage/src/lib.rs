#![forbid(unsafe_code)]

//! Collaborator seam for the assessment engine.
//!
//! The engine consumes three narrow contracts: a course-data provider, a
//! question-bank provider, and a result recorder. This crate defines them
//! as trait objects plus an in-memory adapter; durable backends plug in
//! behind the same traits.

pub mod repository;

pub use repository::{
    CourseRepository, ExamKind, ExamResultRecord, InMemoryRepository, QuizRepository,
    ResultRecorder, Storage, StorageError,
};
