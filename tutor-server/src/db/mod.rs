//! Database abstraction layer.
//!
//! [`StudentStore`] defines the roster operations used by the HTTP handlers.
//! The default implementation is [`sqlite::SqliteStore`]. To swap to another
//! database, implement [`StudentStore`] for the new type and change the
//! concrete type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures, so no
//! `async-trait` boxing is involved on this seam.

pub mod sqlite;

use std::future::Future;

use tutor_types::{NewStudent, Student, UpdateStudentRequest};

/// Durable CRUD over the `students` table.
///
/// Every method is a single SQL statement; `None` / `false` results mean the
/// id did not exist.
pub trait StudentStore: Send + Sync + 'static {
    /// All students ordered by name, ascending.
    fn list_students(&self) -> impl Future<Output = Result<Vec<Student>, sqlx::Error>> + Send;

    fn get_student(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Student>, sqlx::Error>> + Send;

    /// Insert a validated record and return it with its generated `id` and `createdAt`.
    fn create_student(
        &self,
        student: NewStudent,
    ) -> impl Future<Output = Result<Student, sqlx::Error>> + Send;

    /// Merge `changes` into the row. Absent, empty and zero values keep the
    /// stored value.
    fn update_student(
        &self,
        id: i64,
        changes: UpdateStudentRequest,
    ) -> impl Future<Output = Result<Option<Student>, sqlx::Error>> + Send;

    /// Returns `false` when no row was deleted.
    fn delete_student(&self, id: i64) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}
