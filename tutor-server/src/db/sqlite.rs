//! SQLite implementation of [`StudentStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations are run automatically
//! on startup via [`SqliteStore::connect`].
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path **at compile time**
//! relative to `CARGO_MANIFEST_DIR`, so the directory is embedded into the
//! binary. The database file location is determined at runtime by
//! `TUTOR_DATABASE_URL`.
//!
//! # Queries
//!
//! The runtime-checked `sqlx::query` form is used so that no `DATABASE_URL`
//! is needed at compile time. `createdAt` is selected through
//! `CAST(... AS TEXT)` because the column is declared `DATETIME` and may hold
//! either RFC 3339 strings or SQLite's `CURRENT_TIMESTAMP` format.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tutor_types::{LetterGrade, NewStudent, Student, UpdateStudentRequest};

use super::StudentStore;

const STUDENT_COLUMNS: &str =
    "id, name, age, class, overallGrade, CAST(createdAt AS TEXT) AS createdAt";

type StudentRow = (i64, String, i64, String, Option<String>, Option<String>);

/// SQLite-backed roster store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://database.sqlite"` or `"sqlite::memory:"` for tests. The pool
    /// holds a single connection so statements never interleave.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Close the underlying connection, waiting for in-flight statements.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl StudentStore for SqliteStore {
    async fn list_students(&self) -> Result<Vec<Student>, sqlx::Error> {
        let rows: Vec<StudentRow> =
            sqlx::query_as(&format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY name"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(student_from_row).collect())
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>, sqlx::Error> {
        let row: Option<StudentRow> =
            sqlx::query_as(&format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(student_from_row))
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();
        let row: StudentRow = sqlx::query_as(&format!(
            "INSERT INTO students (name, age, class, overallGrade, createdAt) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&student.name)
        .bind(student.age)
        .bind(&student.class)
        .bind(&student.overall_grade)
        .bind(&created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(student_from_row(row))
    }

    async fn update_student(
        &self,
        id: i64,
        changes: UpdateStudentRequest,
    ) -> Result<Option<Student>, sqlx::Error> {
        let row: Option<StudentRow> = sqlx::query_as(&format!(
            "UPDATE students SET \
                 name = COALESCE(NULLIF(?1, ''), name), \
                 age = COALESCE(NULLIF(?2, 0), age), \
                 class = COALESCE(NULLIF(?3, ''), class), \
                 overallGrade = COALESCE(NULLIF(?4, ''), overallGrade) \
             WHERE id = ?5 RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(changes.name)
        .bind(changes.age)
        .bind(changes.class)
        .bind(changes.overall_grade)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(student_from_row))
    }

    async fn delete_student(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn student_from_row(
    (id, name, age, class, overall_grade, created_at): StudentRow,
) -> Student {
    Student {
        id,
        name,
        age,
        class,
        overall_grade: overall_grade.unwrap_or_else(|| LetterGrade::NotAvailable.to_string()),
        created_at: created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| {
                tracing::warn!(student_id = id, raw = ?created_at, "failed to parse createdAt; using now");
                Utc::now()
            }),
    }
}

/// Accepts RFC 3339 and SQLite's `CURRENT_TIMESTAMP` (`YYYY-MM-DD HH:MM:SS`, UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    fn new_student(name: &str, age: i64, class: &str) -> NewStudent {
        NewStudent {
            name: name.into(),
            age,
            class: class.into(),
            overall_grade: "N/A".into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let store = memory_store().await;
        let created = store.create_student(new_student("Ada", 20, "CS101")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.overall_grade, "N/A");

        let fetched = store.get_student(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ada");
        assert_eq!(fetched.age, 20);
        assert_eq!(fetched.class, "CS101");
        assert_eq!(fetched.overall_grade, "N/A");
        assert_eq!(fetched.created_at.timestamp(), created.created_at.timestamp());
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = memory_store().await;
        let a = store.create_student(new_student("Ada", 20, "CS101")).await.unwrap();
        let b = store.create_student(new_student("Ada", 20, "CS101")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let store = memory_store().await;
        for name in ["Grace", "Ada", "Linus", "Barbara"] {
            store.create_student(new_student(name, 30, "CS")).await.unwrap();
        }
        let names: Vec<String> = store
            .list_students()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Ada", "Barbara", "Grace", "Linus"]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let store = memory_store().await;
        assert!(store.list_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_update_leaves_row_unchanged() {
        let store = memory_store().await;
        let created = store.create_student(new_student("Ada", 20, "CS101")).await.unwrap();
        let updated = store
            .update_student(created.id, UpdateStudentRequest::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn falsy_update_values_keep_stored_values() {
        let store = memory_store().await;
        let created = store.create_student(new_student("Ada", 20, "CS101")).await.unwrap();
        let changes = UpdateStudentRequest {
            name: Some(String::new()),
            age: Some(0),
            class: Some(String::new()),
            overall_grade: Some(String::new()),
        };
        let updated = store.update_student(created.id, changes).await.unwrap().unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn partial_update_changes_only_given_fields() {
        let store = memory_store().await;
        let created = store.create_student(new_student("Ada", 20, "CS101")).await.unwrap();
        let changes = UpdateStudentRequest {
            age: Some(21),
            overall_grade: Some("A".into()),
            ..UpdateStudentRequest::default()
        };
        let updated = store.update_student(created.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.age, 21);
        assert_eq!(updated.class, "CS101");
        assert_eq!(updated.overall_grade, "A");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = memory_store().await;
        let result = store
            .update_student(42, UpdateStudentRequest::grade(LetterGrade::A))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = memory_store().await;
        let created = store.create_student(new_student("Ada", 20, "CS101")).await.unwrap();
        assert!(store.delete_student(created.id).await.unwrap());
        assert!(store.get_student(created.id).await.unwrap().is_none());
        assert!(!store.delete_student(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn reads_rows_written_with_column_defaults() {
        let store = memory_store().await;
        sqlx::query("INSERT INTO students (name, age, class) VALUES ('Legacy', 19, 'HIST')")
            .execute(&store.pool)
            .await
            .unwrap();
        let students = store.list_students().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].overall_grade, "N/A");
        // CURRENT_TIMESTAMP is seconds-resolution UTC; allow for clock skew.
        let age = Utc::now() - students[0].created_at;
        assert!(age.num_seconds().abs() < 60);
    }

    #[test]
    fn parses_both_timestamp_formats() {
        assert!(parse_timestamp("2024-03-01T12:30:00+00:00").is_some());
        assert_eq!(
            parse_timestamp("2024-03-01 12:30:00").map(|t| t.to_rfc3339()),
            Some("2024-03-01T12:30:00+00:00".to_owned())
        );
        assert!(parse_timestamp("yesterday").is_none());
    }
}
