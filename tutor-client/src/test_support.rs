//! In-memory stand-in for tutor-server, bound to an ephemeral local port.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tutor_types::{
    ChatRequest, CreateStudentRequest, GradePaperRequest, Student, UpdateStudentRequest,
};

use crate::api::ApiClient;

pub const GRADED_RESPONSE: &str = "GRADE: B+\n\nFEEDBACK:\nClear thesis.";

#[derive(Debug, Default)]
struct FakeState {
    students: Vec<Student>,
    next_id: i64,
    ai_failure: Option<String>,
    requests: Vec<String>,
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeServer {
    addr: SocketAddr,
    state: Shared,
}

impl FakeServer {
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/chat/general", post(chat))
            .route("/api/grade/paper", post(grade_paper))
            .route("/api/students", get(list).post(create))
            .route("/api/students/{id}", get(show).put(update).delete(remove))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(format!("http://{}/api", self.addr))
    }

    pub fn seed(&self, name: &str, age: i64, class: &str) -> Student {
        insert(
            &mut self.state.lock().unwrap(),
            name.into(),
            age,
            class.into(),
            "N/A".into(),
        )
    }

    /// Make chat and grading answer 500 with `message`.
    pub fn fail_ai(&self, message: &str) {
        self.state.lock().unwrap().ai_failure = Some(message.to_owned());
    }

    /// `"METHOD /path"` of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| *r == request).count()
    }
}

fn insert(state: &mut FakeState, name: String, age: i64, class: String, grade: String) -> Student {
    state.next_id += 1;
    let student = Student {
        id: state.next_id,
        name,
        age,
        class,
        overall_grade: grade,
        created_at: Utc::now(),
    };
    state.students.push(student.clone());
    student
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let line = format!("{} {}", req.method(), req.uri().path());
    state.lock().unwrap().requests.push(line);
    next.run(req).await
}

async fn health() -> Response {
    Json(json!({ "status": "ok", "message": "Server is running" })).into_response()
}

async fn chat(State(state): State<Shared>, Json(req): Json<ChatRequest>) -> Response {
    let Some(message) = req.message.filter(|m| !m.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Message is required");
    };
    if let Some(failure) = state.lock().unwrap().ai_failure.clone() {
        return error(StatusCode::INTERNAL_SERVER_ERROR, &failure);
    }
    Json(json!({ "response": format!("Echo: {message}") })).into_response()
}

async fn grade_paper(State(state): State<Shared>, Json(req): Json<GradePaperRequest>) -> Response {
    let (Some(id), Some(_)) = (req.student_id, req.paper_text.filter(|t| !t.is_empty())) else {
        return error(StatusCode::BAD_REQUEST, "Student ID and paper text are required");
    };
    let mut state = state.lock().unwrap();
    let Some(index) = state.students.iter().position(|s| s.id == id) else {
        return error(StatusCode::NOT_FOUND, "Student not found");
    };
    if let Some(failure) = state.ai_failure.clone() {
        return error(StatusCode::INTERNAL_SERVER_ERROR, &failure);
    }
    state.students[index].overall_grade = "B+".into();
    Json(json!({
        "response": GRADED_RESPONSE,
        "grade": "B+",
        "studentName": state.students[index].name,
    }))
    .into_response()
}

async fn list(State(state): State<Shared>) -> Response {
    let mut students = state.lock().unwrap().students.clone();
    students.sort_by(|a, b| a.name.cmp(&b.name));
    Json(students).into_response()
}

async fn create(State(state): State<Shared>, Json(req): Json<CreateStudentRequest>) -> Response {
    let grade = req.overall_grade.clone().filter(|g| !g.is_empty());
    match (req.name, req.age, req.class) {
        (Some(name), Some(age), Some(class)) if !name.is_empty() && age != 0 && !class.is_empty() => {
            let student = insert(
                &mut state.lock().unwrap(),
                name,
                age,
                class,
                grade.unwrap_or_else(|| "N/A".into()),
            );
            (StatusCode::CREATED, Json(student)).into_response()
        }
        _ => error(StatusCode::BAD_REQUEST, "Name, age, and class are required"),
    }
}

async fn show(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    match state.lock().unwrap().students.iter().find(|s| s.id == id) {
        Some(student) => Json(student.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Student not found"),
    }
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(student) = state.students.iter_mut().find(|s| s.id == id) else {
        return error(StatusCode::NOT_FOUND, "Student not found");
    };
    if let Some(name) = req.name.filter(|v| !v.is_empty()) {
        student.name = name;
    }
    if let Some(age) = req.age.filter(|v| *v != 0) {
        student.age = age;
    }
    if let Some(class) = req.class.filter(|v| !v.is_empty()) {
        student.class = class;
    }
    if let Some(grade) = req.overall_grade.filter(|v| !v.is_empty()) {
        student.overall_grade = grade;
    }
    Json(student.clone()).into_response()
}

async fn remove(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    let before = state.students.len();
    state.students.retain(|s| s.id != id);
    if state.students.len() == before {
        return error(StatusCode::NOT_FOUND, "Student not found");
    }
    Json(json!({ "message": "Student deleted successfully" })).into_response()
}
