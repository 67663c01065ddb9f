//! In-process mock of the AcademIQ REST backend.

#![allow(dead_code)]

use academiq::{
    ApiClient, ClientConfig, Role, Session, User,
    auth::UserId,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;

pub const TOKEN: &str = "tok-7";
pub const TEACHER_ID: UserId = 7;
pub const TEACHER_EMAIL: &str = "ana@uni.es";
pub const TEACHER_PASSWORD: &str = "secret";
/// Statistics endpoints fail for this user
pub const BROKEN_USER_ID: UserId = 99;
/// `GET /Video` answers after this delay
pub const SLOW_RESPONSE: Duration = Duration::from_secs(2);

/// A field received in a multipart upload
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Text(String),
    File { file_name: String, len: usize },
}

#[derive(Debug, Default)]
pub struct MockState {
    pub origin: String,
    pub courses: Mutex<Vec<Value>>,
    pub bookmarks: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<HashMap<String, Received>>>,
    pub stored: Mutex<Vec<(String, usize)>>,
    pub records: Mutex<Vec<Value>>,
    /// Comment and report listings answer 500 while set
    pub fail_reads: AtomicBool,
    /// Bulk bookmark creation answers 500 while set
    pub fail_bookmarks: AtomicBool,
    /// Requests seen by `GET /Asignatura`; the first one is slow
    pub subject_hits: AtomicUsize,
    /// Requests seen by `GET /Quiz`, which always answers 400
    pub quiz_hits: AtomicUsize,
    next_id: AtomicI64,
}

impl MockState {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 100
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    /// Serve the mock on an ephemeral port
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(MockState {
            origin: origin.clone(),
            courses: Mutex::new(vec![
                json!({"idCurso": 1, "nombre": "Rust", "descripcion": "Ownership", "idUsuario": TEACHER_ID}),
                json!({"idCurso": 2, "nombre": "Algebra", "idUsuario": 3}),
            ]),
            ..MockState::default()
        });

        let app = router(Arc::clone(&state));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("{origin}/api"),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::with_base_url(&self.base_url)
    }

    pub fn client(&self, session: &Session) -> ApiClient {
        ApiClient::new(&self.config(), session.clone()).unwrap()
    }
}

pub fn teacher() -> User {
    User {
        id: TEACHER_ID,
        first_name: "Ana".to_string(),
        last_name: Some("García".to_string()),
        email: TEACHER_EMAIL.to_string(),
        phone: None,
        avatar: None,
        role: Role::Teacher,
    }
}

/// In-memory session logged in as the teacher
pub fn teacher_session() -> Session {
    let session = Session::in_memory();
    session.start(teacher(), TOKEN.to_string());
    session
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Token expired"}))).into_response()
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/Auth/login", post(login))
        .route("/api/Curso", get(list_courses))
        .route("/api/Curso/crear", post(create_course))
        .route("/api/Curso/{id}", delete(delete_course))
        .route("/api/Curso/usuario/{id}", get(courses_by_owner))
        .route("/api/Video", get(slow_videos))
        .route("/api/Video/usuario/{id}", get(videos_by_owner))
        .route("/api/Quiz", get(rejected_quizzes))
        .route("/api/Quiz/usuario/{id}", get(quizzes_by_owner))
        .route("/api/Asignatura", get(slow_first_subjects))
        .route("/api/ComentarioVideo/video/{id}", get(comments))
        .route("/api/ReporteVideo/video/{id}", get(reports))
        .route("/api/favorito/usuario/{id}", get(favorites))
        .route("/api/Pregunta/quiz/{id}", get(questions))
        .route("/api/Video/registrar", post(register_video))
        .route("/api/MarcadorVideo/video/{id}", get(list_bookmarks))
        .route("/api/MarcadorVideo/video/{id}/bulk", post(bulk_bookmarks))
        .route("/api/s3/get-presigned-url", post(presign))
        .route("/storage/{name}", put(store_object))
        .route("/api/videos", post(create_video_record))
        .with_state(state)
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["gmail"] == TEACHER_EMAIL && body["contraseña"] == TEACHER_PASSWORD {
        Json(json!({"idUsuario": TEACHER_ID, "nombre": "Ana", "token": TOKEN, "rol": "profesor"}))
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": ""}))).into_response()
    }
}

async fn list_courses(State(state): State<Arc<MockState>>) -> Json<Value> {
    Json(Value::Array(state.courses.lock().unwrap().clone()))
}

async fn create_course(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        fields.insert(name, field.text().await.unwrap_or_default());
    }
    let course = json!({
        "idCurso": state.next_id(),
        "nombre": fields.get("Nombre").cloned().unwrap_or_default(),
        "descripcion": fields.get("Descripcion").cloned(),
        "idUsuario": fields.get("IdUsuario").and_then(|v| v.parse::<i64>().ok()),
    });
    state.courses.lock().unwrap().push(course.clone());
    Json(course).into_response()
}

async fn delete_course(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut courses = state.courses.lock().unwrap();
    let before = courses.len();
    courses.retain(|c| c["idCurso"] != id);
    if courses.len() == before {
        (StatusCode::NOT_FOUND, Json(json!({"title": "Course not found"}))).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn courses_by_owner(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    if id == BROKEN_USER_ID {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let courses: Vec<Value> = state
        .courses
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c["idUsuario"] == id)
        .cloned()
        .collect();
    Json(courses).into_response()
}

async fn slow_videos() -> Json<Value> {
    tokio::time::sleep(SLOW_RESPONSE).await;
    Json(json!([]))
}

async fn videos_by_owner(Path(id): Path<i64>) -> Response {
    if id == BROKEN_USER_ID {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!([{"idVideo": 5, "titulo": "Borrowing", "url": "/v/5.mp4"}])).into_response()
}

async fn quizzes_by_owner(Path(id): Path<i64>) -> Response {
    if id == BROKEN_USER_ID {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!([])).into_response()
}

async fn rejected_quizzes(State(state): State<Arc<MockState>>) -> Response {
    state.quiz_hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::BAD_REQUEST, Json(json!({"message": "Invalid filter"}))).into_response()
}

async fn slow_first_subjects(State(state): State<Arc<MockState>>) -> Json<Value> {
    if state.subject_hits.fetch_add(1, Ordering::SeqCst) == 0 {
        tokio::time::sleep(SLOW_RESPONSE).await;
    }
    Json(json!([{"idAsignatura": 4, "nombre": "Lifetimes", "idCurso": 1}]))
}

async fn comments(State(state): State<Arc<MockState>>, Path(video): Path<i64>) -> Response {
    if state.fail_reads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!([{
        "idComentario": 1,
        "texto": "Clear explanation",
        "fecha": "2026-01-10T09:30:00",
        "idUsuario": TEACHER_ID,
        "idVideo": video
    }]))
    .into_response()
}

async fn reports(State(state): State<Arc<MockState>>, Path(video): Path<i64>) -> Response {
    if state.fail_reads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!([{"idReporte": 3, "idVideo": video, "idUsuario": 2, "motivo": "Wrong audio"}]))
        .into_response()
}

async fn favorites(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([])).into_response()
}

async fn questions(Path(quiz): Path<i64>) -> Json<Value> {
    Json(json!([
        {"idPregunta": 13, "descripcion": "Third", "orden": 3, "idQuiz": quiz},
        {"idPregunta": 11, "descripcion": "First", "orden": 1, "idQuiz": quiz},
        {"idPregunta": 12, "descripcion": "Second", "orden": 2, "idQuiz": quiz},
    ]))
}

async fn register_video(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let received = match file_name {
            Some(file_name) => Received::File {
                file_name,
                len: field.bytes().await.unwrap().len(),
            },
            None => Received::Text(field.text().await.unwrap()),
        };
        fields.insert(name, received);
    }

    let title = match fields.get("Titulo") {
        Some(Received::Text(title)) => title.clone(),
        _ => String::new(),
    };
    state.uploads.lock().unwrap().push(fields);
    Json(json!({"idVideo": 41, "titulo": title, "url": "/videos/41.mp4", "idUsuario": TEACHER_ID}))
        .into_response()
}

async fn list_bookmarks(State(state): State<Arc<MockState>>, Path(video): Path<i64>) -> Json<Value> {
    let bookmarks: Vec<Value> = state
        .bookmarks
        .lock()
        .unwrap()
        .iter()
        .filter(|b| b["idVideo"] == video)
        .cloned()
        .collect();
    Json(Value::Array(bookmarks))
}

async fn bulk_bookmarks(
    State(state): State<Arc<MockState>>,
    Path(video): Path<i64>,
    Json(drafts): Json<Vec<Value>>,
) -> StatusCode {
    if state.fail_bookmarks.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let mut bookmarks = state.bookmarks.lock().unwrap();
    for draft in drafts {
        bookmarks.push(json!({
            "idMarcador": state.next_id(),
            "idVideo": video,
            "minutoImportante": draft["minutoImportante"],
            "titulo": draft["titulo"],
        }));
    }
    StatusCode::CREATED
}

async fn presign(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    let file_name = body["fileName"].as_str().unwrap_or("file");
    Json(json!({
        "presignedUrl": format!("{}/storage/{file_name}?X-Amz-Signature=abc", state.origin),
        "fileKey": format!("{}/{file_name}", body["fileType"].as_str().unwrap_or("misc")),
    }))
}

async fn store_object(
    State(state): State<Arc<MockState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> StatusCode {
    state.stored.lock().unwrap().push((name, body.len()));
    StatusCode::OK
}

async fn create_video_record(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    state.records.lock().unwrap().push(body.clone());
    Json(json!({
        "idVideo": 42,
        "titulo": body["title"],
        "url": body["videoUrl"],
        "miniatura": body["thumbnailUrl"],
    }))
}
