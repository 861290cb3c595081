//! Local stand-in for jsonplaceholder's `/todos` resource.
//!
//! Seeded with 200 todos whose first entry matches the public service. Every
//! response can be delayed by a fixed latency so callers can observe how
//! their requests overlap.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const SEEDED_TODOS: u64 = 200;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    #[serde(default = "default_user_id")]
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

fn default_user_id() -> u64 {
    1
}

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Added before every response.
    pub latency: Duration,
}

pub type Db = Arc<RwLock<BTreeMap<u64, Todo>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    latency: Duration,
}

pub fn seed() -> BTreeMap<u64, Todo> {
    (1..=SEEDED_TODOS)
        .map(|id| {
            let todo = if id == 1 {
                Todo {
                    user_id: 1,
                    id: 1,
                    title: "delectus aut autem".to_string(),
                    completed: false,
                }
            } else {
                Todo {
                    user_id: (id - 1) / 20 + 1,
                    id,
                    title: format!("todo {id}"),
                    completed: id % 3 == 0,
                }
            };
            (id, todo)
        })
        .collect()
}

pub fn app() -> Router {
    app_with(ServerConfig::default())
}

pub fn app_with(config: ServerConfig) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(seed())),
        latency: config.latency,
    };
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, ServerConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: ServerConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

async fn delay(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    delay(state.latency).await;
    let todos = state.db.read().await;
    Json(todos.values().cloned().collect())
}

async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    delay(state.latency).await;
    let mut todos = state.db.write().await;
    let id = todos.keys().next_back().copied().unwrap_or(0) + 1;
    let todo = Todo {
        user_id: input.user_id,
        id,
        title: input.title,
        completed: input.completed,
    };
    todos.insert(id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    delay(state.latency).await;
    let todos = state.db.read().await;
    todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}
