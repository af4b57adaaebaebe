//! In-process stub oracle for the contract tests.
//!
//! Serves seeded, jsonplaceholder-shaped data with the status semantics the
//! contract asserts: 404 for unknown ids at the top-level resource, 200
//! plus an empty array at nested endpoints, unconditional 200 on DELETE,
//! echo-with-id on POST, and 500 on PUT for out-of-range ids or a
//! non-numeric userId.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use restcheck::{Album, Comment, Photo, Post, Todo};
use restcheck_http::ApiClient;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct Seed {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub albums: Vec<Album>,
    pub photos: Vec<Photo>,
    pub todos: Vec<Todo>,
}

impl Seed {
    /// Ten users owning ten posts and ten albums each, five comments per
    /// post, five photos per album, twenty todos per user.
    pub fn placeholder() -> Self {
        let posts = (1..=100)
            .map(|id| Post {
                user_id: (id - 1) / 10 + 1,
                id,
                title: format!("post {id} title"),
                body: format!("post {id} body"),
            })
            .collect::<Vec<_>>();

        let comments = posts
            .iter()
            .flat_map(|post| {
                (1..=5).map(|n| Comment {
                    post_id: post.id,
                    id: (post.id - 1) * 5 + n,
                    name: format!("comment {n} on post {}", post.id),
                    email: format!("commenter{n}@example.com"),
                    body: format!("comment {n} body"),
                })
            })
            .collect();

        let albums = (1..=100)
            .map(|id| Album {
                user_id: (id - 1) / 10 + 1,
                id,
                title: format!("album {id} title"),
            })
            .collect::<Vec<_>>();

        let photos = albums
            .iter()
            .flat_map(|album| {
                (1..=5).map(|n| Photo {
                    album_id: album.id,
                    id: (album.id - 1) * 5 + n,
                    title: format!("photo {n} in album {}", album.id),
                    url: format!("https://photos.example/{}/{n}", album.id),
                    thumbnail_url: format!("https://photos.example/{}/{n}/thumb", album.id),
                })
            })
            .collect();

        let todos = (1..=200)
            .map(|id| Todo {
                user_id: (id - 1) / 20 + 1,
                id,
                title: format!("todo {id} title"),
                completed: id % 2 == 0,
            })
            .collect();

        Seed {
            posts,
            comments,
            albums,
            photos,
            todos,
        }
    }
}

struct StubState {
    seed: Seed,
    // Drops the "body" key from every serialized post, for tests that need
    // an oracle violating the contract.
    strip_post_body: bool,
}

pub struct StubApi {
    pub base_url: String,
    server: JoinHandle<()>,
}

impl StubApi {
    pub async fn start() -> Self {
        Self::launch(StubState {
            seed: Seed::placeholder(),
            strip_post_body: false,
        })
        .await
    }

    pub async fn start_nonconforming() -> Self {
        Self::launch(StubState {
            seed: Seed::placeholder(),
            strip_post_body: true,
        })
        .await
    }

    async fn launch(state: StubState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Failed to read stub address");
        let app = router(Arc::new(state));
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server failed");
        });
        StubApi {
            base_url: format!("http://{addr}"),
            server,
        }
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(&self.base_url)
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// Helper struct for direct endpoint assertions, independent of ApiClient.
pub struct TestClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(api: &StubApi) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: api.base_url.clone(),
        }
    }
}

// =============================================================================
// ROUTES
// =============================================================================

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post)
                .put(replace_post)
                .patch(patch_post)
                .delete(delete_post),
        )
        .route("/posts/{id}/comments", get(post_comments))
        .route("/albums/{id}/photos", get(album_photos))
        .route("/users/{id}/albums", get(user_albums))
        .route("/users/{id}/todos", get(user_todos))
        .route("/users/{id}/posts", get(user_posts))
        .with_state(state)
}

fn post_value(state: &StubState, post: &Post) -> Value {
    let mut value = serde_json::to_value(post).expect("Post serializes");
    if state.strip_post_body {
        if let Some(object) = value.as_object_mut() {
            object.remove("body");
        }
    }
    value
}

fn parse_id(raw: &str) -> u64 {
    // Seeded ids start at 1, so unparseable input maps to "matches nothing".
    raw.parse().unwrap_or(0)
}

async fn list_posts(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let items: Vec<Value> = state
        .seed
        .posts
        .iter()
        .filter(|post| match params.get("userId") {
            Some(wanted) => post.user_id.to_string() == *wanted,
            None => true,
        })
        .map(|post| post_value(&state, post))
        .collect();
    Json(Value::Array(items))
}

async fn get_post(
    State(state): State<Arc<StubState>>,
    Path(raw): Path<String>,
) -> (StatusCode, Json<Value>) {
    let id = parse_id(&raw);
    match state.seed.posts.iter().find(|post| post.id == id) {
        Some(post) => (StatusCode::OK, Json(post_value(&state, post))),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn create_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut object = body.as_object().cloned().unwrap_or_default();
    object.insert("id".to_string(), json!(101));
    (StatusCode::CREATED, Json(Value::Object(object)))
}

async fn replace_post(
    Path(raw): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = parse_id(&raw);
    let in_range = (1..=100).contains(&id);
    let user_id_is_numeric = body.get("userId").is_none_or(Value::is_number);
    if in_range && user_id_is_numeric {
        (StatusCode::OK, Json(body))
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})))
    }
}

async fn patch_post(
    State(state): State<Arc<StubState>>,
    Path(raw): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = parse_id(&raw);
    let mut merged: Map<String, Value> = state
        .seed
        .posts
        .iter()
        .find(|post| post.id == id)
        .and_then(|post| serde_json::to_value(post).ok())
        .and_then(|value| value.as_object().cloned())
        .unwrap_or_default();
    if let Some(entries) = body.as_object() {
        for (key, value) in entries {
            merged.insert(key.clone(), value.clone());
        }
    }
    (StatusCode::OK, Json(Value::Object(merged)))
}

async fn delete_post(Path(_raw): Path<String>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({})))
}

async fn post_comments(
    State(state): State<Arc<StubState>>,
    Path(raw): Path<String>,
) -> Json<Value> {
    let id = parse_id(&raw);
    collect_items(state.seed.comments.iter().filter(|c| c.post_id == id))
}

async fn album_photos(
    State(state): State<Arc<StubState>>,
    Path(raw): Path<String>,
) -> Json<Value> {
    let id = parse_id(&raw);
    collect_items(state.seed.photos.iter().filter(|p| p.album_id == id))
}

async fn user_albums(
    State(state): State<Arc<StubState>>,
    Path(raw): Path<String>,
) -> Json<Value> {
    let id = parse_id(&raw);
    collect_items(state.seed.albums.iter().filter(|a| a.user_id == id))
}

async fn user_todos(State(state): State<Arc<StubState>>, Path(raw): Path<String>) -> Json<Value> {
    let id = parse_id(&raw);
    collect_items(state.seed.todos.iter().filter(|t| t.user_id == id))
}

async fn user_posts(State(state): State<Arc<StubState>>, Path(raw): Path<String>) -> Json<Value> {
    let id = parse_id(&raw);
    let items: Vec<Value> = state
        .seed
        .posts
        .iter()
        .filter(|post| post.user_id == id)
        .map(|post| post_value(&state, post))
        .collect();
    Json(Value::Array(items))
}

fn collect_items<'a, T: serde::Serialize + 'a>(items: impl Iterator<Item = &'a T>) -> Json<Value> {
    let values: Vec<Value> = items
        .map(|item| serde_json::to_value(item).expect("Seed item serializes"))
        .collect();
    Json(Value::Array(values))
}
