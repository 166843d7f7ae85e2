use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

struct Users {
    next_id: u64,
    by_id: HashMap<u64, User>,
}

type Db = Arc<RwLock<Users>>;

/// Router seeded with user 1 (John Doe), so GET /users/1 works out of the box.
pub fn app() -> Router {
    let seeded = User {
        id: 1,
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
    };
    let db: Db = Arc::new(RwLock::new(Users {
        next_id: 2,
        by_id: HashMap::from([(1, seeded)]),
    }));
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/search", get(search))
        .route("/login", post(login))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    let users = db.read().await;
    users.by_id.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let mut users = db.write().await;
    let user = User {
        id: users.next_id,
        name: input.name,
        email: input.email,
    };
    users.next_id += 1;
    users.by_id.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let mut users = db.write().await;
    match users.by_id.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// Echo the received query parameters back as a JSON object.
async fn search(Query(params): Query<HashMap<String, String>>) -> Json<HashMap<String, String>> {
    Json(params)
}

async fn login(Form(input): Form<Login>) -> Result<Json<serde_json::Value>, StatusCode> {
    if input.username.is_empty() || input.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(serde_json::json!({"ok": true, "username": input.username})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 1,
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "John Doe");
        assert_eq!(json["email"], "john.doe@example.com");
    }

    #[test]
    fn create_user_rejects_missing_email() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"name":"Jane"}"#);
        assert!(result.is_err());
    }
}
