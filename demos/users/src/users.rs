//! User handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use rivet::prelude::*;
use serde::{Deserialize, Serialize};

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
pub struct UserId {
    #[bind(path = "id")]
    pub id: i64,
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
pub struct PostUserRequest {
    pub name: String,
    pub email: String,
    #[bind(default = "21")]
    pub age: i64,
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
pub struct GetUserRequest {
    #[bind(flatten)]
    #[serde(flatten)]
    pub user: UserId,
    #[bind(query = "name")]
    pub name: String,
    #[bind(query = "email")]
    pub email: String,
    #[bind(query = "age", default = "21")]
    pub age: i64,
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
pub struct DeleteUserRequest {
    #[bind(flatten)]
    #[serde(flatten)]
    pub user: UserId,
}

pub async fn post_user(
    _ctx: Arc<RequestContext>,
    req: PostUserRequest,
) -> Result<Json<User>, BoxError> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    debug!(id, name = %req.name, "Created user");

    Ok(Json(User {
        id,
        name: req.name,
        email: req.email,
        age: req.age,
    }))
}

pub async fn get_user(
    _ctx: Arc<RequestContext>,
    req: GetUserRequest,
) -> Result<Json<User>, BoxError> {
    let name = if req.name.is_empty() {
        "user name".to_string()
    } else {
        req.name
    };
    let email = if req.email.is_empty() {
        "user@email.com".to_string()
    } else {
        req.email
    };

    Ok(Json(User {
        id: req.user.id,
        name,
        email,
        age: req.age,
    }))
}

pub async fn delete_user(
    _ctx: Arc<RequestContext>,
    req: DeleteUserRequest,
) -> Result<(), BoxError> {
    info!(id = req.user.id, "Deleted user");
    Ok(())
}

pub fn register(app: &mut RivetApp) {
    app.post("/users", post_user)
        .get("/users/{id}", get_user)
        .delete("/users/{id}", delete_user);
}

#[cfg(test)]
mod tests {
    use http::Method;
    use rivet::framework::BindOptions;
    use serde_json::json;

    use super::*;

    fn ctx(method: Method, path: &str) -> rivet::framework::RequestContextBuilder {
        RequestContext::builder(method, path)
    }

    #[tokio::test]
    async fn test_get_user_defaults() {
        let ctx = ctx(Method::GET, "/users/7").path_param("id", "7").build();
        let value = Handler::call(get_user, Arc::new(ctx), BindOptions::default())
            .await
            .unwrap();

        assert_eq!(
            value,
            Some(json!({"id": 7, "name": "user name", "email": "user@email.com", "age": 21}))
        );
    }

    #[tokio::test]
    async fn test_get_user_query() {
        let ctx = ctx(Method::GET, "/users/7")
            .path_param("id", "7")
            .query("name=Ann&email=ann%40example.com&age=30")
            .build();
        let value = Handler::call(get_user, Arc::new(ctx), BindOptions::default())
            .await
            .unwrap();

        assert_eq!(
            value,
            Some(json!({"id": 7, "name": "Ann", "email": "ann@example.com", "age": 30}))
        );
    }

    #[tokio::test]
    async fn test_get_user_invalid_id() {
        let ctx = ctx(Method::GET, "/users/abc").path_param("id", "abc").build();
        let err = Handler::call(get_user, Arc::new(ctx), BindOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "'1' invalid parameter(s): id");
    }

    #[tokio::test]
    async fn test_post_user_default_age() {
        let ctx = ctx(Method::POST, "/users")
            .json(json!({"name": "Ann", "email": "ann@example.com"}))
            .build();
        let value = Handler::call(post_user, Arc::new(ctx), BindOptions::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(value["name"], "Ann");
        assert_eq!(value["age"], 21);
        assert!(value["id"].as_i64().is_some_and(|id| id > 0));
    }

    #[tokio::test]
    async fn test_delete_user_has_no_output() {
        let ctx = ctx(Method::DELETE, "/users/3").path_param("id", "3").build();
        let value = Handler::call(delete_user, Arc::new(ctx), BindOptions::default())
            .await
            .unwrap();

        assert_eq!(value, None);
    }
}
