//! End-to-end handler invocation: bind, validate, call, normalize.

use std::sync::Arc;

use http::Method;
use rivet_core::BindError;
use rivet_framework::{BindOptions, BoxError, Handler, HandlerError, Json, RequestContext};
use rivet_macros::Bind;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Bind)]
#[serde(default, rename_all = "camelCase")]
struct Person {
    first_name: String,
    last_name: String,
    id: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Bind)]
#[serde(default, rename_all = "camelCase")]
struct BasicRequest {
    #[bind(flatten)]
    #[serde(flatten)]
    person: Person,
    #[bind(query = "name")]
    name: String,
    #[bind(query = "age")]
    age: u64,
    #[bind(query = "score")]
    score: f64,
    #[bind(query = "balance")]
    balance: i64,
    #[bind(query = "isActive")]
    is_active: bool,
}

async fn basic_handler(_ctx: Arc<RequestContext>, req: BasicRequest) -> Result<Json<BasicRequest>, BoxError> {
    Ok(Json(req))
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Bind)]
#[serde(default)]
struct QueryWithDefaults {
    #[bind(query = "name", default = "person")]
    name: String,
    #[bind(query = "age", default = "21")]
    age: u64,
    #[bind(query = "score", default = "8.5")]
    score: f64,
    #[bind(query = "balance", default = "100")]
    balance: i64,
}

async fn default_queries_handler(
    _ctx: Arc<RequestContext>,
    req: QueryWithDefaults,
) -> Result<Json<QueryWithDefaults>, BoxError> {
    Ok(Json(req))
}

#[derive(Debug, Default, Deserialize, Validate, Bind)]
#[serde(default)]
#[bind(validate)]
struct PostRequest {
    name: String,
    #[validate(range(min = 21))]
    age: u64,
    #[validate(length(min = 1, code = "required"), email)]
    email: String,
}

async fn default_post_handler(_ctx: Arc<RequestContext>, _req: PostRequest) -> Result<(), BoxError> {
    Ok(())
}

async fn call<H, Args>(handler: H, ctx: RequestContext) -> Result<Option<Value>, HandlerError>
where
    H: Handler<Args>,
{
    handler.call(Arc::new(ctx), BindOptions::default()).await
}

fn get(query: &str) -> RequestContext {
    RequestContext::builder(Method::GET, "/basic").query(query).build()
}

fn post(body: &str) -> RequestContext {
    RequestContext::builder(Method::POST, "/basic")
        .header("content-type", "application/json")
        .body(body.to_string())
        .build()
}

fn bind_error(result: Result<Option<Value>, HandlerError>) -> BindError {
    match result {
        Err(HandlerError::Bind(err)) => err,
        other => panic!("expected a bind error, got {other:?}"),
    }
}

// ============================================================================
// Query parameters
// ============================================================================

#[tokio::test]
async fn test_valid_query_values() {
    let result = call(
        basic_handler,
        get("name=User+Name&age=27&score=4.78&balance=-100&isActive=true"),
    )
    .await
    .unwrap();

    let expected = BasicRequest {
        name: "User Name".into(),
        age: 27,
        score: 4.78,
        balance: -100,
        is_active: true,
        ..Default::default()
    };
    assert_eq!(result, Some(serde_json::to_value(expected).unwrap()));
}

#[tokio::test]
async fn test_invalid_query_values_name_the_parameter() {
    let cases = [
        ("name=User+Name&age=User+Name", "age"),
        ("name=User+Name&isActive=User+Name", "isActive"),
        ("name=User+Name&score=User+Name", "score"),
        ("name=User+Name&balance=User+Name", "balance"),
        ("age=-1", "age"),
    ];

    for (query, param) in cases {
        let err = bind_error(call(basic_handler, get(query)).await);
        assert_eq!(err, BindError::invalid(param), "query: {query}");
    }
}

// ============================================================================
// Request body
// ============================================================================

#[tokio::test]
async fn test_valid_request_body() {
    let result = call(
        basic_handler,
        post(r#"{"firstName":"First Name","lastName":"Last Name"}"#),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result["firstName"], "First Name");
    assert_eq!(result["lastName"], "Last Name");
    assert_eq!(result["id"], 0);
}

#[tokio::test]
async fn test_invalid_field_type_in_body() {
    let err = bind_error(
        call(
            basic_handler,
            post(r#"{"id":"First Name","lastName":"Last Name"}"#),
        )
        .await,
    );
    assert_eq!(err, BindError::invalid("id"));
}

#[tokio::test]
async fn test_query_overrides_body() {
    let ctx = RequestContext::builder(Method::POST, "/basic")
        .query("name=From+Query")
        .json(json!({"name": "From Body", "age": 5}))
        .build();

    let result = call(basic_handler, ctx).await.unwrap().unwrap();
    assert_eq!(result["name"], "From Query");
    assert_eq!(result["age"], 5);
}

// ============================================================================
// Defaults
// ============================================================================

#[tokio::test]
async fn test_defaults_when_no_queries_passed() {
    let result = call(default_queries_handler, get("")).await.unwrap();
    let expected = QueryWithDefaults {
        name: "person".into(),
        age: 21,
        score: 8.5,
        balance: 100,
    };
    assert_eq!(result, Some(serde_json::to_value(expected).unwrap()));
}

#[tokio::test]
async fn test_queries_win_over_defaults() {
    let result = call(default_queries_handler, get("name=User+Name&age=25"))
        .await
        .unwrap();
    let expected = QueryWithDefaults {
        name: "User Name".into(),
        age: 25,
        score: 8.5,
        balance: 100,
    };
    assert_eq!(result, Some(serde_json::to_value(expected).unwrap()));
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_post_with_validation() {
    let cases = [
        (
            r#"{"name":"First Name","age":21}"#,
            Some(BindError::missing("email")),
        ),
        (
            r#"{"name":"First Name","age":21, "email": "1234567890"}"#,
            Some(BindError::invalid("email")),
        ),
        (
            r#"{"name":"First Name","age":21, "email": "lite@rivet.rs"}"#,
            None,
        ),
        (
            r#"{"name":"First Name","age":18, "email": "lite@rivet.rs"}"#,
            Some(BindError::invalid("age")),
        ),
        (r#"{"name":"First Name","age":18}"#, Some(BindError::missing("email"))),
    ];

    for (body, expected) in cases {
        let result = call(default_post_handler, post(body)).await;
        match expected {
            Some(expected) => assert_eq!(bind_error(result), expected, "body: {body}"),
            None => assert_eq!(result.unwrap(), None, "body: {body}"),
        }
    }
}

#[tokio::test]
async fn test_validation_can_be_disabled() {
    let ctx = post(r#"{"name":"First Name","age":18}"#);
    let result = Handler::call(
        default_post_handler,
        Arc::new(ctx),
        BindOptions { validate: false },
    )
    .await;
    assert_eq!(result.unwrap(), None);
}
