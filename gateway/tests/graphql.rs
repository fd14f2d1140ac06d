//! End-to-end tests for the GraphQL surface, executed directly against
//! the schema with real gRPC backends behind it.

mod common;

use reunio_gateway::{build_schema, AppSchema};
use serde_json::Value;

async fn schema() -> AppSchema {
    let (users, reunions) = common::spawn_backends().await;
    build_schema(users, reunions)
}

async fn execute(schema: &AppSchema, query: &str) -> Value {
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()
}

#[tokio::test]
async fn create_then_get_user() {
    let schema = schema().await;

    let data = execute(
        &schema,
        r#"mutation { createUser(name: "A", email: "a@x.com") { id name email } }"#,
    )
    .await;
    let id = data["createUser"]["id"].as_str().unwrap().to_owned();
    assert_eq!(data["createUser"]["name"], "A");

    let data = execute(
        &schema,
        &format!(r#"query {{ getUser(id: "{id}") {{ id name email }} }}"#),
    )
    .await;
    assert_eq!(data["getUser"]["id"], id);
    assert_eq!(data["getUser"]["email"], "a@x.com");
}

#[tokio::test]
async fn get_missing_user_surfaces_error() {
    let schema = schema().await;

    let response = schema
        .execute(r#"query { getUser(id: "nope") { id } }"#)
        .await;
    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("not found"));
}

#[tokio::test]
async fn create_and_update_share_upsert() {
    let schema = schema().await;

    let data = execute(
        &schema,
        r#"mutation { createUser(name: "A", email: "a@x.com") { id } }"#,
    )
    .await;
    let id = data["createUser"]["id"].as_str().unwrap().to_owned();

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{ updateUser(id: "{id}", name: "B", email: "b@x.com") {{ id name }} }}"#
        ),
    )
    .await;
    assert_eq!(data["updateUser"]["id"], id);
    assert_eq!(data["updateUser"]["name"], "B");

    let data = execute(&schema, r#"query { getUsers { id name } }"#).await;
    assert_eq!(data["getUsers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reunion_lifecycle() {
    let schema = schema().await;

    let data = execute(
        &schema,
        r#"mutation {
            createReunion(sujet: "S", location: "L", date: "2024-01-01", user_ids: ["u1"]) {
                id sujet location date user_ids
            }
        }"#,
    )
    .await;
    let id = data["createReunion"]["id"].as_str().unwrap().to_owned();
    assert_eq!(data["createReunion"]["user_ids"], serde_json::json!(["u1"]));

    let data = execute(
        &schema,
        &format!(
            r#"mutation {{
                updateReunion(id: "{id}", sujet: "S2", location: "L", date: "2024-01-02", user_ids: ["u1", "u2"]) {{
                    sujet user_ids
                }}
            }}"#
        ),
    )
    .await;
    assert_eq!(data["updateReunion"]["sujet"], "S2");
    assert_eq!(
        data["updateReunion"]["user_ids"],
        serde_json::json!(["u1", "u2"])
    );

    let data = execute(
        &schema,
        &format!(r#"mutation {{ deleteReunion(id: "{id}") {{ success message }} }}"#),
    )
    .await;
    assert_eq!(data["deleteReunion"]["success"], true);

    let data = execute(&schema, r#"query { getReunions { id } }"#).await;
    assert!(data["getReunions"].as_array().unwrap().is_empty());
}
