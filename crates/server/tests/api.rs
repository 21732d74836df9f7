use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder().database(db).build().await.unwrap();
    server::router(engine)
}

fn get(uri: &str, owner: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-owner-id", owner)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str, owner: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-owner-id", owner)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, owner: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-owner-id", owner)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn created_expense(app: &Router, owner: &str, body: Value) -> String {
    let response = app
        .clone()
        .oneshot(send_json("POST", "/expenses", owner, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_an_owner_are_rejected() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/expenses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/expenses")
                .header("x-owner-id", "   ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_and_list_round_trip() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/expenses",
            "alice",
            json!({ "name": "  Coffee  ", "amount": " 3.50 " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Expense saved");
    uuid::Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();

    let response = app.oneshot(get("/expenses", "alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let expenses = body["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0]["name"], "Coffee");
    assert_eq!(expenses[0]["amount"], "3.5");
    assert_eq!(expenses[0]["category"], Value::Null);
    assert_eq!(expenses[0]["edit_count"], 0);
    assert_eq!(expenses[0]["created_at"], expenses[0]["updated_at"]);
}

#[tokio::test]
async fn create_rejects_malformed_input() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/expenses",
            "alice",
            json!({ "name": "Coffee", "amount": "lots" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid amount: not a decimal number: lots");

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/expenses",
            "alice",
            json!({ "name": "Coffee", "amount": "3", "date": "03/01/2026" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid field: date must be YYYY-MM-DD");

    let response = app
        .oneshot(send_json(
            "POST",
            "/expenses",
            "alice",
            json!({ "name": "   ", "amount": "3" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid field: name must not be empty");
}

#[tokio::test]
async fn list_is_scoped_to_the_owner_and_newest_first() {
    let app = app().await;

    created_expense(&app, "alice", json!({ "name": "First", "amount": "1" })).await;
    created_expense(&app, "alice", json!({ "name": "Second", "amount": "2" })).await;
    created_expense(&app, "bob", json!({ "name": "Intruder", "amount": "9" })).await;

    let body = body_json(app.oneshot(get("/expenses", "alice")).await.unwrap()).await;
    let names: Vec<&str> = body["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[tokio::test]
async fn update_reports_the_changes() {
    let app = app().await;
    let id = created_expense(
        &app,
        "alice",
        json!({ "name": "Groceries", "amount": "50", "category": "food", "date": "2026-03-01" }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/expenses/{id}"))
                .header("x-owner-id", "alice")
                .header("x-owner-name", "Alice W.")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "name": "Rent", "amount": "75", "category": "food", "date": "2026-03-01" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Expense updated");
    assert_eq!(
        body["changes"],
        json!(["Name: \"Groceries\" → \"Rent\"", "Amount: 50 → 75"])
    );

    let body = body_json(
        app.oneshot(get(&format!("/expenses/{id}"), "alice"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["expense"]["name"], "Rent");
    assert_eq!(body["expense"]["edit_count"], 1);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["editor_id"], "alice");
    assert_eq!(history[0]["editor_name"], "Alice W.");
    assert_eq!(history[0]["before"]["name"], "Groceries");
    assert_eq!(history[0]["after"]["name"], "Rent");
}

#[tokio::test]
async fn history_lists_every_edit() {
    let app = app().await;
    let id = created_expense(&app, "alice", json!({ "name": "Groceries", "amount": "50" })).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/expenses/{id}"))
                .header("x-owner-id", "alice")
                .header("x-owner-name", "Alice W.")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "name": "Groceries", "amount": "60" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/expenses/{id}"),
            "alice",
            json!({ "name": "Groceries", "amount": "70" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(
        app.oneshot(get(&format!("/expenses/{id}/history"), "alice"))
            .await
            .unwrap(),
    )
    .await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["editor_name"], "Alice W.");
    assert_eq!(history[1]["editor_name"], "Unknown");
    assert_eq!(history[0]["changes"], json!(["Amount: 50 → 60"]));
    assert_eq!(history[1]["changes"], json!(["Amount: 60 → 70"]));
}

#[tokio::test]
async fn foreign_owner_is_walled_off() {
    let app = app().await;
    let id = created_expense(&app, "alice", json!({ "name": "Secret", "amount": "5" })).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/expenses/{id}"), "bob"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "\"expense not exists\" key not found!");

    let response = app
        .clone()
        .oneshot(get(&format!("/expenses/{id}/history"), "bob"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/expenses/{id}"),
            "bob",
            json!({ "name": "Mine now", "amount": "5" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Forbidden: expense belongs to another owner");

    let response = app
        .clone()
        .oneshot(delete(&format!("/expenses/{id}"), "bob"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get(&format!("/expenses/{id}"), "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_round_trip() {
    let app = app().await;
    let id = created_expense(&app, "alice", json!({ "name": "Cinema", "amount": "12" })).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/expenses/{id}"), "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Expense deleted");

    let response = app
        .clone()
        .oneshot(get(&format!("/expenses/{id}"), "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(app.oneshot(get("/expenses", "alice")).await.unwrap()).await;
    assert_eq!(body["expenses"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn malformed_expense_ids_are_rejected() {
    let app = app().await;

    let response = app
        .oneshot(get("/expenses/not-a-uuid", "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn budget_endpoints_round_trip() {
    let app = app().await;

    let body = body_json(app.clone().oneshot(get("/budget", "alice")).await.unwrap()).await;
    assert_eq!(
        body,
        json!({
            "amount": "0",
            "updated_at": null,
            "status": {
                "tier": "unset",
                "percentage": null,
                "bar_percentage": null,
                "over_amount": null
            }
        })
    );

    let response = app
        .clone()
        .oneshot(send_json("PUT", "/budget", "alice", json!({ "amount": "250" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Budget saved");
    assert_eq!(body["amount"], "250");

    let body = body_json(app.clone().oneshot(get("/budget", "alice")).await.unwrap()).await;
    assert_eq!(body["amount"], "250");
    assert!(body["updated_at"].is_string());
    assert_eq!(
        body["status"],
        json!({
            "tier": "normal",
            "percentage": 0,
            "bar_percentage": 0,
            "over_amount": null
        })
    );

    let response = app
        .clone()
        .oneshot(send_json("PUT", "/budget", "alice", json!({ "amount": "0" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Budget reset");
    assert_eq!(body["amount"], "0");

    let response = app
        .clone()
        .oneshot(send_json("PUT", "/budget", "alice", json!({ "amount": "250" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(delete("/budget", "alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "message": "Budget reset" }));

    let body = body_json(app.oneshot(get("/budget", "alice")).await.unwrap()).await;
    assert_eq!(body["status"]["tier"], "unset");
}

#[tokio::test]
async fn budget_rejects_junk_amounts() {
    let app = app().await;

    let response = app
        .oneshot(send_json("PUT", "/budget", "alice", json!({ "amount": "lots" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid amount: not a decimal number: lots");
}

#[tokio::test]
async fn summary_reports_totals_and_overrun() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(send_json("PUT", "/budget", "alice", json!({ "amount": "100" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    created_expense(
        &app,
        "alice",
        json!({ "name": "Groceries", "amount": "80", "category": "food", "date": "2026-06-01" }),
    )
    .await;
    created_expense(
        &app,
        "alice",
        json!({ "name": "Cinema", "amount": "40", "category": "leisure", "date": "2026-06-01" }),
    )
    .await;

    let response = app.oneshot(get("/summary", "alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "total_spent": "120",
            "by_date": { "2026-06-01": "120" },
            "by_category": { "Over Budget": "20", "food": "80", "leisure": "40" },
            "status": {
                "tier": "exceeded",
                "percentage": 120,
                "bar_percentage": 100,
                "over_amount": "20"
            }
        })
    );
}

#[tokio::test]
async fn events_stream_delivers_owner_changes() {
    let app = app().await;

    let response = app.clone().oneshot(get("/events", "alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    let mut alice_events = response.into_body();

    let mut bob_events = app
        .clone()
        .oneshot(get("/events", "bob"))
        .await
        .unwrap()
        .into_body();

    let id = created_expense(&app, "alice", json!({ "name": "Coffee", "amount": "3" })).await;

    let frame = tokio::time::timeout(Duration::from_secs(5), alice_events.frame())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.contains("\"scope\":\"expenses\""));
    assert!(text.contains("\"action\":\"created\""));
    assert!(text.contains(&id));

    // Bob hears nothing about Alice's writes; only the keep-alive would
    // arrive eventually, far beyond this window.
    let waited = tokio::time::timeout(Duration::from_millis(300), bob_events.frame()).await;
    assert!(waited.is_err());
}
