//! End-to-end route tests against the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bookstore_app::{build_app, modules::books::store::MemoryBookStore};
use bookstore_kernel::Settings;

fn app() -> Router {
    build_app(Arc::new(MemoryBookStore::new()), &Settings::default())
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn error_message(response: Response) -> String {
    json(response).await["error"]["message"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Add a book and return its id as listed by the inventory.
async fn add_book(app: &Router, form: &str) -> String {
    let before = json(get(app, "/show_inventory").await).await["count"]
        .as_u64()
        .unwrap();

    let response = post_form(app, "/add", form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/home");

    let inventory = json(get(app, "/show_inventory").await).await;
    assert_eq!(inventory["count"].as_u64().unwrap(), before + 1);
    inventory["books"][before as usize]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

const DUNE: &str = "title=Dune&author=Herbert&genre=SciFi&price=15.50&quantity=3";

#[tokio::test]
async fn home_renders() {
    let response = get(&app(), "/home").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json(response).await["links"].is_array());
}

#[tokio::test]
async fn dune_end_to_end() {
    let app = app();
    let id = add_book(&app, DUNE).await;

    let detail = json(get(&app, &format!("/book_detail/{id}")).await).await;
    assert_eq!(detail["book"]["title"], "Dune");
    assert_eq!(detail["book"]["author"], "Herbert");
    assert_eq!(detail["book"]["genre"], "SciFi");
    assert_eq!(detail["book"]["price"], 15.5);
    assert_eq!(detail["book"]["quantity"], 3);

    let response = post_form(&app, &format!("/edit_quantity/{id}"), "quantity=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Quantity must be a positive value.");

    let detail = json(get(&app, &format!("/book_detail/{id}")).await).await;
    assert_eq!(detail["book"]["quantity"], 3);
}

#[tokio::test]
async fn inventory_lists_title_and_quantity_only() {
    let app = app();
    add_book(&app, DUNE).await;

    let inventory = json(get(&app, "/show_inventory").await).await;
    let entry = inventory["books"][0].as_object().unwrap();
    let mut keys: Vec<_> = entry.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["id", "quantity", "title"]);
}

#[tokio::test]
async fn invalid_adds_are_rejected_without_creating_records() {
    let app = app();
    let cases = [
        ("title=Dune&author=Herbert&genre=SciFi&price=15.50", "All fields are required."),
        ("title=&author=Herbert&genre=SciFi&price=1&quantity=1", "All fields are required."),
        ("title=Dune&author=Herbert&genre=SciFi&price=abc&quantity=3", "Price and quantity must be numbers."),
        ("title=Dune&author=Herbert&genre=SciFi&price=15.5&quantity=x", "Price and quantity must be numbers."),
        ("title=Dune&author=Herbert&genre=SciFi&price=0&quantity=3", "Price and quantity must be positive values."),
        ("title=Dune&author=Herbert&genre=SciFi&price=15.5&quantity=-1", "Price and quantity must be positive values."),
    ];

    for (form, message) in cases {
        let response = post_form(&app, "/add", form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
        assert_eq!(error_message(response).await, message, "{form}");
    }

    let inventory = json(get(&app, "/show_inventory").await).await;
    assert_eq!(inventory["count"], 0);
}

#[tokio::test]
async fn search_without_parameters_matches_nothing() {
    let app = app();
    add_book(&app, DUNE).await;

    let results = json(get(&app, "/search").await).await;
    assert_eq!(results["count"], 0);
}

#[tokio::test]
async fn search_by_title_is_case_insensitive() {
    let app = app();
    add_book(&app, "title=Foolish+Fire&author=A&genre=G&price=5&quantity=1").await;
    add_book(&app, "title=BIG+FOO&author=B&genre=G&price=5&quantity=1").await;
    add_book(&app, "title=Dune&author=C&genre=G&price=5&quantity=1").await;

    let results = json(get(&app, "/search?title=foo").await).await;
    assert_eq!(results["count"], 2);
    let titles: Vec<_> = results["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap().to_string())
        .collect();
    assert!(titles.contains(&"Foolish Fire".to_string()));
    assert!(titles.contains(&"BIG FOO".to_string()));
}

#[tokio::test]
async fn search_by_price_is_upper_bound() {
    let app = app();
    add_book(&app, "title=Cheap&author=A&genre=G&price=20.00&quantity=1").await;
    add_book(&app, "title=Dear&author=A&genre=G&price=20.01&quantity=1").await;

    let results = json(get(&app, "/search?price=20").await).await;
    assert_eq!(results["count"], 1);
    assert_eq!(results["books"][0]["title"], "Cheap");
}

#[tokio::test]
async fn search_rejects_malformed_date_and_price() {
    let app = app();

    let response = get(&app, "/search?date_added=2024-01-01").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/search?date_added=01/01/2024").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Invalid date format. Please use YYYY-MM-DD."
    );

    let response = get(&app, "/search?price=cheap").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Invalid price format. Please enter a valid number."
    );
}

#[tokio::test]
async fn search_by_date_returns_books_added_that_day() {
    let app = app();
    add_book(&app, DUNE).await;
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();

    let results = json(get(&app, &format!("/search?date_added={today}")).await).await;
    assert_eq!(results["count"], 1);
    assert_eq!(results["books"][0]["title"], "Dune");

    let results = json(get(&app, "/search?date_added=2000-01-01").await).await;
    assert_eq!(results["count"], 0);
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = app();

    let request = Request::post("/add")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(DUNE))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"]["code"], "bad_request");

    let response = get(&app, "/search?title=a&title=b").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"]["code"], "bad_request");

    let inventory = json(get(&app, "/show_inventory").await).await;
    assert_eq!(inventory["count"], 0);
}

#[tokio::test]
async fn delete_removes_book_and_unknown_ids_still_redirect() {
    let app = app();
    let id = add_book(&app, DUNE).await;

    let response = post_form(&app, &format!("/delete/{id}"), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/home");

    let inventory = json(get(&app, "/show_inventory").await).await;
    assert_eq!(inventory["count"], 0);

    let response = post_form(&app, &format!("/delete/{id}"), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/home");
}

#[tokio::test]
async fn price_edit_updates_only_price() {
    let app = app();
    let id = add_book(&app, DUNE).await;
    let before = json(get(&app, &format!("/book_detail/{id}")).await).await["book"].clone();

    let response = post_form(&app, &format!("/edit_price/{id}"), "price=-3").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = post_form(&app, &format!("/edit_price/{id}"), "price=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_form(&app, &format!("/edit_price/{id}"), "price=9.99").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/book_detail/{id}"));

    let after = json(get(&app, &format!("/book_detail/{id}")).await).await["book"].clone();
    assert_eq!(after["price"], 9.99);
    for field in ["id", "title", "author", "genre", "quantity", "date_added"] {
        assert_eq!(after[field], before[field], "{field} changed");
    }
}

#[tokio::test]
async fn text_edits_for_every_field() {
    let app = app();
    let id = add_book(&app, DUNE).await;

    for (field, value) in [("title", "Dune Messiah"), ("author", "F. Herbert"), ("genre", "Space Opera")] {
        let response = post_form(
            &app,
            &format!("/edit_{field}/{id}"),
            &format!("{field}={}", value.replace(' ', "+")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{field}");

        let response = post_form(&app, &format!("/edit_{field}/{id}"), &format!("{field}=")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}");
    }

    let detail = json(get(&app, &format!("/book_detail/{id}")).await).await;
    assert_eq!(detail["book"]["title"], "Dune Messiah");
    assert_eq!(detail["book"]["author"], "F. Herbert");
    assert_eq!(detail["book"]["genre"], "Space Opera");
    assert_eq!(detail["book"]["price"], 15.5);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = app();

    let response = get(&app, "/book_detail/not-an-id").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/book_detail/65a1b2c3d4e5f60718293a4b").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(&app, "/edit_title/65a1b2c3d4e5f60718293a4b", "title=Emma").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(&app, "/delete/not-an-id", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn probes_and_openapi() {
    let app = app();
    assert_eq!(get(&app, "/healthz").await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/readyz").await.status(), StatusCode::OK);

    let spec = json(get(&app, "/docs/openapi.json").await).await;
    assert!(spec["paths"]["/search"]["get"].is_object());
    assert!(spec["paths"]["/edit_author/{id}"]["post"].is_object());
    assert!(spec["components"]["schemas"]["Book"].is_object());
}
