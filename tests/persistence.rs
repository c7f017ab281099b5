//! Database-backed integration tests.
//!
//! Ignored by default because they need a live Postgres reachable through
//! `DATABASE_URL`. Run them with:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test --test persistence -- --ignored
//! ```
//!
//! Every test cleans up the rows it creates, using the API's own delete
//! endpoints where possible.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use portfolio_api::db;
use portfolio_api::routes::auth::issue_token;
use tower::ServiceExt;
use uuid::Uuid;

lazy_static::lazy_static! {
    // One runtime for the whole binary: the connection pool is a process
    // global and its connections must outlive any single test.
    static ref RT: tokio::runtime::Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");
}

async fn setup_app() -> Router {
    dotenvy::dotenv().ok();
    if db::get_pool().is_none() {
        let pool = db::init_pool(None)
            .await
            .expect("DATABASE_URL must point at a reachable Postgres");
        db::run_migrations(&pool).await.expect("migrations failed");
    }
    portfolio_api::create_app()
}

fn bearer() -> String {
    format!(
        "Bearer {}",
        issue_token("admin@example.com", "admin").unwrap()
    )
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ----------------------------------------------------------------------
// Projects
// ----------------------------------------------------------------------

#[test]
#[ignore]
fn test_project_create_get_delete_round_trip() {
    RT.block_on(async {
        let app = setup_app().await;
        let auth = bearer();

        let payload = serde_json::json!({
            "title": format!("Round Trip {}", Uuid::new_v4()),
            "description": "Created by the persistence suite",
            "image": "/img/round-trip.png",
            "technologies": ["Rust", "Axum"],
            "category": "web",
            "featured": true
        });
        let (status, created) =
            request(&app, Method::POST, "/api/projects", Some(&auth), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        // The stored row reads back with the submitted fields intact.
        let uri = format!("/api/projects/{}", id);
        let (status, fetched) = request(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], payload["title"]);
        assert_eq!(fetched["technologies"], payload["technologies"]);
        assert_eq!(fetched["featured"], serde_json::json!(true));

        let (status, body) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], serde_json::json!(true));

        // Gone after delete, and deleting again reports the same.
        let (status, _) = request(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    });
}

#[test]
#[ignore]
fn test_project_partial_update_preserves_unspecified_fields() {
    RT.block_on(async {
        let app = setup_app().await;
        let auth = bearer();

        let (status, created) = request(
            &app,
            Method::POST,
            "/api/projects",
            Some(&auth),
            Some(serde_json::json!({
                "title": format!("Merge {}", Uuid::new_v4()),
                "description": "Original description",
                "image": "/img/merge.png",
                "technologies": ["Rust"],
                "category": "web",
                "githubUrl": "https://github.com/example/merge"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/projects/{}", created["id"].as_str().unwrap());

        // Only the title changes; everything else keeps its prior value.
        let (status, updated) = request(
            &app,
            Method::PUT,
            &uri,
            Some(&auth),
            Some(serde_json::json!({"title": "Renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], serde_json::json!("Renamed"));
        assert_eq!(updated["description"], created["description"]);
        assert_eq!(updated["technologies"], created["technologies"]);
        assert_eq!(updated["category"], created["category"]);
        assert_eq!(updated["githubUrl"], created["githubUrl"]);
        assert_eq!(updated["featured"], created["featured"]);

        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
    });
}

// ----------------------------------------------------------------------
// Skills
// ----------------------------------------------------------------------

#[test]
#[ignore]
fn test_skill_create_get_delete_round_trip() {
    RT.block_on(async {
        let app = setup_app().await;
        let auth = bearer();

        let payload = serde_json::json!({
            "name": format!("Skill {}", Uuid::new_v4()),
            "category": "backend",
            "level": "Advanced",
            "percentage": 85,
            "experience": "Persistence suite"
        });
        let (status, created) =
            request(&app, Method::POST, "/api/skills", Some(&auth), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/api/skills/{}", created["id"].as_str().unwrap());
        let (status, fetched) = request(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], payload["name"]);
        assert_eq!(fetched["percentage"], payload["percentage"]);

        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = request(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    });
}

#[test]
#[ignore]
fn test_skill_partial_update_preserves_unspecified_fields() {
    RT.block_on(async {
        let app = setup_app().await;
        let auth = bearer();

        let (status, created) = request(
            &app,
            Method::POST,
            "/api/skills",
            Some(&auth),
            Some(serde_json::json!({
                "name": format!("Skill {}", Uuid::new_v4()),
                "category": "frontend",
                "level": "Intermediate",
                "percentage": 60,
                "experience": "2 years"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/skills/{}", created["id"].as_str().unwrap());

        let (status, updated) = request(
            &app,
            Method::PUT,
            &uri,
            Some(&auth),
            Some(serde_json::json!({"percentage": 75})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["percentage"], serde_json::json!(75));
        assert_eq!(updated["name"], created["name"]);
        assert_eq!(updated["category"], created["category"]);
        assert_eq!(updated["level"], created["level"]);
        assert_eq!(updated["experience"], created["experience"]);

        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
    });
}

// ----------------------------------------------------------------------
// Testimonials
// ----------------------------------------------------------------------

#[test]
#[ignore]
fn test_testimonial_create_get_delete_round_trip() {
    RT.block_on(async {
        let app = setup_app().await;
        let auth = bearer();

        let payload = serde_json::json!({
            "name": format!("Reviewer {}", Uuid::new_v4()),
            "role": "CTO",
            "content": "Persistence suite testimonial",
            "rating": 5
        });
        let (status, created) = request(
            &app,
            Method::POST,
            "/api/testimonials",
            Some(&auth),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        // Omitted avatar lands as the empty-string default.
        assert_eq!(created["avatar"], serde_json::json!(""));

        let uri = format!("/api/testimonials/{}", created["id"].as_str().unwrap());
        let (status, fetched) = request(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], payload["name"]);
        assert_eq!(fetched["rating"], payload["rating"]);

        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = request(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    });
}

#[test]
#[ignore]
fn test_testimonial_partial_update_preserves_unspecified_fields() {
    RT.block_on(async {
        let app = setup_app().await;
        let auth = bearer();

        let (status, created) = request(
            &app,
            Method::POST,
            "/api/testimonials",
            Some(&auth),
            Some(serde_json::json!({
                "name": format!("Reviewer {}", Uuid::new_v4()),
                "role": "Designer",
                "content": "Original content",
                "rating": 4,
                "avatar": "/img/avatar.png"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/testimonials/{}", created["id"].as_str().unwrap());

        let (status, updated) = request(
            &app,
            Method::PUT,
            &uri,
            Some(&auth),
            Some(serde_json::json!({"rating": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["rating"], serde_json::json!(5));
        assert_eq!(updated["name"], created["name"]);
        assert_eq!(updated["role"], created["role"]);
        assert_eq!(updated["content"], created["content"]);
        assert_eq!(updated["avatar"], created["avatar"]);

        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
    });
}

// ----------------------------------------------------------------------
// End-to-end admin flow
// ----------------------------------------------------------------------

#[test]
#[ignore]
fn test_login_create_update_delete_scenario() {
    RT.block_on(async {
        let app = setup_app().await;
        let pool = db::get_pool().unwrap();

        // Provision an admin row the way the hash-password helper would.
        let email = format!("it-admin-{}@example.com", Uuid::new_v4());
        let password = "integration-password";
        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).unwrap();
        sqlx::query("INSERT INTO admins (email, password_hash) VALUES ($1, $2)")
            .bind(&email)
            .bind(&hash)
            .execute(pool.as_ref())
            .await
            .unwrap();

        let (status, login) = request(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(serde_json::json!({"email": email, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(login["admin"]["email"], serde_json::json!(email));
        let auth = format!("Bearer {}", login["token"].as_str().unwrap());

        // The freshly issued token carries the whole mutation flow.
        let (status, created) = request(
            &app,
            Method::POST,
            "/api/projects",
            Some(&auth),
            Some(serde_json::json!({
                "title": format!("Scenario {}", Uuid::new_v4()),
                "description": "End to end",
                "image": "/img/scenario.png",
                "category": "other"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/projects/{}", created["id"].as_str().unwrap());

        let (status, updated) = request(
            &app,
            Method::PUT,
            &uri,
            Some(&auth),
            Some(serde_json::json!({"featured": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["featured"], serde_json::json!(true));

        let (status, _) = request(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = request(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        sqlx::query("DELETE FROM admins WHERE email = $1")
            .bind(&email)
            .execute(pool.as_ref())
            .await
            .unwrap();
    });
}
