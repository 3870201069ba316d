//! End-to-end tests for the assembled application.
//!
//! Requests pass through `build_app`, so routing, extractor configuration and
//! middleware match the running server. Storage is in memory.

use actix_web::http::StatusCode;
use actix_web::http::header::CACHE_CONTROL;
use actix_web::{test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use taskboard::domain::TRACE_ID_HEADER;
use taskboard::inbound::http::health::HealthState;
use taskboard::inbound::http::test_utils::{TestHarness, bearer};
use taskboard::server::{AppDependencies, build_app};

struct Suite {
    harness: TestHarness,
    health: web::Data<HealthState>,
}

impl Suite {
    fn deps(&self) -> AppDependencies {
        AppDependencies {
            health_state: self.health.clone(),
            http_state: self.harness.state(),
        }
    }
}

#[fixture]
fn suite() -> Suite {
    Suite {
        harness: TestHarness::new(),
        health: web::Data::new(HealthState::new()),
    }
}

async fn signup(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
) -> (String, String) {
    let req = actix_test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({"email": email, "password": "correct horse", "name": "Ada"}))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    let id = body["user"]["id"].as_str().expect("user id").to_owned();
    let token = body["token"].as_str().expect("token").to_owned();
    (id, token)
}

#[rstest]
#[actix_web::test]
async fn signed_up_user_manages_own_tasks(suite: Suite) {
    let app = actix_test::init_service(build_app(suite.deps())).await;
    let (user_id, token) = signup(&app, "ada@example.com").await;

    let create = actix_test::TestRequest::post()
        .uri(&format!("/api/{user_id}/tasks"))
        .insert_header(bearer(&token))
        .set_json(json!({"title": "Buy milk", "priority": "low", "tags": ["errand"]}))
        .to_request();
    let res = actix_test::call_service(&app, create).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    assert_eq!(created["user_id"], Value::String(user_id.clone()));
    assert_eq!(created["completed"], Value::Bool(false));
    assert!(created["created_at"].is_string());
    assert!(created.get("createdAt").is_none());

    let list = actix_test::TestRequest::get()
        .uri(&format!("/api/{user_id}/tasks?search=MILK"))
        .insert_header(bearer(&token))
        .to_request();
    let listed: Vec<Value> = actix_test::call_and_read_body_json(&app, list).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Buy milk");
}

#[rstest]
#[actix_web::test]
async fn second_account_cannot_read_first_accounts_tasks(suite: Suite) {
    let app = actix_test::init_service(build_app(suite.deps())).await;
    let (ada_id, ada_token) = signup(&app, "ada@example.com").await;
    let (_, bob_token) = signup(&app, "bob@example.com").await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/{ada_id}/tasks"))
        .insert_header(bearer(&bob_token))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let own = actix_test::TestRequest::get()
        .uri(&format!("/api/{ada_id}/tasks"))
        .insert_header(bearer(&ada_token))
        .to_request();
    let listed: Vec<Value> = actix_test::call_and_read_body_json(&app, own).await;
    assert!(listed.is_empty());
}

#[rstest]
#[actix_web::test]
async fn duplicate_signup_is_rejected_and_login_succeeds(suite: Suite) {
    let app = actix_test::init_service(build_app(suite.deps())).await;
    let (user_id, _) = signup(&app, "ada@example.com").await;

    let again = actix_test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({"email": "ada@example.com", "password": "another pass"}))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, again).await.status(),
        StatusCode::BAD_REQUEST
    );

    let login = actix_test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "ada@example.com", "password": "correct horse"}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, login).await;
    assert_eq!(body["user"]["id"], Value::String(user_id));

    let wrong = actix_test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "ada@example.com", "password": "wrong horse"}))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, wrong).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[rstest]
#[actix_web::test]
async fn session_reflects_presented_token(suite: Suite) {
    let app = actix_test::init_service(build_app(suite.deps())).await;
    let (user_id, token) = signup(&app, "ada@example.com").await;

    let with_token = actix_test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, with_token).await;
    assert_eq!(body["user"]["id"], Value::String(user_id));
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["token"], Value::String(token));

    let anonymous = actix_test::TestRequest::get().uri("/auth/session").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, anonymous).await;
    assert!(body.is_null());
}

#[rstest]
#[actix_web::test]
async fn logout_acknowledges_without_credentials(suite: Suite) {
    let app = actix_test::init_service(build_app(suite.deps())).await;

    let req = actix_test::TestRequest::post().uri("/auth/logout").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "Logged out successfully");
}

#[rstest]
#[actix_web::test]
async fn error_bodies_carry_the_trace_id_header(suite: Suite) {
    let app = actix_test::init_service(build_app(suite.deps())).await;

    let req = actix_test::TestRequest::get().uri("/api/u1/tasks").to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["traceId"], Value::String(header));
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn probes_and_index_are_public(suite: Suite) {
    suite.health.mark_ready();
    let app = actix_test::init_service(build_app(suite.deps())).await;

    let ready = actix_test::TestRequest::get().uri("/health/ready").to_request();
    let res = actix_test::call_service(&app, ready).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(CACHE_CONTROL));

    let health = actix_test::TestRequest::get().uri("/health").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, health).await;
    assert_eq!(body["status"], "healthy");

    let index = actix_test::TestRequest::get().uri("/").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, index).await;
    assert_eq!(body["openapi"], "/api-docs/openapi.json");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_body_is_a_bad_request(suite: Suite) {
    let app = actix_test::init_service(build_app(suite.deps())).await;
    let (user_id, token) = signup(&app, "ada@example.com").await;

    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/{user_id}/tasks"))
        .insert_header(bearer(&token))
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}
