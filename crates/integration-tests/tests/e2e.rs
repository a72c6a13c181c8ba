//! End-to-end flows against running servers.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`lumen migrate`)
//! - The site running (`cargo run -p lumen-site`)
//! - The admin running (`cargo run -p lumen-admin`)
//! - For admin flows, an admin account whose credentials are in
//!   `E2E_ADMIN_EMAIL` / `E2E_ADMIN_PASSWORD`
//!
//! Run with: `cargo test -p lumen-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use lumen_integration_tests::{CLIENT_IP, admin_base_url, site_base_url};
use reqwest::{Client, StatusCode, redirect::Policy};
use uuid::Uuid;

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

/// A client signed in to the admin.
async fn admin_client() -> Client {
    let client = client();
    let email = std::env::var("E2E_ADMIN_EMAIL").unwrap();
    let password = std::env::var("E2E_ADMIN_PASSWORD").unwrap();
    let response = client
        .post(format!("{}/admin/login", admin_base_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/admin");
    client
}

#[tokio::test]
#[ignore = "Requires running site and database"]
async fn test_site_readiness() {
    let response = client()
        .get(format!("{}/health/ready", site_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running site and database"]
async fn test_contact_message_is_accepted() {
    let response = client()
        .post(format!("{}/contact", site_base_url()))
        .header("x-forwarded-for", CLIENT_IP)
        .form(&[
            ("name", "E2E Visitor"),
            ("email", "visitor@example.com"),
            ("message", "Hello from the end-to-end tests"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("/contact?notice="));
}

#[tokio::test]
#[ignore = "Requires running site, admin, database and an admin account"]
async fn test_draft_post_is_hidden_until_published() {
    let admin = admin_client().await;
    let slug = format!("e2e-{}", Uuid::new_v4());

    let response = admin
        .post(format!("{}/admin/blog", admin_base_url()))
        .form(&[
            ("title", "End to end draft"),
            ("slug", slug.as_str()),
            ("content", "Draft body"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let public = client()
        .get(format!("{}/blog/{slug}", site_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(public.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin and database"]
async fn test_member_account_cannot_open_admin() {
    let client = client();
    let email = format!("member-{}@example.com", Uuid::new_v4());
    let form = [("email", email.as_str()), ("password", "correct horse battery")];

    let response = client
        .post(format!("{}/admin/signup", admin_base_url()))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .post(format!("{}/admin/login", admin_base_url()))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .get(format!("{}/admin", admin_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(!location.starts_with("/admin"));
}
