use httpmock::prelude::*;
use serde_json::json;

use get_authentic::backend::{
    BackendClient, BackendConfig, ProfileUpdate, ResultSubmission, SignupRequest,
};
use get_authentic::catalog::Category;
use get_authentic::config::UserContext;
use get_authentic::scoring::ProfileLabel;

fn client_for(server: &MockServer) -> BackendClient {
    let _ = rustls::crypto::ring::default_provider().install_default();
    BackendClient::new(&BackendConfig {
        base_url: server.base_url(),
        timeout: Some("5s".to_string()),
    })
    .unwrap()
}

fn submission() -> ResultSubmission {
    ResultSubmission {
        email: "owner@example.com".to_string(),
        scores: vec![7, 6, 5, 4],
        categories: Category::ALL.to_vec(),
        profile_type: ProfileLabel::FoodDrivenTraveler,
    }
}

#[tokio::test]
async fn test_submit_posts_result_payload() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/upload-result")
                .body_contains("name=\"email\"")
                .body_contains("owner@example.com")
                .body_contains("name=\"scores\"")
                .body_contains("[7,6,5,4]")
                .body_contains("name=\"categories\"")
                .body_contains(concat!(
                    r#"["Ingredients","Visual Appearance","#,
                    r#""Cultural & Local Experiences","Servicescape"]"#
                ))
                .body_contains("name=\"profile_type\"")
                .body_contains("Food-Driven Traveler");
            then.status(200).json_body(json!({
                "success": true,
                "token": "tok-123",
                "url": "/results/tok-123"
            }));
        })
        .await;

    let receipt = client_for(&server).submit_result(&submission()).await.unwrap();

    upload.assert_async().await;
    assert!(receipt.success);
    assert_eq!(receipt.token.as_deref(), Some("tok-123"));
    assert_eq!(receipt.url.as_deref(), Some("/results/tok-123"));
}

#[tokio::test]
async fn test_submit_reports_backend_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/upload-result");
            then.status(422).json_body(json!({"detail": "email is required"}));
        })
        .await;

    let err = client_for(&server)
        .submit_result(&submission())
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("422"), "{}", msg);
    assert!(msg.contains("email is required"), "{}", msg);
}

#[tokio::test]
async fn test_submit_rejected_without_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/upload-result");
            then.status(200).json_body(json!({"success": false}));
        })
        .await;

    let err = client_for(&server)
        .submit_result(&submission())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("did not accept"));
}

#[tokio::test]
async fn test_fetch_result_by_token() {
    let server = MockServer::start_async().await;
    let fetch = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/results/tok-123");
            then.status(200).json_body(json!({
                "email": "owner@example.com",
                "scores": [7, 6, 5, 4],
                "categories": [
                    "Ingredients",
                    "Visual Appearance",
                    "Cultural & Local Experiences",
                    "Servicescape"
                ],
                "profile_type": "Food-Driven Traveler"
            }));
        })
        .await;

    let stored = client_for(&server).fetch_result("tok-123").await.unwrap();

    fetch.assert_async().await;
    assert_eq!(stored, submission());
}

#[tokio::test]
async fn test_fetch_missing_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/results/nope");
            then.status(404).body("");
        })
        .await;

    let err = client_for(&server).fetch_result("nope").await.unwrap_err();
    assert_eq!(err.to_string(), "Backend returned 404 Not Found");
}

#[tokio::test]
async fn test_fetch_keeps_token_inside_results_path() {
    let server = MockServer::start_async().await;
    let admin = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin");
            then.status(200).json_body(json!({
                "email": "owner@example.com",
                "scores": [],
                "categories": [],
                "profile_type": "Leisure Traveler"
            }));
        })
        .await;

    let client = client_for(&server);
    assert!(client.fetch_result("../admin").await.is_err());
    assert!(client.fetch_result("..").await.is_err());
    assert_eq!(admin.hits_async().await, 0);
}

#[tokio::test]
async fn test_signup_posts_account() {
    let server = MockServer::start_async().await;
    let signup = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/signup").json_body(json!({
                "restaurant_name": "Baan Thai",
                "email": "owner@example.com",
                "password": "hunter22"
            }));
            then.status(200).json_body(json!({
                "success": true,
                "message": "Account created successfully."
            }));
        })
        .await;

    let message = client_for(&server)
        .signup(&SignupRequest {
            restaurant_name: "Baan Thai".to_string(),
            email: "owner@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();

    signup.assert_async().await;
    assert_eq!(message, "Account created successfully.");
}

#[tokio::test]
async fn test_signup_existing_user() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/signup");
            then.status(400).json_body(json!({"detail": "User already exists."}));
        })
        .await;

    let err = client_for(&server)
        .signup(&SignupRequest {
            restaurant_name: "Baan Thai".to_string(),
            email: "owner@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("User already exists."), "{}", err);
}

#[tokio::test]
async fn test_login_returns_respondent() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/login").json_body(json!({
                "identifier": "Baan Thai",
                "password": "hunter22"
            }));
            then.status(200).json_body(json!({
                "restaurant_name": "Baan Thai",
                "email": "owner@example.com"
            }));
        })
        .await;

    let user = client_for(&server)
        .login("Baan Thai", "hunter22")
        .await
        .unwrap();

    login.assert_async().await;
    assert_eq!(
        user,
        UserContext {
            email: "owner@example.com".to_string(),
            restaurant_name: Some("Baan Thai".to_string()),
        }
    );
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/login");
            then.status(401).json_body(json!({"detail": "Invalid credentials."}));
        })
        .await;

    let err = client_for(&server)
        .login("owner@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Backend returned 401 Unauthorized: Invalid credentials."
    );
}

fn profile() -> ProfileUpdate {
    ProfileUpdate {
        contact_email: "owner@example.com".to_string(),
        owner_name: "Somchai".to_string(),
        location: "Chiang Mai".to_string(),
        business_type: "Restaurant".to_string(),
        current_position: "Owner".to_string(),
        website: Some("https://baanthai.example".to_string()),
        ..ProfileUpdate::default()
    }
}

#[tokio::test]
async fn test_update_profile_posts_details() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/profile-update").json_body(json!({
                "contact_email": "owner@example.com",
                "owner_name": "Somchai",
                "location": "Chiang Mai",
                "business_type": "Restaurant",
                "current_position": "Owner",
                "website": "https://baanthai.example"
            }));
            then.status(200).json_body(json!({"success": true}));
        })
        .await;

    client_for(&server).update_profile(&profile()).await.unwrap();
    update.assert_async().await;
}

#[tokio::test]
async fn test_update_profile_requires_fields() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/profile-update");
            then.status(200).json_body(json!({"success": true}));
        })
        .await;

    let incomplete = ProfileUpdate {
        owner_name: String::new(),
        ..profile()
    };
    let err = client_for(&server)
        .update_profile(&incomplete)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("owner_name"), "{}", err);
    assert_eq!(update.hits_async().await, 0);
}
