#![allow(clippy::unwrap_used)]

use argon2::Params;
use reqwest::StatusCode;
use secrecy::SecretString;
use sesame::{
    api,
    auth::{AuthConfig, AuthService},
    client::{AuthClient, ClientError, SessionFile},
    password::Hasher,
    store::MemoryUserStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use ulid::Ulid;

async fn spawn_server() -> String {
    let auth = AuthService::new(
        AuthConfig::default(),
        &SecretString::from("test-secret".to_string()),
        Arc::new(MemoryUserStore::new()),
        Hasher::new(Params::new(1024, 1, 1, None).unwrap()),
    )
    .unwrap();
    let app = api::app(Arc::new(auth)).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn client_round_trip() {
    let client = AuthClient::new(&spawn_server().await).unwrap();

    let created = client.signup("alice", "a@x.com", "Secr3t!").await.unwrap();
    assert_eq!(created.message, "Account created successfully");

    let token = client.signin("a@x.com", "Secr3t!").await.unwrap();
    assert!(!token.is_empty());

    let profile = client.me(&token).await.unwrap();
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.email, "a@x.com");

    let logged_out = client.logout(Some(&token)).await.unwrap();
    assert_eq!(logged_out.message, "Logged out");
}

#[tokio::test]
async fn server_errors_surface_as_api_errors() {
    let client = AuthClient::new(&spawn_server().await).unwrap();
    client.signup("alice", "a@x.com", "Secr3t!").await.unwrap();

    match client.signup("alice", "a@x.com", "Secr3t!").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(message, "Email already registered");
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    match client.signin("a@x.com", "Wr0ngpass").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected invalid credentials, got {other:?}"),
    }

    match client.me("not.a.jwt").await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
        other => panic!("expected unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn session_file_tracks_login_state() {
    let client = AuthClient::new(&spawn_server().await).unwrap();
    let session =
        SessionFile::new(std::env::temp_dir().join(format!("sesame-flow-{}", Ulid::new())));

    client.signup("alice", "a@x.com", "Secr3t!").await.unwrap();
    let token = client.signin("a@x.com", "Secr3t!").await.unwrap();
    session.save(&token).await.unwrap();

    let stored = session.load().await.unwrap().unwrap();
    assert_eq!(client.me(&stored).await.unwrap().username, "alice");

    client.logout(Some(&stored)).await.unwrap();
    session.clear().await.unwrap();
    assert!(session.load().await.unwrap().is_none());
}
