use chemviz_auth::{AuthError, AuthService, Authenticator};
use chemviz_storage::{InMemoryKeyValueStore, KeyValueStore};
use std::sync::Arc;

fn service() -> (Arc<InMemoryKeyValueStore>, AuthService) {
    let store = Arc::new(InMemoryKeyValueStore::new());
    (store.clone(), AuthService::new(store))
}

#[tokio::test]
async fn sign_in_persists_user_record() {
    let (store, auth) = service();
    let user = auth.sign_in(" operator ", "secret").await.expect("sign in");
    assert_eq!(user.username, "operator");

    let raw = store.get("chem_user").await.expect("get").expect("stored");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(value["username"], "operator");
    assert_eq!(value["isAuthenticated"], true);

    let current = auth.require_user().await.expect("require");
    assert_eq!(current, user);
}

#[tokio::test]
async fn empty_credentials_rejected() {
    let (_, auth) = service();
    let err = auth.sign_in("", "secret").await.expect_err("no user");
    assert!(matches!(err, AuthError::MissingCredentials));
    let err = auth.sign_in("operator", "  ").await.expect_err("no password");
    assert!(matches!(err, AuthError::MissingCredentials));
    assert!(auth.current_user().await.expect("current").is_none());
}

#[tokio::test]
async fn sign_out_closes_the_gate() {
    let (_, auth) = service();
    let gate: &dyn Authenticator = &auth;
    gate.sign_in("operator", "secret").await.expect("sign in");
    assert!(gate.sign_out().await.expect("sign out"));
    assert!(!gate.sign_out().await.expect("second sign out"));
    let err = gate.require_user().await.expect_err("gate closed");
    assert!(matches!(err, AuthError::NotSignedIn));
}

#[tokio::test]
async fn malformed_record_counts_as_signed_out() {
    let (store, auth) = service();
    store
        .set("chem_user", "not json".to_string())
        .await
        .expect("set");
    assert!(auth.current_user().await.expect("current").is_none());

    store
        .set(
            "chem_user",
            r#"{"username":"x","isAuthenticated":false}"#.to_string(),
        )
        .await
        .expect("set");
    assert!(matches!(
        auth.require_user().await,
        Err(AuthError::NotSignedIn)
    ));
}
