// Integration tests for register, login and profile commands

use folio_core::errors::FolioError;
use folio_core::model::{CollectionName, RecordId, Role};
use folio_core_types::Sensitive;
use folio_engine::commands::account::{
    add_user, create_user, delete_user, list_users, login, me, register, update_me,
};
use folio_engine::TokenSigner;
use folio_store::CollectionStore;
use serde_json::json;

fn signer() -> TokenSigner {
    TokenSigner::new(&Sensitive::from("account-tests-secret"), 24)
}

#[tokio::test]
async fn test_register_then_login() {
    let store = CollectionStore::in_memory();
    let signer = signer();

    let session = register(
        &store,
        &signer,
        &json!({"email": "Ada@Example.com", "password": "pw-123", "name": "Ada"}),
    )
    .await
    .unwrap();
    assert_eq!(session.user.get_str("email"), Some("ada@example.com"));
    assert_eq!(session.user.get_str("role"), Some("user"));
    assert!(session.user.get("passwordHash").is_none());

    let claims = signer.verify(&session.token).unwrap();
    assert_eq!(claims.sub, "1");
    assert_eq!(claims.role, Role::User);

    let again = login(&store, &signer, &json!({"email": "ADA@example.com", "password": "pw-123"}))
        .await
        .unwrap();
    assert_eq!(again.user.get("id"), Some(&json!(1)));
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let store = CollectionStore::in_memory();
    register(&store, &signer(), &json!({"email": "a@b.c", "password": "plain-secret"}))
        .await
        .unwrap();

    let raw = store.fetch_collection(CollectionName::Users).await.unwrap();
    let stored = raw[0].get_str("passwordHash").unwrap();
    assert!(stored.starts_with("$argon2"));
    assert!(!serde_json::to_string(&raw).unwrap().contains("plain-secret"));
}

#[tokio::test]
async fn test_register_duplicate_email_ignores_case() {
    let store = CollectionStore::in_memory();
    register(&store, &signer(), &json!({"email": "a@b.c", "password": "x"}))
        .await
        .unwrap();

    let err = register(&store, &signer(), &json!({"email": " A@B.C ", "password": "y"}))
        .await
        .unwrap_err();
    assert!(matches!(err, FolioError::EmailTaken { .. }));
    assert_eq!(list_users(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_fail_alike() {
    let store = CollectionStore::in_memory();
    register(&store, &signer(), &json!({"email": "a@b.c", "password": "right"}))
        .await
        .unwrap();

    let wrong = login(&store, &signer(), &json!({"email": "a@b.c", "password": "wrong"}))
        .await
        .unwrap_err();
    let unknown = login(&store, &signer(), &json!({"email": "x@y.z", "password": "right"}))
        .await
        .unwrap_err();

    assert_eq!(wrong, FolioError::InvalidCredentials);
    assert_eq!(unknown, FolioError::InvalidCredentials);
}

#[tokio::test]
async fn test_login_missing_fields_is_validation_error() {
    let store = CollectionStore::in_memory();
    let err = login(&store, &signer(), &json!({"email": "a@b.c"}))
        .await
        .unwrap_err();
    assert!(matches!(err, FolioError::MissingFields { .. }));
}

#[tokio::test]
async fn test_legacy_plaintext_user_cannot_log_in() {
    let store = CollectionStore::in_memory();
    store
        .replace_collection(
            CollectionName::Users,
            &[folio_core::Record::from_value(json!({"id": 1, "email": "old@b.c", "password": "hunter2"})).unwrap()],
        )
        .await
        .unwrap();

    let err = login(&store, &signer(), &json!({"email": "old@b.c", "password": "hunter2"}))
        .await
        .unwrap_err();
    assert_eq!(err, FolioError::InvalidCredentials);
}

#[tokio::test]
async fn test_me_and_update_me() {
    let store = CollectionStore::in_memory();
    let signer = signer();
    let session = register(&store, &signer, &json!({"email": "a@b.c", "password": "old-pw"}))
        .await
        .unwrap();
    let claims = signer.verify(&session.token).unwrap();

    let profile = me(&store, &claims).await.unwrap();
    assert_eq!(profile.get_str("email"), Some("a@b.c"));

    let updated = update_me(&store, &claims, &json!({"name": "Ada", "password": "new-pw"}))
        .await
        .unwrap();
    assert_eq!(updated.get_str("name"), Some("Ada"));
    assert!(updated.get("passwordHash").is_none());

    assert!(login(&store, &signer, &json!({"email": "a@b.c", "password": "old-pw"}))
        .await
        .is_err());
    assert!(login(&store, &signer, &json!({"email": "a@b.c", "password": "new-pw"}))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_update_me_rejects_taken_email() {
    let store = CollectionStore::in_memory();
    let signer = signer();
    register(&store, &signer, &json!({"email": "first@b.c", "password": "x"}))
        .await
        .unwrap();
    let second = register(&store, &signer, &json!({"email": "second@b.c", "password": "x"}))
        .await
        .unwrap();
    let claims = signer.verify(&second.token).unwrap();

    let err = update_me(&store, &claims, &json!({"email": "FIRST@b.c"}))
        .await
        .unwrap_err();
    assert!(matches!(err, FolioError::EmailTaken { .. }));

    // keeping one's own email is not a conflict
    update_me(&store, &claims, &json!({"email": "second@b.c"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_deleted_account_token_is_unauthorized() {
    let store = CollectionStore::in_memory();
    let signer = signer();
    let session = register(&store, &signer, &json!({"email": "a@b.c", "password": "x"}))
        .await
        .unwrap();
    let claims = signer.verify(&session.token).unwrap();

    store.replace_collection(CollectionName::Users, &[]).await.unwrap();

    let err = me(&store, &claims).await.unwrap_err();
    assert!(matches!(err, FolioError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_create_admin_user() {
    let store = CollectionStore::in_memory();
    let admin = create_user(
        &store,
        "root@b.c",
        Sensitive::from("admin-pw"),
        Some("Root".to_string()),
        Role::Admin,
    )
    .await
    .unwrap();
    assert_eq!(admin.get_str("role"), Some("admin"));

    let session = login(&store, &signer(), &json!({"email": "root@b.c", "password": "admin-pw"}))
        .await
        .unwrap();
    assert_eq!(signer().verify(&session.token).unwrap().role, Role::Admin);
}

#[tokio::test]
async fn test_add_user_with_role() {
    let store = CollectionStore::in_memory();
    let admin = add_user(
        &store,
        &json!({"email": "root@example.com", "password": "pw", "role": "admin"}),
    )
    .await
    .unwrap();
    assert_eq!(admin.get_str("role"), Some("admin"));
    assert!(admin.get("passwordHash").is_none());

    let err = add_user(
        &store,
        &json!({"email": "x@example.com", "password": "pw", "role": "owner"}),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, FolioError::InvalidField { ref field, .. } if field == "role"));
}

#[tokio::test]
async fn test_delete_user() {
    let store = CollectionStore::in_memory();
    add_user(&store, &json!({"email": "a@b.c", "password": "pw"}))
        .await
        .unwrap();

    let removed = delete_user(&store, &RecordId::new("1")).await.unwrap();
    assert_eq!(removed.get_str("email"), Some("a@b.c"));
    assert!(removed.get("passwordHash").is_none());
    assert!(list_users(&store).await.unwrap().is_empty());

    let err = delete_user(&store, &RecordId::new("1")).await.unwrap_err();
    assert!(matches!(err, FolioError::RecordNotFound { .. }));
}

#[tokio::test]
async fn test_create_user_rejects_blank_credentials() {
    let store = CollectionStore::in_memory();

    let err = create_user(&store, "  ", Sensitive::from(""), None, Role::Admin)
        .await
        .unwrap_err();
    match err {
        FolioError::MissingFields { fields, .. } => {
            assert_eq!(fields, vec!["email".to_string(), "password".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = create_user(&store, "a@b.c", Sensitive::from("   "), None, Role::User)
        .await
        .unwrap_err();
    assert!(matches!(err, FolioError::MissingFields { .. }));
    assert!(list_users(&store).await.unwrap().is_empty());
}
