//! Account command handlers: register, login, profile.
//!
//! User records live in the `users` collection with fields `id`, `email`,
//! `name`, `role`, `passwordHash` and `createdAt`. Emails are stored
//! lowercased and compared case-insensitively. A user record never leaves
//! this module with its `passwordHash`.

use std::time::Instant;

use folio_core::errors::FolioError;
use folio_core::model::{CollectionName, Record, RecordId, Role};
use folio_core::ops;
use folio_core::rules::require_fields;
use folio_core::{log_op_end, log_op_error, log_op_start};
use folio_core_types::Sensitive;
use folio_store::{CollectionStore, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{as_object, elapsed_ms, now_iso};
use crate::auth::{hash_password, verify_password, Claims, TokenSigner};

const USERS: CollectionName = CollectionName::Users;
const PASSWORD_HASH: &str = "passwordHash";

/// A user plus a freshly issued token
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: Record,
    pub token: String,
}

/// Copy of a user record safe to return to clients
pub fn public_user(record: &Record) -> Record {
    let mut user = record.clone();
    user.remove(PASSWORD_HASH);
    user.remove("password");
    user
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_of(record: &Record) -> Option<String> {
    record.get_str("email").map(normalize_email)
}

fn string_field(body: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(FolioError::InvalidField {
            field: field.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

/// Argon2 blocks for tens of milliseconds; keep it off the async workers
async fn hash_in_background(password: Sensitive<String>) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| FolioError::Internal {
            message: format!("password hashing task failed: {}", e),
        })?
}

async fn verify_in_background(password: Sensitive<String>, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| FolioError::Internal {
            message: format!("password check task failed: {}", e),
        })
}

fn issue_for(signer: &TokenSigner, user: &Record) -> Result<String> {
    let id = user.id().ok_or_else(|| FolioError::Internal {
        message: "user record has no id".to_string(),
    })?;
    let email = user.get_str("email").unwrap_or_default();
    let role = Role::from_stored(user.get_str("role"));
    signer.issue(id.as_str(), email, role)
}

/// Create a user with a hashed password
///
/// Used by `register` (always `Role::User`) and by administrative tooling.
///
/// ## Returns
///
/// The stored user without its password hash
///
/// ## Errors
///
/// - `MissingFields`: `email` or `password` is blank
/// - `EmailTaken`: another user has this email, ignoring case
/// - `StoreUnavailable`: backend unreachable
pub async fn create_user(
    store: &CollectionStore,
    email: &str,
    password: Sensitive<String>,
    name: Option<String>,
    role: Role,
) -> Result<Record> {
    log_op_start!("create_user", role = role.as_str());
    let start = Instant::now();

    let result = create_user_impl(store, email, password, name, role)
        .await
        .map_err(|e| {
            log_op_error!("create_user", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "create_user",
        duration_ms = elapsed_ms(start),
        record_id = %result.id().map(|id| id.to_string()).unwrap_or_default()
    );
    Ok(result)
}

async fn create_user_impl(
    store: &CollectionStore,
    email: &str,
    password: Sensitive<String>,
    name: Option<String>,
    role: Role,
) -> Result<Record> {
    // the password is only checked for blankness, never copied
    let present = |blank: bool| Value::String(if blank { String::new() } else { "set".to_string() });
    let provided: Map<String, Value> = [
        ("email".to_string(), present(email.trim().is_empty())),
        ("password".to_string(), present(password.expose().trim().is_empty())),
    ]
    .into_iter()
    .collect();
    require_fields(USERS.as_str(), &provided, &["email", "password"])?;

    let email = normalize_email(email);
    let password_hash = hash_in_background(password).await?;

    let mut user = Record::new();
    user.insert("email", email.clone());
    user.insert("name", name.unwrap_or_default());
    user.insert("role", role.as_str());
    user.insert(PASSWORD_HASH, password_hash);
    user.insert("createdAt", now_iso());

    store
        .modify(USERS, move |records| {
            if records.iter().any(|r| email_of(r).as_deref() == Some(email.as_str())) {
                return Err(FolioError::EmailTaken { email });
            }
            user.set_id(ops::next_id(records, USERS.id_policy()));
            records.push(user.clone());
            Ok(public_user(&user))
        })
        .await
}

/// Register a new account and sign it in
///
/// ## Errors
///
/// - `MissingFields`: `email` or `password` absent or blank
/// - `EmailTaken`: email already registered
/// - `StoreUnavailable`: backend unreachable
pub async fn register(
    store: &CollectionStore,
    signer: &TokenSigner,
    payload: &Value,
) -> Result<AuthSession> {
    let body = as_object(payload)?;
    require_fields(USERS.as_str(), body, &["email", "password"])?;
    let email = string_field(body, "email")?.unwrap_or_default();
    let password = Sensitive::new(body.get("password").and_then(Value::as_str).unwrap_or_default().to_string());
    let name = string_field(body, "name")?;

    let user = create_user(store, &email, password, name, Role::User).await?;
    let token = issue_for(signer, &user)?;
    Ok(AuthSession { user, token })
}

/// Check credentials and issue a token
///
/// An unknown email and a wrong password fail identically.
///
/// ## Errors
///
/// - `MissingFields`: `email` or `password` absent or blank
/// - `InvalidCredentials`: no such user, or the password does not verify
/// - `StoreUnavailable`: backend unreachable
pub async fn login(
    store: &CollectionStore,
    signer: &TokenSigner,
    payload: &Value,
) -> Result<AuthSession> {
    log_op_start!("login");
    let start = Instant::now();

    let result = login_impl(store, signer, payload).await.map_err(|e| {
        log_op_error!("login", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "login",
        duration_ms = elapsed_ms(start),
        record_id = %result.user.id().map(|id| id.to_string()).unwrap_or_default()
    );
    Ok(result)
}

async fn login_impl(
    store: &CollectionStore,
    signer: &TokenSigner,
    payload: &Value,
) -> Result<AuthSession> {
    let body = as_object(payload)?;
    require_fields("login", body, &["email", "password"])?;
    let email = normalize_email(body.get("email").and_then(Value::as_str).unwrap_or_default());
    let password = Sensitive::new(body.get("password").and_then(Value::as_str).unwrap_or_default().to_string());

    let users = store.fetch_collection(USERS).await?;
    let user = users
        .into_iter()
        .find(|r| email_of(r).as_deref() == Some(email.as_str()))
        .ok_or(FolioError::InvalidCredentials)?;

    let stored_hash = user.get_str(PASSWORD_HASH).unwrap_or_default().to_string();
    if !verify_in_background(password, stored_hash).await? {
        return Err(FolioError::InvalidCredentials);
    }

    let token = issue_for(signer, &user)?;
    Ok(AuthSession {
        user: public_user(&user),
        token,
    })
}

fn find_by_claims<'a>(records: &'a mut [Record], claims: &Claims) -> Result<&'a mut Record> {
    let id = RecordId::new(claims.sub.clone());
    records
        .iter_mut()
        .find(|r| r.has_id(&id))
        .ok_or_else(|| FolioError::unauthorized("account no longer exists"))
}

/// The signed-in user
///
/// ## Errors
///
/// - `Unauthorized`: the token's user has been deleted
/// - `StoreUnavailable`: backend unreachable
pub async fn me(store: &CollectionStore, claims: &Claims) -> Result<Record> {
    let mut users = store.fetch_collection(USERS).await?;
    let user = find_by_claims(&mut users, claims)?;
    Ok(public_user(user))
}

/// Update the signed-in user's `name`, `email` and/or `password`
///
/// Absent fields are left unchanged. A new password is re-hashed.
///
/// ## Errors
///
/// - `InvalidField`: a field is not a string, or `email`/`password` is blank
/// - `EmailTaken`: another user has the new email
/// - `Unauthorized`: the token's user has been deleted
/// - `StoreUnavailable`: backend unreachable
pub async fn update_me(store: &CollectionStore, claims: &Claims, payload: &Value) -> Result<Record> {
    log_op_start!("update_me", record_id = claims.sub.as_str());
    let start = Instant::now();

    let result = update_me_impl(store, claims, payload).await.map_err(|e| {
        log_op_error!(
            "update_me",
            e.clone(),
            duration_ms = elapsed_ms(start),
            record_id = claims.sub.as_str()
        );
        e
    })?;

    log_op_end!(
        "update_me",
        duration_ms = elapsed_ms(start),
        record_id = claims.sub.as_str()
    );
    Ok(result)
}

async fn update_me_impl(store: &CollectionStore, claims: &Claims, payload: &Value) -> Result<Record> {
    let body = as_object(payload)?;
    let name = string_field(body, "name")?;
    let email = string_field(body, "email")?.map(|e| normalize_email(&e));
    let password = string_field(body, "password")?;

    for (field, value) in [("email", &email), ("password", &password)] {
        if matches!(value, Some(v) if v.is_empty()) {
            return Err(FolioError::InvalidField {
                field: field.to_string(),
                reason: "must not be blank".to_string(),
            });
        }
    }

    let password_hash = match password {
        Some(p) => Some(hash_in_background(Sensitive::new(p)).await?),
        None => None,
    };

    store
        .modify(USERS, move |records| {
            let self_id = RecordId::new(claims.sub.clone());
            if let Some(email) = &email {
                let taken = records
                    .iter()
                    .any(|r| !r.has_id(&self_id) && email_of(r).as_deref() == Some(email.as_str()));
                if taken {
                    return Err(FolioError::EmailTaken { email: email.clone() });
                }
            }

            let user = find_by_claims(records, claims)?;
            if let Some(name) = name {
                user.insert("name", name);
            }
            if let Some(email) = email {
                user.insert("email", email);
            }
            if let Some(hash) = password_hash {
                user.insert(PASSWORD_HASH, hash);
            }
            user.insert("updatedAt", now_iso());
            Ok(public_user(user))
        })
        .await
}

/// Every user, without password hashes
///
/// # Errors
///
/// `StoreUnavailable` when the backend cannot be reached.
pub async fn list_users(store: &CollectionStore) -> Result<Vec<Record>> {
    let users = store.fetch_collection(USERS).await?;
    Ok(users.iter().map(public_user).collect())
}

/// Administrative user creation from a request payload
///
/// Like `register`, but `role` may be given and no token is issued.
///
/// ## Errors
///
/// - `MissingFields`: `email` or `password` absent or blank
/// - `InvalidField`: `role` is neither `user` nor `admin`
/// - `EmailTaken`: email already registered
pub async fn add_user(store: &CollectionStore, payload: &Value) -> Result<Record> {
    let body = as_object(payload)?;
    require_fields(USERS.as_str(), body, &["email", "password"])?;
    let email = string_field(body, "email")?.unwrap_or_default();
    let password = Sensitive::new(body.get("password").and_then(Value::as_str).unwrap_or_default().to_string());
    let name = string_field(body, "name")?;
    let role = match string_field(body, "role")?.as_deref() {
        None | Some("user") => Role::User,
        Some("admin") => Role::Admin,
        Some(other) => {
            return Err(FolioError::InvalidField {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", other),
            })
        }
    };

    create_user(store, &email, password, name, role).await
}

/// Remove a user account; outstanding tokens stop resolving to a user
///
/// ## Errors
///
/// - `RecordNotFound`: no user has `id` (nothing is written)
/// - `StoreUnavailable`: backend unreachable
pub async fn delete_user(store: &CollectionStore, id: &RecordId) -> Result<Record> {
    log_op_start!("delete_user", record_id = id.as_str());
    let start = Instant::now();

    let removed = store.remove(USERS, id).await.map_err(|e| {
        log_op_error!(
            "delete_user",
            e.clone(),
            duration_ms = elapsed_ms(start),
            record_id = id.as_str()
        );
        e
    })?;

    log_op_end!("delete_user", duration_ms = elapsed_ms(start), record_id = id.as_str());
    Ok(public_user(&removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_user_strips_secrets() {
        let user = Record::from_value(json!({
            "id": 1,
            "email": "a@b.c",
            "passwordHash": "$argon2id$...",
            "password": "legacy"
        }))
        .unwrap();
        let public = public_user(&user);
        assert!(public.get(PASSWORD_HASH).is_none());
        assert!(public.get("password").is_none());
        assert_eq!(public.get_str("email"), Some("a@b.c"));
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
