//! Tests for registration and credential verification.

use std::sync::Mutex;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, PasswordHashError};
use crate::domain::{ErrorCode, PasswordDigest, RequiredField, StoredCredentials, User};
use rstest::{fixture, rstest};

/// In-memory user table enforcing username uniqueness like the real schema.
#[derive(Default)]
struct InMemoryUserRepository {
    rows: Mutex<Vec<(UserId, NewUser)>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut rows = self.rows.lock().expect("rows lock");
        if rows.iter().any(|(_, row)| row.username == user.username) {
            return Err(UserPersistenceError::unique_violation(user.username.as_ref()));
        }
        let id = UserId::new(i64::try_from(rows.len()).expect("row count fits") + 1);
        rows.push((id, user.clone()));
        Ok(id)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(row_id, row)| User::new(*row_id, row.username.clone())))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows
            .iter()
            .find(|(_, row)| &row.username == username)
            .map(|(id, row)| StoredCredentials {
                user_id: *id,
                password_hash: row.password_hash.clone(),
            }))
    }
}

/// Reversible stand-in so tests stay fast; salting is covered by the Argon2 adapter.
struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError> {
        Ok(PasswordDigest::new(format!("hashed:{password}")))
    }

    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHashError> {
        Ok(digest.as_ref() == format!("hashed:{password}"))
    }
}

type Store = CredentialService<InMemoryUserRepository, PrefixHasher>;

#[fixture]
fn store() -> Store {
    CredentialService::new(
        Arc::new(InMemoryUserRepository::default()),
        Arc::new(PrefixHasher),
    )
}

#[rstest]
#[tokio::test]
async fn alice_scenario(store: Store) {
    let alice = store.register("alice", "secret").await.expect("register alice");

    assert_eq!(store.verify("alice", "secret").await, Ok(alice));
    assert_eq!(
        store.verify("alice", "wrong").await,
        Err(AuthError::BadPassword)
    );
    assert_eq!(store.verify("bob", "x").await, Err(AuthError::UnknownUser));
}

#[rstest]
#[tokio::test]
async fn registering_twice_is_a_duplicate(store: Store) {
    store.register("alice", "secret").await.expect("first registration");

    let second = store.register("alice", "other").await;

    assert_eq!(second, Err(AuthError::duplicate_username("alice")));
}

#[rstest]
#[tokio::test]
async fn usernames_are_trimmed_before_uniqueness(store: Store) {
    store.register("alice", "secret").await.expect("first registration");

    let second = store.register("  alice ", "secret").await;

    assert_eq!(second, Err(AuthError::duplicate_username("alice")));
}

#[rstest]
#[case("", "secret", RequiredField::Username)]
#[case("   ", "", RequiredField::Username)]
#[case("alice", "", RequiredField::Password)]
#[tokio::test]
async fn register_requires_both_fields(
    store: Store,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: RequiredField,
) {
    let result = store.register(username, password).await;
    assert_eq!(result, Err(AuthError::missing_field(field)));
}

#[rstest]
#[tokio::test]
async fn only_the_hash_is_persisted() {
    let users = Arc::new(InMemoryUserRepository::default());
    let store = CredentialService::new(Arc::clone(&users), Arc::new(PrefixHasher));

    store.register("alice", "secret").await.expect("register");

    let rows = users.rows.lock().expect("rows lock");
    let (_, row) = rows.first().expect("stored row");
    assert_eq!(row.password_hash.as_ref(), "hashed:secret");
}

#[rstest]
#[tokio::test]
async fn verify_with_blank_username_is_unknown_without_lookup() {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().never();
    let store = CredentialService::new(Arc::new(users), Arc::new(PrefixHasher));

    assert_eq!(store.verify("  ", "x").await, Err(AuthError::UnknownUser));
}

#[rstest]
#[tokio::test]
async fn connection_failure_is_a_backend_error() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("database locked")));
    let store = CredentialService::new(Arc::new(users), Arc::new(PrefixHasher));

    let error = store
        .register("alice", "secret")
        .await
        .expect_err("insert fails");

    match error {
        AuthError::Backend(inner) => assert_eq!(inner.code(), ErrorCode::ServiceUnavailable),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn malformed_stored_hash_is_internal() {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(|_| {
        Ok(Some(StoredCredentials {
            user_id: UserId::new(1),
            password_hash: PasswordDigest::new("garbage"),
        }))
    });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .return_once(|_, _| Err(PasswordHashError::malformed("not a PHC string")));
    let store = CredentialService::new(Arc::new(users), Arc::new(hasher));

    let error = store.verify("alice", "secret").await.expect_err("bad hash");

    match error {
        AuthError::Backend(inner) => assert_eq!(inner.code(), ErrorCode::InternalError),
        other => panic!("expected backend error, got {other:?}"),
    }
}
