//! In-memory implementations
//!
//! Process-local session store and user directory for development and
//! tests. Passwords are still Argon2id-hashed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use platform::password::{ClearTextPassword, HashedPassword, verify_decoy};
use tokio::sync::{Mutex, RwLock};

use crate::domain::entity::identity::Identity;
use crate::domain::repository::{
    CredentialVerifier, NewUser, SessionStore, StoreError, UserDirectory,
};
use crate::domain::service::clock::Clock;
use crate::domain::value_object::{user_id::UserId, user_name::UserName, user_role::Role};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Session Store
// ============================================================================

struct StoredSession {
    refresh_token: String,
    expires_at: i64,
}

impl StoredSession {
    fn new(refresh_token: &str, ttl: Duration, now: i64) -> Self {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            refresh_token: refresh_token.to_string(),
            expires_at: now.saturating_add(ttl),
        }
    }
}

/// Entries past their TTL read as absent and are purged on access
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<UserId, StoredSession>>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn purge_expired(sessions: &mut HashMap<UserId, StoredSession>, user_id: &UserId, now: i64) {
        if sessions.get(user_id).is_some_and(|s| s.expires_at <= now) {
            sessions.remove(user_id);
        }
    }
}

impl SessionStore for InMemorySessionStore {
    async fn save(
        &self,
        user_id: &UserId,
        refresh_token: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        // drop every expired entry, not only this identity's
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(*user_id, StoredSession::new(refresh_token, ttl, now));
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<String>, StoreError> {
        let mut sessions = self.sessions.lock().await;
        Self::purge_expired(&mut sessions, user_id, self.clock.now());
        Ok(sessions.get(user_id).map(|s| s.refresh_token.clone()))
    }

    async fn remove(&self, user_id: &UserId) -> Result<(), StoreError> {
        self.sessions.lock().await.remove(user_id);
        Ok(())
    }

    async fn remove_if(&self, user_id: &UserId, expected: &str) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.lock().await;
        Self::purge_expired(&mut sessions, user_id, self.clock.now());

        if sessions
            .get(user_id)
            .is_some_and(|s| s.refresh_token == expected)
        {
            sessions.remove(user_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected: &str,
        replacement: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        Self::purge_expired(&mut sessions, user_id, now);

        match sessions.get_mut(user_id) {
            Some(current) if current.refresh_token == expected => {
                *current = StoredSession::new(replacement, ttl, now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ============================================================================
// User Directory
// ============================================================================

struct StoredUser {
    identity: Identity,
    canonical_name: String,
    password: HashedPassword,
}

#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, StoredUser>>>,
    pepper: Option<Arc<[u8]>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pepper(pepper: impl Into<Vec<u8>>) -> Self {
        let pepper: Vec<u8> = pepper.into();
        Self {
            pepper: Some(Arc::from(pepper)),
            ..Self::default()
        }
    }

    /// Insert an account directly, bypassing sign-up validation and the
    /// password policy
    pub async fn seed(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> AuthResult<Identity> {
        let hashed = ClearTextPassword::for_verification(password.to_string())
            .hash(self.pepper.as_deref())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let identity = Identity::new(UserId::new(), user_name, email, role);
        self.insert(identity.clone(), UserName::canonicalize(user_name), hashed)
            .await?;
        Ok(identity)
    }

    async fn insert(
        &self,
        identity: Identity,
        canonical_name: String,
        password: HashedPassword,
    ) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let taken = users.values().any(|u| {
            u.canonical_name == canonical_name || u.identity.email == identity.email
        });
        if taken {
            return Err(AuthError::AlreadyExists);
        }
        users.insert(
            identity.id,
            StoredUser {
                identity,
                canonical_name,
                password,
            },
        );
        Ok(())
    }
}

impl CredentialVerifier for InMemoryUserDirectory {
    async fn verify(&self, username: &str, password: &ClearTextPassword) -> AuthResult<Identity> {
        let canonical = UserName::canonicalize(username);
        let users = self.users.read().await;
        let Some(user) = users.values().find(|u| u.canonical_name == canonical) else {
            verify_decoy(password, self.pepper.as_deref());
            return Err(AuthError::InvalidCredentials);
        };

        if !user.password.verify(password, self.pepper.as_deref()) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user.identity.clone())
    }
}

impl UserDirectory for InMemoryUserDirectory {
    async fn register(&self, user: NewUser) -> AuthResult<UserId> {
        let hashed = user
            .password
            .hash(self.pepper.as_deref())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let identity = Identity::new(
            UserId::new(),
            user.username.as_str(),
            user.email.as_str(),
            user.role,
        );
        let user_id = identity.id;
        self.insert(identity, user.username.canonical().to_string(), hashed)
            .await?;
        Ok(user_id)
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Identity>> {
        Ok(self
            .users
            .read()
            .await
            .get(user_id)
            .map(|u| u.identity.clone()))
    }

    async fn has_role(&self, user_id: &UserId, role: Role) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .get(user_id)
            .is_some_and(|u| u.identity.role == role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::clock::ManualClock;
    use crate::domain::value_object::email::Email;

    const TTL: Duration = Duration::from_secs(30);

    fn store() -> (InMemorySessionStore, ManualClock) {
        let clock = ManualClock::new(1_000);
        (InMemorySessionStore::new(Arc::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (store, _) = store();
        let user = UserId::new();
        store.save(&user, "r1", TTL).await.unwrap();
        store.save(&user, "r2", TTL).await.unwrap();
        assert_eq!(store.get(&user).await.unwrap().as_deref(), Some("r2"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_entries_expire_with_ttl() {
        let (store, clock) = store();
        let user = UserId::new();
        store.save(&user, "r1", TTL).await.unwrap();

        clock.advance(29);
        assert!(store.get(&user).await.unwrap().is_some());
        clock.advance(1);
        assert!(store.get(&user).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (store, _) = store();
        let user = UserId::new();
        store.save(&user, "r1", TTL).await.unwrap();
        store.remove(&user).await.unwrap();
        store.remove(&user).await.unwrap();
        assert!(store.get(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let (store, clock) = store();
        let user = UserId::new();

        assert!(!store.compare_and_swap(&user, "r1", "r2", TTL).await.unwrap());

        store.save(&user, "r1", TTL).await.unwrap();
        assert!(!store.compare_and_swap(&user, "stale", "r2", TTL).await.unwrap());
        assert!(store.compare_and_swap(&user, "r1", "r2", TTL).await.unwrap());
        assert!(!store.compare_and_swap(&user, "r1", "r3", TTL).await.unwrap());
        assert_eq!(store.get(&user).await.unwrap().as_deref(), Some("r2"));

        // swap renews the ttl
        clock.advance(20);
        assert!(store.compare_and_swap(&user, "r2", "r3", TTL).await.unwrap());
        clock.advance(20);
        assert_eq!(store.get(&user).await.unwrap().as_deref(), Some("r3"));
    }

    #[tokio::test]
    async fn test_remove_if_only_drops_expected_token() {
        let (store, _) = store();
        let user = UserId::new();

        assert!(!store.remove_if(&user, "r1").await.unwrap());

        store.save(&user, "r1", TTL).await.unwrap();
        store.save(&user, "r2", TTL).await.unwrap();
        assert!(!store.remove_if(&user, "r1").await.unwrap());
        assert_eq!(store.get(&user).await.unwrap().as_deref(), Some("r2"));

        assert!(store.remove_if(&user, "r2").await.unwrap());
        assert!(store.get(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_purges_abandoned_sessions() {
        let (store, clock) = store();
        for _ in 0..5 {
            store.save(&UserId::new(), "gone", TTL).await.unwrap();
        }
        clock.advance(31);
        store.save(&UserId::new(), "live", TTL).await.unwrap();
        assert_eq!(store.sessions.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_per_identity() {
        let (store, _) = store();
        let (alice, bob) = (UserId::new(), UserId::new());
        store.save(&alice, "ra", TTL).await.unwrap();
        store.save(&bob, "rb", TTL).await.unwrap();
        store.remove(&alice).await.unwrap();
        assert!(store.get(&alice).await.unwrap().is_none());
        assert_eq!(store.get(&bob).await.unwrap().as_deref(), Some("rb"));
    }

    #[tokio::test]
    async fn test_directory_verify() {
        let directory = InMemoryUserDirectory::with_pepper(b"pepper".to_vec());
        let bob = directory
            .seed("Bob", "bob@example.com", "pw", Role::Customer)
            .await
            .unwrap();

        let found = directory
            .verify("bob", &ClearTextPassword::for_verification("pw".into()))
            .await
            .unwrap();
        assert_eq!(found, bob);

        let wrong = directory
            .verify("bob", &ClearTextPassword::for_verification("nope".into()))
            .await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        let unknown = directory
            .verify("carol", &ClearTextPassword::for_verification("pw".into()))
            .await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_empty_directory_rejects_like_wrong_password() {
        let directory = InMemoryUserDirectory::new();
        let started = std::time::Instant::now();
        let unknown = directory
            .verify("nobody", &ClearTextPassword::for_verification("pw".into()))
            .await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        // an Argon2id verification ran even though nothing matched
        assert!(started.elapsed() >= std::time::Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_directory_register_rejects_duplicates() {
        let directory = InMemoryUserDirectory::new();
        let new_user = |name: &str, email: &str| NewUser {
            email: Email::new(email).unwrap(),
            username: UserName::new(name).unwrap(),
            password: ClearTextPassword::new("correct horse".to_string()).unwrap(),
            role: Role::Seller,
        };

        let id = directory
            .register(new_user("alice", "alice@example.com"))
            .await
            .unwrap();
        assert!(directory.has_role(&id, Role::Seller).await.unwrap());
        assert!(!directory.has_role(&id, Role::Admin).await.unwrap());

        let same_name = directory
            .register(new_user("ALICE", "other@example.com"))
            .await;
        assert!(matches!(same_name, Err(AuthError::AlreadyExists)));

        let same_email = directory
            .register(new_user("alice2", "alice@example.com"))
            .await;
        assert!(matches!(same_email, Err(AuthError::AlreadyExists)));
    }
}
