//! Login session: bearer token and user profile, persisted between runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::api::AuthApi;
use crate::error::{AppError, Result};
use crate::models::auth::{LoginRequest, Role, UserInfo};
use crate::router::{Navigator, Route};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_INFO_KEY: &str = "user_info";

/// Key/value persistence for the session.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Per-user data directory of the platform.
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("pe", "talleres", "talleres-desk").map(|d| d.data_dir().join("session"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage, used when no data directory is available and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| AppError::config("Session storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| AppError::config("Session storage lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| AppError::config("Session storage lock poisoned"))?
            .remove(key);
        Ok(())
    }
}

/// Authentication state shared by the whole app.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    auth: AuthApi,
    navigator: Arc<dyn Navigator>,
    user: watch::Sender<Option<UserInfo>>,
}

impl SessionStore {
    pub fn open(storage: Arc<dyn SessionStorage>, auth: AuthApi, navigator: Arc<dyn Navigator>) -> Self {
        let (user, _) = watch::channel(None);
        Self {
            storage,
            auth,
            navigator,
            user,
        }
    }

    /// Load a persisted session into memory. Returns whether one was found.
    ///
    /// A user profile that no longer parses is discarded together with its
    /// token.
    pub fn restore(&self) -> Result<bool> {
        let token = self.storage.get(TOKEN_KEY)?;
        let info = self.storage.get(USER_INFO_KEY)?;

        let (Some(token), Some(info)) = (token, info) else {
            return Ok(false);
        };

        match serde_json::from_str::<UserInfo>(&info) {
            Ok(user) => {
                tracing::info!("Restored session for {}", user.email);
                self.auth.client().set_token(Some(token));
                self.user.send_replace(Some(user));
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable session: {}", e);
                self.clear_persisted()?;
                Ok(false)
            }
        }
    }

    /// Authenticate and persist the session. Backend errors are returned
    /// as-is for the login panel to classify.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<UserInfo> {
        let response = self.auth.login(credentials).await?;
        let user = UserInfo::from(&response);

        self.storage.set(TOKEN_KEY, &response.token)?;
        self.storage.set(USER_INFO_KEY, &serde_json::to_string(&user)?)?;
        self.auth.client().set_token(Some(response.token));
        self.user.send_replace(Some(user.clone()));

        tracing::info!("Logged in as {} ({})", user.email, user.role);
        Ok(user)
    }

    /// Forget the session and go to the login panel.
    pub fn logout(&self) -> Result<()> {
        if let Some(user) = self.user_info() {
            tracing::info!("Logging out {}", user.email);
        }
        self.auth.client().set_token(None);
        self.user.send_replace(None);
        let cleared = self.clear_persisted();
        self.navigator.navigate(Route::Login);
        cleared
    }

    /// Send the user to the landing panel of their role.
    pub fn redirect_by_role(&self) -> Route {
        let route = match self.role() {
            Some(Role::Unknown(code)) => {
                tracing::warn!("Unrecognized role {:?}, redirecting to home", code);
                Route::Inicio
            }
            Some(role) => Route::home_for(&role),
            None => {
                tracing::warn!("redirect_by_role without a session");
                Route::Inicio
            }
        };
        self.navigator.navigate(route);
        route
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some() && self.auth.client().token().is_some()
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        self.user.borrow().clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.borrow().as_ref().map(UserInfo::role)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UserInfo>> {
        self.user.subscribe()
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.auth.forgot_password(email).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        self.auth.reset_password(token, new_password).await
    }

    fn clear_persisted(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_INFO_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client_for;
    use crate::router::RecordingNavigator;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_with(storage: Arc<dyn SessionStorage>, uri: &str) -> (SessionStore, Arc<RecordingNavigator>) {
        let nav = Arc::new(RecordingNavigator::default());
        let store = SessionStore::open(storage, AuthApi::new(client_for(uri)), nav.clone());
        (store, nav)
    }

    async fn mock_login(server: &MockServer, role: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-1", "email": "ana@talleres.pe", "role": role, "nombreCompleto": "Ana"
            })))
            .mount(server)
            .await;
    }

    fn credentials() -> LoginRequest {
        LoginRequest {
            email: "ana@talleres.pe".to_string(),
            password: "secreto1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_and_restores() {
        let server = MockServer::start().await;
        mock_login(&server, "ROLE_CLIENTE").await;
        let dir = tempfile::tempdir().unwrap();

        let storage: Arc<dyn SessionStorage> = Arc::new(FileSessionStorage::new(dir.path()));
        let (store, _) = store_with(storage.clone(), &server.uri());
        let user = store.login(&credentials()).await.unwrap();
        assert_eq!(user.display_name(), "Ana");
        assert!(store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("jwt-1"));

        // A fresh process sees the same session.
        let (restored, _) = store_with(Arc::new(FileSessionStorage::new(dir.path())), &server.uri());
        assert!(restored.restore().unwrap());
        assert_eq!(restored.role(), Some(Role::Cliente));
        assert!(restored.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let storage = Arc::new(MemorySessionStorage::default());
        let (store, _) = store_with(storage.clone(), &server.uri());
        let err = store.login(&credentials()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(!store.is_authenticated());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_and_navigates() {
        let server = MockServer::start().await;
        mock_login(&server, "ROLE_ADMIN").await;

        let storage = Arc::new(MemorySessionStorage::default());
        let (store, nav) = store_with(storage.clone(), &server.uri());
        store.login(&credentials()).await.unwrap();
        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert!(storage.get(USER_INFO_KEY).unwrap().is_none());
        assert_eq!(nav.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_redirect_by_role() {
        for (role, expected) in [
            ("ROLE_ADMIN", Route::AdminEstudiantes),
            ("ROLE_CLIENTE", Route::EstudianteHorario),
            ("ROLE_PROFESOR", Route::ProfesorHorario),
            ("ROLE_INVITADO", Route::Inicio),
        ] {
            let server = MockServer::start().await;
            mock_login(&server, role).await;
            let (store, nav) = store_with(Arc::new(MemorySessionStorage::default()), &server.uri());
            store.login(&credentials()).await.unwrap();

            assert_eq!(store.redirect_by_role(), expected);
            assert_eq!(nav.last(), Some(expected));
        }
    }

    #[test]
    fn test_restore_discards_corrupt_profile() {
        let storage = Arc::new(MemorySessionStorage::default());
        storage.set(TOKEN_KEY, "jwt").unwrap();
        storage.set(USER_INFO_KEY, "{not json").unwrap();

        let (store, _) = store_with(storage.clone(), "http://localhost:8080");
        assert!(!store.restore().unwrap());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        storage.remove(TOKEN_KEY).unwrap();
        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }
}
