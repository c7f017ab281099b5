/**
 * Admin Session Client
 * Login state machine, persisted token storage, and authorized mutations
 */
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{error_message, ClientError};
use crate::db::models::{
    NewProject, NewSkill, NewTestimonial, Project, Skill, Testimonial, UpdateProject, UpdateSkill,
    UpdateTestimonial,
};
use crate::error::SuccessResponse;
use crate::routes::auth::{AdminProfile, LoginRequest, LoginResponse};

// ============================================================================
// Session state
// ============================================================================

/// The session state machine. `Authenticating` exists only for the
/// duration of a login call; every failure path lands back in `Anonymous`
/// with nothing retained.
#[derive(Debug, Clone)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated {
        token: String,
        profile: AdminProfile,
    },
}

/// What gets persisted between runs; "is authenticated" is always
/// re-derived from this, never cached separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub profile: AdminProfile,
}

// ============================================================================
// Token storage
// ============================================================================

/// Client-side persisted storage for the session token.
pub trait TokenStore {
    fn load(&self) -> Option<StoredSession>;
    fn save(&self, session: &StoredSession) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// In-memory store; useful for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<StoredSession> {
        self.inner.lock().unwrap().clone()
    }

    fn save(&self, session: &StoredSession) -> io::Result<()> {
        *self.inner.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}

/// File-backed store persisting the session as JSON, the desktop
/// equivalent of the browser's localStorage slot.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<StoredSession> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    fn save(&self, session: &StoredSession) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(session).map_err(io::Error::other)?;
        std::fs::write(&self.path, json)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// Admin session
// ============================================================================

/// Owns the session state and attaches the bearer credential to every
/// mutation. A 401 on any call clears the session (implicit logout)
/// instead of retrying.
pub struct AdminSession<S: TokenStore> {
    http: reqwest::Client,
    base_url: String,
    store: S,
    state: SessionState,
}

impl<S: TokenStore> AdminSession<S> {
    /// Build a session, re-deriving the state from the persisted token.
    /// An expired token surfaces on first use, not here; the token
    /// service is stateless so there is nothing to ask server-side.
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        let state = match store.load() {
            Some(stored) => SessionState::Authenticated {
                token: stored.token,
                profile: stored.profile,
            },
            None => SessionState::Anonymous,
        };
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn profile(&self) -> Option<&AdminProfile> {
        match &self.state {
            SessionState::Authenticated { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Route guard: admin views may only render when this succeeds;
    /// callers redirect to the login view otherwise.
    pub fn require_authenticated(&self) -> Result<&AdminProfile, ClientError> {
        self.profile().ok_or(ClientError::NotAuthenticated)
    }

    /// Submit credentials. On success the issued token is persisted and
    /// the session becomes authenticated; on any failure the session
    /// returns to anonymous with the server's generic message surfaced.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&AdminProfile, ClientError> {
        self.state = SessionState::Authenticating;

        let url = format!("{}/api/auth/login", self.base_url);
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match self.http.post(&url).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                self.state = SessionState::Anonymous;
                return Err(ClientError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            self.state = SessionState::Anonymous;
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: LoginResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                self.state = SessionState::Anonymous;
                return Err(ClientError::Network(e));
            }
        };

        if let Err(e) = self.store.save(&StoredSession {
            token: body.token.clone(),
            profile: body.admin.clone(),
        }) {
            self.state = SessionState::Anonymous;
            return Err(ClientError::Storage(e));
        }
        self.state = SessionState::Authenticated {
            token: body.token,
            profile: body.admin,
        };

        match &self.state {
            SessionState::Authenticated { profile, .. } => Ok(profile),
            _ => unreachable!(),
        }
    }

    /// Client-side logout: delete the stored token and forget the state.
    /// There is no server call because the token service is stateless.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.state = SessionState::Anonymous;
        Ok(())
    }

    /// Send an authorized request. A 401 means the token was rejected
    /// (expired or invalidated by secret rotation): clear the session and
    /// report expiry rather than retrying.
    async fn send<T, B>(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = match &self.state {
            SessionState::Authenticated { token, .. } => token.clone(),
            _ => return Err(ClientError::NotAuthenticated),
        };

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            let _ = self.store.clear();
            self.state = SessionState::Anonymous;
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(response.json().await?)
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub async fn create_project(&mut self, payload: &NewProject) -> Result<Project, ClientError> {
        self.send(Method::POST, "/api/projects", Some(payload)).await
    }

    pub async fn update_project(
        &mut self,
        id: Uuid,
        payload: &UpdateProject,
    ) -> Result<Project, ClientError> {
        self.send(Method::PUT, &format!("/api/projects/{}", id), Some(payload))
            .await
    }

    pub async fn delete_project(&mut self, id: Uuid) -> Result<SuccessResponse, ClientError> {
        self.send::<_, ()>(Method::DELETE, &format!("/api/projects/{}", id), None)
            .await
    }

    // ------------------------------------------------------------------
    // Skills
    // ------------------------------------------------------------------

    pub async fn create_skill(&mut self, payload: &NewSkill) -> Result<Skill, ClientError> {
        self.send(Method::POST, "/api/skills", Some(payload)).await
    }

    pub async fn update_skill(
        &mut self,
        id: Uuid,
        payload: &UpdateSkill,
    ) -> Result<Skill, ClientError> {
        self.send(Method::PUT, &format!("/api/skills/{}", id), Some(payload))
            .await
    }

    pub async fn delete_skill(&mut self, id: Uuid) -> Result<SuccessResponse, ClientError> {
        self.send::<_, ()>(Method::DELETE, &format!("/api/skills/{}", id), None)
            .await
    }

    // ------------------------------------------------------------------
    // Testimonials
    // ------------------------------------------------------------------

    pub async fn create_testimonial(
        &mut self,
        payload: &NewTestimonial,
    ) -> Result<Testimonial, ClientError> {
        self.send(Method::POST, "/api/testimonials", Some(payload))
            .await
    }

    pub async fn update_testimonial(
        &mut self,
        id: Uuid,
        payload: &UpdateTestimonial,
    ) -> Result<Testimonial, ClientError> {
        self.send(
            Method::PUT,
            &format!("/api/testimonials/{}", id),
            Some(payload),
        )
        .await
    }

    pub async fn delete_testimonial(&mut self, id: Uuid) -> Result<SuccessResponse, ClientError> {
        self.send::<_, ()>(Method::DELETE, &format!("/api/testimonials/{}", id), None)
            .await
    }
}
