//! API client for the Classeviva REST platform.
//!
//! `Client` owns one credential pair, one bearer token, and one expiry
//! timestamp. Login adopts a still-valid cached session when one exists,
//! otherwise posts to the auth endpoint; successful logins are persisted to
//! disk and renewed by a background task until logout.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::{LoginPayload, Session, SessionCache};
use crate::config::ClientConfig;
use crate::models::{
    AbsenceEvent, AgendaEvent, AgendaFilter, CalendarDay, Card, Document, DocumentStatus, Grade,
    Lesson, NoticeboardItem, Period, Profile, Subject, TokenStatus,
};
use crate::utils::compact_date;

use super::endpoint::{self, Endpoint, IdKind};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Per-session bearer header
const AUTH_HEADER: &str = "Z-Auth-Token";

/// Vendor API key, fixed for every client build
const DEV_APIKEY: &str = "Tg1NWEwNGIgIC0K";

/// Renewal cadence after a successful login.
/// Platform tokens live about as long, so each tick re-authenticates.
const RENEWAL_INTERVAL: Duration = Duration::from_secs(90 * 60);

// ============================================================================
// Session state
// ============================================================================

struct State {
    username: Option<String>,
    password: Option<String>,
    session: Option<Session>,
    profile: Profile,
    /// The durable cache is consulted at most once per process; logout
    /// re-arms the check.
    cache_checked: bool,
}

impl State {
    fn authorized(&self) -> bool {
        self.session
            .as_ref()
            .map(Session::authorized)
            .unwrap_or(false)
    }

    fn token(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.token.clone())
            .unwrap_or_default()
    }
}

struct Inner {
    http: reqwest::Client,
    rest_base: String,
    origin: String,
    cache: SessionCache,
    state: Mutex<State>,
    renewal: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.renewal.get_mut().take() {
            handle.abort();
        }
    }
}

/// Client for the Classeviva REST API.
/// Clone is cheap and clones share the session; overlapping calls from
/// clones serialize on the session lock instead of racing.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// Create a new client. No network traffic happens until `login`.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("Z-Dev-Apikey", HeaderValue::from_static(DEV_APIKEY));
        headers.insert("Z-Cache-Control", HeaderValue::from_static("no-cache"));

        // Redirects stay unfollowed so Location headers can be read back
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let cache = SessionCache::new(config.cache_dir_or_default());

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                rest_base: config.rest_base(),
                origin: config.origin(),
                cache,
                state: Mutex::new(State {
                    username: config.username,
                    password: config.password,
                    session: None,
                    profile: Profile::default(),
                    cache_checked: false,
                }),
                renewal: Mutex::new(None),
            }),
        })
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Log in with the construction-time credentials.
    ///
    /// No-op when already authorized. A still-valid cached session is adopted
    /// without touching the network; otherwise one POST to the auth endpoint
    /// establishes the session, persists it, and schedules renewal.
    pub async fn login(&self) -> Result<Profile, ApiError> {
        let mut state = self.inner.state.lock().await;
        self.login_locked(&mut state).await
    }

    /// Log in with an explicit credential pair, keeping it for renewals.
    pub async fn login_with(&self, username: &str, password: &str) -> Result<Profile, ApiError> {
        let mut state = self.inner.state.lock().await;
        state.username = Some(username.to_string());
        state.password = Some(password.to_string());
        self.login_locked(&mut state).await
    }

    async fn login_locked(&self, state: &mut State) -> Result<Profile, ApiError> {
        if state.authorized() {
            debug!("already logged in");
            return Ok(state.profile.clone());
        }

        let (username, password) = match (state.username.clone(), state.password.clone()) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                warn!("login failed: credentials not set");
                return Err(ApiError::MissingCredentials);
            }
        };

        if state.session.is_none() && !state.cache_checked {
            state.cache_checked = true;
            if let Some(cached) = self.inner.cache.load() {
                if adopt(state, &cached) {
                    info!(ident = %state.profile.ident, "logged in from cached session");
                    self.schedule_renewal().await;
                    return Ok(state.profile.clone());
                }
            }
        }

        let url = format!("{}/auth/login/", self.inner.rest_base);
        let body = json!({ "uid": username, "pass": password });
        let response = self.inner.http.post(&url).json(&body).send().await?;

        let status = response.status();
        let envelope: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "login response was not JSON");
                return Err(ApiError::Network(e));
            }
        };

        if let Some((code, message)) = remote_error(&envelope, status) {
            warn!(status = code, message = %message, "login rejected");
            state.session = None;
            return Err(ApiError::Remote {
                status: code,
                message,
            });
        }
        if status != StatusCode::OK {
            warn!(status = %status, "login failed");
            return Err(ApiError::Status(status));
        }

        let payload: LoginPayload = serde_json::from_value(envelope)?;
        if !adopt(state, &payload) {
            warn!("login response missing a usable session");
            return Err(ApiError::InvalidSession);
        }

        if let Err(e) = self.inner.cache.store(&payload) {
            warn!(error = %e, "failed to persist session cache");
        }

        info!(ident = %state.profile.ident, "logged in");
        self.schedule_renewal().await;
        Ok(state.profile.clone())
    }

    /// Log out, cancelling the renewal task and clearing the session.
    /// Returns `false` when there was nothing to log out from. The cache
    /// file is left on disk.
    pub async fn logout(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if !state.authorized() {
            debug!("already logged out");
            return false;
        }
        if let Some(handle) = self.inner.renewal.lock().await.take() {
            handle.abort();
        }
        state.session = None;
        state.profile = Profile::default();
        state.cache_checked = false;
        info!("logged out");
        true
    }

    /// Whether a session is currently active and unexpired.
    pub async fn authorized(&self) -> bool {
        self.inner.state.lock().await.authorized()
    }

    /// Snapshot of the current profile.
    pub async fn profile(&self) -> Profile {
        self.inner.state.lock().await.profile.clone()
    }

    /// Arrange the recurring background renewal. At most one task per
    /// session; the task holds only a weak reference, so dropping the last
    /// client handle ends it as surely as logout does.
    fn schedule_renewal(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let mut slot = self.inner.renewal.lock().await;
            if slot.as_ref().map(|h| !h.is_finished()).unwrap_or(false) {
                return;
            }
            let weak = Arc::downgrade(&self.inner);
            *slot = Some(tokio::spawn(async move {
                loop {
                    tokio::time::sleep(RENEWAL_INTERVAL).await;
                    let Some(inner) = weak.upgrade() else { break };
                    let client = Client { inner };
                    if let Err(e) = client.login().await {
                        warn!(error = %e, "session renewal failed");
                    }
                }
            }));
        })
    }

    // ========================================================================
    // Generic authenticated fetch
    // ========================================================================

    /// Compose URL and bearer token for an endpoint call, short-circuiting
    /// without network traffic when not authorized.
    async fn prepare(&self, spec: &Endpoint, path: Option<&str>) -> Result<(String, String), ApiError> {
        let state = self.inner.state.lock().await;
        if !state.authorized() {
            warn!(path = path.unwrap_or(spec.path), "not logged in");
            return Err(ApiError::NotAuthenticated);
        }
        let id = match spec.id {
            IdKind::Numeric => state.profile.id.clone(),
            IdKind::Ident => state.profile.ident.clone(),
        };
        let url = format!(
            "{}/{}/{}{}",
            self.inner.rest_base,
            spec.audience.segment(),
            id,
            path.unwrap_or(spec.path)
        );
        Ok((url, state.token()))
    }

    async fn execute(
        &self,
        spec: &Endpoint,
        path: Option<&str>,
        body: Option<Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let (url, token) = self.prepare(spec, path).await?;
        let mut request = self
            .inner
            .http
            .request(spec.method.clone(), &url)
            .header(AUTH_HEADER, token);
        if spec.method != Method::GET {
            if let Some(body) = body {
                request = request.json(&body);
            }
        }
        Ok(request.send().await?)
    }

    /// Issue one JSON endpoint call and return the decoded envelope.
    async fn call(
        &self,
        spec: &Endpoint,
        path: Option<&str>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let response = self.execute(spec, path, body).await?;
        decode(response).await
    }

    /// Issue one binary endpoint call and return the raw bytes.
    async fn call_bytes(
        &self,
        spec: &Endpoint,
        path: Option<&str>,
        body: Option<Value>,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(spec, path, body).await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, "unexpected status");
            return Err(ApiError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Run an endpoint through the envelope-unwrap step.
    async fn fetch<T>(
        &self,
        spec: &Endpoint,
        path: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let envelope = self.call(spec, path, body).await?;
        unwrap_section(envelope, spec.key)
    }

    // ========================================================================
    // Endpoint catalogue
    // ========================================================================

    /// Marks for the whole school year.
    pub async fn grades(&self) -> Result<Vec<Grade>, ApiError> {
        self.fetch(&endpoint::GRADES, None, None).await
    }

    /// Absence, delay, and early-exit events.
    pub async fn absences(&self) -> Result<Vec<AbsenceEvent>, ApiError> {
        self.fetch(&endpoint::ABSENCES, None, None).await
    }

    /// Absence events from `begin`, optionally bounded by `end`.
    pub async fn absences_since(
        &self,
        begin: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<AbsenceEvent>, ApiError> {
        let mut path = format!("/absences/details/{}", compact_date(begin));
        if let Some(end) = end {
            path.push('/');
            path.push_str(&compact_date(end));
        }
        self.fetch(&endpoint::ABSENCES, Some(&path), None).await
    }

    /// Agenda entries in a date range, optionally narrowed by event kind.
    pub async fn agenda(
        &self,
        filter: AgendaFilter,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AgendaEvent>, ApiError> {
        let path = format!(
            "/agenda/{}/{}/{}",
            filter.code(),
            compact_date(begin),
            compact_date(end)
        );
        self.fetch(&endpoint::AGENDA, Some(&path), None).await
    }

    pub async fn lessons_today(&self) -> Result<Vec<Lesson>, ApiError> {
        self.fetch(&endpoint::LESSONS_TODAY, None, None).await
    }

    pub async fn lessons(&self, date: NaiveDate) -> Result<Vec<Lesson>, ApiError> {
        let path = format!("/lessons/{}", compact_date(date));
        self.fetch(&endpoint::LESSONS, Some(&path), None).await
    }

    /// The school calendar: working days, holidays, closures.
    pub async fn calendar(&self) -> Result<Vec<CalendarDay>, ApiError> {
        self.fetch(&endpoint::CALENDAR, None, None).await
    }

    pub async fn periods(&self) -> Result<Vec<Period>, ApiError> {
        self.fetch(&endpoint::PERIODS, None, None).await
    }

    pub async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.fetch(&endpoint::SUBJECTS, None, None).await
    }

    /// Disciplinary and teacher notes, grouped by category exactly as the
    /// platform returns them.
    pub async fn notes(&self) -> Result<Map<String, Value>, ApiError> {
        self.fetch(&endpoint::NOTES, None, None).await
    }

    /// Teaching material shared by teachers.
    pub async fn didactics(&self) -> Result<Vec<Value>, ApiError> {
        self.fetch(&endpoint::DIDACTICS, None, None).await
    }

    pub async fn noticeboard(&self) -> Result<Vec<NoticeboardItem>, ApiError> {
        self.fetch(&endpoint::NOTICEBOARD, None, None).await
    }

    /// Fetch the card record and fold the school descriptor and account
    /// role into the profile.
    pub async fn card(&self) -> Result<Card, ApiError> {
        let card: Card = self.fetch(&endpoint::CARD, None, None).await?;
        let mut state = self.inner.state.lock().await;
        state.profile.apply_card(&card);
        Ok(card)
    }

    pub async fn documents(&self) -> Result<Vec<Document>, ApiError> {
        self.fetch(&endpoint::DOCUMENTS, None, Some(json!({}))).await
    }

    pub async fn check_document(&self, hash: &str) -> Result<DocumentStatus, ApiError> {
        let path = format!("/documents/check/{hash}");
        self.fetch(&endpoint::CHECK_DOCUMENT, Some(&path), Some(json!({})))
            .await
    }

    /// Document content as raw bytes.
    pub async fn read_document(&self, hash: &str) -> Result<Vec<u8>, ApiError> {
        let path = format!("/documents/read/{hash}");
        self.call_bytes(&endpoint::READ_DOCUMENT, Some(&path), Some(json!({})))
            .await
    }

    /// Attachment bytes for a noticeboard item.
    pub async fn read_notice(&self, evt_code: &str, pub_id: i64) -> Result<Vec<u8>, ApiError> {
        let path = format!("/noticeboard/read/{evt_code}/{pub_id}/101");
        self.call_bytes(&endpoint::READ_NOTICE, Some(&path), None).await
    }

    /// Where a noticeboard attachment is served from, taken from the
    /// `Location` response header without following it.
    pub async fn notice_document_url(
        &self,
        evt_code: &str,
        pub_id: i64,
    ) -> Result<String, ApiError> {
        let path = format!("/noticeboard/read/{evt_code}/{pub_id}/101");
        let response = self.execute(&endpoint::READ_NOTICE, Some(&path), None).await?;
        match response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            Some(url) => Ok(url.to_string()),
            None => {
                warn!(status = %response.status(), "response carried no Location header");
                Err(ApiError::MissingLocation)
            }
        }
    }

    /// Teacher availability frames for parent-teacher talks.
    pub async fn talks(&self) -> Result<Vec<Value>, ApiError> {
        self.fetch(&endpoint::TALKS, None, None).await
    }

    pub async fn talk_options(&self) -> Result<Map<String, Value>, ApiError> {
        self.fetch(&endpoint::TALK_OPTIONS, None, None).await
    }

    pub async fn terms_agreement(&self) -> Result<Map<String, Value>, ApiError> {
        self.fetch(&endpoint::TERMS_AGREEMENT, None, None).await
    }

    pub async fn set_terms_agreement(
        &self,
        accepted: bool,
    ) -> Result<Map<String, Value>, ApiError> {
        self.fetch(
            &endpoint::SET_TERMS_AGREEMENT,
            None,
            Some(json!({ "accepted": accepted })),
        )
        .await
    }

    // ========================================================================
    // Direct endpoints outside the audience namespace
    // ========================================================================

    async fn bearer(&self) -> Result<String, ApiError> {
        let state = self.inner.state.lock().await;
        if !state.authorized() {
            warn!("not logged in");
            return Err(ApiError::NotAuthenticated);
        }
        Ok(state.token())
    }

    /// Token status as reported by the server.
    pub async fn token_status(&self) -> Result<TokenStatus, ApiError> {
        let token = self.bearer().await?;
        let url = format!("{}/auth/status/", self.inner.rest_base);
        let response = self
            .inner
            .http
            .get(&url)
            .header(AUTH_HEADER, token)
            .send()
            .await?;
        let envelope = decode(response).await?;
        unwrap_section(envelope, Some("status"))
    }

    /// Single-use ticket for the web frontend.
    pub async fn ticket(&self) -> Result<Map<String, Value>, ApiError> {
        let token = self.bearer().await?;
        let url = format!("{}/auth/ticket", self.inner.rest_base);
        let response = self
            .inner
            .http
            .get(&url)
            .header(AUTH_HEADER, token)
            .send()
            .await?;
        let envelope = decode(response).await?;
        unwrap_section(envelope, None)
    }

    /// Account avatar as raw image bytes.
    pub async fn avatar(&self) -> Result<Vec<u8>, ApiError> {
        let token = self.bearer().await?;
        let url = format!("{}/auth/avatar", self.inner.rest_base);
        let response = self
            .inner
            .http
            .get(&url)
            .header(AUTH_HEADER, token)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, "unexpected status");
            return Err(ApiError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Published contents from the secondary host, addressed by school code.
    /// Requires a successful `card()` first.
    pub async fn contents(&self) -> Result<Vec<Value>, ApiError> {
        let (token, school_code) = {
            let state = self.inner.state.lock().await;
            if !state.authorized() {
                warn!("not logged in");
                return Err(ApiError::NotAuthenticated);
            }
            (state.token(), state.profile.school.code.clone())
        };
        if school_code.is_empty() {
            warn!("school code unknown, card() has not succeeded yet");
            return Err(ApiError::SchoolCodeUnknown);
        }
        let url = format!(
            "{}/gek/api/v1/{}/2021/students/contents",
            self.inner.origin, school_code
        );
        let response = self
            .inner
            .http
            .get(&url)
            .header(AUTH_HEADER, token)
            .send()
            .await?;
        let envelope = decode(response).await?;
        unwrap_section(envelope, None)
    }

    #[cfg(test)]
    pub(crate) async fn renewal_pending(&self) -> bool {
        self.inner
            .renewal
            .lock()
            .await
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

// ============================================================================
// Envelope handling
// ============================================================================

/// Adopt a login payload into session + profile. An empty or unusable
/// payload clears the session instead.
fn adopt(state: &mut State, payload: &LoginPayload) -> bool {
    match Session::from_payload(payload) {
        Some(session) if session.authorized() => {
            state.session = Some(session);
            state.profile.set_identity(
                payload.first_name.as_deref().unwrap_or(""),
                payload.last_name.as_deref().unwrap_or(""),
                payload.ident.as_deref().unwrap_or(""),
            );
            true
        }
        _ => {
            state.session = None;
            false
        }
    }
}

/// Decode a JSON envelope, mapping remote error indicators and unexpected
/// statuses. Error indicators are checked before the status line because the
/// platform pairs them with assorted 4xx codes.
async fn decode(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let path = response.url().path().to_string();
    let envelope: Value = match response.json().await {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path, error = %e, "response was not JSON");
            return Err(ApiError::Network(e));
        }
    };
    if let Some((code, message)) = remote_error(&envelope, status) {
        warn!(path = %path, status = code, message = %message, "remote error");
        return Err(ApiError::Remote {
            status: code,
            message,
        });
    }
    if status != StatusCode::OK {
        warn!(path = %path, status = %status, "unexpected status");
        return Err(ApiError::Status(status));
    }
    Ok(envelope)
}

/// Extract the platform error indicator from an envelope: the human message
/// when one is present, else the tail of the error-path field.
fn remote_error(envelope: &Value, status: StatusCode) -> Option<(u16, String)> {
    let error = envelope.get("error")?.as_str()?;
    let message = envelope
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.rsplit('/').next().unwrap_or(error).trim().to_string());
    let code = envelope
        .get("statusCode")
        .and_then(Value::as_u64)
        .map(|c| c as u16)
        .unwrap_or_else(|| status.as_u16());
    Some((code, message))
}

/// Unwrap the per-endpoint payload key, defaulting on absence.
fn unwrap_section<T>(mut envelope: Value, key: Option<&str>) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    let payload = match key {
        None => envelope,
        Some(key) => match envelope.get_mut(key).map(Value::take) {
            None | Some(Value::Null) => return Ok(T::default()),
            Some(value) => value,
        },
    };
    serde_json::from_value(payload).map_err(ApiError::from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as TimeDelta, Utc};
    use mockito::{Matcher, Server, ServerGuard};
    use tempfile::TempDir;

    fn config(server: &ServerGuard, cache: &TempDir) -> ClientConfig {
        ClientConfig {
            base_url: Some(server.url()),
            cache_dir: Some(cache.path().to_path_buf()),
            username: Some("demo".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        }
    }

    fn login_body(expire_in: TimeDelta) -> String {
        json!({
            "ident": "S42",
            "firstName": "A",
            "lastName": "B",
            "token": "t",
            "release": Utc::now().to_rfc3339(),
            "expire": (Utc::now() + expire_in).to_rfc3339(),
        })
        .to_string()
    }

    async fn logged_in_client(server: &mut ServerGuard, cache: &TempDir) -> Client {
        let mock = server
            .mock("POST", "/rest/v1/auth/login/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(login_body(TimeDelta::hours(1)))
            .create_async()
            .await;
        let client = Client::new(config(server, cache)).unwrap();
        client.login().await.unwrap();
        mock.assert_async().await;
        client
    }

    #[tokio::test]
    async fn test_login_populates_profile_and_writes_cache() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let mock = server
            .mock("POST", "/rest/v1/auth/login/")
            .match_body(Matcher::PartialJson(json!({"uid": "demo", "pass": "secret"})))
            .with_status(200)
            .with_body(login_body(TimeDelta::hours(1)))
            .create_async()
            .await;

        let client = Client::new(config(&server, &cache)).unwrap();
        let profile = client.login().await.unwrap();
        mock.assert_async().await;

        assert_eq!(profile.name, "A");
        assert_eq!(profile.surname, "B");
        assert_eq!(profile.id, "42");
        assert_eq!(profile.ident, "S42");
        assert!(client.authorized().await);

        let cached = std::fs::read_to_string(cache.path().join("session.json")).unwrap();
        assert!(cached.contains("\"token\": \"t\""));
    }

    #[tokio::test]
    async fn test_login_is_idempotent() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let mock = server
            .mock("POST", "/rest/v1/auth/login/")
            .with_status(200)
            .with_body(login_body(TimeDelta::hours(1)))
            .expect(1)
            .create_async()
            .await;

        let client = Client::new(config(&server, &cache)).unwrap();
        let first = client.login().await.unwrap();
        let second = client.login().await.unwrap();
        assert_eq!(first, second);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_without_credentials() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let mock = server
            .mock("POST", "/rest/v1/auth/login/")
            .expect(0)
            .create_async()
            .await;

        let client = Client::new(ClientConfig {
            base_url: Some(server.url()),
            cache_dir: Some(cache.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingCredentials));
        assert!(!client.authorized().await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_remote_error() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        server
            .mock("POST", "/rest/v1/auth/login/")
            .with_status(422)
            .with_body(r#"{"error": "/auth/ authentication failed", "statusCode": 422}"#)
            .create_async()
            .await;

        let client = Client::new(config(&server, &cache)).unwrap();
        match client.login().await.unwrap_err() {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "authentication failed");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
        assert!(!client.authorized().await);
    }

    #[tokio::test]
    async fn test_login_unexpected_status() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        server
            .mock("POST", "/rest/v1/auth/login/")
            .with_status(503)
            .with_body("{}")
            .create_async()
            .await;

        let client = Client::new(config(&server, &cache)).unwrap();
        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ApiError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_cached_session_skips_network() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let mock = server
            .mock("POST", "/rest/v1/auth/login/")
            .expect(0)
            .create_async()
            .await;

        let record = LoginPayload {
            ident: Some("S77".to_string()),
            first_name: Some("C".to_string()),
            last_name: Some("D".to_string()),
            token: Some("cached-token".to_string()),
            release: None,
            expire: Some((Utc::now() + TimeDelta::hours(1)).to_rfc3339()),
        };
        SessionCache::new(cache.path().to_path_buf())
            .store(&record)
            .unwrap();

        let client = Client::new(config(&server, &cache)).unwrap();
        let profile = client.login().await.unwrap();
        assert_eq!(profile.id, "77");
        assert!(client.authorized().await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_cache_forces_network_login() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let mock = server
            .mock("POST", "/rest/v1/auth/login/")
            .with_status(200)
            .with_body(login_body(TimeDelta::hours(1)))
            .expect(1)
            .create_async()
            .await;

        let record = LoginPayload {
            ident: Some("S77".to_string()),
            first_name: None,
            last_name: None,
            token: Some("stale".to_string()),
            release: None,
            expire: Some((Utc::now() - TimeDelta::hours(1)).to_rfc3339()),
        };
        SessionCache::new(cache.path().to_path_buf())
            .store(&record)
            .unwrap();

        let client = Client::new(config(&server, &cache)).unwrap();
        let profile = client.login().await.unwrap();
        assert_eq!(profile.ident, "S42");
        mock.assert_async().await;

        // The cache now holds the fresh session
        let cached = std::fs::read_to_string(cache.path().join("session.json")).unwrap();
        assert!(cached.contains("\"token\": \"t\""));
    }

    #[tokio::test]
    async fn test_logout_clears_state_and_short_circuits() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        let data_mock = server
            .mock("GET", Matcher::Regex("/students/".to_string()))
            .expect(0)
            .create_async()
            .await;

        assert!(client.logout().await);
        assert!(!client.authorized().await);
        assert_eq!(client.profile().await, Profile::default());

        let err = client.grades().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
        data_mock.assert_async().await;

        assert!(!client.logout().await);
    }

    #[tokio::test]
    async fn test_grades_unwraps_envelope() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        server
            .mock("GET", "/rest/v1/students/42/grades")
            .match_header("z-auth-token", "t")
            .with_status(200)
            .with_body(r#"{"grades": [{"subjectDesc": "MATEMATICA", "decimalValue": 8.0}]}"#)
            .create_async()
            .await;

        let grades = client.grades().await.unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].subject_desc.as_deref(), Some("MATEMATICA"));
    }

    #[tokio::test]
    async fn test_absent_envelope_key_defaults_empty() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        server
            .mock("GET", "/rest/v1/students/42/subjects")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let subjects = client.subjects().await.unwrap();
        assert!(subjects.is_empty());
    }

    #[tokio::test]
    async fn test_data_endpoint_remote_error() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        server
            .mock("GET", "/rest/v1/students/42/grades")
            .with_status(401)
            .with_body(r#"{"error": "/rest/v1/students/grades/ auth token expired", "statusCode": 401}"#)
            .create_async()
            .await;

        match client.grades().await.unwrap_err() {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "auth token expired");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_renewal_task_lifecycle() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        assert!(client.renewal_pending().await);

        // A second login is a no-op and must not spawn a duplicate
        client.login().await.unwrap();
        assert!(client.renewal_pending().await);

        client.logout().await;
        assert!(!client.renewal_pending().await);
    }

    #[tokio::test]
    async fn test_avatar_returns_raw_bytes() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        let image = [0xFFu8, 0xD8, 0xFF, 0xE0];
        server
            .mock("GET", "/rest/v1/auth/avatar")
            .with_status(200)
            .with_body(image)
            .create_async()
            .await;

        assert_eq!(client.avatar().await.unwrap(), image.to_vec());
    }

    #[tokio::test]
    async fn test_notice_document_url_reads_location_header() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        server
            .mock("POST", "/rest/v1/students/42/noticeboard/read/CF/991/101")
            .with_status(302)
            .with_header("location", "https://cdn.example/circolare-42.pdf")
            .create_async()
            .await;

        let url = client.notice_document_url("CF", 991).await.unwrap();
        assert_eq!(url, "https://cdn.example/circolare-42.pdf");
    }

    #[tokio::test]
    async fn test_check_document() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        server
            .mock("POST", "/rest/v1/students/42/documents/check/abc123")
            .with_status(200)
            .with_body(r#"{"document": {"available": true}}"#)
            .create_async()
            .await;

        assert!(client.check_document("abc123").await.unwrap().available);
    }

    #[tokio::test]
    async fn test_card_enriches_profile_then_contents() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        // Before the card fetch the school code is unknown
        let err = client.contents().await.unwrap_err();
        assert!(matches!(err, ApiError::SchoolCodeUnknown));

        server
            .mock("GET", "/rest/v1/students/42/card")
            .with_status(200)
            .with_body(
                r#"{"card": {"usrType": "G", "schCode": "SC1", "schName": "ITIS Example",
                    "schDedication": "A. Volta", "schCity": "Milano", "schProv": "MI"}}"#,
            )
            .create_async()
            .await;

        client.card().await.unwrap();
        let profile = client.profile().await;
        assert_eq!(profile.school.code, "SC1");
        assert_eq!(profile.kind, crate::models::UserKind::Parent);

        server
            .mock("GET", "/gek/api/v1/SC1/2021/students/contents")
            .with_status(200)
            .with_body(r#"[{"id": 1}, {"id": 2}]"#)
            .create_async()
            .await;

        assert_eq!(client.contents().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_parents_endpoint_uses_raw_ident() {
        let mut server = Server::new_async().await;
        let cache = TempDir::new().unwrap();
        let client = logged_in_client(&mut server, &cache).await;

        server
            .mock("GET", "/rest/v1/parents/S42/talks/teachersframes")
            .with_status(200)
            .with_body(r#"{"teachers": [{"teacherName": "ROSSI"}]}"#)
            .create_async()
            .await;

        assert_eq!(client.talks().await.unwrap().len(), 1);
    }

    #[test]
    fn test_remote_error_prefers_message_field() {
        let envelope = json!({"error": "/auth/ authentication failed", "message": "wrong password"});
        let (code, message) = remote_error(&envelope, StatusCode::UNPROCESSABLE_ENTITY).unwrap();
        assert_eq!(code, 422);
        assert_eq!(message, "wrong password");
    }

    #[test]
    fn test_remote_error_falls_back_to_error_tail() {
        let envelope = json!({"error": "/rest/v1/auth/ authentication failed"});
        let (code, message) = remote_error(&envelope, StatusCode::BAD_REQUEST).unwrap();
        assert_eq!(code, 400);
        assert_eq!(message, "authentication failed");
    }

    #[test]
    fn test_remote_error_absent_on_clean_envelope() {
        assert!(remote_error(&json!({"grades": []}), StatusCode::OK).is_none());
        assert!(remote_error(&json!([1, 2]), StatusCode::OK).is_none());
    }

    #[test]
    fn test_unwrap_section_defaults_on_absence() {
        let grades: Vec<Grade> = unwrap_section(json!({}), Some("grades")).unwrap();
        assert!(grades.is_empty());

        let map: Map<String, Value> = unwrap_section(json!({"a": 1}), None).unwrap();
        assert_eq!(map.get("a"), Some(&json!(1)));
    }
}
