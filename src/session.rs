use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashmap::DashMap;

use crate::state::AppState;
use crate::utils::token;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// The logged-in user recorded in a session. A fresh CSRF token is minted
/// at every login.
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub csrf_token: String,
}

#[derive(Clone, Debug, Default)]
struct SessionData {
    user: Option<SessionUser>,
    flashes: Vec<String>,
}

/// In-process session storage keyed by random hex ids. Sessions do not
/// survive a restart.
///
/// Entries are created on the first write (login or flash), never for a
/// plain page view, so cookie-less traffic leaves nothing behind in the
/// map.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionData>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = token::generate();
            if !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Handle on one request's session. `attach_session` clones it into the
/// request extensions; handlers receive it through the extractor in
/// `extractors::session`.
#[derive(Clone)]
pub struct Session {
    store: Arc<SessionStore>,
    id: String,
}

impl Session {
    pub fn user(&self) -> Option<SessionUser> {
        self.store
            .sessions
            .get(&self.id)
            .and_then(|data| data.user.clone())
    }

    /// Run a mutation against this session's data, creating the store
    /// entry if this is the session's first write.
    fn write(&self, mutate: impl FnOnce(&mut SessionData)) {
        let mut data = self.store.sessions.entry(self.id.clone()).or_default();
        mutate(&mut data);
    }

    /// Record a login, minting a fresh CSRF token.
    pub fn log_in(&self, user_id: i32, username: String) {
        self.write(|data| {
            data.user = Some(SessionUser {
                id: user_id,
                username,
                csrf_token: token::generate(),
            });
        });
    }

    /// Clear the logged-in user. The session itself stays, so queued flash
    /// messages still reach the next page.
    pub fn log_out(&self) {
        if let Some(mut data) = self.store.sessions.get_mut(&self.id) {
            data.user = None;
        }
    }

    /// Queue a message for the next rendered page.
    pub fn flash(&self, message: impl Into<String>) {
        self.write(|data| data.flashes.push(message.into()));
    }

    /// Drain the queued flash messages.
    pub fn take_flashes(&self) -> Vec<String> {
        self.store
            .sessions
            .get_mut(&self.id)
            .map(|mut data| std::mem::take(&mut data.flashes))
            .unwrap_or_default()
    }
}

/// Resolve the request's session and insert a handle into the request
/// extensions. A request without a known cookie gets a fresh id, but the
/// store entry and the `Set-Cookie` only materialize if the handler
/// actually wrote to the session; a plain page view stores nothing.
pub async fn attach_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| state.sessions.contains(id));

    let (id, had_cookie) = match existing {
        Some(id) => (id, true),
        None => (state.sessions.fresh_id(), false),
    };

    let session = Session {
        store: state.sessions.clone(),
        id: id.clone(),
    };
    req.extensions_mut().insert(session);

    let response = next.run(req).await;

    if !had_cookie && state.sessions.contains(&id) {
        let cookie = Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), response).into_response()
    } else {
        response
    }
}
