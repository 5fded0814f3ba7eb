//! Session-backed identity extractors.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use campus_core::error::{ApiError, api_response};
use campus_domain::user::UserRole;

use crate::cookie::session_id;
use crate::session::{RedisSessionStore, SessionData, SessionError, SessionStore};

/// The authenticated caller. Rejects with 401 when no live session exists.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: String,
    pub data: SessionData,
}

impl CurrentUser {
    pub fn role(&self) -> UserRole {
        self.data.role
    }
}

/// The caller if a live session exists. Never rejects on a missing session.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

#[derive(Debug, thiserror::Error)]
pub enum SessionRejection {
    #[error("authentication required")]
    Missing,
    #[error(transparent)]
    Store(#[from] SessionError),
}

impl ApiError for SessionRejection {
    fn status(&self) -> StatusCode {
        match self {
            Self::Missing => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "UNAUTHORIZED",
            Self::Store(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        api_response(&self)
    }
}

/// Resolve a session id against `store`.
pub async fn resolve<S: SessionStore>(
    store: &S,
    session_id: Option<String>,
) -> Result<Option<CurrentUser>, SessionError> {
    let Some(session_id) = session_id else {
        return Ok(None);
    };
    let data = store.load(&session_id).await?;
    Ok(data.map(|data| CurrentUser { session_id, data }))
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    RedisSessionStore: FromRef<S>,
{
    type Rejection = SessionRejection;

    // Read the cookie synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let sid = session_id(&CookieJar::from_headers(&parts.headers));
        let store = RedisSessionStore::from_ref(state);

        async move {
            resolve(&store, sid)
                .await?
                .ok_or(SessionRejection::Missing)
        }
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    RedisSessionStore: FromRef<S>,
{
    type Rejection = SessionRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let sid = session_id(&CookieJar::from_headers(&parts.headers));
        let store = RedisSessionStore::from_ref(state);

        async move { Ok(MaybeUser(resolve(&store, sid).await?)) }
    }
}
