//! User identity middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use tracing::{debug, warn};

use crate::application::services::UserIdentity;
use crate::state::AppState;

/// Name of the cookie carrying the identity token.
pub const TOKEN_COOKIE: &str = "token";

/// Attaches a [`UserIdentity`] to every request.
///
/// # Token Sources
///
/// ```text
/// Authorization: Bearer <token>
/// Cookie: token=<token>
/// ```
///
/// The header wins when both are present. A missing or forged token is not
/// an error: the request proceeds under a freshly minted identity, and the
/// new token is returned in both `Authorization` and `Set-Cookie` so the
/// client can keep using it.
///
/// Handlers read the identity with `Extension<UserIdentity>`.
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let bearer = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token);
    let token = bearer.or_else(|| token_cookie(&parts.headers));

    let identity = st.identity_service.identify(token.as_deref());
    if identity.issued {
        debug!(user_id = %identity.user_id, "Issued new user identity");
    }
    parts.extensions.insert(identity.clone());

    let mut response = next.run(Request::from_parts(parts, body)).await;

    if identity.issued {
        attach_token(response.headers_mut(), &identity);
    }

    response
}

fn token_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(TOKEN_COOKIE), Some(value)) if !value.is_empty() => Some(value.to_string()),
                _ => None,
            }
        })
}

fn attach_token(headers: &mut HeaderMap, identity: &UserIdentity) {
    let bearer = HeaderValue::from_str(&format!("Bearer {}", identity.token));
    let cookie = HeaderValue::from_str(&format!(
        "{TOKEN_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        identity.token
    ));

    match (bearer, cookie) {
        (Ok(bearer), Ok(cookie)) => {
            headers.insert(AUTHORIZATION, bearer);
            headers.append(SET_COOKIE, cookie);
        }
        _ => warn!(user_id = %identity.user_id, "Token is not a valid header value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=abc.def; lang=en"));

        assert_eq!(token_cookie(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_token_cookie_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("tokens=1; token="));

        assert!(token_cookie(&headers).is_none());
        assert!(token_cookie(&HeaderMap::new()).is_none());
    }
}
