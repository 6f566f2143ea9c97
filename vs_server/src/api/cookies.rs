//! Auth cookie transport.
//!
//! The access token travels on every path; the refresh token is scoped to the
//! refresh endpoint so it is never sent anywhere else.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;
use vidshare::auth::{
    SessionTokens,
    tokens::{ACCESS_TOKEN_TTL_MINUTES, REFRESH_TOKEN_TTL_DAYS},
};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Attributes shared by both auth cookies
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
    pub domain: Option<String>,
}

impl CookieSettings {
    fn build(&self, name: &'static str, value: String, path: &'static str) -> Cookie<'static> {
        let mut cookie = Cookie::build((name, value))
            .path(path)
            .http_only(true)
            .same_site(SameSite::None)
            .secure(self.secure);
        if let Some(domain) = &self.domain {
            cookie = cookie.domain(domain.clone());
        }
        cookie.build()
    }

    pub fn access_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = self.build(ACCESS_TOKEN_COOKIE, token, "/");
        cookie.set_max_age(Duration::minutes(ACCESS_TOKEN_TTL_MINUTES));
        cookie
    }

    pub fn refresh_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = self.build(REFRESH_TOKEN_COOKIE, token, REFRESH_PATH);
        cookie.set_max_age(Duration::days(REFRESH_TOKEN_TTL_DAYS));
        cookie
    }

    /// Set both auth cookies
    pub fn set_tokens(&self, jar: CookieJar, tokens: SessionTokens) -> CookieJar {
        jar.add(self.access_cookie(tokens.access_token))
            .add(self.refresh_cookie(tokens.refresh_token))
    }

    /// Expire both auth cookies.
    ///
    /// Removal cookies are always emitted because the refresh cookie is not sent
    /// back on most paths and so never appears in the incoming jar.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut access = self.build(ACCESS_TOKEN_COOKIE, String::new(), "/");
        access.make_removal();
        let mut refresh = self.build(REFRESH_TOKEN_COOKIE, String::new(), REFRESH_PATH);
        refresh.make_removal();
        jar.add(access).add(refresh)
    }
}
