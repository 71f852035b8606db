//! Who is making the request.
//!
//! The login session lives in the actix-identity cookie session and ends with
//! the browser. Logging in with "remember me" also sets an encrypted,
//! long-lived `remember_token` cookie which re-establishes the session once the
//! browser session has gone.

use actix_identity::{Identity, IdentityExt};
use actix_session::SessionExt;
use actix_web::cookie::{time::Duration, Cookie, CookieJar, Key};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;

use crate::config::EnvConfig;
use crate::models::user::User;
use crate::utils::error::AppError;
use crate::utils::flash::{self, Level};

pub const REMEMBER_COOKIE: &str = "remember_token";
const REMEMBER_DAYS: i64 = 365;

/// The signed-in user, if any.
pub struct MaybeUser(pub Option<User>);

/// The signed-in user. Anonymous requests are sent to the login page.
pub struct CurrentUser(pub User);

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Ok(MaybeUser(load_user(&req).await?)) })
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match load_user(&req).await? {
                Some(user) => Ok(CurrentUser(user)),
                None => {
                    flash::push(&req.get_session(), Level::Info, "Please log in to access this page.")?;
                    Err(AppError::LoginRequired {
                        next: req.uri().path().to_string(),
                    })
                }
            }
        })
    }
}

async fn load_user(req: &HttpRequest) -> Result<Option<User>, AppError> {
    let pool = req
        .app_data::<web::Data<SqlitePool>>()
        .ok_or_else(|| AppError::Internal("database pool is not registered".into()))?;

    if let Some(user_id) = session_user_id(req) {
        return Ok(User::find_by_id(pool, user_id).await?);
    }

    let config = req
        .app_data::<web::Data<EnvConfig>>()
        .ok_or_else(|| AppError::Internal("configuration is not registered".into()))?;
    let Some(user_id) = remembered_user_id(req, &config.secret_key) else {
        return Ok(None);
    };

    let user = User::find_by_id(pool, user_id).await?;
    if let Some(user) = &user {
        log::debug!("restoring session for user {} from remember cookie", user.id);
        start_session(req, user.id)?;
    }
    Ok(user)
}

fn session_user_id(req: &HttpRequest) -> Option<i64> {
    req.get_identity().ok()?.id().ok()?.parse().ok()
}

fn remembered_user_id(req: &HttpRequest, key: &Key) -> Option<i64> {
    let mut jar = CookieJar::new();
    jar.add_original(req.cookie(REMEMBER_COOKIE)?);
    jar.private(key).get(REMEMBER_COOKIE)?.value().parse().ok()
}

fn start_session(req: &HttpRequest, user_id: i64) -> Result<(), AppError> {
    Identity::login(&req.extensions(), user_id.to_string())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(())
}

/// Starts a session for `user`. With `remember` set, also returns the
/// remember-me cookie the caller must attach to its response. `secure`
/// restricts that cookie to HTTPS, like the session cookie.
pub fn login_user(
    req: &HttpRequest,
    user: &User,
    remember: bool,
    key: &Key,
    secure: bool,
) -> Result<Option<Cookie<'static>>, AppError> {
    start_session(req, user.id)?;
    if !remember {
        return Ok(None);
    }

    let mut jar = CookieJar::new();
    jar.private_mut(key).add(
        Cookie::build(REMEMBER_COOKIE, user.id.to_string())
            .path("/")
            .http_only(true)
            .secure(secure)
            .max_age(Duration::days(REMEMBER_DAYS))
            .finish(),
    );
    Ok(jar.get(REMEMBER_COOKIE).cloned())
}

/// Ends the session (if any) and returns the cookie that clears remember-me.
pub fn logout_user(identity: Option<Identity>) -> Cookie<'static> {
    if let Some(identity) = identity {
        identity.logout();
    }

    let mut removal = Cookie::build(REMEMBER_COOKIE, "").path("/").finish();
    removal.make_removal();
    removal
}
