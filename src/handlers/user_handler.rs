use actix_identity::Identity;
use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::config::EnvConfig;
use crate::dto::user_dto::{AccountUpload, LoginForm, RegistrationForm, UpdateAccountForm};
use crate::dto::{FormErrors, Validated};
use crate::handlers::redirect;
use crate::models::user::{NewUser, User};
use crate::utils::auth::{login_user, logout_user, CurrentUser, MaybeUser};
use crate::utils::error::AppError;
use crate::utils::flash::{self, Level};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::pictures::save_picture;
use crate::views::{user_views, PageContext};

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Only same-site paths are followed after login. Browsers drop tabs and
/// newlines from URLs, so `/\t/host` would resolve like `//host`.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(|c| c.is_control() || c.is_whitespace()) =>
        {
            path
        }
        _ => "/home",
    }
}

pub async fn register_page(user: MaybeUser, session: Session) -> Result<HttpResponse, AppError> {
    if user.0.is_some() {
        return Ok(redirect("/home"));
    }

    let ctx = PageContext::new(&session, None)?;
    Ok(user_views::register_page(&ctx, "", "", &FormErrors::default()))
}

pub async fn register(
    user: MaybeUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    config: web::Data<EnvConfig>,
    form: web::Form<RegistrationForm>,
) -> Result<HttpResponse, AppError> {
    if user.0.is_some() {
        return Ok(redirect("/home"));
    }

    match form.validate(&db_pool).await? {
        Validated::Valid(registration) => {
            let password_hash = hash_password(&registration.password, config.bcrypt_cost)?;
            let user = User::create(
                &db_pool,
                &NewUser {
                    username: registration.username,
                    email: registration.email,
                    password_hash,
                },
            )
            .await?;

            log::info!("registered user {} ({})", user.id, user.username);
            flash::push(&session, Level::Success, "Your account has been created. You can now log in!")?;
            Ok(redirect("/login"))
        }
        Validated::Invalid(errors) => {
            let ctx = PageContext::new(&session, None)?;
            Ok(user_views::register_page(&ctx, &form.username, &form.email, &errors))
        }
    }
}

pub async fn login_page(user: MaybeUser, session: Session) -> Result<HttpResponse, AppError> {
    if user.0.is_some() {
        return Ok(redirect("/home"));
    }

    let ctx = PageContext::new(&session, None)?;
    Ok(user_views::login_page(&ctx, "", &FormErrors::default()))
}

pub async fn login(
    req: HttpRequest,
    user: MaybeUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    config: web::Data<EnvConfig>,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    if user.0.is_some() {
        return Ok(redirect("/home"));
    }

    let errors = match form.validate() {
        Validated::Valid(credentials) => {
            if let Some(user) = User::find_by_email(&db_pool, &credentials.email).await? {
                if verify_password(&credentials.password, &user.password) {
                    let remember = login_user(
                        &req,
                        &user,
                        credentials.remember,
                        &config.secret_key,
                        config.cookie_secure,
                    )?;
                    log::info!("user {} logged in", user.id);

                    let mut response = HttpResponse::Found();
                    response.insert_header((header::LOCATION, safe_next(query.next.as_deref())));
                    if let Some(cookie) = remember {
                        response.cookie(cookie);
                    }
                    return Ok(response.finish());
                }
            }

            flash::push(
                &session,
                Level::Danger,
                format!(
                    "Login unsuccessful for {}. Please check email and password.",
                    credentials.email
                ),
            )?;
            FormErrors::default()
        }
        Validated::Invalid(errors) => errors,
    };

    let ctx = PageContext::new(&session, None)?;
    Ok(user_views::login_page(&ctx, &form.email, &errors))
}

pub async fn logout(identity: Option<Identity>) -> HttpResponse {
    let removal = logout_user(identity);
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/home"))
        .cookie(removal)
        .finish()
}

pub async fn account_page(CurrentUser(user): CurrentUser, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::new(&session, Some(&user))?;
    Ok(user_views::account_page(
        &ctx,
        &user,
        &user.username,
        &user.email,
        &FormErrors::default(),
    ))
}

pub async fn update_account(
    CurrentUser(mut user): CurrentUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    config: web::Data<EnvConfig>,
    MultipartForm(upload): MultipartForm<AccountUpload>,
) -> Result<HttpResponse, AppError> {
    let form = UpdateAccountForm::from(upload);
    let (username, email) = (form.username.clone(), form.email.clone());

    match form.validate(&user, &db_pool).await? {
        Validated::Valid(changes) => {
            if let Some(picture) = changes.picture {
                let dir = config.profile_pics_dir();
                let file_name = web::block(move || {
                    save_picture(picture.file.file.path(), &picture.extension, &dir)
                })
                .await??;
                log::debug!("stored profile picture {} for user {}", file_name, user.id);
                user.image_file = file_name;
            }
            user.username = changes.username;
            user.email = changes.email;
            user.save_account(&db_pool).await?;

            flash::push(&session, Level::Success, "Your account has been updated!")?;
            Ok(redirect("/account"))
        }
        Validated::Invalid(errors) => {
            let ctx = PageContext::new(&session, Some(&user))?;
            Ok(user_views::account_page(&ctx, &user, &username, &email, &errors))
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/register")
            .route(web::get().to(register_page))
            .route(web::post().to(register)),
    );

    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_page))
            .route(web::post().to(login)),
    );

    cfg.service(web::resource("/logout").route(web::get().to(logout)));

    cfg.service(
        web::resource("/account")
            .route(web::get().to(account_page))
            .route(web::post().to(update_account)),
    );
}

#[cfg(test)]
mod tests {
    use super::safe_next;

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/list/3/update")), "/list/3/update");
        assert_eq!(safe_next(Some("https://evil.example")), "/home");
        assert_eq!(safe_next(Some("//evil.example")), "/home");
        assert_eq!(safe_next(Some("/\\evil.example")), "/home");
        assert_eq!(safe_next(Some("/\t/evil.example")), "/home");
        assert_eq!(safe_next(Some("/\n/evil.example")), "/home");
        assert_eq!(safe_next(Some("/\r/evil.example")), "/home");
        assert_eq!(safe_next(Some("/ /evil.example")), "/home");
        assert_eq!(safe_next(None), "/home");
    }
}
