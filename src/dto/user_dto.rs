use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::dto::{email, length, required, FormErrors, Validated};
use crate::models::user::User;
use crate::utils::pictures::{allowed_extension, ALLOWED_EXTENSIONS};

const USERNAME_MIN_LEN: usize = 2;
const USERNAME_MAX_LEN: usize = 20;

const USERNAME_TAKEN: &str = "That username is taken. Please choose a different one.";
const EMAIL_TAKEN: &str = "That email is taken. Please choose a different one.";

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// A registration with unique username and email. The password is still plaintext.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox; present (usually as "on") only when ticked.
    pub remember: Option<String>,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

/// Multipart body of the account page.
#[derive(MultipartForm)]
pub struct AccountUpload {
    pub username: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub picture: Option<TempFile>,
}

pub struct UpdateAccountForm {
    pub username: String,
    pub email: String,
    pub picture: Option<TempFile>,
}

pub struct PictureUpload {
    pub file: TempFile,
    /// Lower-cased, one of `ALLOWED_EXTENSIONS`.
    pub extension: String,
}

pub struct AccountChanges {
    pub username: String,
    pub email: String,
    pub picture: Option<PictureUpload>,
}

fn check_username(errors: &mut FormErrors, value: &str) -> bool {
    if !required(errors, "username", value) {
        return false;
    }
    length(errors, "username", value, USERNAME_MIN_LEN, USERNAME_MAX_LEN);
    true
}

fn check_email(errors: &mut FormErrors, value: &str) -> bool {
    if !required(errors, "email", value) {
        return false;
    }
    email(errors, "email", value);
    true
}

impl RegistrationForm {
    pub async fn validate(&self, pool: &SqlitePool) -> Result<Validated<Registration>, sqlx::Error> {
        let mut errors = FormErrors::default();

        if check_username(&mut errors, &self.username) && User::username_taken(pool, &self.username).await? {
            errors.add("username", USERNAME_TAKEN);
        }
        if check_email(&mut errors, &self.email) && User::email_taken(pool, &self.email).await? {
            errors.add("email", EMAIL_TAKEN);
        }
        required(&mut errors, "password", &self.password);
        if required(&mut errors, "confirm_password", &self.confirm_password)
            && self.confirm_password != self.password
        {
            errors.add("confirm_password", "Field must be equal to password.");
        }

        Ok(Validated::check(errors, || Registration {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }))
    }
}

impl LoginForm {
    pub fn validate(&self) -> Validated<Credentials> {
        let mut errors = FormErrors::default();
        check_email(&mut errors, &self.email);
        required(&mut errors, "password", &self.password);

        Validated::check(errors, || Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
            remember: self.remember.is_some(),
        })
    }
}

impl From<AccountUpload> for UpdateAccountForm {
    fn from(upload: AccountUpload) -> Self {
        // Browsers submit an empty part when no file was chosen.
        let picture = upload.picture.filter(|file| {
            file.size > 0 || file.file_name.as_deref().is_some_and(|name| !name.is_empty())
        });

        UpdateAccountForm {
            username: upload.username.map(|t| t.0).unwrap_or_default(),
            email: upload.email.map(|t| t.0).unwrap_or_default(),
            picture,
        }
    }
}

impl UpdateAccountForm {
    /// Uniqueness is only checked for values that differ from `current`'s.
    pub async fn validate(
        self,
        current: &User,
        pool: &SqlitePool,
    ) -> Result<Validated<AccountChanges>, sqlx::Error> {
        let mut errors = FormErrors::default();

        if check_username(&mut errors, &self.username)
            && self.username != current.username
            && User::username_taken(pool, &self.username).await?
        {
            errors.add("username", USERNAME_TAKEN);
        }
        if check_email(&mut errors, &self.email)
            && self.email != current.email
            && User::email_taken(pool, &self.email).await?
        {
            errors.add("email", EMAIL_TAKEN);
        }

        let mut picture = None;
        if let Some(file) = self.picture {
            let extension = file.file_name.as_deref().and_then(allowed_extension);
            match extension {
                Some(extension) => picture = Some(PictureUpload { file, extension }),
                None => errors.add(
                    "picture",
                    format!(
                        "File does not have an approved extension: {}",
                        ALLOWED_EXTENSIONS.join(", ")
                    ),
                ),
            }
        }

        let (username, email) = (self.username, self.email);
        Ok(Validated::check(errors, || AccountChanges {
            username,
            email,
            picture,
        }))
    }
}
