use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::EnvConfig;
use crate::db;

pub const BOUNDARY: &str = "----todoappTestBoundary";

/// Lowest cost bcrypt accepts; keeps the tests fast.
pub const TEST_COST: u32 = 4;

/// One connection that never expires, otherwise every new connection would
/// open its own empty in-memory database.
pub async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Could not open in-memory database");

    db::init_schema(&pool).await.expect("Could not apply schema");

    pool
}

/// Serves the `static/` directory shipped with the crate.
pub fn shipped_static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

pub fn test_config(static_dir: &Path) -> EnvConfig {
    EnvConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        secret_key: Key::generate(),
        static_dir: static_dir.to_path_buf(),
        cookie_secure: false,
        bcrypt_cost: TEST_COST,
    }
}

/// A cookie jar that replays whatever the app set on earlier responses.
#[derive(Default)]
pub struct Browser {
    cookies: HashMap<String, Cookie<'static>>,
}

impl Browser {
    pub async fn send<S, B>(&mut self, app: &S, mut req: TestRequest) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        for cookie in self.cookies.values() {
            req = req.cookie(cookie.clone());
        }

        let resp = test::call_service(app, req.to_request()).await;

        for cookie in resp.response().cookies() {
            if cookie.value().is_empty() {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies.insert(cookie.name().to_string(), cookie.into_owned());
            }
        }
        resp
    }

    pub async fn get<S, B>(&mut self, app: &S, uri: &str) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::get().uri(uri)).await
    }

    pub async fn post_form<S, B, T>(&mut self, app: &S, uri: &str, form: &T) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
        T: Serialize + ?Sized,
    {
        self.send(app, TestRequest::post().uri(uri).set_form(form)).await
    }

    pub async fn register<S, B>(&mut self, app: &S, username: &str, email: &str, password: &str) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.post_form(
            app,
            "/register",
            &[
                ("username", username),
                ("email", email),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await
    }

    pub async fn login<S, B>(&mut self, app: &S, email: &str, password: &str) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.post_form(app, "/login", &[("email", email), ("password", password)])
            .await
    }

    /// Registers and logs in, asserting both steps succeed.
    pub async fn sign_up<S, B>(&mut self, app: &S, username: &str, email: &str, password: &str)
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let resp = self.register(app, username, email, password).await;
        assert_eq!(location(&resp), "/login");
        let resp = self.login(app, email, password).await;
        assert_eq!(location(&resp), "/home");
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.cookies.get(name).cloned()
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("response is not a redirect")
        .to_str()
        .expect("Location is not ASCII")
}

pub async fn body_string<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .expect("Could not encode test image");
    buf
}

/// `file` is (field file name, content type, bytes) for the "picture" field.
pub fn multipart_request(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> TestRequest {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"picture\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

pub async fn count_lists(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM todolists")
        .fetch_one(pool)
        .await
        .expect("Failed to query database.")
}
