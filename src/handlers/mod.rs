use actix_web::{http::header, HttpResponse};

pub mod page_handler;
pub mod todo_list_handler;
pub mod user_handler;

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
