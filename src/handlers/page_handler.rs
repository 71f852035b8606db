use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::models::todo_list::ToDoList;
use crate::utils::auth::MaybeUser;
use crate::utils::error::AppError;
use crate::views::{list_views, PageContext};

pub async fn home(
    user: MaybeUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::new(&session, user.0.as_ref())?;

    match &user.0 {
        Some(user) => {
            let lists = ToDoList::by_author(&db_pool, user).await?;
            Ok(list_views::home_page(&ctx, Some(lists.as_slice())))
        }
        None => Ok(list_views::home_page(&ctx, None)),
    }
}

pub async fn about(user: MaybeUser, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::new(&session, user.0.as_ref())?;
    Ok(list_views::about_page(&ctx))
}

pub async fn contact(user: MaybeUser, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::new(&session, user.0.as_ref())?;
    Ok(list_views::contact_page(&ctx))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)));
    cfg.service(web::resource("/home").route(web::get().to(home)));
    cfg.service(web::resource("/about").route(web::get().to(about)));
    cfg.service(web::resource("/contact").route(web::get().to(contact)));
}
