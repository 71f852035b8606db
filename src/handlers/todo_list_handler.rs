use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::dto::todo_list_dto::ToDoListForm;
use crate::dto::{FormErrors, Validated};
use crate::handlers::redirect;
use crate::models::todo_list::ToDoList;
use crate::models::user::User;
use crate::utils::auth::{CurrentUser, MaybeUser};
use crate::utils::error::AppError;
use crate::utils::flash::{self, Level};
use crate::views::{list_views, PageContext};

const CREATE_LEGEND: &str = "Create New List";
const UPDATE_LEGEND: &str = "Update List";

async fn get_or_404(db_pool: &SqlitePool, list_id: i64) -> Result<ToDoList, AppError> {
    ToDoList::find_by_id(db_pool, list_id)
        .await?
        .ok_or(AppError::NotFound)
}

fn ensure_author(list: &ToDoList, user: &User) -> Result<(), AppError> {
    if list.is_authored_by(user) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub async fn new_list_page(CurrentUser(user): CurrentUser, session: Session) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::new(&session, Some(&user))?;
    Ok(list_views::list_form_page(&ctx, CREATE_LEGEND, "", "", &FormErrors::default()))
}

pub async fn create_list(
    CurrentUser(user): CurrentUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    form: web::Form<ToDoListForm>,
) -> Result<HttpResponse, AppError> {
    match form.validate() {
        Validated::Valid(draft) => {
            let list = ToDoList::create(&db_pool, &draft.title, &draft.content, &user).await?;
            log::debug!("user {} created list {}", user.id, list.id);
            flash::push(&session, Level::Success, "Your to-do list has been created!")?;
            Ok(redirect("/home"))
        }
        Validated::Invalid(errors) => {
            let ctx = PageContext::new(&session, Some(&user))?;
            Ok(list_views::list_form_page(&ctx, CREATE_LEGEND, &form.title, &form.content, &errors))
        }
    }
}

/// Lists are readable by anyone who knows the id.
pub async fn view_list(
    user: MaybeUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let list = get_or_404(&db_pool, list_id.into_inner()).await?;
    let is_author = user.0.as_ref().is_some_and(|u| list.is_authored_by(u));

    let ctx = PageContext::new(&session, user.0.as_ref())?;
    Ok(list_views::list_page(&ctx, &list, is_author))
}

pub async fn update_list_page(
    CurrentUser(user): CurrentUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let list = get_or_404(&db_pool, list_id.into_inner()).await?;
    ensure_author(&list, &user)?;

    let ctx = PageContext::new(&session, Some(&user))?;
    Ok(list_views::list_form_page(
        &ctx,
        UPDATE_LEGEND,
        &list.title,
        &list.content,
        &FormErrors::default(),
    ))
}

pub async fn update_list(
    CurrentUser(user): CurrentUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
    form: web::Form<ToDoListForm>,
) -> Result<HttpResponse, AppError> {
    let mut list = get_or_404(&db_pool, list_id.into_inner()).await?;
    ensure_author(&list, &user)?;

    match form.validate() {
        Validated::Valid(draft) => {
            list.title = draft.title;
            list.content = draft.content;
            list.save(&db_pool).await?;
            flash::push(&session, Level::Success, "Your to-do list has been updated!")?;
            Ok(redirect(&format!("/list/{}", list.id)))
        }
        Validated::Invalid(errors) => {
            let ctx = PageContext::new(&session, Some(&user))?;
            Ok(list_views::list_form_page(&ctx, UPDATE_LEGEND, &form.title, &form.content, &errors))
        }
    }
}

pub async fn delete_list(
    CurrentUser(user): CurrentUser,
    session: Session,
    db_pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let list = get_or_404(&db_pool, list_id.into_inner()).await?;
    ensure_author(&list, &user)?;

    list.delete(&db_pool).await?;
    flash::push(&session, Level::Success, "Your to-do list has been deleted!")?;
    Ok(redirect("/home"))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // before "/list/{id}" so "new" is not taken for an id
    cfg.service(
        web::resource("/list/new")
            .route(web::get().to(new_list_page))
            .route(web::post().to(create_list)),
    );

    cfg.service(web::resource("/list/{id}").route(web::get().to(view_list)));

    cfg.service(
        web::resource("/list/{id}/update")
            .route(web::get().to(update_list_page))
            .route(web::post().to(update_list)),
    );

    cfg.service(web::resource("/list/{id}/delete").route(web::post().to(delete_list)));
}
