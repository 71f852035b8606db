use actix_web::HttpResponse;

use crate::dto::FormErrors;
use crate::models::todo_list::ToDoList;
use crate::views::{escape, input, render, textarea, PageContext};

/// `None` renders the anonymous landing page.
pub fn home_page(ctx: &PageContext, lists: Option<&[ToDoList]>) -> HttpResponse {
    let body = match lists {
        None => r#"<h1>ToDo Lists</h1><p>Keep track of everything you need to do. <a href="/register">Sign up</a> or <a href="/login">log in</a> to get started.</p>"#.to_string(),
        Some([]) => r#"<h1>Your Lists</h1><p>You have no lists yet. <a href="/list/new">Create one</a>.</p>"#.to_string(),
        Some(lists) => {
            let items: String = lists
                .iter()
                .map(|list| {
                    format!(
                        r#"<article class="todolist"><h2><a href="/list/{}">{}</a></h2><p>{}</p></article>"#,
                        list.id,
                        escape(&list.title),
                        escape(&list.content)
                    )
                })
                .collect();
            format!("<h1>Your Lists</h1>{}", items)
        }
    };
    render(ctx, "Home", &body)
}

pub fn list_page(ctx: &PageContext, list: &ToDoList, is_author: bool) -> HttpResponse {
    let controls = if is_author {
        format!(
            r#"<div class="list-controls"><a href="/list/{id}/update">Update</a>
<form method="POST" action="/list/{id}/delete"><button type="submit">Delete</button></form></div>"#,
            id = list.id
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"<article class="todolist"><h2 class="list-title">{}</h2><p class="list-content">{}</p>{}</article>"#,
        escape(&list.title),
        escape(&list.content),
        controls
    );
    render(ctx, &list.title, &body)
}

/// Shared by "create" and "update"; `legend` tells them apart.
pub fn list_form_page(
    ctx: &PageContext,
    legend: &str,
    title: &str,
    content: &str,
    errors: &FormErrors,
) -> HttpResponse {
    let body = format!(
        r#"<form method="POST" action="">
<fieldset><legend>{}</legend>
{}{}
</fieldset>
<button type="submit">Save</button>
</form>"#,
        escape(legend),
        input("text", "title", "Title", title, errors),
        textarea("content", "Content", content, errors),
    );
    render(ctx, legend, &body)
}

pub fn about_page(ctx: &PageContext) -> HttpResponse {
    render(
        ctx,
        "About",
        "<h1>About</h1><p>A small multi-user to-do list application. Register, log in and keep your lists in one place.</p>",
    )
}

pub fn contact_page(ctx: &PageContext) -> HttpResponse {
    render(
        ctx,
        "Contact",
        "<h1>Contact</h1><p>Questions or feedback? Open an issue in the project repository.</p>",
    )
}
