use actix_web::HttpResponse;

use crate::dto::FormErrors;
use crate::models::user::User;
use crate::views::{escape, input, render, PageContext};

pub fn register_page(ctx: &PageContext, username: &str, email: &str, errors: &FormErrors) -> HttpResponse {
    let body = format!(
        r#"<form method="POST" action="">
<fieldset><legend>Join Today</legend>
{}{}{}{}
</fieldset>
<button type="submit">Sign Up</button>
</form>
<small>Already have an account? <a href="/login">Sign In</a></small>"#,
        input("text", "username", "Username", username, errors),
        input("email", "email", "Email", email, errors),
        input("password", "password", "Password", "", errors),
        input("password", "confirm_password", "Confirm Password", "", errors),
    );
    render(ctx, "Register New Account", &body)
}

pub fn login_page(ctx: &PageContext, email: &str, errors: &FormErrors) -> HttpResponse {
    let body = format!(
        r#"<form method="POST">
<fieldset><legend>Log In</legend>
{}{}
<div class="form-check"><input type="checkbox" id="remember" name="remember" class="form-check-input"><label for="remember">Remember Me</label></div>
</fieldset>
<button type="submit">Login</button>
</form>
<small>Need an account? <a href="/register">Sign Up Now</a></small>"#,
        input("email", "email", "Email", email, errors),
        input("password", "password", "Password", "", errors),
    );
    render(ctx, "Login", &body)
}

/// `username` and `email` are what the form shows, which after a failed
/// submission is what was submitted rather than what is stored.
pub fn account_page(
    ctx: &PageContext,
    user: &User,
    username: &str,
    email: &str,
    errors: &FormErrors,
) -> HttpResponse {
    let picture_errors: String = errors
        .field("picture")
        .iter()
        .map(|e| format!(r#"<span class="text-danger">{}</span><br>"#, escape(e)))
        .collect();

    let body = format!(
        r#"<div class="media">
<img class="account-img" src="{image}" alt="profile picture">
<div class="media-body"><h2 class="account-heading">{current_name}</h2><p class="text-secondary">{current_email}</p></div>
</div>
<form method="POST" action="" enctype="multipart/form-data">
<fieldset><legend>Account Info</legend>
{username}{email}
<div class="form-group"><label for="picture">Update Profile Picture</label><input type="file" id="picture" name="picture" accept=".jpg,.jpeg,.png">{picture_errors}</div>
</fieldset>
<button type="submit">Update</button>
</form>"#,
        image = escape(&user.image_url()),
        current_name = escape(&user.username),
        current_email = escape(&user.email),
        username = input("text", "username", "Username", username, errors),
        email = input("email", "email", "Email", email, errors),
        picture_errors = picture_errors,
    );
    render(ctx, "Account", &body)
}
