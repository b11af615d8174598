// ============================
// crates/secrets-lib/src/views.rs
// ============================
//! Minimal HTML rendering.
//!
//! Plain functions producing full pages; no templating engine. Every piece
//! of user-supplied text goes through [`escape`] before it is interpolated.
use axum::response::Html;

/// Escape text for safe interpolation into HTML
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - Secrets</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    ))
}

pub fn home() -> Html<String> {
    page(
        "Home",
        "<h1>Secrets</h1>\n\
         <p>Don't keep your secrets, share them anonymously!</p>\n\
         <p><a href=\"/register\">Register</a> | <a href=\"/login\">Login</a></p>",
    )
}

fn auth_form(title: &str, action: &str) -> Html<String> {
    let body = format!(
        "<h1>{title}</h1>\n\
         <form action=\"{action}\" method=\"post\">\n\
         <label>Username <input type=\"text\" name=\"username\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">{title}</button>\n\
         </form>\n\
         <p><a href=\"/auth/google\">Sign in with Google</a></p>\n\
         <p><a href=\"/auth/github\">Sign in with GitHub</a></p>"
    );
    page(title, &body)
}

pub fn login() -> Html<String> {
    auth_form("Login", "/login")
}

pub fn register() -> Html<String> {
    auth_form("Register", "/register")
}

pub fn submit() -> Html<String> {
    page(
        "Submit",
        "<h1>Share a secret</h1>\n\
         <form action=\"/submit\" method=\"post\">\n\
         <input type=\"text\" name=\"secret\" placeholder=\"What's your secret?\" required>\n\
         <button type=\"submit\">Submit</button>\n\
         </form>",
    )
}

pub fn secrets(secrets: &[String]) -> Html<String> {
    let mut body = String::from("<h1>You've discovered my secret!</h1>\n<ul>\n");
    for secret in secrets {
        body.push_str(&format!("<li class=\"secret\">{}</li>\n", escape(secret)));
    }
    body.push_str(
        "</ul>\n<p><a href=\"/submit\">Submit a secret</a> | <a href=\"/logout\">Log out</a></p>",
    );
    page("Secrets", &body)
}
