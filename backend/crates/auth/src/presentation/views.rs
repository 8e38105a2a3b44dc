//! HTML Views
//!
//! Every piece of user-supplied text goes through `html_escape`.

use html_escape::encode_text;

use crate::domain::entity::identity::Identity;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = encode_text(title),
        body = body,
    )
}

fn message_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>\n", encode_text(m)))
        .collect();

    format!("<ul class=\"messages\">\n{items}</ul>\n")
}

/// GET /
pub fn index_page(identity: Option<&Identity>, messages: &[String]) -> String {
    let content = match identity {
        Some(identity) => format!(
            r#"<h1>Welcome back {name}</h1>
<a href="/restricted">Restricted page</a>
<a href="/log-out">Log out</a>
"#,
            name = encode_text(identity.user_name.as_str()),
        ),
        None => r#"<h1>Please log in</h1>
<form action="/log-in" method="POST">
<label for="username">Username</label>
<input id="username" name="username" placeholder="username" type="text">
<label for="password">Password</label>
<input id="password" name="password" type="password">
<button>Log In</button>
</form>
<a href="/sign-up">Sign up</a>
"#
        .to_string(),
    };

    layout("Home", &format!("{}{}", message_list(messages), content))
}

/// GET /sign-up, and POST /sign-up when the input is rejected
pub fn sign_up_page(notice: Option<&str>) -> String {
    let notice = notice
        .map(|n| format!("<p class=\"notice\">{}</p>\n", encode_text(n)))
        .unwrap_or_default();

    let content = format!(
        r#"<h1>Sign Up</h1>
{notice}<form action="/sign-up" method="POST">
<label for="username">Username</label>
<input id="username" name="username" placeholder="username" type="text">
<label for="password">Password</label>
<input id="password" name="password" type="password">
<button>Sign Up</button>
</form>
"#
    );

    layout("Sign Up", &content)
}

/// GET /restricted
pub fn restricted_page(identity: &Identity, page_count: i64) -> String {
    let content = format!(
        r#"<h1>Restricted</h1>
<p>Signed in as {name}</p>
<p>You have visited this page {page_count} times.</p>
<a href="/">Home</a>
"#,
        name = encode_text(identity.user_name.as_str()),
    );

    layout("Restricted", &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{UserId, user_name::UserName};

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(),
            user_name: UserName::new(name).unwrap(),
        }
    }

    #[test]
    fn test_index_anonymous_shows_login_form() {
        let html = index_page(None, &[]);
        assert!(html.contains("action=\"/log-in\""));
        assert!(!html.contains("class=\"messages\""));
    }

    #[test]
    fn test_index_renders_messages_escaped() {
        let html = index_page(None, &["<b>hi</b>".to_string()]);
        assert!(html.contains("<li>&lt;b&gt;hi&lt;/b&gt;</li>"));
    }

    #[test]
    fn test_user_name_escaped() {
        let html = index_page(Some(&identity("<script>")), &[]);
        assert!(html.contains("Welcome back &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_restricted_shows_count() {
        let html = restricted_page(&identity("alice"), 3);
        assert!(html.contains("visited this page 3 times"));
    }
}
