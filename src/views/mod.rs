//! HTML pages for the web interface
//!
//! Simple inline HTML templates without a template engine.

use chrono::{DateTime, Utc};

use crate::database::Todo;
use crate::forms::{TodoForm, TITLE_MAX_CHARS};

/// A page a handler can render, with the data it needs
#[derive(Debug)]
pub enum View {
    Home { username: Option<String> },
    Login { username: String },
    Signup { username: String },
    Pending { todos: Vec<Todo> },
    Completed { todos: Vec<Todo> },
    CreateTodo { form: TodoForm },
    TodoDetail { todo: Todo, form: TodoForm },
    NotFound,
    MethodNotAllowed,
    ServerError,
}

const STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 800px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
    }
    .container { background: white; padding: 30px; border-radius: 8px; }
    nav { margin-bottom: 20px; }
    nav a, nav form { display: inline-block; margin-right: 12px; }
    .error { background: #fee; color: #c00; padding: 10px; border-radius: 4px; margin: 10px 0; }
    .form-group { margin: 15px 0; }
    label { display: block; font-weight: bold; margin-bottom: 5px; }
    input[type="text"], input[type="password"], textarea { width: 100%; padding: 8px; box-sizing: border-box; }
    ul.todos li { margin: 8px 0; }
    .important { font-weight: bold; }
    button { padding: 8px 16px; }
"#;

impl View {
    pub fn render(&self, error: Option<&str>) -> String {
        let error_html = error.map_or(String::new(), |e| {
            format!(r#"<div class="error">{}</div>"#, html_escape(e))
        });

        match self {
            View::Home { username } => home_page(username.as_deref(), &error_html),
            View::Login { username } => login_page(username, &error_html),
            View::Signup { username } => signup_page(username, &error_html),
            View::Pending { todos } => pending_page(todos, &error_html),
            View::Completed { todos } => completed_page(todos, &error_html),
            View::CreateTodo { form } => create_page(form, &error_html),
            View::TodoDetail { todo, form } => detail_page(todo, form, &error_html),
            View::NotFound => message_page(
                "Not Found",
                "The page you are looking for does not exist.",
                &error_html,
            ),
            View::MethodNotAllowed => message_page(
                "Method Not Allowed",
                "This action must be submitted with its button.",
                &error_html,
            ),
            View::ServerError => message_page("Server Error", "Please try again later.", &error_html),
        }
    }
}

fn layout(title: &str, signed_in: bool, body: &str) -> String {
    let nav = if signed_in {
        r#"<nav>
            <a href="/todos">Current</a>
            <a href="/todos/completed">Completed</a>
            <a href="/todos/create">Create</a>
            <form method="POST" action="/logout"><button type="submit">Logout</button></form>
        </nav>"#
    } else {
        r#"<nav>
            <a href="/">Home</a>
            <a href="/signup">Sign Up</a>
            <a href="/login">Login</a>
        </nav>"#
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Todo - {title}</title>
    <style>{STYLES}</style>
</head>
<body>
    <div class="container">
        {nav}
        {body}
    </div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn home_page(username: Option<&str>, error_html: &str) -> String {
    let body = match username {
        Some(name) => format!(
            r#"<h1>Welcome back, {}</h1>{error_html}<p><a href="/todos">See your current todos</a></p>"#,
            html_escape(name)
        ),
        None => format!(
            r#"<h1>Todo</h1>{error_html}<p>Keep track of what you need to do.</p>
            <p><a href="/signup">Sign up</a> or <a href="/login">log in</a> to get started.</p>"#
        ),
    };
    layout("Home", username.is_some(), &body)
}

fn login_page(username: &str, error_html: &str) -> String {
    let body = format!(
        r#"<h1>Login</h1>
        {error_html}
        <form method="POST" action="/login">
            <div class="form-group">
                <label for="username">Username:</label>
                <input type="text" id="username" name="username" value="{}" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">Password:</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button type="submit">Login</button>
        </form>"#,
        html_escape(username)
    );
    layout("Login", false, &body)
}

fn signup_page(username: &str, error_html: &str) -> String {
    let body = format!(
        r#"<h1>Sign Up</h1>
        {error_html}
        <form method="POST" action="/signup">
            <div class="form-group">
                <label for="username">Username:</label>
                <input type="text" id="username" name="username" value="{}" required autofocus>
            </div>
            <div class="form-group">
                <label for="password1">Password:</label>
                <input type="password" id="password1" name="password1" required>
            </div>
            <div class="form-group">
                <label for="password2">Password confirmation:</label>
                <input type="password" id="password2" name="password2" required>
            </div>
            <button type="submit">Sign Up</button>
        </form>"#,
        html_escape(username)
    );
    layout("Sign Up", false, &body)
}

fn todo_item(todo: &Todo) -> String {
    let class = if todo.important { r#" class="important""# } else { "" };
    let memo = if todo.memo.is_empty() {
        String::new()
    } else {
        format!(" - {}", html_escape(&todo.memo))
    };
    format!(
        r#"<li{class}><a href="/todos/{}">{}</a>{memo}</li>"#,
        todo.id,
        html_escape(&todo.title)
    )
}

fn pending_page(todos: &[Todo], error_html: &str) -> String {
    let list = if todos.is_empty() {
        r#"<p>Looks like you don't have any todos! <a href="/todos/create">Create one</a>.</p>"#
            .to_string()
    } else {
        let items: String = todos.iter().map(todo_item).collect();
        format!(r#"<ul class="todos">{items}</ul>"#)
    };
    let body = format!(r#"<h1>Current Todos ({})</h1>{error_html}{list}"#, todos.len());
    layout("Current Todos", true, &body)
}

fn completed_page(todos: &[Todo], error_html: &str) -> String {
    let list = if todos.is_empty() {
        "<p>You haven't completed any todos yet.</p>".to_string()
    } else {
        let items: String = todos
            .iter()
            .map(|todo| {
                let completed = todo.completed_at.map(format_time).unwrap_or_default();
                format!(
                    r#"<li><a href="/todos/{}">{}</a> - completed {}</li>"#,
                    todo.id,
                    html_escape(&todo.title),
                    completed
                )
            })
            .collect();
        format!(r#"<ul class="todos">{items}</ul>"#)
    };
    let body = format!(r#"<h1>Completed Todos</h1>{error_html}{list}"#);
    layout("Completed Todos", true, &body)
}

fn todo_fields(form: &TodoForm) -> String {
    let checked = if form.is_important() { " checked" } else { "" };
    format!(
        r#"<div class="form-group">
                <label for="title">Title:</label>
                <input type="text" id="title" name="title" maxlength="{TITLE_MAX_CHARS}" value="{}" required>
            </div>
            <div class="form-group">
                <label for="memo">Memo:</label>
                <textarea id="memo" name="memo" rows="4">{}</textarea>
            </div>
            <div class="form-group">
                <label><input type="checkbox" name="important"{checked}> Important</label>
            </div>"#,
        html_escape(&form.title),
        html_escape(&form.memo)
    )
}

fn create_page(form: &TodoForm, error_html: &str) -> String {
    let body = format!(
        r#"<h1>Create Todo</h1>
        {error_html}
        <form method="POST" action="/todos/create">
            {}
            <button type="submit">Save</button>
        </form>"#,
        todo_fields(form)
    );
    layout("Create Todo", true, &body)
}

fn detail_page(todo: &Todo, form: &TodoForm, error_html: &str) -> String {
    let status = match todo.completed_at {
        Some(at) => format!("<p>Completed {}</p>", format_time(at)),
        None => format!(
            r#"<form method="POST" action="/todos/{}/complete"><button type="submit">Complete</button></form>"#,
            todo.id
        ),
    };
    let body = format!(
        r#"<h1>{}</h1>
        <p>Created {}</p>
        {error_html}
        <form method="POST" action="/todos/{id}">
            {}
            <button type="submit">Save</button>
        </form>
        {status}
        <form method="POST" action="/todos/{id}/delete"><button type="submit">Delete</button></form>"#,
        html_escape(&todo.title),
        format_time(todo.created_at),
        todo_fields(form),
        id = todo.id,
    );
    layout("Todo", true, &body)
}

fn message_page(title: &str, message: &str, error_html: &str) -> String {
    let body = format!(
        r#"<h1>{}</h1>{error_html}<p>{}</p><p><a href="/">Back to home</a></p>"#,
        html_escape(title),
        html_escape(message)
    );
    layout(title, false, &body)
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
