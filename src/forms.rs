//! Form payloads and their validation.
//!
//! Every form deserializes leniently (missing fields become empty strings) so
//! that a bad submission reaches validation and gets re-rendered with a
//! message instead of being rejected by the extractor.

use serde::Deserialize;

use crate::database::{Todo, TodoInput};
use crate::error::TodoError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const USERNAME_MAX_CHARS: usize = 150;

const REQUIRED: &str = "This field is required.";

/// A single invalid field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TodoForm {
    pub title: String,
    pub memo: String,
    /// HTML checkbox: present when ticked
    pub important: Option<String>,
}

impl TodoForm {
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            memo: todo.memo.clone(),
            important: todo.important.then(|| "on".to_string()),
        }
    }

    pub fn is_important(&self) -> bool {
        self.important.is_some()
    }

    pub fn validate(&self) -> Result<TodoInput, FieldError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FieldError::new("title", REQUIRED));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(FieldError::new(
                "title",
                format!("Ensure this value has at most {} characters.", TITLE_MAX_CHARS),
            ));
        }

        Ok(TodoInput {
            title: title.to_string(),
            memo: self.memo.trim().to_string(),
            important: self.is_important(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

/// A validated sign-up request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<NewAccount, TodoError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(FieldError::new("username", REQUIRED).into());
        }
        if username.chars().count() > USERNAME_MAX_CHARS {
            return Err(FieldError::new(
                "username",
                format!("Ensure this value has at most {} characters.", USERNAME_MAX_CHARS),
            )
            .into());
        }
        if self.password1.is_empty() {
            return Err(FieldError::new("password1", REQUIRED).into());
        }
        if self.password2.is_empty() {
            return Err(FieldError::new("password2", REQUIRED).into());
        }
        if self.password1 != self.password2 {
            return Err(TodoError::PasswordMismatch);
        }

        Ok(NewAccount {
            username: username.to_string(),
            password: self.password1.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Blank fields fail the same way a wrong password does.
    pub fn validate(&self) -> Result<(&str, &str), TodoError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(TodoError::InvalidCredentials);
        }
        Ok((username, self.password.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo_form(title: &str) -> TodoForm {
        TodoForm {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn todo_requires_title() {
        let err = todo_form("   ").validate().unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn todo_title_length_is_bounded() {
        assert!(todo_form(&"x".repeat(TITLE_MAX_CHARS)).validate().is_ok());
        let err = todo_form(&"x".repeat(TITLE_MAX_CHARS + 1)).validate().unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn todo_trims_and_reads_checkbox() {
        let form = TodoForm {
            title: "  buy milk ".to_string(),
            memo: " 2 litres ".to_string(),
            important: Some("on".to_string()),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.title, "buy milk");
        assert_eq!(input.memo, "2 litres");
        assert!(input.important);
        assert!(!todo_form("x").validate().unwrap().important);
    }

    #[test]
    fn signup_rejects_mismatch() {
        let form = SignupForm {
            username: "alice".to_string(),
            password1: "pw1".to_string(),
            password2: "pw2".to_string(),
        };
        assert!(matches!(form.validate(), Err(TodoError::PasswordMismatch)));
    }

    #[test]
    fn signup_rejects_empty_fields() {
        let form = SignupForm {
            username: String::new(),
            password1: "pw1".to_string(),
            password2: "pw1".to_string(),
        };
        assert!(matches!(
            form.validate(),
            Err(TodoError::Validation { field: "username", .. })
        ));

        let form = SignupForm {
            username: "alice".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            form.validate(),
            Err(TodoError::Validation { field: "password1", .. })
        ));
    }

    #[test]
    fn signup_accepts_matching_passwords() {
        let form = SignupForm {
            username: " alice ".to_string(),
            password1: "pw1".to_string(),
            password2: "pw1".to_string(),
        };
        let account = form.validate().unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.password, "pw1");
    }

    #[test]
    fn login_blank_fields_are_invalid_credentials() {
        let form = LoginForm {
            username: "alice".to_string(),
            password: String::new(),
        };
        assert!(matches!(form.validate(), Err(TodoError::InvalidCredentials)));
    }
}
