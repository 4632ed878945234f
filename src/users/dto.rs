use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ApiError, FieldError};
use crate::users::repo::User;

/// Create shape: all fields required. Deserialized as `Option` so that
/// missing fields land in the aggregated 400 list instead of a decode error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Update shape: all fields optional; only supplied fields are checked and
/// applied. Unrecognized fields are rejected at decode time.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Проверенные поля для создания пользователя.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub email: String,
}

/// Проверенные поля частичного обновления: только то, что прислали.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserOut {
    #[serde(rename = "ID-пользователя")]
    pub id: i32,
    #[serde(rename = "имя")]
    pub name: String,
    pub email: String,
    #[serde(rename = "дата регистрации", with = "time::serde::rfc3339")]
    pub reg_time: OffsetDateTime,
}

impl From<User> for UserOut {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            reg_time: u.reg_time,
        }
    }
}

const REQUIRED: &str = "обязательное поле";

fn check_name(val: &str) -> Option<String> {
    if val.chars().count() > 30 {
        return Some("длина не должна превышать 30 символов".into());
    }
    None
}

fn check_password(val: &str) -> Option<String> {
    if val.chars().count() < 4 {
        Some("Пароль слишков короткий".into())
    } else if !val.chars().any(|c| c.is_ascii_digit()) {
        Some("В пароле должна содержаться хотя бы одна цифра".into())
    } else if !val.chars().any(|c| c.is_alphabetic()) {
        Some("В пароле должна содержаться хотя бы одна буква".into())
    } else if !val.chars().any(|c| c.is_uppercase()) {
        Some("В пароле должна содержаться хотя бы одна буква в верхнем регистре".into())
    } else if val.chars().count() > 20 {
        Some("длина не должна превышать 20 символов".into())
    } else {
        None
    }
}

fn check_email(val: &str) -> Option<String> {
    // намеренно слабая проверка, как в исходном сервисе
    if !val.contains('@') || !val.contains('.') {
        Some("Не правильный формат адреса электронной почты".into())
    } else if val.chars().count() > 50 {
        Some("длина не должна превышать 50 символов".into())
    } else {
        None
    }
}

fn validated(
    field: &'static str,
    value: Option<String>,
    check: fn(&str) -> Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None => {
            errors.push(FieldError {
                field,
                message: REQUIRED.into(),
            });
            None
        }
        Some(v) => {
            if let Some(message) = check(&v) {
                errors.push(FieldError { field, message });
            }
            Some(v)
        }
    }
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let mut errors = Vec::new();
        let name = validated("name", self.name, check_name, &mut errors);
        let password = validated("password", self.password, check_password, &mut errors);
        let email = validated("email", self.email, check_email, &mut errors);

        match (name, password, email) {
            (Some(name), Some(password), Some(email)) if errors.is_empty() => Ok(NewUser {
                name,
                password,
                email,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserPatch, ApiError> {
        let mut errors = Vec::new();
        if let Some(v) = &self.name {
            if let Some(message) = check_name(v) {
                errors.push(FieldError {
                    field: "name",
                    message,
                });
            }
        }
        if let Some(v) = &self.password {
            if let Some(message) = check_password(v) {
                errors.push(FieldError {
                    field: "password",
                    message,
                });
            }
        }
        if let Some(v) = &self.email {
            if let Some(message) = check_email(v) {
                errors.push(FieldError {
                    field: "email",
                    message,
                });
            }
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(UserPatch {
            name: self.name,
            password: self.password,
            email: self.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(name: &str, password: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: Some(name.into()),
            password: Some(password.into()),
            email: Some(email.into()),
        }
    }

    fn violations(err: ApiError) -> Vec<FieldError> {
        match err {
            ApiError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_create_request_passes() {
        let new_user = create_req("Ann", "Abc123", "a@b.com").validate().unwrap();
        assert_eq!(new_user.name, "Ann");
        assert_eq!(new_user.email, "a@b.com");
    }

    #[test]
    fn short_password_is_rejected() {
        let errors = violations(create_req("Ann", "A1c", "a@b.com").validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
        assert!(errors[0].message.contains("короткий"));
    }

    #[test]
    fn password_without_digit_is_rejected() {
        let errors = violations(create_req("Ann", "Abcdef", "a@b.com").validate().unwrap_err());
        assert!(errors[0].message.contains("цифра"));
    }

    #[test]
    fn password_without_letter_is_rejected() {
        let errors = violations(create_req("Ann", "123456", "a@b.com").validate().unwrap_err());
        assert!(errors[0].message.contains("буква"));
    }

    #[test]
    fn password_without_uppercase_is_rejected() {
        let errors = violations(create_req("Ann", "abc123", "a@b.com").validate().unwrap_err());
        assert!(errors[0].message.contains("верхнем регистре"));
    }

    #[test]
    fn email_without_at_or_dot_is_rejected() {
        let errors = violations(create_req("Ann", "Abc123", "ab.com").validate().unwrap_err());
        assert_eq!(errors[0].field, "email");

        let errors = violations(create_req("Ann", "Abc123", "a@bcom").validate().unwrap_err());
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn all_violations_are_aggregated() {
        let errors = violations(create_req("Ann", "abc", "bad").validate().unwrap_err());
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["password", "email"]);
    }

    #[test]
    fn missing_fields_are_listed_as_required() {
        let req = CreateUserRequest {
            name: None,
            password: None,
            email: None,
        };
        let errors = violations(req.validate().unwrap_err());
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.message == REQUIRED));
    }

    #[test]
    fn update_keeps_only_supplied_fields() {
        let req = UpdateUserRequest {
            name: Some("Боб".into()),
            ..Default::default()
        };
        let patch = req.validate().unwrap();
        assert_eq!(patch.name.as_deref(), Some("Боб"));
        assert!(patch.password.is_none());
        assert!(patch.email.is_none());
    }

    #[test]
    fn update_validates_supplied_password() {
        let req = UpdateUserRequest {
            password: Some("ab".into()),
            ..Default::default()
        };
        let errors = violations(req.validate().unwrap_err());
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn empty_update_is_allowed() {
        let patch = UpdateUserRequest::default().validate().unwrap();
        assert!(patch.name.is_none() && patch.password.is_none() && patch.email.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected_at_decode() {
        let result: Result<UpdateUserRequest, _> =
            serde_json::from_value(serde_json::json!({ "header": "nope" }));
        assert!(result.is_err());
    }

    #[test]
    fn user_out_uses_original_labels() {
        let out = UserOut {
            id: 1,
            name: "Ann".into(),
            email: "a@b.com".into(),
            reg_time: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["ID-пользователя"], 1);
        assert_eq!(json["имя"], "Ann");
        assert_eq!(json["email"], "a@b.com");
        assert!(json["дата регистрации"].as_str().unwrap().starts_with("1970"));
        assert!(json.get("password").is_none());
    }
}
