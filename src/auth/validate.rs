//! Client-side field validation. Errors here never reach the network.

use super::types::{Credentials, LoginCredentials, RegistrationDetails};
use crate::session::Role;
use regex::Regex;
use std::{collections::BTreeMap, fmt};

/// Symbols accepted (and one required) by the password policy.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Invalid email format.";
pub const PASSWORD_REQUIRED: &str = "Password is required.";
pub const PASSWORD_WEAK: &str = "Password must be at least 8 characters long, contain an uppercase letter, a lowercase letter, a number, and a special character.";
pub const FIRST_NAME_REQUIRED: &str = "First name is required.";
pub const LAST_NAME_REQUIRED: &str = "Last name is required.";
pub const ROLE_NOT_ALLOWED: &str = "Role must be student or hr.";

/// Form fields that can carry a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    Role,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Per-field messages, ordered by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub(crate) fn insert(&mut self, field: Field, message: &str) {
        self.fields.insert(field, message.to_string());
    }

    pub(crate) fn clear_field(&mut self, field: Field) {
        self.fields.remove(&field);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                formatter.write_str("; ")?;
            }
            write!(formatter, "{field}: {message}")?;
        }
        Ok(())
    }
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_ok_and(|re| re.is_match(email))
}

/// At least eight characters from letters, digits and [`PASSWORD_SYMBOLS`], with
/// one of each class present.
#[must_use]
pub fn strong_password(password: &str) -> bool {
    let charset = Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,}$").is_ok_and(|re| re.is_match(password));

    charset
        && password.chars().any(|ch| ch.is_ascii_lowercase())
        && password.chars().any(|ch| ch.is_ascii_uppercase())
        && password.chars().any(|ch| ch.is_ascii_digit())
        && password.chars().any(|ch| PASSWORD_SYMBOLS.contains(ch))
}

fn check_email(email: &str, errors: &mut ValidationErrors) {
    let email = email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, EMAIL_REQUIRED);
    } else if !valid_email(email) {
        errors.insert(Field::Email, EMAIL_INVALID);
    }
}

fn check_password(password: &str, errors: &mut ValidationErrors) {
    if password.trim().is_empty() {
        errors.insert(Field::Password, PASSWORD_REQUIRED);
    } else if !strong_password(password) {
        errors.insert(Field::Password, PASSWORD_WEAK);
    }
}

#[must_use]
pub fn validate_login(credentials: &LoginCredentials) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    check_email(&credentials.email, &mut errors);
    check_password(&credentials.password, &mut errors);
    errors
}

#[must_use]
pub fn validate_registration(details: &RegistrationDetails) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if details.first_name.trim().is_empty() {
        errors.insert(Field::FirstName, FIRST_NAME_REQUIRED);
    }
    if details.last_name.trim().is_empty() {
        errors.insert(Field::LastName, LAST_NAME_REQUIRED);
    }
    check_email(&details.email, &mut errors);
    check_password(&details.password, &mut errors);
    if !matches!(details.role, Role::Student | Role::Hr) {
        errors.insert(Field::Role, ROLE_NOT_ALLOWED);
    }
    errors
}

#[must_use]
pub fn validate(credentials: &Credentials) -> ValidationErrors {
    match credentials {
        Credentials::Login(credentials) => validate_login(credentials),
        Credentials::Register(details) => validate_registration(details),
    }
}
