//! # Record Validation
//!
//! Turns a `NewCliente` into a complete `Cliente`, enforcing the required
//! fields, the mail pattern and the uniqueness rules against the records
//! already in the collection.
//!
//! Only creation goes through here. Updates are merged without re-validation
//! in every store, so a record can be moved into a state `create` would have
//! refused.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::{Cliente, NewCliente};
use thiserror::Error;
use uuid::Uuid;

static MAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("mail pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("mail must be a valid address: {0}")]
    InvalidMail(String),
    #[error("a cliente with id {0} already exists")]
    DuplicateId(String),
    #[error("a cliente with dni {0} already exists")]
    DuplicateDni(i64),
    #[error("a cliente with userID {0} already exists")]
    DuplicateUserId(String),
}

/// Check a mail address against the basic `user@host.tld` shape
pub fn is_valid_mail(mail: &str) -> bool {
    MAIL_PATTERN.is_match(mail)
}

/// Generate a fresh record id
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Id a new record is stored under: the caller's id without surrounding
/// whitespace, or a fresh one when absent or blank
pub fn assign_id(id: Option<String>) -> String {
    non_blank(id).unwrap_or_else(generate_id)
}

/// Build a validated record from creation input.
///
/// `existing` is the current collection, used for the uniqueness checks on
/// `id`, `dni` and `userID`.
pub fn build_cliente(new: NewCliente, existing: &[Cliente]) -> Result<Cliente, ValidationError> {
    let id = assign_id(new.id);
    let nombre = required_text(new.nombre, "nombre")?;
    let apellido = required_text(new.apellido, "apellido")?;
    let dni = new.dni.ok_or(ValidationError::MissingField("dni"))?;
    let telefono = new.telefono.ok_or(ValidationError::MissingField("telefono"))?;
    let mail = required_text(new.mail, "mail")?;
    let domicilio = required_text(new.domicilio, "domicilio")?;

    if !is_valid_mail(&mail) {
        return Err(ValidationError::InvalidMail(mail));
    }

    let e_civil = non_blank(new.e_civil);
    let user_id = non_blank(new.user_id);

    if existing.iter().any(|c| c.id == id) {
        return Err(ValidationError::DuplicateId(id));
    }
    if existing.iter().any(|c| c.dni == dni) {
        return Err(ValidationError::DuplicateDni(dni));
    }
    if let Some(user_id) = &user_id {
        if existing.iter().any(|c| c.user_id.as_ref() == Some(user_id)) {
            return Err(ValidationError::DuplicateUserId(user_id.clone()));
        }
    }

    Ok(Cliente {
        id,
        nombre,
        apellido,
        dni,
        telefono,
        mail,
        domicilio,
        nacimiento: new.nacimiento,
        e_civil,
        user_id,
        inventario: new.inventario.unwrap_or_default(),
    })
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    non_blank(value).ok_or(ValidationError::MissingField(field))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
