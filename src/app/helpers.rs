use actix_web::HttpRequest;
use crate::utils::text_utils;
use super::dtos::RegisterForm;
use super::error::Error;

// Extractor failures (bad path ids, broken JSON, wrong
// query strings) all end up as a 400 with a JSON detail.
pub fn extractor_error<E: std::fmt::Display>(
  err: E,
  _req: &HttpRequest
) -> actix_web::Error {
  Error::BadRequest(format!("Invalid request - {}", err)).into()
}

pub fn validate_registration(
  form: &RegisterForm,
  min_password_length: usize
) -> Result<(), Error> {
  if form.username.trim().is_empty() {
    return Err(Error::BadRequest(String::from("Username cannot be empty")));
  }
  if !text_utils::is_valid_email(form.email.trim()) {
    return Err(Error::BadRequest(String::from("Invalid email address")));
  }
  if !text_utils::is_long_enough(&form.password, min_password_length) {
    return Err(Error::BadRequest(format!(
      "Password must be at least {} characters long",
      min_password_length
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(username: &str, email: &str, password: &str) -> RegisterForm {
    RegisterForm {
      username: username.to_string(),
      email: email.to_string(),
      password: password.to_string()
    }
  }

  #[test]
  fn valid_registration() {
    assert!(validate_registration(&form("alice", "a@x.com", "pw1"), 1).is_ok());
  }

  #[test]
  fn blank_username_is_rejected() {
    let result = validate_registration(&form("  ", "a@x.com", "pw1"), 1);
    assert!(matches!(result, Err(Error::BadRequest(_))));
  }

  #[test]
  fn bad_email_is_rejected() {
    let result = validate_registration(&form("alice", "alice", "pw1"), 1);
    assert!(matches!(result, Err(Error::BadRequest(_))));
  }

  #[test]
  fn short_password_is_rejected() {
    let result = validate_registration(&form("alice", "a@x.com", "pw1"), 8);
    assert!(matches!(result, Err(Error::BadRequest(_))));
  }
}
