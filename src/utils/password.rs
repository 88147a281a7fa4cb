use argon2::{
  password_hash::{PasswordHasher, SaltString},
  Argon2, PasswordHash, PasswordVerifier
};
use color_eyre::Result;
use eyre::eyre;
use rand::rngs::OsRng;

/// Hash a password with Argon2 and a random salt.
/// The PHC string that comes out carries the salt and
/// parameters and is what goes into the users table.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| eyre!("Failed to hash password - {}", e))?;
  Ok(hash.to_string())
}

/// Ok(false) for a wrong password, Err when the stored
/// hash can't be parsed at all.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
  let parsed = PasswordHash::new(hash)
    .map_err(|e| eyre!("Invalid password hash format - {}", e))?;
  Ok(
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  )
}
