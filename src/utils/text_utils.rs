use regex::Regex;
use lazy_static::lazy_static;

// Not trying to be RFC 5322 compliant, just making
// sure it looks like local@domain.tld.
pub fn is_valid_email(email: &str) -> bool {
  lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
      r"^[^@\s]+@[^@\s]+\.[^@\s]+$"
    ).unwrap();
  }
  EMAIL_REGEX.is_match(email)
}

// Password length is counted in chars, not bytes.
pub fn is_long_enough(value: &str, min_length: usize) -> bool {
  value.chars().count() >= min_length
}
