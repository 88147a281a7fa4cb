// Adding the context method to errors:
use eyre::{WrapErr, eyre};
use color_eyre::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  pub bind_address: String,
  pub pool_max_size: u32,
  // Any origin is allowed when this is absent.
  pub cors_allowed_origin: Option<String>,
  pub min_password_length: usize
}

impl Config {

  pub fn from_env() -> Result<Config> {
    // RUST_LOG is handled by env_logger in main.rs.
    // You have to use lowercase when compared to
    // what's in the .env file.
    config::Config::builder()
      .set_default("bind_address", "127.0.0.1:8080")?
      .set_default("pool_max_size", 10)?
      .set_default("min_password_length", 1)?
      .add_source(config::Environment::default().try_parsing(true))
      .build()
      .context("Reading configuration sources")?
      // The error has to be given a context for
      // color_eyre to work here:
      .try_deserialize::<Config>()
      .context("Loading configuration from env")?
      .validate()
  }

  // r2d2 panics on an empty pool, so catch it here.
  fn validate(self) -> Result<Config> {
    if self.pool_max_size == 0 {
      return Err(eyre!("pool_max_size must be greater than 0"));
    }
    Ok(self)
  }

}
