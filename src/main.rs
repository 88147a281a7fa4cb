mod app;
mod config;
mod db;
mod utils;

use color_eyre::Result;
use dotenv::dotenv;
use env_logger::Env;

#[actix_web::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  // A missing .env file is fine, the environment
  // could have everything already.
  dotenv().ok();
  env_logger::Builder::from_env(Env::default().default_filter_or("info"))
    .init();

  app::run().await
}
