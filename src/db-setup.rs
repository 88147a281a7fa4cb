#![allow(dead_code)]
mod config;
mod db;

use std::env;
use color_eyre::Result;
use eyre::WrapErr;
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};
use getopts::Options;
use crate::config::Config;
use crate::db::{InsertOutcome, Pool};
use crate::db::entities::Category;

fn print_usage(program: &str, opts: Options) {
  let brief = format!("Usage: {} [options]", program);
  print!("{}", opts.usage(&brief));
}

// Existing names are skipped, not treated as errors.
fn add_categories(pool: &Pool, names: &[String]) -> Result<usize> {
  let mut added = 0;
  for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
    let mut category = Category { id: -1, name: name.to_string() };
    match db::insert_category(pool, &mut category)? {
      InsertOutcome::Inserted => {
        info!("Added category {} with id {}", category.name, category.id);
        added += 1;
      },
      InsertOutcome::Duplicate => warn!("Category {} already exists", category.name)
    }
  }
  Ok(added)
}

/**
 * Creates the database schema if needed and
 * optionally seeds categories.
 */
fn main() -> Result<()> {
  dotenv().ok();
  env_logger::Builder::from_env(Env::default().default_filter_or("info"))
    .init();

  let args: Vec<String> = env::args().collect();
  let program = args[0].clone();
  let mut opts = Options::new();
  opts.optmulti("c", "category", "Add a story category (repeatable)", "NAME");
  opts.optflag("h", "help", "Program usage");
  let opt_matches = opts.parse(&args[1..])?;
  if opt_matches.opt_present("h") {
    print_usage(&program, opts);
    return Ok(());
  }

  let config = Config::from_env()
    .context("Configuration (environment or .env file) is missing")?;
  let pool = db::create_pool(&config.db_path, 1)?;
  db::ensure_schema(&pool)?;
  info!("Schema ready in {}", config.db_path);

  let added = add_categories(&pool, &opt_matches.opt_strs("c"))?;
  for category in db::all_categories(&pool)? {
    println!("{}\t{}", category.id, category.name);
  }
  info!("{} new categories", added);

  Ok(())
}
