use actix_web::{middleware, web, App, HttpServer};
use actix_cors::Cors;
use color_eyre::Result;
use eyre::WrapErr;
use log::{debug, info};
// I think we have to add crate here because
// of the other crate named "config" that we
// use as a dependency.
use crate::config::Config;
use crate::db::{self, Pool};
mod handlers;
mod dtos;
mod error;
mod helpers;

// Declare app state struct:
pub struct AppState {
  pub pool: Pool,
  pub min_password_length: usize
}

// Function to start the server.
// Configuration is loaded once here and whatever the
// handlers need is moved into AppState.
pub async fn run() -> Result<()> {
  let config = Config::from_env()
    .context("Configuration (environment or .env file) is missing")?;
  debug!("Current config: {:?}", config);

  let pool = db::create_pool(&config.db_path, config.pool_max_size)?;
  db::ensure_schema(&pool)?;

  let bind_address = config.bind_address.clone();
  let cors_allowed_origin = config.cors_allowed_origin.clone();

  let app_state = web::Data::new(
    AppState {
      pool,
      min_password_length: config.min_password_length
    }
  );

  info!("Listening on {}", bind_address);
  HttpServer::new(move || {
    App::new()
      .app_data(app_state.clone())
      .wrap(cors(&cors_allowed_origin))
      .wrap(middleware::Logger::default())
      .configure(endpoints_config)
      .default_service(web::route().to(handlers::not_found))
  })
  .bind(bind_address)?
  .run()
  .await
  .context("Start Actix web server")
}

fn cors(allowed_origin: &Option<String>) -> Cors {
  let cors = match allowed_origin {
    Some(origin) => Cors::default().allowed_origin(origin),
    None => Cors::default().allow_any_origin()
  };
  cors.allowed_methods(vec!["GET", "POST"])
    .allow_any_header()
    .max_age(3600)
}

// Route configuration, extractor error handlers included:
fn endpoints_config(cfg: &mut web::ServiceConfig) {
  cfg.app_data(web::PathConfig::default().error_handler(helpers::extractor_error))
    .app_data(web::QueryConfig::default().error_handler(helpers::extractor_error))
    .app_data(web::JsonConfig::default().error_handler(helpers::extractor_error))
    .route("/", web::get().to(handlers::index))
    .route("/users/register", web::post().to(handlers::register_user))
    .route("/users/login", web::post().to(handlers::login_user))
    .route("/users/{user_id}", web::get().to(handlers::user_profile))
    .route("/stories/add", web::post().to(handlers::add_story))
    .route("/stories", web::get().to(handlers::all_stories))
    .route("/stories/{story_id}/comment", web::post().to(handlers::add_comment))
    .route("/stories/{story_id}/comments", web::get().to(handlers::story_comments))
    .route("/stories/{story_id}/like", web::post().to(handlers::like_story))
    .route("/stories/{story_id}/likes", web::get().to(handlers::story_likes))
    .route("/categories", web::get().to(handlers::categories));
}
