use actix_web::{
  web,
  HttpResponse,
  Result
};
use crate::db::{self, InsertOutcome};
use crate::db::entities::*;
use crate::utils::password;
use log::{error, info, warn};
use super::dtos::*;
use super::error::{Error, map_db_error};
use super::AppState;
use super::helpers;

// Module with all the API handler functions.
// None of them check who's calling: author_id and
// user_id are taken from the request as they are.

pub async fn index() -> HttpResponse {
  HttpResponse::Ok().body("Nothing here")
}

// Default response when no route matched the request:
pub async fn not_found() -> Result<HttpResponse, Error> {
  Err(Error::NotFound(String::from("Endpoint doesn't exist")))
}

/* --- Users --- */

pub async fn register_user(
  app_state: web::Data<AppState>,
  form: web::Json<RegisterForm>
) -> Result<HttpResponse, Error> {
  let form = form.into_inner();
  helpers::validate_registration(&form, app_state.min_password_length)?;
  let plain_password = form.password.clone();
  let mut user: User = form.into();

  // Check first so that we don't hash for nothing:
  if db::user_exists(&app_state.pool, &user.username, &user.email)
    .map_err(map_db_error)? {
    return Err(Error::Conflict(
      String::from("Username or email already registered.")
    ));
  }

  // Argon2 is CPU heavy, keep it off the worker threads.
  let password_hash = web::block(move || password::hash_password(&plain_password))
    .await
    .map_err(|e| Error::InternalServerError(e.to_string()))?
    .map_err(|e| Error::InternalServerError(e.to_string()))?;

  match db::insert_user(&app_state.pool, &mut user, &password_hash)
    .map_err(map_db_error)? {
    InsertOutcome::Inserted => {
      info!("Registered user {} with id {}", user.username, user.id);
      Ok(HttpResponse::Ok().json(UserDto::from(user)))
    },
    // Someone registered the same name in between.
    InsertOutcome::Duplicate => Err(Error::Conflict(
      String::from("Username or email already registered.")
    ))
  }
}

// Gives the user id back when the password matches.
fn check_password(plain_password: &str, credentials: Credentials) -> Option<i64> {
  match password::verify_password(plain_password, &credentials.password_hash) {
    Ok(true) => Some(credentials.user_id),
    Ok(false) => None,
    Err(e) => {
      error!(
        "Stored password hash for user {} is unusable - {}",
        credentials.user_id, e
      );
      None
    }
  }
}

// Credentials can come from the query string or from a
// JSON body. The query string has precedence.
pub async fn login_user(
  app_state: web::Data<AppState>,
  query: web::Query<LoginForm>,
  body: Option<web::Json<LoginForm>>
) -> Result<HttpResponse, Error> {
  let form = query.into_inner()
    .or(body.map(web::Json::into_inner).unwrap_or_default());
  let (username, plain_password) = match (form.username, form.password) {
    (Some(username), Some(plain_password)) => (username, plain_password),
    _ => return Err(Error::BadRequest(
      String::from("username and password are required")
    ))
  };

  // Usernames are stored trimmed.
  let username = username.trim().to_string();

  let credentials = db::credentials_by_username(&app_state.pool, &username)
    .map_err(map_db_error)?;
  let user_id = match credentials {
    Some(c) => web::block(move || check_password(&plain_password, c))
      .await
      .map_err(|e| Error::InternalServerError(e.to_string()))?,
    None => None
  };

  match user_id {
    Some(user_id) => Ok(HttpResponse::Ok().json(LoginResponse::success(user_id))),
    None => {
      warn!("Failed login attempt for username {}", username);
      Err(Error::Unauthorized(String::from("Invalid username or password")))
    }
  }
}

// Path variables have to be in a tuple.
pub async fn user_profile(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let user_id = path.into_inner().0;
  match db::user_by_id(&app_state.pool, user_id).map_err(map_db_error)? {
    Some(user) => Ok(HttpResponse::Ok().json(UserDto::from(user))),
    None => Err(Error::NotFound(String::from("User not found")))
  }
}

/* --- Stories --- */

pub async fn add_story(
  app_state: web::Data<AppState>,
  form: web::Json<StoryForm>
) -> Result<HttpResponse, Error> {
  let mut story: Story = form.into_inner().into();
  db::insert_story(&app_state.pool, &mut story)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(StoryDto::from(story)))
}

pub async fn all_stories(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let stories: Vec<StoryDto> = db::all_stories(&app_state.pool)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(stories))
}

pub async fn add_comment(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>,
  form: web::Json<CommentForm>
) -> Result<HttpResponse, Error> {
  let story_id = path.into_inner().0;
  let mut comment = form.into_inner().into_comment(story_id);
  db::insert_comment(&app_state.pool, &mut comment)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(CommentDto::from(comment)))
}

pub async fn story_comments(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let story_id = path.into_inner().0;
  let comments: Vec<CommentDto> = db::comments_for_story(&app_state.pool, story_id)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(comments))
}

pub async fn like_story(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>,
  form: web::Json<LikeForm>
) -> Result<HttpResponse, Error> {
  let story_id = path.into_inner().0;
  let mut like = form.into_inner().into_like(story_id);
  match db::insert_like(&app_state.pool, &mut like).map_err(map_db_error)? {
    InsertOutcome::Inserted => Ok(HttpResponse::Ok().json(LikeDto::from(like))),
    InsertOutcome::Duplicate => {
      info!("User {} tried to like story {} twice", like.user_id, story_id);
      Err(Error::Conflict(String::from("User already liked this story")))
    }
  }
}

// Live count from the likes table, not the counter
// stored with the story.
pub async fn story_likes(
  app_state: web::Data<AppState>,
  path: web::Path<(i64,)>
) -> Result<HttpResponse, Error> {
  let story_id = path.into_inner().0;
  let likes_count = db::like_count(&app_state.pool, story_id)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(LikesCountDto { likes_count }))
}

/* --- Categories --- */

pub async fn categories(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let categories: Vec<CategoryDto> = db::all_categories(&app_state.pool)
    .map_err(map_db_error)?;
  Ok(HttpResponse::Ok().json(categories))
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{test, App, http::StatusCode};
  use serde_json::{json, Value};
  use crate::db::tests::memory_pool;

  // Same layout as the real server minus the middlewares.
  macro_rules! test_app {
    () => {
      test::init_service(
        App::new()
          .app_data(web::Data::new(AppState {
            pool: memory_pool(),
            min_password_length: 1
          }))
          .configure(crate::app::endpoints_config)
          .default_service(web::route().to(not_found))
      ).await
    };
  }

  fn register_request(username: &str, email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
      .uri("/users/register")
      .set_json(json!({"username": username, "email": email, "password": password}))
  }

  #[actix_web::test]
  async fn register_then_login() {
    let app = test_app!();
    let resp = test::call_service(&app, register_request("alice", "a@x.com", "pw1").to_request()).await;
    assert_eq!(StatusCode::OK, resp.status());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(json!({"id": 1, "username": "alice", "email": "a@x.com"}), body);

    let req = test::TestRequest::post()
      .uri("/users/login?username=alice&password=pw1")
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json!({"message": "Login successful", "user_id": 1}), body);

    let req = test::TestRequest::post()
      .uri("/users/login?username=alice&password=wrong")
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::UNAUTHORIZED, resp.status());
  }

  #[actix_web::test]
  async fn login_with_json_body() {
    let app = test_app!();
    test::call_service(&app, register_request("alice", "a@x.com", "pw1").to_request()).await;
    let req = test::TestRequest::post()
      .uri("/users/login")
      .set_json(json!({"username": "alice", "password": "pw1"}))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(1, body["user_id"]);
  }

  #[actix_web::test]
  async fn login_matches_trimmed_username() {
    let app = test_app!();
    let resp = test::call_service(&app, register_request(" alice ", "a@x.com", "pw1").to_request()).await;
    assert_eq!(StatusCode::OK, resp.status());
    let req = test::TestRequest::post()
      .uri("/users/login")
      .set_json(json!({"username": " alice ", "password": "pw1"}))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(1, body["user_id"]);
  }

  #[actix_web::test]
  async fn login_unknown_user_or_missing_fields() {
    let app = test_app!();
    let req = test::TestRequest::post()
      .uri("/users/login?username=ghost&password=pw1")
      .to_request();
    assert_eq!(StatusCode::UNAUTHORIZED, test::call_service(&app, req).await.status());
    let req = test::TestRequest::post()
      .uri("/users/login?username=ghost")
      .to_request();
    assert_eq!(StatusCode::BAD_REQUEST, test::call_service(&app, req).await.status());
  }

  #[actix_web::test]
  async fn duplicate_username_or_email_conflicts() {
    let app = test_app!();
    let first = test::call_service(&app, register_request("alice", "a@x.com", "pw1").to_request()).await;
    assert_eq!(StatusCode::OK, first.status());
    let same_name = test::call_service(&app, register_request("alice", "b@x.com", "pw2").to_request()).await;
    assert_eq!(StatusCode::BAD_REQUEST, same_name.status());
    let body: Value = test::read_body_json(same_name).await;
    assert_eq!("Username or email already registered.", body["detail"]);
    let same_email = test::call_service(&app, register_request("bob", "a@x.com", "pw2").to_request()).await;
    assert_eq!(StatusCode::BAD_REQUEST, same_email.status());
  }

  #[actix_web::test]
  async fn invalid_registration_is_rejected() {
    let app = test_app!();
    let resp = test::call_service(&app, register_request("alice", "not-an-email", "pw1").to_request()).await;
    assert_eq!(StatusCode::BAD_REQUEST, resp.status());
    let req = test::TestRequest::post()
      .uri("/users/register")
      .set_json(json!({"username": "alice"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::BAD_REQUEST, resp.status());
  }

  #[actix_web::test]
  async fn user_profile_found_and_missing() {
    let app = test_app!();
    test::call_service(&app, register_request("alice", "a@x.com", "pw1").to_request()).await;
    let req = test::TestRequest::get().uri("/users/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!("alice", body["username"]);
    assert!(body.get("password").is_none());

    let req = test::TestRequest::get().uri("/users/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::NOT_FOUND, resp.status());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!("User not found", body["detail"]);

    let req = test::TestRequest::get().uri("/users/abc").to_request();
    assert_eq!(StatusCode::BAD_REQUEST, test::call_service(&app, req).await.status());
  }

  #[actix_web::test]
  async fn story_like_flow() {
    let app = test_app!();
    let req = test::TestRequest::post()
      .uri("/stories/add")
      .set_json(json!({"title": "T", "content": "C", "author_id": 1, "category_id": 1}))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(1, body["id"]);
    assert_eq!(0, body["likes"]);

    let like = || test::TestRequest::post()
      .uri("/stories/1/like")
      .set_json(json!({"user_id": 1}))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, like()).await;
    assert_eq!(json!({"id": 1, "story_id": 1, "user_id": 1}), body);
    let resp = test::call_service(&app, like()).await;
    assert_eq!(StatusCode::BAD_REQUEST, resp.status());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!("User already liked this story", body["detail"]);

    let req = test::TestRequest::get().uri("/stories/1/likes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json!({"likes_count": 1}), body);

    let req = test::TestRequest::get().uri("/stories").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(1, body[0]["likes"]);
    assert_eq!("T", body[0]["title"]);
  }

  #[actix_web::test]
  async fn comment_then_list() {
    let app = test_app!();
    let req = test::TestRequest::post()
      .uri("/stories/3/comment")
      .set_json(json!({"user_id": 2, "content": "Great read"}))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json!({"id": 1, "story_id": 3, "user_id": 2, "content": "Great read"}), body);

    let req = test::TestRequest::get().uri("/stories/3/comments").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(1, body.as_array().unwrap().len());
    assert_eq!("Great read", body[0]["content"]);

    let req = test::TestRequest::get().uri("/stories/4/comments").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
  }

  #[actix_web::test]
  async fn unknown_ids_are_accepted_on_empty_database() {
    let app = test_app!();
    let req = test::TestRequest::post()
      .uri("/stories/add")
      .set_json(json!({"title": "T", "content": "C", "author_id": 41, "category_id": 42}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(StatusCode::OK, resp.status());

    let req = test::TestRequest::post()
      .uri("/stories/7/comment")
      .set_json(json!({"user_id": 9, "content": "hello"}))
      .to_request();
    assert_eq!(StatusCode::OK, test::call_service(&app, req).await.status());

    let req = test::TestRequest::post()
      .uri("/stories/7/like")
      .set_json(json!({"user_id": 9}))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json!({"id": 1, "story_id": 7, "user_id": 9}), body);

    let req = test::TestRequest::get().uri("/stories/7/likes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json!({"likes_count": 1}), body);
  }

  #[actix_web::test]
  async fn empty_category_list_and_unknown_route() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/categories").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json!([]), body);
    let req = test::TestRequest::get().uri("/nowhere").to_request();
    assert_eq!(StatusCode::NOT_FOUND, test::call_service(&app, req).await.status());
  }
}
