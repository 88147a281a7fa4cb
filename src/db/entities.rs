use serde::{Deserialize, Serialize};

// Rows map one to one with the tables. Ids are
// set to -1 until the row has been inserted.

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String
}

// Kept apart from User so that the password hash
// can't end up in a response by accident.
#[derive(Debug)]
pub struct Credentials {
  pub user_id: i64,
  pub password_hash: String
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Category {
  pub id: i64,
  pub name: String
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Story {
  pub id: i64,
  pub title: String,
  pub content: String,
  pub author_id: i64,
  pub category_id: i64,
  // Denormalized counter, only ever incremented
  // when a like is inserted.
  pub likes: i64
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Comment {
  pub id: i64,
  pub story_id: i64,
  pub user_id: i64,
  pub content: String
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Like {
  pub id: i64,
  pub story_id: i64,
  pub user_id: i64
}
