use super::entities::*;
use rusqlite::{Row, Error};

// Mappers expect the columns in the same order
// as the struct fields.

pub fn map_user(row: &Row) -> Result<User, Error> {
  Ok(User {
    id: row.get(0)?,
    username: row.get(1)?,
    email: row.get(2)?
  })
}

pub fn map_credentials(row: &Row) -> Result<Credentials, Error> {
  Ok(Credentials {
    user_id: row.get(0)?,
    password_hash: row.get(1)?
  })
}

pub fn map_category(row: &Row) -> Result<Category, Error> {
  Ok(Category {
    id: row.get(0)?,
    name: row.get(1)?
  })
}

pub fn map_story(row: &Row) -> Result<Story, Error> {
  Ok(Story {
    id: row.get(0)?,
    title: row.get(1)?,
    content: row.get(2)?,
    author_id: row.get(3)?,
    category_id: row.get(4)?,
    likes: row.get(5)?
  })
}

pub fn map_comment(row: &Row) -> Result<Comment, Error> {
  Ok(Comment {
    id: row.get(0)?,
    story_id: row.get(1)?,
    user_id: row.get(2)?,
    content: row.get(3)?
  })
}
