use rusqlite::{params, Params, Row, OptionalExtension};
use r2d2_sqlite::SqliteConnectionManager;
pub mod entities;
mod mappers;
mod helpers;
use eyre::WrapErr;
use color_eyre::Result;
use entities::*;
use mappers::*;
use helpers::{init_connection, is_unique_violation};

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<SqliteConnectionManager>;

// Result of inserts that can bump into a UNIQUE
// constraint. Nothing has been written when we get
// Duplicate.
#[derive(Debug, PartialEq)]
pub enum InsertOutcome {
  Inserted,
  Duplicate
}

/**
 * Every function in here checks out a single connection
 * from the pool, which goes back to the pool when the
 * guard is dropped, whatever happens in between.
 * Never hold two connections at once: the test pool
 * only has one.
 */
pub fn create_pool(db_path: &str, max_size: u32) -> Result<Pool> {
  let manager = SqliteConnectionManager::file(db_path)
    .with_init(init_connection);
  Pool::builder()
    .max_size(max_size)
    .build(manager)
    .context("Creating the database connection pool")
}

pub fn ensure_schema(pool: &Pool) -> Result<()> {
  let conn = pool.get()?;
  conn.execute_batch(helpers::SCHEMA)
    .context("Creating database schema")
}

fn select_many<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Vec<T>>
  where
    P: Params,
    F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.get()?;
  let mut stmt = conn.prepare(query)?;
  let rows = stmt.query_map(params, mapper)
    .and_then(Iterator::collect)
    .context("Generic select_many query");
  rows
}

fn select_one<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Option<T>>
  where
    P: Params,
    F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.get()?;
  let row = conn.query_row(query, params, mapper)
    .optional()
    .context("Generic select_one query");
  row
}

/* --- Users --- */

pub fn user_exists(
  pool: &Pool,
  username: &str,
  email: &str
) -> Result<bool> {
  let found = select_one(
    pool,
    "SELECT id FROM users WHERE username = ?1 OR email = ?2",
    params![username, email],
    |row| row.get::<_, i64>(0)
  )?;
  Ok(found.is_some())
}

// Sets the id of the given user on success.
pub fn insert_user(
  pool: &Pool,
  user: &mut User,
  password_hash: &str
) -> Result<InsertOutcome> {
  let conn = pool.get()?;
  // The UNIQUE constraints catch whatever slipped
  // past the user_exists check.
  match conn.execute(
    "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)",
    params![user.username, user.email, password_hash]
  ) {
    Ok(_) => {
      user.id = conn.last_insert_rowid();
      Ok(InsertOutcome::Inserted)
    },
    Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
    Err(e) => Err(e).context("Inserting user")
  }
}

pub fn user_by_id(
  pool: &Pool,
  user_id: i64
) -> Result<Option<User>> {
  select_one(
    pool,
    "SELECT id, username, email FROM users WHERE id = ?1",
    params![user_id],
    map_user
  )
}

pub fn credentials_by_username(
  pool: &Pool,
  username: &str
) -> Result<Option<Credentials>> {
  select_one(
    pool,
    "SELECT id, password FROM users WHERE username = ?1",
    params![username],
    map_credentials
  )
}

/* --- Categories --- */

pub fn all_categories(
  pool: &Pool
) -> Result<Vec<Category>> {
  select_many(
    pool,
    "SELECT id, name FROM categories ORDER BY name ASC",
    [],
    map_category
  )
}

pub fn insert_category(
  pool: &Pool,
  category: &mut Category
) -> Result<InsertOutcome> {
  let conn = pool.get()?;
  match conn.execute(
    "INSERT INTO categories (name) VALUES (?1)",
    params![category.name]
  ) {
    Ok(_) => {
      category.id = conn.last_insert_rowid();
      Ok(InsertOutcome::Inserted)
    },
    Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
    Err(e) => Err(e).context("Inserting category")
  }
}

/* --- Stories --- */

// author_id and category_id are not checked, foreign
// keys aren't enforced.
pub fn insert_story(
  pool: &Pool,
  story: &mut Story
) -> Result<()> {
  let conn = pool.get()?;
  conn.execute(
    "INSERT INTO stories (title, content, author_id, category_id)
    VALUES (?1, ?2, ?3, ?4)",
    params![story.title, story.content, story.author_id, story.category_id]
  ).context("Inserting story")?;
  story.id = conn.last_insert_rowid();
  story.likes = 0;
  Ok(())
}

// No pagination whatsoever.
pub fn all_stories(
  pool: &Pool
) -> Result<Vec<Story>> {
  select_many(
    pool,
    "SELECT id, title, content, author_id, category_id, likes
    FROM stories ORDER BY id ASC",
    [],
    map_story
  )
}

/* --- Comments --- */

pub fn insert_comment(
  pool: &Pool,
  comment: &mut Comment
) -> Result<()> {
  let conn = pool.get()?;
  conn.execute(
    "INSERT INTO comments (story_id, user_id, content) VALUES (?1, ?2, ?3)",
    params![comment.story_id, comment.user_id, comment.content]
  ).context("Inserting comment")?;
  comment.id = conn.last_insert_rowid();
  Ok(())
}

pub fn comments_for_story(
  pool: &Pool,
  story_id: i64
) -> Result<Vec<Comment>> {
  select_many(
    pool,
    "SELECT id, story_id, user_id, content FROM comments
    WHERE story_id = ?1 ORDER BY id ASC",
    params![story_id],
    map_comment
  )
}

/* --- Likes --- */

// The like row and the counter on the story are written
// in the same transaction. Returning early drops the
// transaction, which rolls it back.
pub fn insert_like(
  pool: &Pool,
  like: &mut Like
) -> Result<InsertOutcome> {
  let mut conn = pool.get()?;
  let tx = conn.transaction()?;
  match tx.execute(
    "INSERT INTO likes (story_id, user_id) VALUES (?1, ?2)",
    params![like.story_id, like.user_id]
  ) {
    Ok(_) => like.id = tx.last_insert_rowid(),
    Err(e) if is_unique_violation(&e) => return Ok(InsertOutcome::Duplicate),
    Err(e) => return Err(e).context("Inserting like")
  }
  tx.execute(
    "UPDATE stories SET likes = likes + 1 WHERE id = ?1",
    params![like.story_id]
  ).context("Incrementing story like counter")?;
  tx.commit().context("Committing like transaction")?;
  Ok(InsertOutcome::Inserted)
}

// Counts the rows in likes, the counter on stories
// is never read here.
pub fn like_count(
  pool: &Pool,
  story_id: i64
) -> Result<i64> {
  let conn = pool.get()?;
  let count: i64 = conn.query_row(
    "SELECT count(*) FROM likes WHERE story_id = ?1",
    params![story_id],
    |row| row.get(0)
  )?;
  Ok(count)
}
