use rusqlite::{ffi, Connection, Error};
use std::time::Duration;

// How long a connection waits on a locked database
// before giving up with SQLITE_BUSY:
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub const SCHEMA: &str = "
  CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
  );
  CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
  );
  CREATE TABLE IF NOT EXISTS stories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author_id INTEGER NOT NULL REFERENCES users(id),
    category_id INTEGER NOT NULL REFERENCES categories(id),
    likes INTEGER NOT NULL DEFAULT 0
  );
  CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    story_id INTEGER NOT NULL REFERENCES stories(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    content TEXT NOT NULL
  );
  CREATE INDEX IF NOT EXISTS comments_story_id ON comments(story_id);
  CREATE TABLE IF NOT EXISTS likes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    story_id INTEGER NOT NULL REFERENCES stories(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    UNIQUE(story_id, user_id)
  );
";

/**
 * Run on every new pooled connection. The bundled SQLite
 * enforces foreign keys by default, but referenced ids
 * are never checked by this service so the pragma is
 * switched off.
 */
pub fn init_connection(c: &mut Connection) -> Result<(), Error> {
  c.busy_timeout(BUSY_TIMEOUT)?;
  c.pragma_update(None, "foreign_keys", false)
}

// Only UNIQUE and PRIMARY KEY failures count as duplicates,
// NOT NULL, CHECK or trigger aborts are real errors.
pub fn is_unique_violation(err: &Error) -> bool {
  match err {
    Error::SqliteFailure(e, _) =>
      e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
    _ => false
  }
}
