use serde::{Deserialize, Serialize};
use crate::db::entities::*;

// Entities that can be sent as they are. User has
// no password field so it's safe to expose.
pub use crate::db::entities::User as UserDto;
pub use crate::db::entities::Story as StoryDto;
pub use crate::db::entities::Comment as CommentDto;
pub use crate::db::entities::Like as LikeDto;
pub use crate::db::entities::Category as CategoryDto;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
  pub message: String,
  pub user_id: i64
}

impl LoginResponse {
  pub fn success(user_id: i64) -> Self {
    Self {
      message: String::from("Login successful"),
      user_id
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikesCountDto {
  pub likes_count: i64
}

/* --- Request body or query objects --- */

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterForm {
  pub username: String,
  pub email: String,
  pub password: String
}

// Used for both the query string and the JSON body,
// hence the options.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginForm {
  pub username: Option<String>,
  pub password: Option<String>
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoryForm {
  pub title: String,
  pub content: String,
  pub author_id: i64,
  pub category_id: i64
}

// Clients may send a story_id too, it's ignored: the
// one from the path wins.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentForm {
  pub user_id: i64,
  pub content: String
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeForm {
  pub user_id: i64
}

/* --- End request body or query objects --- */

impl From<RegisterForm> for User {
  fn from(form: RegisterForm) -> Self {
    Self {
      id: -1,
      username: form.username.trim().to_string(),
      email: form.email.trim().to_string()
    }
  }
}

impl From<StoryForm> for Story {
  fn from(form: StoryForm) -> Self {
    Self {
      id: -1,
      title: form.title,
      content: form.content,
      author_id: form.author_id,
      category_id: form.category_id,
      likes: 0
    }
  }
}

impl CommentForm {
  pub fn into_comment(self, story_id: i64) -> Comment {
    Comment {
      id: -1,
      story_id,
      user_id: self.user_id,
      content: self.content
    }
  }
}

impl LikeForm {
  pub fn into_like(self, story_id: i64) -> Like {
    Like {
      id: -1,
      story_id,
      user_id: self.user_id
    }
  }
}

impl LoginForm {
  // Fields from self win over the ones in other.
  pub fn or(self, other: LoginForm) -> Self {
    Self {
      username: self.username.or(other.username),
      password: self.password.or(other.password)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn register_form_to_user_trims() {
    let form = RegisterForm {
      username: " alice ".to_string(),
      email: "a@x.com\n".to_string(),
      password: " pw1 ".to_string()
    };
    let user: User = form.into();
    assert_eq!(-1, user.id);
    assert_eq!("alice", user.username);
    assert_eq!("a@x.com", user.email);
  }

  #[test]
  fn user_dto_has_no_password() {
    let user = UserDto {
      id: 1,
      username: "alice".to_string(),
      email: "a@x.com".to_string()
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(
      serde_json::json!({"id": 1, "username": "alice", "email": "a@x.com"}),
      json
    );
  }

  #[test]
  fn comment_form_takes_story_id_from_path() {
    let form: CommentForm = serde_json::from_str(
      r#"{"story_id": 99, "user_id": 3, "content": "nice"}"#
    ).unwrap();
    let comment = form.into_comment(5);
    assert_eq!(5, comment.story_id);
    assert_eq!(3, comment.user_id);
  }

  #[test]
  fn login_form_query_wins_over_body() {
    let query = LoginForm {
      username: Some("alice".to_string()),
      password: None
    };
    let body = LoginForm {
      username: Some("bob".to_string()),
      password: Some("pw1".to_string())
    };
    let merged = query.or(body);
    assert_eq!(Some("alice".to_string()), merged.username);
    assert_eq!(Some("pw1".to_string()), merged.password);
  }
}
