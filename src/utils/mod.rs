pub mod text_utils;
pub mod password;
