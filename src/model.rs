use std::collections::BTreeMap;

use rustc_serialize::json::{Json, ToJson};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub likes: u64,
}

impl Post {
    /// A fresh post with a newly minted id and no likes.
    pub fn new(author: &str, title: &str, content: &str) -> Post {
        Post::from_parts(None, author, title, content, None)
    }

    /// Build a post from its stored parts, minting an id when none is given.
    pub fn from_parts(id: Option<String>,
                      author: &str,
                      title: &str,
                      content: &str,
                      likes: Option<u64>)
                      -> Post {
        Post {
            id: id.unwrap_or_else(mint_id),
            author: author.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            likes: likes.unwrap_or(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read a post back from one element of the stored array.
    ///
    /// Integer ids are kept as their decimal string. Returns `None` when a text
    /// field is missing or not a string, or when `id`/`likes` have the wrong type.
    pub fn from_json(json: &Json) -> Option<Post> {
        let object = json.as_object()?;
        let text = |key: &str| object.get(key).and_then(Json::as_string);

        let id = match object.get("id") {
            Some(&Json::String(ref id)) => Some(id.clone()),
            Some(&Json::U64(id)) => Some(id.to_string()),
            Some(&Json::I64(id)) => Some(id.to_string()),
            Some(_) => return None,
            None => None,
        };
        let likes = match object.get("likes") {
            Some(value) => Some(value.as_u64()?),
            None => None,
        };

        Some(Post::from_parts(id, text("author")?, text("title")?, text("content")?, likes))
    }
}

impl ToJson for Post {
    fn to_json(&self) -> Json {
        let mut object = BTreeMap::new();
        object.insert("id".to_string(), self.id.to_json());
        object.insert("author".to_string(), self.author.to_json());
        object.insert("title".to_string(), self.title.to_json());
        object.insert("content".to_string(), self.content.to_json());
        object.insert("likes".to_string(), self.likes.to_json());
        Json::Object(object)
    }
}

fn mint_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_mints_unique_id_and_starts_without_likes() {
        let first = Post::new("Ann", "Hi", "x");
        let second = Post::new("Ann", "Hi", "x");

        assert_eq!(first.likes, 0);
        assert!(!first.id().is_empty());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn to_json_has_all_keys() {
        let post = Post::from_parts(Some("a1".to_string()), "Ann", "Hi", "x", Some(2));
        let json = post.to_json();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["author", "content", "id", "likes", "title"]);
        assert_eq!(object["id"].as_string(), Some("a1"));
        assert_eq!(object["likes"].as_u64(), Some(2));
    }

    #[test]
    fn from_json_fills_in_missing_id_and_likes() {
        let json = Json::from_str(r#"{"author":"Bob","title":"T","content":"C"}"#).unwrap();
        let post = Post::from_json(&json).unwrap();

        assert_eq!(post.author, "Bob");
        assert_eq!(post.likes, 0);
        assert!(!post.id().is_empty());
    }

    #[test]
    fn from_json_rejects_bad_records() {
        let missing_title = Json::from_str(r#"{"id":"a","author":"Bob","content":"C"}"#).unwrap();
        let bool_id = Json::from_str(r#"{"id":true,"author":"B","title":"T","content":"C"}"#)
            .unwrap();
        let negative_likes =
            Json::from_str(r#"{"author":"B","title":"T","content":"C","likes":-1}"#).unwrap();

        assert_eq!(Post::from_json(&missing_title), None);
        assert_eq!(Post::from_json(&bool_id), None);
        assert_eq!(Post::from_json(&negative_likes), None);
        assert_eq!(Post::from_json(&Json::Array(vec![])), None);
    }

    #[test]
    fn from_json_keeps_integer_ids_as_strings() {
        let json = Json::from_str(r#"{"id":7,"author":"B","title":"T","content":"C","likes":5}"#)
            .unwrap();
        let post = Post::from_json(&json).unwrap();

        assert_eq!(post.id(), "7");
        assert_eq!(post.likes, 5);
        assert_eq!(post.to_json().find("id").and_then(Json::as_string), Some("7"));
    }
}
