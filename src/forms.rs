use std::collections::BTreeMap;

use rustc_serialize::json::{Json, ToJson};
use url::form_urlencoded;

use crate::error::FormError;
use crate::model::Post;

pub const AUTHOR_MAX_LEN: usize = 100;
pub const TITLE_MAX_LEN: usize = 200;

/// Messages per field name, only for fields that failed.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// The author/title/content fields of a create or update submission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostForm {
    pub author: String,
    pub title: String,
    pub content: String,
}

impl PostForm {
    pub fn from_post(post: &Post) -> PostForm {
        PostForm {
            author: post.author.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
        }
    }

    /// Fields from an `application/x-www-form-urlencoded` body. Absent fields stay empty.
    pub fn from_urlencoded(body: &[u8]) -> PostForm {
        let mut form = PostForm::default();
        for (key, value) in form_urlencoded::parse(body) {
            match &*key {
                "author" => form.author = value.into_owned(),
                "title" => form.title = value.into_owned(),
                "content" => form.content = value.into_owned(),
                _ => {}
            }
        }
        form
    }

    /// Fields from raw JSON body bytes, which must be UTF-8.
    pub fn from_json_bytes(body: Vec<u8>) -> Result<PostForm, FormError> {
        PostForm::from_json_body(&String::from_utf8(body)?)
    }

    /// Fields from a JSON object body. Absent or non-string fields stay empty.
    pub fn from_json_body(body: &str) -> Result<PostForm, FormError> {
        let json = Json::from_str(body)?;
        let object = json.as_object().ok_or(FormError::NotAnObject)?;
        let text = |key: &str| {
            object.get(key).and_then(Json::as_string).unwrap_or_default().to_string()
        };

        Ok(PostForm {
            author: text("author"),
            title: text("title"),
            content: text("content"),
        })
    }

    /// The one validation routine every create and update goes through.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check(&mut errors, "author", &self.author, Some(AUTHOR_MAX_LEN));
        check(&mut errors, "title", &self.title, Some(TITLE_MAX_LEN));
        check(&mut errors, "content", &self.content, None);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check(errors: &mut FieldErrors, field: &'static str, value: &str, max_len: Option<usize>) {
    if value.trim().is_empty() {
        errors.entry(field).or_default().push("This field is required.".to_string());
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            errors.entry(field)
                .or_default()
                .push(format!("Field cannot be longer than {} characters.", max));
        }
    }
}

impl ToJson for PostForm {
    fn to_json(&self) -> Json {
        let mut object = BTreeMap::new();
        object.insert("author".to_string(), self.author.to_json());
        object.insert("title".to_string(), self.title.to_json());
        object.insert("content".to_string(), self.content.to_json());
        Json::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(author: &str, title: &str, content: &str) -> PostForm {
        PostForm {
            author: author.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert_eq!(form("Ann", "Hi", "x").validate(), Ok(()));
    }

    #[test]
    fn empty_and_blank_fields_are_required() {
        let errors = form("", "   ", "x").validate().unwrap_err();

        assert_eq!(errors.keys().cloned().collect::<Vec<_>>(), vec!["author", "title"]);
        assert_eq!(errors["author"], vec!["This field is required.".to_string()]);
    }

    #[test]
    fn author_and_title_have_length_limits() {
        let long_author = "a".repeat(AUTHOR_MAX_LEN + 1);
        let long_title = "t".repeat(TITLE_MAX_LEN + 1);
        let long_content = "c".repeat(10 * TITLE_MAX_LEN);

        let errors = form(&long_author, &long_title, &long_content).validate().unwrap_err();
        assert_eq!(errors.keys().cloned().collect::<Vec<_>>(), vec!["author", "title"]);

        let at_limit = form(&"é".repeat(AUTHOR_MAX_LEN), &"t".repeat(TITLE_MAX_LEN), "c");
        assert_eq!(at_limit.validate(), Ok(()));
    }

    #[test]
    fn urlencoded_body_is_decoded() {
        let parsed = PostForm::from_urlencoded(b"author=Ann+Lee&title=Hi%21&content=a%26b&extra=1");

        assert_eq!(parsed, form("Ann Lee", "Hi!", "a&b"));
    }

    #[test]
    fn urlencoded_body_missing_fields_stay_empty() {
        let parsed = PostForm::from_urlencoded(b"title=Hi");

        assert_eq!(parsed, form("", "Hi", ""));
    }

    #[test]
    fn json_body_is_decoded() {
        let parsed = PostForm::from_json_body(r#"{"author":"Ann","title":"Hi","likes":4}"#).unwrap();

        assert_eq!(parsed, form("Ann", "Hi", ""));
    }

    #[test]
    fn json_body_must_be_an_object() {
        assert!(PostForm::from_json_body("[1, 2]").is_err());
        assert!(PostForm::from_json_body("{oops").is_err());
    }

    #[test]
    fn json_bytes_must_be_utf8() {
        let invalid = b"{\"author\":\"\xff\",\"title\":\"T\",\"content\":\"C\"}".to_vec();
        assert!(matches!(PostForm::from_json_bytes(invalid), Err(FormError::Utf8(_))));

        let valid = r#"{"author":"Zoë","title":"T","content":"C"}"#.as_bytes().to_vec();
        assert_eq!(PostForm::from_json_bytes(valid).unwrap(), form("Zoë", "T", "C"));
    }
}
