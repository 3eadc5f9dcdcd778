use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rustc_serialize::json::{self, Json, ToJson};
use tempfile::NamedTempFile;

use crate::error::StoreResult;
use crate::model::Post;

/// Owns the JSON file holding every post.
///
/// Each operation reads the whole file, changes the collection in memory and
/// writes the whole file back. Mutations in this process are serialized and
/// the file is replaced by rename, so readers never see a half-written file.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    writer: Mutex<()>,
}

impl Store {
    pub fn new<P: Into<PathBuf>>(path: P) -> Store {
        Store {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All posts in file order. A missing or malformed file reads as empty.
    ///
    /// Records stored without an id get one here, and the file is rewritten
    /// so the id stays the same on the next read.
    pub fn load_posts(&self) -> Vec<Post> {
        let _guard = lock!(self.writer);
        let (posts, minted) = self.read_posts();
        if minted {
            if let Err(e) = self.write_posts(&posts) {
                warn!("could not store minted ids in {}: {}", self.path.display(), e);
            }
        }
        posts
    }

    /// Overwrite the file with exactly `posts`.
    pub fn save_posts(&self, posts: &[Post]) -> StoreResult<()> {
        let _guard = lock!(self.writer);
        self.write_posts(posts)
    }

    pub fn find_post(&self, id: &str) -> Option<Post> {
        self.load_posts().into_iter().find(|post| post.id() == id)
    }

    pub fn add_post(&self, author: &str, title: &str, content: &str) -> StoreResult<Post> {
        let post = Post::new(author, title, content);
        self.modify(|posts| {
            posts.push(post.clone());
            (post, true)
        })
    }

    /// Remove every post with `id`. Returns whether anything was removed.
    pub fn delete_post(&self, id: &str) -> StoreResult<bool> {
        self.modify(|posts| {
            let before = posts.len();
            posts.retain(|post| post.id() != id);
            let removed = posts.len() != before;
            (removed, removed)
        })
    }

    /// Replace the text fields of the post with `id`, keeping its id and likes.
    pub fn update_post(&self,
                       id: &str,
                       author: &str,
                       title: &str,
                       content: &str)
                       -> StoreResult<bool> {
        self.modify(|posts| match posts.iter_mut().find(|post| post.id() == id) {
            Some(post) => {
                post.author = author.to_string();
                post.title = title.to_string();
                post.content = content.to_string();
                (true, true)
            }
            None => (false, false),
        })
    }

    pub fn like_post(&self, id: &str) -> StoreResult<bool> {
        self.modify(|posts| match posts.iter_mut().find(|post| post.id() == id) {
            Some(post) => {
                post.likes += 1;
                (true, true)
            }
            None => (false, false),
        })
    }

    /// Load, apply `change`, and write back if it reports a change.
    fn modify<T, F>(&self, change: F) -> StoreResult<T>
        where F: FnOnce(&mut Vec<Post>) -> (T, bool)
    {
        let _guard = lock!(self.writer);
        let (mut posts, minted) = self.read_posts();
        let (result, changed) = change(&mut posts);
        if changed || minted {
            self.write_posts(&posts)?;
        }
        Ok(result)
    }

    /// The stored posts, and whether any of them needed a new id.
    fn read_posts(&self) -> (Vec<Post>, bool) {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("no posts read from {}: {}", self.path.display(), e);
                return (vec![], false);
            }
        };

        match parse_posts(&text) {
            Some(parsed) => parsed,
            None => {
                debug!("ignoring malformed posts file {}", self.path.display());
                (vec![], false)
            }
        }
    }

    fn write_posts(&self, posts: &[Post]) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let document = Json::Array(posts.iter().map(ToJson::to_json).collect());
        let mut file = NamedTempFile::new_in(dir)?;
        writeln!(file, "{}", json::as_pretty_json(&document))?;
        file.persist(&self.path)?;

        debug!("wrote {} posts to {}", posts.len(), self.path.display());
        Ok(())
    }
}

fn parse_posts(text: &str) -> Option<(Vec<Post>, bool)> {
    let document = Json::from_str(text).ok()?;
    let records = document.as_array()?;
    let minted = records.iter().any(|record| record.find("id").is_none());
    let posts = records.iter().map(Post::from_json).collect::<Option<Vec<_>>>()?;
    Some((posts, minted))
}
