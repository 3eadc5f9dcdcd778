//! A small board of posts (author, title, content, likes) kept in one JSON file
//! and served over HTTP with Iron.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod model;
pub mod store;
