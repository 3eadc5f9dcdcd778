use std::env;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "localhost:3000";
pub const DEFAULT_DATA_FILE: &str = "posts.json";

/// Where to listen and where the posts live.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub addr: String,
    pub data_file: PathBuf,
}

impl Config {
    /// Read `POSTBOARD_ADDR` and `POSTBOARD_DATA_FILE`, picking up a `.env` file first if present.
    pub fn from_env() -> Config {
        dotenv::dotenv().ok();
        Config::from_vars(|key| env::var(key).ok())
    }

    fn from_vars<F>(var: F) -> Config
        where F: Fn(&str) -> Option<String>
    {
        Config {
            addr: var("POSTBOARD_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            data_file: var("POSTBOARD_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
        }
    }
}
