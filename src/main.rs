use std::process;
use std::sync::Arc;

use env_logger::Env;
use iron::prelude::Chain;
use iron::Iron;
use log::{error, info};
use logger::Logger;
use postboard::config::Config;
use postboard::handlers::{self, JsonAfterMiddleware};
use postboard::store::Store;

// RUST_LOG=logger=info postboard > logs 2>&1 &
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let (logger_before, logger_after) = Logger::new(None);

    let config = Config::from_env();
    let store = Arc::new(Store::new(config.data_file.clone()));
    info!("serving posts from {}", store.path().display());

    let mut chain = Chain::new(handlers::routes(store));
    chain.link_before(logger_before); // Should be first!
    chain.link_after(JsonAfterMiddleware);
    chain.link_after(logger_after); // Should be last!

    // The listener joins its worker threads when dropped, so this blocks.
    match Iron::new(chain).http(config.addr.as_str()) {
        Ok(_listening) => info!("listening on {}", config.addr),
        Err(e) => {
            error!("could not listen on {}: {}", config.addr, e);
            process::exit(1);
        }
    }
}
