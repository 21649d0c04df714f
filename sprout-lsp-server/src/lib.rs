pub mod server;
pub mod test_utils;

pub use server::{ServerConfig, SproutLanguageServer};
