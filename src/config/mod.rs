mod server;

pub use server::{GithubSection, ServerConfig};
