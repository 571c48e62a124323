pub mod dto;
mod orgs;
pub mod response;
mod router;

pub use router::{AppState, create_router};
