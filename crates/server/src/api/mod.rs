pub mod content;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod recordings;
pub mod routes;
pub mod videos;

pub use routes::create_router;
