pub mod episodes;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod routes;
pub mod series;
pub mod settings;
pub mod users;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
