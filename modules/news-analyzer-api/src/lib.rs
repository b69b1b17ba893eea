pub mod analysis;
pub mod error;
pub mod history;
pub mod rest;
pub mod routes;
pub mod state;

pub use analysis::Analyzer;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
