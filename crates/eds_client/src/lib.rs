pub mod backend;
pub mod counter;
pub mod indexing;
pub mod outcome;
pub mod query;
pub mod session;
pub mod upload;

pub use backend::http::HttpBackend;
pub use backend::Backend;
pub use session::DesignSession;
