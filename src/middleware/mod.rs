pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{authorize, Guard};
pub use extract::{EntityId, ListParams, ValidJson};
pub use response::{ApiResponse, ApiResult};
