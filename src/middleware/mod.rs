pub mod auth;
pub mod rate_limit;
pub mod response;

pub use auth::{authenticate, session_auth_middleware, SessionIdentity, TokenSource};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
pub use response::{ApiResponse, ApiResult};
