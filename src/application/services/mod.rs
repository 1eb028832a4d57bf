mod rate_limiter;
mod relay_service;
mod session_store;

pub use rate_limiter::RateLimiter;
pub use relay_service::{RelayError, RelayEvent, RelayService, RelayStream, StreamFailure};
pub use session_store::{ConversationEpoch, SessionSnapshot, SessionStore};
