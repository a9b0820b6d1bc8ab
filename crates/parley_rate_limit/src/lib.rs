//! Per-client rate limiting for the Parley chat completion service.
//!
//! Requests are counted in fixed windows per client and per [`Quota`]. Exempt
//! clients, such as monitoring hosts, are never counted. The HTTP layer checks the
//! limiter before doing any other work.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod limiter;
mod quota;
mod sweeper;
mod window;

pub use error::{RateLimitError, RateLimitErrorKind};
pub use limiter::RateLimiter;
pub use quota::Quota;
pub use sweeper::spawn_sweeper;
