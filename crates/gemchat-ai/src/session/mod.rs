//! The reusable handle to a configured model.
//!
//! A `Session` owns the backend and nothing else. Every exchange is
//! independent: the backend only ever sees the current input, never earlier
//! turns.

mod context;
mod error;
mod exchange;
mod flatten;


pub use context::ExchangeContext;
pub use error::ExchangeError;
pub use exchange::Session;
pub use flatten::flatten_reply;
