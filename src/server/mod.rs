//! Connection supervision: the accept loop, one worker per connection, and
//! shutdown.

pub mod listener;

pub use listener::{bind, serve};
