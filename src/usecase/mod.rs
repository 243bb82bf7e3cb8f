pub mod contracts;
pub mod poller;
pub mod sync;
