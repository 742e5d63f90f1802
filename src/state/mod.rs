pub mod inbox;
pub mod thread;
