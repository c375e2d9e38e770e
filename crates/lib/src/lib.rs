//! pagebot core library: config, Messenger channel, scripted replies, and the
//! webhook gateway used by the CLI.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod reply;
