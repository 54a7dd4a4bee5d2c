pub mod extensions;
pub mod watch;
