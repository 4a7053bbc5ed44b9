pub mod generate;
pub mod init;
pub mod preview;
pub mod serve;
pub mod validate;
pub mod watch;
