mod command_result;
pub mod helper;
pub mod init;
pub mod prune;
pub mod update;
pub mod validate;

pub use command_result::*;
