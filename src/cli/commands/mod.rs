pub mod clean;
mod command_result;
pub mod extract;
pub mod helper;
pub mod init;
pub mod translate;

pub use command_result::*;
