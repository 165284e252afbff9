pub mod build;
pub mod chapters;
pub mod init;
pub mod parse;
pub mod show;
