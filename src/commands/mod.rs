pub mod admin;
pub mod init;
pub mod list;
pub mod roadmap;
pub mod settings;
pub mod show;
pub mod submit;
pub mod vote;
