pub mod commands;
pub mod config;
pub mod db;
pub mod feed;
pub mod i18n;
pub mod models;
pub mod roadmap;
pub mod settings;
pub mod store;
pub mod submit;
pub mod vote;
