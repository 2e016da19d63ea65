pub mod audio;
pub mod config;
pub mod db;
pub mod engines;
pub mod http;
pub mod repositories;
pub mod transport;
