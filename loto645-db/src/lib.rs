pub mod db;
pub mod models;
pub mod remote;
pub mod source;

pub use rusqlite;
