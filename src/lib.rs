pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod srs;
pub mod stats;

#[cfg(test)]
mod testing;
