pub mod cipher;
pub mod cli;
pub mod config;
pub mod errors;
pub mod journal;
pub mod logging;
pub mod vault;
