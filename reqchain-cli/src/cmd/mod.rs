pub mod config;
pub mod export;
pub mod migrate;
pub mod run;
pub mod validate;
pub mod workflows;
