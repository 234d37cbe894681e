pub mod config;
pub mod db;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod staging;
pub mod transform;
