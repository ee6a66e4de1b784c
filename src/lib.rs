//! Browse image folders and edit the comma-separated tag file that sits next
//! to each image, for preparing fine-tuning datasets.

pub mod config;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod paths;
pub mod scanner;
pub mod server;
pub mod tags;
pub mod util;

pub use error::{Result, TagError};
