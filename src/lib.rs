pub mod config;
pub mod logging;

pub mod descriptor;
pub mod mime_table;
pub mod source;
