pub mod custom_links;
pub mod files;
pub mod query;
pub mod upload;
