pub mod analytics;
pub mod growth;
