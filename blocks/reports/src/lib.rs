pub mod analytics;
pub mod export_csv;
pub mod export_pdf;
pub mod overview;
pub mod types;
