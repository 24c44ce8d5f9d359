pub mod batch_summary;
pub mod classification;
pub mod lead;
pub mod page_text;
