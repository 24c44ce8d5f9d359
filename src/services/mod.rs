pub mod droid;
pub mod lead_classifier;
pub mod lead_qualifier;
pub mod openai_client;
pub mod page_fetcher;
pub mod report_exporter;

pub use droid::*;
pub use lead_classifier::*;
pub use lead_qualifier::*;
pub use openai_client::*;
pub use page_fetcher::*;
pub use report_exporter::*;
