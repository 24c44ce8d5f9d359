use std::fmt;

use super::classification::{Classification, NO_PRODUCTS};

pub const UNREACHABLE_REASON: &str = "site unreachable";
pub const UNREADABLE_REASON: &str = "could not read text";
pub const INVALID_OUTPUT_REASON: &str = "invalid structured output";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    EcommerceStore,
    Blog,
    CorporateSite,
    DeadLink,
    ScrapeFailed,
    ClassifierError,
    LinkDead,
    /// Literal returned by the classifier that is not one of the known types.
    Other(String),
}

impl Category {
    pub fn from_site_type(site_type: &str) -> Self {
        match site_type.trim().to_lowercase().as_str() {
            "e-commerce store" | "ecommerce store" => Category::EcommerceStore,
            "blog" => Category::Blog,
            "corporate site" => Category::CorporateSite,
            "dead link" => Category::DeadLink,
            _ => Category::Other(site_type.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Category::ScrapeFailed | Category::ClassifierError | Category::LinkDead
        )
    }

    pub fn label(&self) -> &str {
        match self {
            Category::EcommerceStore => "E-commerce Store",
            Category::Blog => "Blog",
            Category::CorporateSite => "Corporate Site",
            Category::DeadLink => "Dead Link",
            Category::ScrapeFailed => "Scrape Fail",
            Category::ClassifierError => "AI Error",
            Category::LinkDead => "Link Dead",
            Category::Other(literal) => literal,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFlag {
    Yes,
    No,
    NotApplicable,
    Error,
}

impl StoreFlag {
    pub fn label(&self) -> &'static str {
        match self {
            StoreFlag::Yes => "YES",
            StoreFlag::No => "NO",
            StoreFlag::NotApplicable => "N/A",
            StoreFlag::Error => "Error",
        }
    }
}

impl From<bool> for StoreFlag {
    fn from(value: bool) -> Self {
        match value {
            true => StoreFlag::Yes,
            false => StoreFlag::No,
        }
    }
}

impl fmt::Display for StoreFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a URL stopped short of a classification. Variants are listed in the
/// order the pipeline stages run.
#[derive(Debug, Clone, PartialEq)]
pub enum StageFailure {
    Unreachable { reason: String },
    NotAnalyzable { chars: usize },
    ClassifierFailed { reason: String },
    InvalidOutput { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    pub url: String,
    pub category: Category,
    pub is_store: StoreFlag,
    pub products: String,
    pub reasoning: String,
}

impl LeadRecord {
    pub fn build(url: &str, outcome: Result<Classification, StageFailure>) -> Self {
        let (category, is_store, products, reasoning) = match outcome {
            Err(StageFailure::Unreachable { .. }) => (
                Category::LinkDead,
                StoreFlag::NotApplicable,
                NO_PRODUCTS.to_string(),
                UNREACHABLE_REASON.to_string(),
            ),
            Err(StageFailure::NotAnalyzable { .. }) | Err(StageFailure::ClassifierFailed { .. }) => (
                Category::ScrapeFailed,
                StoreFlag::NotApplicable,
                NO_PRODUCTS.to_string(),
                UNREADABLE_REASON.to_string(),
            ),
            Err(StageFailure::InvalidOutput { .. }) => (
                Category::ClassifierError,
                StoreFlag::Error,
                NO_PRODUCTS.to_string(),
                INVALID_OUTPUT_REASON.to_string(),
            ),
            Ok(classification) => (
                Category::from_site_type(&classification.site_type),
                StoreFlag::from(classification.is_store),
                classification.products,
                classification.reasoning,
            ),
        };

        LeadRecord {
            url: url.to_string(),
            category,
            is_store,
            products,
            reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, LeadRecord, StageFailure, StoreFlag};
    use crate::domain::classification::Classification;

    fn classification(site_type: &str, is_store: bool) -> Classification {
        Classification {
            site_type: site_type.to_string(),
            is_store,
            products: "Shoes, Bags".to_string(),
            reasoning: "Sells physical goods".to_string(),
        }
    }

    #[test]
    fn build_classified_record() {
        let record = LeadRecord::build(
            "https://shop.example.com",
            Ok(classification("E-commerce Store", true)),
        );

        assert_eq!(
            record,
            LeadRecord {
                url: "https://shop.example.com".to_string(),
                category: Category::EcommerceStore,
                is_store: StoreFlag::Yes,
                products: "Shoes, Bags".to_string(),
                reasoning: "Sells physical goods".to_string(),
            }
        );
    }

    #[test]
    fn build_failure_records() {
        let unreachable = LeadRecord::build(
            "https://dead.example.com",
            Err(StageFailure::Unreachable {
                reason: "navigation timed out".to_string(),
            }),
        );
        let short = LeadRecord::build("u", Err(StageFailure::NotAnalyzable { chars: 12 }));
        let classifier = LeadRecord::build(
            "u",
            Err(StageFailure::ClassifierFailed {
                reason: "rate limited".to_string(),
            }),
        );
        let invalid = LeadRecord::build(
            "u",
            Err(StageFailure::InvalidOutput {
                reason: "expected value".to_string(),
            }),
        );

        assert_eq!(unreachable.category, Category::LinkDead);
        assert_eq!(unreachable.is_store, StoreFlag::NotApplicable);
        assert_eq!(unreachable.products, "");
        assert_eq!(unreachable.reasoning, "site unreachable");

        assert_eq!(short.category, Category::ScrapeFailed);
        assert_eq!(short.reasoning, "could not read text");
        assert_eq!(classifier.category, Category::ScrapeFailed);
        assert_eq!(classifier.is_store, StoreFlag::NotApplicable);

        assert_eq!(invalid.category, Category::ClassifierError);
        assert_eq!(invalid.is_store, StoreFlag::Error);
        assert_eq!(invalid.reasoning, "invalid structured output");
        assert_ne!(invalid.category, short.category);

        for record in [unreachable, short, classifier, invalid] {
            assert!(record.category.is_failure());
            assert!(!matches!(record.is_store, StoreFlag::Yes | StoreFlag::No));
        }
    }

    #[test]
    fn category_from_site_type() {
        assert_eq!(Category::from_site_type("Blog"), Category::Blog);
        assert_eq!(
            Category::from_site_type(" corporate site "),
            Category::CorporateSite
        );
        assert_eq!(
            Category::from_site_type("Ecommerce Store"),
            Category::EcommerceStore
        );
        assert_eq!(Category::from_site_type("Dead Link"), Category::DeadLink);
        assert_eq!(
            Category::from_site_type("Marketplace"),
            Category::Other("Marketplace".to_string())
        );
        assert_eq!(Category::from_site_type("Unknown").label(), "Unknown");
        assert!(!Category::from_site_type("Marketplace").is_failure());
    }
}
