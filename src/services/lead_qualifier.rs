use std::{fmt, time::Duration};

use crate::domain::{
    classification::{parse_classification, Classification, ParseError},
    lead::{LeadRecord, StageFailure},
    page_text::normalize_text,
};

use super::{
    request_classification, ClassificationRequest, Classifier, ClassifierError, FetchError,
    PageRenderer,
};

#[derive(Debug, Clone, Copy)]
enum Stage {
    Fetching,
    Normalizing,
    Classifying,
    Recording,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Normalizing => "normalizing",
            Stage::Classifying => "classifying",
            Stage::Recording => "recording",
        };
        f.write_str(name)
    }
}

impl From<FetchError> for StageFailure {
    fn from(value: FetchError) -> Self {
        StageFailure::Unreachable {
            reason: value.to_string(),
        }
    }
}

impl From<ClassifierError> for StageFailure {
    fn from(value: ClassifierError) -> Self {
        StageFailure::ClassifierFailed {
            reason: value.to_string(),
        }
    }
}

impl From<ParseError> for StageFailure {
    fn from(value: ParseError) -> Self {
        StageFailure::InvalidOutput {
            reason: value.to_string(),
        }
    }
}

/// Runs urls through render, normalize, classify and parse one at a time.
pub struct LeadQualifier<R, C> {
    renderer: R,
    classifier: C,
    navigation_timeout: Duration,
}

impl<R, C> LeadQualifier<R, C>
where
    R: PageRenderer,
    C: Classifier,
{
    pub fn new(renderer: R, classifier: C, navigation_timeout: Duration) -> Self {
        LeadQualifier {
            renderer,
            classifier,
            navigation_timeout,
        }
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// One record per url, in input order. Duplicates are qualified again.
    pub async fn qualify_leads(&self, urls: &[String]) -> Vec<LeadRecord> {
        log::info!("Qualifying {} urls", urls.len());

        let mut records = Vec::with_capacity(urls.len());
        for url in urls {
            records.push(self.qualify_lead(url).await);
        }

        records
    }

    pub async fn qualify_lead(&self, url: &str) -> LeadRecord {
        log::info!("Checking {}...", url);

        let outcome = self.run_stages(url).await;
        if let Err(ref failure) = outcome {
            log::error!("Could not qualify {}: {:?}", url, failure);
        }

        log::debug!("{} | {}", url, Stage::Recording);
        let record = LeadRecord::build(url, outcome);
        log::info!("{} -> {} (store: {})", url, record.category, record.is_store);

        record
    }

    async fn run_stages(&self, url: &str) -> Result<Classification, StageFailure> {
        log::debug!("{} | {}", url, Stage::Fetching);
        let raw_text = self.renderer.render(url, self.navigation_timeout).await?;

        log::debug!("{} | {}", url, Stage::Normalizing);
        let text = normalize_text(&raw_text);

        log::debug!("{} | {}", url, Stage::Classifying);
        match request_classification(&self.classifier, &text).await? {
            ClassificationRequest::NotAnalyzable { chars } => {
                Err(StageFailure::NotAnalyzable { chars })
            }
            ClassificationRequest::Answered(payload) => Ok(parse_classification(&payload)?),
        }
    }
}
