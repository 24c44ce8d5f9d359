use std::{collections::BTreeMap, fmt};

use super::lead::{LeadRecord, StoreFlag};

/// Per-category tally of a finished batch.
#[derive(Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub stores: usize,
    pub failures: usize,
    pub by_category: BTreeMap<String, usize>,
}

impl BatchSummary {
    pub fn from_records(records: &[LeadRecord]) -> Self {
        let mut summary = BatchSummary {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            if record.is_store == StoreFlag::Yes {
                summary.stores += 1;
            }
            if record.category.is_failure() {
                summary.failures += 1;
            }
            *summary
                .by_category
                .entry(record.category.label().to_string())
                .or_default() += 1;
        }

        summary
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} urls, {} stores, {} failed",
            self.total, self.stores, self.failures
        )?;
        for (label, count) in self.by_category.iter() {
            write!(f, " | {}: {}", label, count)?;
        }
        Ok(())
    }
}
