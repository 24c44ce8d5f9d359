use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    configuration::{RendererKind, Settings},
    domain::{batch_summary::BatchSummary, lead::LeadRecord},
    services::{
        Droid, HttpRenderer, LeadQualifier, OpenaiClient, ReportExporter, XlsxReportExporter,
    },
};

/// Qualifies every url in the configured input file and writes the report.
pub async fn run(settings: Settings) -> anyhow::Result<PathBuf> {
    let urls = load_urls(&settings.batch.input_path)?;
    if settings.api_keys.openai.is_empty() {
        log::warn!("No openai api key configured, every classification will fail");
    }

    let openai_client = OpenaiClient::new(
        settings.api_keys.openai.clone(),
        settings.classifier.model.clone(),
        settings.classifier.max_tokens,
    );
    let exporter = XlsxReportExporter::new(&settings.batch.output_path);
    let timeout = settings.renderer.navigation_timeout();

    log::info!("Starting e-commerce filter on {} urls", urls.len());

    let records = match settings.renderer.kind {
        RendererKind::Webdriver => {
            let droid = Droid::new(&settings.renderer.webdriver_url, settings.renderer.headless)
                .await
                .with_context(|| {
                    format!(
                        "Failed to open a WebDriver session at {}",
                        settings.renderer.webdriver_url
                    )
                })?;
            let qualifier = LeadQualifier::new(droid, openai_client, timeout);
            let records = qualifier.qualify_leads(&urls).await;

            if let Err(e) = qualifier.into_renderer().shutdown().await {
                log::error!("Failed to quit WebDriver session: {:?}", e);
            }
            records
        }
        RendererKind::Http => {
            let renderer = HttpRenderer::new().context("Failed to build http client")?;
            LeadQualifier::new(renderer, openai_client, timeout)
                .qualify_leads(&urls)
                .await
        }
    };

    export_records(&exporter, &records)
}

fn export_records(
    exporter: &impl ReportExporter,
    records: &[LeadRecord],
) -> anyhow::Result<PathBuf> {
    log::info!("{}", BatchSummary::from_records(records));

    exporter.export(records).context("Failed to write report")
}

pub fn load_urls(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read url list from {}", path.display()))?;

    Ok(parse_url_list(&content))
}

pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{load_urls, parse_url_list};

    #[test]
    fn parse_url_list_skips_blanks_and_comments() {
        let content = "
            # leads from the trade fair
            https://shop.example.com

            https://blog.example.com
            https://shop.example.com
        ";

        assert_eq!(
            parse_url_list(content),
            vec![
                "https://shop.example.com",
                "https://blog.example.com",
                "https://shop.example.com",
            ]
        );
    }

    #[test]
    fn load_urls_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let result = load_urls(&dir.path().join("missing.txt"));

        assert!(result.is_err());
    }
}
