use crate::domain::page_text::{char_len, excerpt, MAX_EXCERPT_CHARS};

use super::{Classifier, ClassifierError};

/// Pages with less text than this are not worth a classifier call.
pub const MIN_TEXT_CHARS: usize = 50;

pub const SYSTEM_INSTRUCTION: &str = "You are an E-commerce Analyst. Output ONLY valid JSON.";

#[derive(Debug, PartialEq)]
pub enum ClassificationRequest {
    NotAnalyzable { chars: usize },
    Answered(String),
}

pub fn build_user_instruction(text: &str) -> String {
    format!(
        r#"
        Analyze this website text: "{}"

        Return a JSON object with:
        1. "type": (Pick one: "E-commerce Store", "Blog", "Corporate Site", "Dead Link")
        2. "is_store": (true/false)
        3. "products": (List 2-3 main products sold, or "None")
        4. "reasoning": (One short sentence why)
        "#,
        excerpt(text, MAX_EXCERPT_CHARS)
    )
}

/// Asks the classifier about already normalized page text.
pub async fn request_classification<C>(
    classifier: &C,
    text: &str,
) -> Result<ClassificationRequest, ClassifierError>
where
    C: Classifier + ?Sized,
{
    let chars = char_len(text);
    if chars < MIN_TEXT_CHARS {
        return Ok(ClassificationRequest::NotAnalyzable { chars });
    }

    let payload = classifier
        .classify(SYSTEM_INSTRUCTION, &build_user_instruction(text))
        .await?;

    Ok(ClassificationRequest::Answered(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{
        build_user_instruction, request_classification, ClassificationRequest,
        SYSTEM_INSTRUCTION,
    };
    use crate::services::{Classifier, ClassifierError};

    #[derive(Default)]
    struct RecordingClassifier {
        prompts: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Classifier for RecordingClassifier {
        async fn classify(&self, system: &str, user: &str) -> Result<String, ClassifierError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            match self.fail {
                true => Err(ClassifierError::new("401 Unauthorized")),
                false => Ok("{}".to_string()),
            }
        }
    }

    #[tokio::test]
    async fn short_text_is_not_sent() {
        let classifier = RecordingClassifier::default();
        let text = "a".repeat(49);

        let empty = request_classification(&classifier, "").await.unwrap();
        let short = request_classification(&classifier, &text).await.unwrap();

        assert_eq!(empty, ClassificationRequest::NotAnalyzable { chars: 0 });
        assert_eq!(short, ClassificationRequest::NotAnalyzable { chars: 49 });
        assert!(classifier.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_text_is_sent_once() {
        let classifier = RecordingClassifier::default();
        let text = "a".repeat(50);

        let result = request_classification(&classifier, &text).await.unwrap();

        assert_eq!(result, ClassificationRequest::Answered("{}".to_string()));
        let prompts = classifier.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, SYSTEM_INSTRUCTION);
        assert!(prompts[0].1.contains(&text));
    }

    #[tokio::test]
    async fn classifier_failure_is_returned() {
        let classifier = RecordingClassifier {
            fail: true,
            ..Default::default()
        };

        let result = request_classification(&classifier, &"a".repeat(80)).await;

        assert_eq!(result.unwrap_err().message, "401 Unauthorized");
    }

    #[test]
    fn user_instruction_truncates_text() {
        let text = format!("{}{}", "a".repeat(2_500), "b".repeat(100));

        let prompt = build_user_instruction(&text);

        assert!(prompt.contains(&format!("\"{}\"", "a".repeat(2_500))));
        assert!(!prompt.contains("ab"));
        for field in ["\"type\"", "\"is_store\"", "\"products\"", "\"reasoning\""] {
            assert!(prompt.contains(field), "{}", field);
        }
        for category in ["E-commerce Store", "Blog", "Corporate Site", "Dead Link"] {
            assert!(prompt.contains(category), "{}", category);
        }
    }
}
