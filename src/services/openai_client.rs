use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Any failure to get a payload out of the classifier. Transport, auth and
/// quota problems are not told apart.
#[derive(Debug, thiserror::Error)]
#[error("classifier call failed: {message}")]
pub struct ClassifierError {
    pub message: String,
}

impl ClassifierError {
    pub fn new(message: impl Into<String>) -> Self {
        ClassifierError {
            message: message.into(),
        }
    }
}

impl From<OpenAIError> for ClassifierError {
    fn from(value: OpenAIError) -> Self {
        ClassifierError::new(value.to_string())
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, system: &str, user: &str) -> Result<String, ClassifierError>;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
}

impl OpenaiClient {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl Classifier for OpenaiClient {
    async fn classify(&self, system: &str, user: &str) -> Result<String, ClassifierError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()?
                    .into(),
            ])
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;
        log::debug!("Response: {:?}", response);

        let first_choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::new("No choices in Openai response"))?
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ClassifierError::new("No content"))?;

        Ok(first_choice)
    }
}
