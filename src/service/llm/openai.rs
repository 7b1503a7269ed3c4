//! Thin wrapper around async-openai for OpenAI-compatible chat calls.

use std::sync::Arc;

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{GenericLlmClient, LlmClient};
use crate::base::{
    config::Config,
    types::{ChatMessage, ChatRole, Res},
};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI-compatible LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new client against the configured base URL.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.llm_api_key.clone()).with_api_base(config.llm_base_url.trim_end_matches('/'));

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::chat", skip_all)]
    async fn chat(&self, messages: Vec<ChatMessage>) -> Res<Vec<String>> {
        debug!("Sending {} messages to {}", messages.len(), self.config.llm_model);

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.config.llm_model).messages(build_request_messages(messages)).temperature(self.config.llm_temperature);

        if let Some(max_tokens) = self.config.llm_max_tokens {
            #[allow(deprecated)]
            request.max_tokens(max_tokens);
        }

        let response = self.client.chat().create(request.build()?).await?;

        debug!("LLM response has {} choices.", response.choices.len());

        Ok(response.choices.into_iter().map(|choice| choice.message.content.unwrap_or_default()).collect())
    }
}

/// Convert role-tagged messages into the OpenAI request shape.
fn build_request_messages(messages: Vec<ChatMessage>) -> Vec<ChatCompletionRequestMessage> {
    messages
        .into_iter()
        .map(|message| match message.role {
            ChatRole::System => ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(message.content),
                name: None,
            }),
            ChatRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(message.content),
                name: None,
            }),
        })
        .collect()
}

// Tests.
