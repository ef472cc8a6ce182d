use crate::llm::prompt::PromptBuilder;
use crate::llm::{LlmError, LlmManager};
use crate::sql::{Rejection, SqlSafetyValidator, ValidatedSql, clean};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MalformedInput,
    EndpointUnavailable,
    UntrustedOutputRejected,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("question is empty")]
    MalformedInput,
    #[error("model endpoint unavailable: {0}")]
    EndpointUnavailable(#[source] LlmError),
    #[error("model output rejected: {0}")]
    UntrustedOutputRejected(#[source] Rejection),
}

impl GenerationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedInput => FailureKind::MalformedInput,
            Self::EndpointUnavailable(_) => FailureKind::EndpointUnavailable,
            Self::UntrustedOutputRejected(_) => FailureKind::UntrustedOutputRejected,
        }
    }

    /// Whether asking again later might succeed. Rejected output is final for
    /// the same question.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::EndpointUnavailable(_))
    }
}

/// Turns a natural-language question into SQL that is safe to execute.
pub struct Translator {
    llm: LlmManager,
    prompts: PromptBuilder,
    validator: SqlSafetyValidator,
    timeout: Option<Duration>,
}

impl Translator {
    pub fn new(llm: LlmManager) -> Self {
        Self {
            llm,
            prompts: PromptBuilder::default(),
            validator: SqlSafetyValidator::default(),
            timeout: None,
        }
    }

    pub fn with_validator(mut self, validator: SqlSafetyValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Bounds the wait on the model endpoint.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub async fn text_to_sql(&self, user_query: &str) -> Result<ValidatedSql, GenerationError> {
        let question = user_query.trim();
        if question.is_empty() {
            return Err(GenerationError::MalformedInput);
        }

        info!("Processing query: {}", question);
        let prompt = self.prompts.prompt_for(question);

        info!("Sending request to model ({})", self.llm.model_name());
        let completion = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.llm.complete(&prompt))
                .await
                .unwrap_or(Err(LlmError::Timeout(limit))),
            None => self.llm.complete(&prompt).await,
        };
        let raw = completion.map_err(|e| {
            error!("Model endpoint failed: {}", e);
            GenerationError::EndpointUnavailable(e)
        })?;
        debug!("Raw LLM response: {}", raw);

        let candidate = clean(&raw);
        debug!("Cleaned SQL: {}", candidate);

        let sql = self.validator.check(&candidate).map_err(|rejection| {
            warn!("Generated SQL failed validation: {}", rejection);
            GenerationError::UntrustedOutputRejected(rejection)
        })?;

        info!("Generated SQL: {}", sql);
        Ok(sql)
    }
}
