// [libs/domain/providers/src/variants/claude.rs]
/*!
 * APARATO: CLAUDE-FAMILY ADAPTER
 * RESPONSABILIDAD: Traduce un `DispatchRequest` al formato de la API
 * de Mensajes de Anthropic.
 */

use super::{classify_status, snippet, ProviderVariant, VariantContext};
use crate::errors::ProviderError;
use serde_json::json;
use snapcast_domain_models::{DispatchOutcome, DispatchRequest};
use std::env;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct ClaudeVariant;

#[async_trait::async_trait]
impl ProviderVariant for ClaudeVariant {
    async fn call(
        &self,
        ctx: &VariantContext<'_>,
        request: &DispatchRequest,
    ) -> Result<DispatchOutcome, ProviderError> {
        let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
            ProviderError::ConfigMissing("ANTHROPIC_API_KEY not set".to_string())
        })?;

        let body = json!({
            "model": ctx.config.model_id,
            "system": request.system_prompt,
            "max_tokens": ctx.config.max_tokens.unwrap_or(4096),
            "temperature": ctx.config.temperature,
            "messages": [
                { "role": "user", "content": request.user_prompt },
            ],
        });

        let response = ctx
            .http
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transient(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &snippet(&body_text)));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseFailure(format!("invalid JSON body: {e}")))?;

        let text = payload["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::ParseFailure("missing content[0].text".to_string())
            })?
            .to_string();

        Ok(DispatchOutcome::Success {
            text,
            citations: Vec::new(),
        })
    }
}
