// [libs/domain/providers/src/variants/perplexity.rs]
/*!
 * APARATO: PERPLEXITY-FAMILY ADAPTER
 * RESPONSABILIDAD: Traduce un `DispatchRequest` al formato Chat
 * Completions de Perplexity (compatible con OpenAI) y extrae el
 * arreglo `citations` que la API agrega de forma nativa.
 */

use super::{classify_status, snippet, ProviderVariant, VariantContext};
use crate::errors::ProviderError;
use serde_json::json;
use snapcast_domain_models::{DispatchOutcome, DispatchRequest};
use std::env;

pub struct PerplexityVariant;

#[async_trait::async_trait]
impl ProviderVariant for PerplexityVariant {
    async fn call(
        &self,
        ctx: &VariantContext<'_>,
        request: &DispatchRequest,
    ) -> Result<DispatchOutcome, ProviderError> {
        let api_key = env::var("PERPLEXITY_API_KEY").map_err(|_| {
            ProviderError::ConfigMissing("PERPLEXITY_API_KEY not set".to_string())
        })?;

        let body = json!({
            "model": ctx.config.model_id,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "max_tokens": ctx.config.max_tokens,
            "temperature": ctx.config.temperature,
            "top_p": ctx.config.top_p,
        });

        let response = ctx
            .http
            .post("https://api.perplexity.ai/chat/completions")
            .bearer_auth(&api_key)
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

        let text = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::ParseFailure("missing choices[0].message.content".to_string())
            })?
            .to_string();

        let citations = payload["citations"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(DispatchOutcome::Success { text, citations })
    }
}
