// [libs/domain/providers/src/variants/openai.rs]
/*!
 * APARATO: OPENAI-FAMILY ADAPTER
 * RESPONSABILIDAD: Traduce un `DispatchRequest` al formato de
 * Chat Completions de OpenAI. Cubre tambien los modelos de
 * razonamiento (o1/o3-style) que rechazan `temperature`.
 */

use super::{classify_status, snippet, ProviderVariant, VariantContext};
use crate::errors::ProviderError;
use serde_json::json;
use snapcast_domain_models::{DispatchOutcome, DispatchRequest};
use std::env;

pub struct OpenAiVariant;

#[async_trait::async_trait]
impl ProviderVariant for OpenAiVariant {
    async fn call(
        &self,
        ctx: &VariantContext<'_>,
        request: &DispatchRequest,
    ) -> Result<DispatchOutcome, ProviderError> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::ConfigMissing("OPENAI_API_KEY not set".to_string())
        })?;

        let is_reasoning_model = ctx.config.model_id.starts_with('o');

        let mut body = json!({
            "model": ctx.config.model_id,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(max_tokens) = ctx.config.max_tokens {
                obj.insert("max_completion_tokens".into(), json!(max_tokens));
            }
            // Los modelos de razonamiento no aceptan temperature/top_p.
            if !is_reasoning_model {
                if let Some(temperature) = ctx.config.temperature {
                    obj.insert("temperature".into(), json!(temperature));
                }
                if let Some(top_p) = ctx.config.top_p {
                    obj.insert("top_p".into(), json!(top_p));
                }
            } else if let Some(effort) = &ctx.config.reasoning_effort {
                obj.insert("reasoning_effort".into(), json!(effort));
            }
            if request.expects_json {
                obj.insert(
                    "response_format".into(),
                    json!({ "type": "json_object" }),
                );
            }
        }

        let response = ctx
            .http
            .post("https://api.openai.com/v1/chat/completions")
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

        Ok(DispatchOutcome::Success {
            text,
            citations: Vec::new(),
        })
    }
}
