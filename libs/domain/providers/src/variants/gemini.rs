// [libs/domain/providers/src/variants/gemini.rs]
/*!
 * APARATO: GEMINI-FAMILY ADAPTER
 * RESPONSABILIDAD: Traduce un `DispatchRequest` al formato
 * `generateContent` de Gemini, habilita la herramienta de busqueda
 * cuando el rol lo amerita, y extrae citas de `groundingMetadata`.
 * La salida de texto pasa por `json_cleanup` cuando se esperaba JSON,
 * porque Gemini tiende a envolver JSON en vallas de codigo Markdown.
 */

use super::{classify_status, snippet, ProviderVariant, VariantContext};
use crate::errors::ProviderError;
use crate::json_cleanup::cleanup_gemini_output;
use serde_json::json;
use snapcast_domain_models::{DispatchOutcome, DispatchRequest};
use std::env;

pub struct GeminiVariant;

#[async_trait::async_trait]
impl ProviderVariant for GeminiVariant {
    async fn call(
        &self,
        ctx: &VariantContext<'_>,
        request: &DispatchRequest,
    ) -> Result<DispatchOutcome, ProviderError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            ProviderError::ConfigMissing("GEMINI_API_KEY not set".to_string())
        })?;

        let mut generation_config = serde_json::Map::new();
        if let Some(max_tokens) = ctx.config.max_tokens {
            generation_config.insert("maxOutputTokens".into(), json!(max_tokens));
        }
        if let Some(temperature) = ctx.config.temperature {
            generation_config.insert("temperature".into(), json!(temperature));
        }
        if let Some(top_p) = ctx.config.top_p {
            generation_config.insert("topP".into(), json!(top_p));
        }
        if let Some(top_k) = ctx.config.top_k {
            generation_config.insert("topK".into(), json!(top_k));
        }

        let mut body = json!({
            "systemInstruction": { "parts": [{ "text": request.system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.user_prompt }] }],
            "generationConfig": generation_config,
        });

        if ctx.config.role.is_search_enabled_by_default() {
            body["tools"] = json!([{ "googleSearch": {} }]);
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            ctx.config.model_id, api_key
        );

        let response = ctx
            .http
            .post(&url)
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

        let candidate = &payload["candidates"][0];
        let raw_text = candidate["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::ParseFailure(
                    "missing candidates[0].content.parts[0].text".to_string(),
                )
            })?;

        let text = cleanup_gemini_output(raw_text, request.expects_json);

        let citations = candidate["groundingMetadata"]["groundingChunks"]
            .as_array()
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| chunk["web"]["uri"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(DispatchOutcome::Success { text, citations })
    }
}
