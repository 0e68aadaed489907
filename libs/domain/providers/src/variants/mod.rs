// [libs/domain/providers/src/variants/mod.rs]
/*!
 * APARATO: PROVIDER VARIANTS
 * RESPONSABILIDAD: Un adaptador por familia de proveedor, cada uno
 * implementando la misma capacidad `call(ctx, request) -> Result<...>`.
 * Ninguna logica de reintento ni de limpieza de JSON vive aqui — solo
 * la traduccion wire-format de cada API externa.
 */

pub mod claude;
pub mod gemini;
pub mod openai;
pub mod perplexity;

use crate::config::RoleConfig;
use crate::errors::ProviderError;
use snapcast_domain_models::{DispatchOutcome, DispatchRequest};

/// Contexto compartido inyectado en cada variante: cliente HTTP
/// reutilizado y la configuracion resuelta del rol en curso.
pub struct VariantContext<'a> {
    pub http: &'a reqwest::Client,
    pub config: &'a RoleConfig,
}

/// Capacidad uniforme que cada familia de proveedor debe satisfacer.
#[async_trait::async_trait]
pub trait ProviderVariant {
    async fn call(
        &self,
        ctx: &VariantContext<'_>,
        request: &DispatchRequest,
    ) -> Result<DispatchOutcome, ProviderError>;
}

/// Clasifica un codigo de estado HTTP segun la taxonomia de
/// SPEC_FULL.md §7: 429 y 5xx son transitorios, el resto permanente.
pub(crate) fn classify_status(status: reqwest::StatusCode, body_snippet: &str) -> ProviderError {
    if status.as_u16() == 429 || status.is_server_error() {
        ProviderError::Transient(format!("http {status}: {body_snippet}"))
    } else {
        ProviderError::Permanent(format!("http {status}: {body_snippet}"))
    }
}

/// Trunca un cuerpo de error para que los mensajes de log permanezcan
/// legibles. Corta en el limite de caracter valido mas cercano a `MAX`
/// sin pasarse — un indice de bytes crudo puede caer en medio de un
/// caracter multi-byte y entrar en panico sobre una respuesta externa
/// valida.
pub(crate) fn snippet(body: &str) -> String {
    const MAX: usize = 240;
    if body.len() <= MAX {
        return body.to_string();
    }
    let cut = body
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= MAX)
        .last()
        .unwrap_or(0);
    format!("{}…", &body[..cut])
}
