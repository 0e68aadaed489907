// [libs/domain/providers/src/config.rs]
/*!
 * APARATO: ROLE CONFIGURATION RESOLVER
 * RESPONSABILIDAD: Traduce las variables de entorno `STRATEGY_<ROL>*`
 * (SPEC_FULL.md §6) a un `RoleConfig` tipado por rol.
 */

use crate::errors::ProviderError;
use snapcast_domain_models::Role;
use std::env;

#[derive(Debug, Clone)]
pub struct RoleConfig {
    pub role: Role,
    pub model_id: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub reasoning_effort: Option<String>,
}

impl RoleConfig {
    /// Carga la configuracion de un rol desde el entorno del proceso.
    ///
    /// # Errors
    /// `ProviderError::ConfigMissing` si `STRATEGY_<ROL>` (el identificador
    /// del modelo) no esta definido — esto falla rapido en vez de diferir
    /// el error hasta la primera invocacion.
    pub fn from_env(role: Role) -> Result<Self, ProviderError> {
        let prefix = format!("STRATEGY_{}", role.env_key_fragment());

        let model_id = env::var(&prefix).map_err(|_| {
            ProviderError::ConfigMissing(format!(
                "no model configured for role (expected env var {prefix})"
            ))
        })?;

        Ok(Self {
            role,
            model_id,
            max_tokens: read_parsed(&format!("{prefix}_MAX_TOKENS")),
            temperature: read_parsed(&format!("{prefix}_TEMPERATURE")),
            top_p: read_parsed(&format!("{prefix}_TOP_P")),
            top_k: read_parsed(&format!("{prefix}_TOP_K")),
            reasoning_effort: env::var(format!("{prefix}_REASONING_EFFORT")).ok(),
        })
    }

    /// Familia de proveedor resuelta desde el prefijo del identificador
    /// de modelo — ver SPEC_FULL.md §4.1.
    pub fn provider_family(&self) -> ProviderFamily {
        ProviderFamily::from_model_id(&self.model_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    OpenAi,
    Claude,
    Gemini,
    Perplexity,
}

impl ProviderFamily {
    pub fn from_model_id(model_id: &str) -> Self {
        let lower = model_id.to_ascii_lowercase();
        if lower.starts_with("claude") {
            ProviderFamily::Claude
        } else if lower.starts_with("gemini") {
            ProviderFamily::Gemini
        } else if lower.starts_with("sonar") || lower.starts_with("perplexity") {
            ProviderFamily::Perplexity
        } else {
            ProviderFamily::OpenAi
        }
    }
}

fn read_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|raw| raw.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_resolves_by_model_prefix() {
        assert_eq!(ProviderFamily::from_model_id("gpt-4o-mini"), ProviderFamily::OpenAi);
        assert_eq!(ProviderFamily::from_model_id("claude-sonnet-4-5"), ProviderFamily::Claude);
        assert_eq!(ProviderFamily::from_model_id("gemini-2.0-flash"), ProviderFamily::Gemini);
        assert_eq!(ProviderFamily::from_model_id("sonar-pro"), ProviderFamily::Perplexity);
    }
}
