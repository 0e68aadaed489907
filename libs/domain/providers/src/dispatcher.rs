// [libs/domain/providers/src/dispatcher.rs]
/*!
 * =================================================================
 * APARATO: ROLE DISPATCHER (C1)
 * CLASIFICACIÓN: DOMAIN SERVICE (ESTRATO L2)
 * RESPONSABILIDAD: RESOLUCION DE ROL -> CONFIGURACION -> VARIANTE, Y
 * EJECUCION ACOTADA POR REINTENTO
 *
 * El despachador se construye una sola vez por proceso y falla rapido
 * si a algun rol le falta configuracion — nunca difiere ese error a la
 * primera invocacion en produccion. La resolucion de familia de
 * proveedor ocurre por invocacion porque el identificador de modelo
 * puede cambiar entre despliegues sin reiniciar el proceso.
 * =================================================================
 */

use crate::config::{ProviderFamily, RoleConfig};
use crate::errors::ProviderError;
use crate::retry::with_retry;
use crate::variants::{claude::ClaudeVariant, gemini::GeminiVariant, openai::OpenAiVariant, perplexity::PerplexityVariant};
use crate::variants::{ProviderVariant, VariantContext};
use snapcast_domain_models::{DispatchOutcome, DispatchRequest, Role};
use std::collections::HashMap;
use std::time::Duration;

pub struct RoleDispatcher {
    http: reqwest::Client,
    configs: HashMap<Role, RoleConfig>,
}

impl RoleDispatcher {
    /// Construye el despachador resolviendo la configuracion de todos
    /// los roles dados desde el entorno. Falla en la construccion si a
    /// cualquier rol le falta su modelo configurado.
    pub fn from_env(roles: &[Role]) -> Result<Self, ProviderError> {
        let mut configs = HashMap::with_capacity(roles.len());
        for role in roles {
            configs.insert(*role, RoleConfig::from_env(*role)?);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("snapcast-orchestrator/0.1")
            .build()
            .expect("fallo al inicializar el cliente HTTP del despachador");

        Ok(Self { http, configs })
    }

    #[tracing::instrument(skip(self, request), fields(role = ?request.role))]
    pub async fn dispatch(&self, request: DispatchRequest) -> DispatchOutcome {
        let config = match self.configs.get(&request.role) {
            Some(config) => config,
            None => {
                return DispatchOutcome::Failure {
                    error: format!("no config resolved for role {:?}", request.role),
                    transient: false,
                }
            }
        };

        let ctx = VariantContext {
            http: &self.http,
            config,
        };

        let variant: &dyn ProviderVariant = match config.provider_family() {
            ProviderFamily::OpenAi => &OpenAiVariant,
            ProviderFamily::Claude => &ClaudeVariant,
            ProviderFamily::Gemini => &GeminiVariant,
            ProviderFamily::Perplexity => &PerplexityVariant,
        };

        let result = with_retry(|| variant.call(&ctx, &request)).await;

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, role = ?request.role, "🔥 fallo definitivo de despacho");
                DispatchOutcome::Failure {
                    error: err.to_string(),
                    transient: err.is_transient(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_fails_fast_when_role_has_no_model_configured() {
        std::env::remove_var("STRATEGY_STRATEGIST");
        let result = RoleDispatcher::from_env(&[Role::Strategist]);
        assert!(result.is_err());
    }
}
