// [libs/domain/providers/src/errors.rs]
/*!
 * APARATO: PROVIDER ERROR CATALOG
 * RESPONSABILIDAD: Catalogacion semantica de fallos del estrato de
 * despacho, alineada con la taxonomia de SPEC_FULL.md §7.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Ningun modelo configurado para el rol, o credenciales ausentes.
    /// Falla rapido en la construccion del despachador.
    #[error("[PROVIDER_CONFIG_FAULT]: {0}")]
    ConfigMissing(String),

    /// 429/5xx/gateway/timeout/aborted — candidato a reintento dentro
    /// del presupuesto de la llamada.
    #[error("[PROVIDER_TRANSIENT_FAULT]: {0}")]
    Transient(String),

    /// 4xx distinto de 429, o respuesta vacia no transitoria.
    #[error("[PROVIDER_PERMANENT_FAULT]: {0}")]
    Permanent(String),

    /// Se esperaba JSON y el cuerpo no pudo interpretarse como tal.
    #[error("[PROVIDER_PARSE_FAULT]: {0}")]
    ParseFailure(String),
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient(_))
    }
}
