// [libs/domain/providers/src/retry.rs]
/*!
 * APARATO: BOUNDED RETRY WRAPPER
 * RESPONSABILIDAD: Reintenta una llamada de proveedor con backoff
 * exponencial, acotado por un presupuesto total de tiempo, y
 * unicamente cuando el fallo esta marcado como transitorio —
 * SPEC_FULL.md §4.10. Nunca reintenta sobre fallas permanentes ni de
 * configuracion.
 */

use crate::errors::ProviderError;
use snapcast_domain_models::DispatchOutcome;
use std::future::Future;
use std::time::{Duration, Instant};

const MAX_BACKOFF: Duration = Duration::from_secs(3);
const TOTAL_BUDGET: Duration = Duration::from_secs(45);
const BASE_BACKOFF_MS: u64 = 250;

/// Ejecuta `attempt` hasta que tenga exito, agote el presupuesto de
/// tiempo, o falle con un error no transitorio.
pub async fn with_retry<F, Fut>(mut attempt: F) -> Result<DispatchOutcome, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DispatchOutcome, ProviderError>>,
{
    let deadline = Instant::now() + TOTAL_BUDGET;
    let mut attempt_number: u32 = 0;

    loop {
        match attempt().await {
            Ok(outcome) => return Ok(outcome),
            Err(err) if err.is_transient() && Instant::now() < deadline => {
                let backoff = backoff_for(attempt_number);
                tracing::warn!(
                    attempt = attempt_number,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "⏳ reintento transitorio de proveedor"
                );
                tokio::time::sleep(backoff).await;
                attempt_number += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn backoff_for(attempt_number: u32) -> Duration {
    let exponent = attempt_number.min(8);
    let millis = BASE_BACKOFF_MS.saturating_mul(1u64 << exponent);
    Duration::from_millis(millis).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_retry(move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(ProviderError::Transient("not yet".to_string()))
                } else {
                    Ok(DispatchOutcome::Success {
                        text: "ok".to_string(),
                        citations: Vec::new(),
                    })
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn never_retries_permanent_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_retry(move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::Permanent("bad request".to_string()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
