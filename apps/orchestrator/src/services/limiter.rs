// [apps/orchestrator/src/services/limiter.rs]
/*!
 * APARATO: LIMITADOR DE CONCURRENCIA Y TIEMPO DE ESPERA (C10)
 * RESPONSABILIDAD: Pool acotado de trabajos pesados — admision limitada
 * por un `Semaphore` (FIFO de espera justa por construccion), cada
 * trabajo corriendo bajo un plazo de reloj cancelable
 * (spec.md §4.10). Las llamadas a proveedores de C2/C6 no comparten
 * este pool; tienen su propio acotamiento por llamada y envoltura de
 * reintento (`snapcast_domain_providers::retry::with_retry`).
 */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum LimiterError {
    #[error("timeout {0}ms")]
    Timeout(u64),
}

pub struct BoundedPool {
    semaphore: Arc<Semaphore>,
    timeout: Duration,
    timeout_ms: u64,
}

impl BoundedPool {
    pub fn new(concurrency: usize, timeout: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            timeout_ms: timeout.as_millis() as u64,
            timeout,
        }
    }

    /// Admite `job` cuando hay un cupo libre — el orden de llegada a la
    /// cola de espera del `Semaphore` es FIFO, satisfaciendo
    /// "waiting work queues in order of arrival" (spec.md §4.10).
    /// El plazo corre desde la admision, no desde la llegada: el tiempo
    /// en la cola de espera no cuenta contra el presupuesto del trabajo.
    pub async fn run<F, T>(&self, job: F) -> Result<T, LimiterError>
    where
        F: Future<Output = T>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("semaphore never closed");

        tokio::time::timeout(self.timeout, job)
            .await
            .map_err(|_| LimiterError::Timeout(self.timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn job_exceeding_deadline_surfaces_timeout_error() {
        let pool = BoundedPool::new(4, Duration::from_millis(20));
        let result = pool
            .run(async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                "never reached"
            })
            .await;

        assert!(matches!(result, Err(LimiterError::Timeout(20))));
    }

    #[tokio::test]
    async fn job_within_deadline_completes_normally() {
        let pool = BoundedPool::new(4, Duration::from_millis(200));
        let result = pool.run(async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn admission_never_exceeds_configured_concurrency() {
        let pool = Arc::new(BoundedPool::new(2, Duration::from_millis(500)));
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_observed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let pool = pool.clone();
            let concurrent = concurrent.clone();
            let max_observed = max_observed.clone();
            handles.push(tokio::spawn(async move {
                pool.run(async {
                    let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                    max_observed.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    concurrent.fetch_sub(1, Ordering::SeqCst);
                })
                .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(max_observed.load(Ordering::SeqCst) <= 2);
    }
}
