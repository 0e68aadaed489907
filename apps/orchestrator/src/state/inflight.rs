// [apps/orchestrator/src/state/inflight.rs]
/*!
 * APARATO: CACHE DE VUELO UNICO PARA LA BRIEFING
 * RESPONSABILIDAD: Garantizar que, dentro de este proceso, a lo sumo
 * una llamada al Generador de Briefing (C2b) este en curso por
 * snapshot — llamadas concurrentes a la misma clave reciben la misma
 * `Future` compartida en vez de disparar su propia consulta al
 * proveedor (spec.md §4.2 parrafo de "briefing row merge logic";
 * SPEC_FULL.md §9). La exclusion mutua entre procesos distintos es
 * responsabilidad del `AdvisoryLock` del consolidador, no de esta
 * cache, que solo vale dentro de un mismo proceso.
 */

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use snapcast_domain_models::BriefingRow;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

type SharedBriefing = Shared<BoxFuture<'static, Arc<BriefingRow>>>;

pub struct InflightCache {
    flights: Mutex<HashMap<Uuid, SharedBriefing>>,
}

impl InflightCache {
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Ejecuta `produce` para `snapshot_id` a lo sumo una vez por
    /// cohorte de llamadas concurrentes; todas las llamadas reciben el
    /// mismo resultado clonado. La entrada se retira del mapa al
    /// completarse para no acumular futuros resueltos indefinidamente.
    pub async fn run_single_flight<F>(&self, snapshot_id: Uuid, produce: F) -> Arc<BriefingRow>
    where
        F: FnOnce() -> BoxFuture<'static, BriefingRow>,
    {
        let existing = {
            let mut flights = self.flights.lock().await;
            match flights.get(&snapshot_id) {
                Some(shared) => Some(shared.clone()),
                None => {
                    let future: SharedBriefing = produce().map(Arc::new).boxed().shared();
                    flights.insert(snapshot_id, future.clone());
                    None
                }
            }
        };

        let shared = match existing {
            Some(shared) => shared,
            None => self
                .flights
                .lock()
                .await
                .get(&snapshot_id)
                .cloned()
                .expect("just inserted"),
        };

        let result = shared.await;

        let mut flights = self.flights.lock().await;
        flights.remove(&snapshot_id);

        result
    }
}

impl Default for InflightCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_for_the_same_snapshot_share_one_execution() {
        let cache = Arc::new(InflightCache::new());
        let call_count = Arc::new(AtomicU32::new(0));
        let snapshot_id = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..5 {
            let cache = cache.clone();
            let call_count = call_count.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .run_single_flight(snapshot_id, || {
                        let call_count = call_count.clone();
                        async move {
                            call_count.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            BriefingRow { snapshot_id, ..Default::default() }
                        }
                        .boxed()
                    })
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sequential_calls_after_completion_each_execute() {
        let cache = InflightCache::new();
        let call_count = Arc::new(AtomicU32::new(0));
        let snapshot_id = Uuid::new_v4();

        for _ in 0..2 {
            let call_count = call_count.clone();
            cache
                .run_single_flight(snapshot_id, || {
                    let call_count = call_count.clone();
                    async move {
                        call_count.fetch_add(1, Ordering::SeqCst);
                        BriefingRow { snapshot_id, ..Default::default() }
                    }
                    .boxed()
                })
                .await;
        }

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }
}
