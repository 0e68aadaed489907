// [apps/orchestrator/tests/lock_contention.rs]
//! Escenario S5 de spec.md §8: dos procesos que observan la misma
//! notificacion `strategy_ready` para el mismo snapshot no deben
//! consolidar dos veces. Se simulan los "dos procesos" con dos pools
//! de una sola conexion cada uno, para garantizar que el candado de
//! asesoria vive en dos sesiones Postgres distintas (un candado de
//! asesoria es apilable dentro de la misma sesion, asi que probar la
//! contencion exige dos conexiones genuinamente separadas).

use snapcast_infra_db::{connect_pool, AdvisoryLock};
use uuid::Uuid;

#[ignore = "requires DATABASE_URL"]
#[tokio::test]
async fn second_worker_observes_contention_while_first_holds_the_lock() {
    let Ok(database_url) = std::env::var("DATABASE_URL") else { return };
    let pool_a = connect_pool(&database_url, 1).await.unwrap();
    let pool_b = connect_pool(&database_url, 1).await.unwrap();

    let snapshot_id = Uuid::new_v4();

    let mut lock_a = AdvisoryLock::new(&pool_a, snapshot_id);
    let mut lock_b = AdvisoryLock::new(&pool_b, snapshot_id);

    assert!(lock_a.try_acquire().await.unwrap(), "first worker acquires the lock");
    assert!(
        !lock_b.try_acquire().await.unwrap(),
        "second worker must observe contention, not acquire"
    );

    lock_a.release().await.unwrap();

    assert!(
        lock_b.try_acquire().await.unwrap(),
        "lock becomes available once the first worker releases it"
    );
    lock_b.release().await.unwrap();
}
