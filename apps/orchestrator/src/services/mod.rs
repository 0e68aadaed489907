// [apps/orchestrator/src/services/mod.rs]
/*!
 * APARATO: REGISTRO DE SERVICIOS DE APLICACION
 * RESPONSABILIDAD: Un modulo por componente del pipeline de estrategia
 * (SPEC_FULL.md §2): los tres runners de rol (C2), el orquestador de
 * admision (C4), el consolidador (C6), el supervisor del oyente de
 * cambios (C5), el controlador de reintento (C9) y el limitador de
 * concurrencia (C10).
 */

pub mod admission;
pub mod briefer;
pub mod consolidator;
pub mod holiday;
pub mod limiter;
pub mod listener;
pub mod retry_controller;
pub mod strategist;
