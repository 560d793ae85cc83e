//! Configuración del cliente
//!
//! Este módulo contiene la configuración de entorno (URLs base, API key,
//! timeout) del cliente.

pub mod environment;

pub use environment::*;
