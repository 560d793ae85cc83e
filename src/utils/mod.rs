//! Utilidades del cliente
//!
//! Este módulo contiene el manejo de errores, la decodificación de JWT,
//! la codificación de parámetros y el colaborador de logging.

pub mod encoding;
pub mod errors;
pub mod jwt;
pub mod logger;
