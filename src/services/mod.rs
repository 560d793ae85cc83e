//! Servicios del cliente
//!
//! Este módulo contiene la gestión de credenciales (API key y token bearer).

pub mod credentials;

pub use credentials::{BearerAuthInterceptor, Credentials};
