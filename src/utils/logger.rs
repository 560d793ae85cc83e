//! Colaborador de logging de peticiones
//!
//! El cliente no registra las peticiones por sí mismo: si se le inyecta un
//! `RequestLogger`, le pasa una línea antes de enviar y otra al recibir.

use serde_json::Value;

/// Logger de peticiones inyectable
pub trait RequestLogger: Send + Sync {
    /// Mensaje de nivel info con contexto estructurado (cabeceras, status...)
    fn info(&self, message: &str, context: &Value);
}

/// Adaptador que reenvía al facade `log`
#[derive(Debug, Clone, Default)]
pub struct LogRequestLogger {
    target: Option<String>,
}

impl LogRequestLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Usar un target de `log` propio en lugar del del módulo
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
        }
    }
}

impl RequestLogger for LogRequestLogger {
    fn info(&self, message: &str, context: &Value) {
        let target = self.target.as_deref().unwrap_or(module_path!());
        if context.is_null() {
            log::info!(target: target, "📡 {}", message);
        } else {
            log::info!(target: target, "📡 {} {}", message, context);
        }
    }
}
