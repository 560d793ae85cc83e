//! Sistema de manejo de errores
//!
//! Este módulo define el único tipo de error que ve el llamador y la forma
//! normalizada de los cuatro tipos de fallo que devuelve la plataforma remota.

use thiserror::Error;

/// Errores principales del cliente
#[derive(Error, Debug)]
pub enum ApiError {
    /// Argumentos inválidos detectados antes de cualquier llamada de red
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// El token cacheado (o recién generado) no se puede decodificar
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Devuelve el error remoto normalizado, si lo es
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            ApiError::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

/// Fallos del transporte HTTP (DNS, conexión rechazada, timeout...)
///
/// No se traducen: el error de `reqwest` se conserva tal cual.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP transport error: {0}")]
    Other(String),
}

/// Tipo de fallo remoto que originó el error normalizado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Cuerpo vacío, falso o no decodificable como JSON
    EmptyResponse,
    /// Respuesta con campo `fault`
    Fault,
    /// Respuesta con campo `error`
    Error,
    /// Respuesta con `status` distinto de OK
    Business,
}

/// Error remoto normalizado
///
/// `status` es el código HTTP, salvo para [`RemoteErrorKind::Error`], donde la
/// plataforma informa su propio `status` en el cuerpo y es ese el que se guarda.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
    pub status: i64,
    pub raw_body: String,
    pub raw_request: String,
}

impl RemoteError {
    pub fn new(
        kind: RemoteErrorKind,
        message: impl Into<String>,
        status: i64,
        raw_body: impl Into<String>,
        raw_request: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            raw_body: raw_body.into(),
            raw_request: raw_request.into(),
        }
    }
}

/// Resultado tipado para operaciones del cliente
pub type ApiResult<T> = Result<T, ApiError>;

/// Función helper para crear errores de entrada inválida
pub fn invalid_input(message: impl Into<String>) -> ApiError {
    ApiError::InvalidInput(message.into())
}
