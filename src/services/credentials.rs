//! Credenciales del cliente
//!
//! Guarda la API key y el token bearer cacheado. El mismo holder lo comparten
//! el cliente (que lo rellena) y el interceptor de autorización (que lo lee).
//! El token vive lo que vive el proceso: nunca se persiste.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::clients::transport::{HttpRequest, RequestInterceptor};
use crate::utils::errors::ApiError;
use crate::utils::jwt::{self, TokenClaims};

/// API key + token bearer cacheado
pub struct Credentials {
    api_key: String,
    token: RwLock<Option<String>>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            token: RwLock::new(None),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Token cacheado tal cual, sin decodificar
    pub async fn current(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Token cacheado, validado estructuralmente
    ///
    /// Un token que no se decodifica es un error; no se descarta ni se regenera.
    pub async fn validated(&self) -> Result<Option<String>, ApiError> {
        match self.current().await {
            Some(token) => {
                jwt::decode_claims(&token)?;
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    /// Claims del token cacheado
    pub async fn claims(&self) -> Result<Option<TokenClaims>, ApiError> {
        match self.current().await {
            Some(token) => jwt::decode_claims(&token).map(Some),
            None => Ok(None),
        }
    }

    /// Sustituir el token cacheado sin condiciones
    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}

/// Interceptor que añade `Authorization: Bearer <token>` si hay token cacheado
///
/// No obtiene tokens por sí mismo.
pub struct BearerAuthInterceptor {
    credentials: Arc<Credentials>,
}

impl BearerAuthInterceptor {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl RequestInterceptor for BearerAuthInterceptor {
    async fn intercept(&self, request: HttpRequest) -> HttpRequest {
        match self.credentials.current().await {
            Some(token) => request.with_header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}
