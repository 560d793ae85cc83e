//! Utilidades JWT
//!
//! Decodificación estructural del token bearer que emite la plataforma. No se
//! verifica la firma (no tenemos la clave pública) ni la expiración: solo se
//! comprueba que el token tenga forma de JWT y que su payload sea legible.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::errors::ApiError;

/// Claims del token bearer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenClaims {
    /// Momento de expiración, si el token lo declara
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Verificar si el token ha expirado (sin `exp` se considera vigente)
    pub fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => exp <= Utc::now().timestamp(),
            None => false,
        }
    }
}

/// Validar formato de token (básico)
pub fn validate_token_format(token: &str) -> Result<(), ApiError> {
    if token.is_empty() {
        return Err(ApiError::MalformedToken("Token no puede estar vacío".to_string()));
    }

    if token.split('.').count() != 3 {
        return Err(ApiError::MalformedToken(
            "Token debe tener 3 partes separadas por puntos".to_string(),
        ));
    }

    Ok(())
}

/// Decodificar el token sin verificar firma ni expiración
pub fn decode_claims(token: &str) -> Result<TokenClaims, ApiError> {
    validate_token_format(token)?;

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::MalformedToken(format!("Token inválido: {}", e)))
}
