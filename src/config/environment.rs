//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del cliente: API key, URL base y timeout.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::ApiError;

/// Timeout por defecto de cada petición (5 minutos)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Entornos de la plataforma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Entorno de preproducción / pruebas
    Test,
    #[default]
    Production,
}

impl Environment {
    /// URL base del entorno
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Test => "https://api-preprod-omni.x5.ru",
            Environment::Production => "https://api-omni.x5.ru",
        }
    }
}

impl FromStr for Environment {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "test" | "preprod" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ApiError::Config(format!("entorno desconocido '{}'", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Configuración del cliente
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Configuración de producción con el timeout por defecto
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Environment::Production.base_url().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.base_url = environment.base_url().to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Cargar la configuración desde variables de entorno (y `.env` si existe)
    ///
    /// - `PARCEL_API_KEY` (obligatoria)
    /// - `PARCEL_ENVIRONMENT`: `test`/`preprod` o `production`/`prod`
    /// - `PARCEL_BASE_URL`: sustituye la URL del entorno
    /// - `PARCEL_TIMEOUT_SECS`: timeout en segundos
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("PARCEL_API_KEY")
            .map_err(|_| ApiError::Config("PARCEL_API_KEY debe estar definida".to_string()))?;
        let mut config = Self::new(api_key);

        if let Ok(name) = env::var("PARCEL_ENVIRONMENT") {
            config = config.with_environment(name.parse()?);
        }

        if let Ok(base_url) = env::var("PARCEL_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        if let Ok(timeout) = env::var("PARCEL_TIMEOUT_SECS") {
            let seconds = timeout.trim().parse::<u64>().map_err(|_| {
                ApiError::Config("PARCEL_TIMEOUT_SECS debe ser un número válido".to_string())
            })?;
            config = config.with_timeout_secs(seconds);
        }

        Ok(config)
    }

    /// Verificar si apuntamos al entorno de producción
    pub fn is_production(&self) -> bool {
        self.base_url == Environment::Production.base_url()
    }
}
