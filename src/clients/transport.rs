//! Transporte HTTP
//!
//! Abstracción sobre el cliente HTTP: el cliente API construye peticiones
//! neutras (`HttpRequest`) y un `HttpTransport` las envía. La implementación por
//! defecto usa `reqwest`; los tests inyectan su propio transporte.
//!
//! Los interceptores (`RequestInterceptor`) se componen delante del transporte
//! con `InterceptedTransport` y se ejecutan una vez por envío.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::utils::errors::TransportError;

/// Métodos HTTP que usa la plataforma
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn to_reqwest_method(self) -> Method {
        match self {
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cuerpo ya serializado de una petición
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: &'static str,
    pub content: String,
}

impl RequestBody {
    pub const JSON: &'static str = "application/json";
    pub const FORM: &'static str = "application/x-www-form-urlencoded";

    pub fn json(content: String) -> Self {
        Self {
            content_type: Self::JSON,
            content,
        }
    }

    pub fn form(content: String) -> Self {
        Self {
            content_type: Self::FORM,
            content,
        }
    }
}

/// Petición independiente del cliente HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Ruta relativa a la URL base (`/api/v1/...`)
    pub path: String,
    /// Query string ya codificada, sin `?`
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: String) -> Self {
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Ruta con query string
    pub fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    fn redacted_target(&self) -> String {
        match &self.query {
            Some(query) => {
                let query = query
                    .split('&')
                    .map(|pair| match pair.split_once('=') {
                        Some((key, _)) if key.eq_ignore_ascii_case("apikey") => {
                            format!("{}=***", key)
                        }
                        _ => pair.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("&");
                format!("{}?{}", self.path, query)
            }
            None => self.path.clone(),
        }
    }

    /// Representación textual para logs y errores
    ///
    /// No incluye la cabecera `Authorization` y oculta el valor de `apikey`.
    pub fn to_raw(&self) -> String {
        let mut raw = format!("{} {}", self.method, self.redacted_target());
        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            raw.push_str(&format!("\n{}: {}", name, value));
        }
        if let Some(body) = &self.body {
            raw.push_str(&format!("\nContent-Type: {}\n\n{}", body.content_type, body.content));
        }
        raw
    }
}

/// Respuesta HTTP ya leída
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }
}

/// Transporte HTTP inyectable
///
/// Un status no 2xx no es un error del transporte: la respuesta se devuelve igual.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

/// Middleware que transforma la petición antes de enviarla
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn intercept(&self, request: HttpRequest) -> HttpRequest;
}

/// Transporte con una cadena de interceptores delante
pub struct InterceptedTransport {
    inner: Arc<dyn HttpTransport>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl InterceptedTransport {
    pub fn new(inner: Arc<dyn HttpTransport>) -> Self {
        Self {
            inner,
            interceptors: Vec::new(),
        }
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }
}

#[async_trait]
impl HttpTransport for InterceptedTransport {
    async fn send(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = request;
        for interceptor in &self.interceptors {
            request = interceptor.intercept(request).await;
        }
        self.inner.send(request, timeout).await
    }
}

/// Transporte por defecto sobre `reqwest`
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Crear nuevo transporte contra una URL base
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("pvz_client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Usar un `reqwest::Client` ya configurado
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &HttpRequest) -> String {
        format!("{}{}", self.base_url, request.target())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request);
        log::debug!("🌐 {} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.to_reqwest_method(), &url)
            .timeout(timeout)
            .header("Accept", "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder
                .header("Content-Type", body.content_type)
                .body(body.content);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
