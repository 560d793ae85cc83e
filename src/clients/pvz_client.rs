//! Cliente HTTP para la plataforma de puntos de recogida
//!
//! Todas las operaciones pasan por `dispatch`, que construye la petición, la
//! envía por el transporte (con el interceptor de autorización delante),
//! decodifica el JSON y normaliza los cuatro tipos de error remoto. La
//! generación de tokens usa el transporte sin interceptores.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};

use crate::clients::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, InterceptedTransport, RequestBody,
    RequestInterceptor, ReqwestTransport,
};
use crate::config::environment::ClientConfig;
use crate::models::order::{CreateOrdersRequest, Order};
use crate::models::order_status::{OrderReference, StatusQuery};
use crate::models::pickup_point::PickupPointsQuery;
use crate::services::credentials::{BearerAuthInterceptor, Credentials};
use crate::utils::encoding::encode_form;
use crate::utils::errors::{invalid_input, ApiError, ApiResult, RemoteError, RemoteErrorKind};
use crate::utils::jwt::TokenClaims;
use crate::utils::logger::RequestLogger;

pub const TOKEN_PATH: &str = "/jwt-generate-claims/rs256/1";
pub const TOKEN_SUBJECT: &str = "OpenAPI";
pub const TOKEN_AUDIENCE: &str = "A122019!";

pub const PICKUP_POINTS_PATH: &str = "/api/v1/pickuppoints/query";
pub const WAREHOUSE_PATH: &str = "/api/v1/warehouse";
pub const CREATE_ORDER_PATH: &str = "/api/v1/createOrder";
pub const CANCEL_ORDER_PATH: &str = "/api/v1/cancelOrder";
pub const ORDER_STATUS_PATH: &str = "/api/v1/getOrderStatus";
pub const ORDER_HISTORY_PATH: &str = "/api/v1/getOrderHistory";

/// Serialización del cuerpo de un POST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    /// `application/x-www-form-urlencoded`, solo para generar tokens
    Form,
}

/// Cliente API de la plataforma
pub struct ApiClient {
    credentials: Arc<Credentials>,
    transport: Arc<dyn HttpTransport>,
    /// Transporte sin interceptores, solo para generar tokens
    token_transport: Arc<dyn HttpTransport>,
    logger: Option<Arc<dyn RequestLogger>>,
    timeout: Duration,
}

/// Constructor del cliente con colaboradores inyectables
pub struct ApiClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    logger: Option<Arc<dyn RequestLogger>>,
}

impl ApiClientBuilder {
    /// Sustituir el transporte `reqwest` por defecto
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Interceptor adicional, ejecutado después del de autorización
    pub fn interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn RequestLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self) -> ApiResult<ApiClient> {
        if self.config.api_key.is_empty() {
            return Err(ApiError::Config("la api key no puede estar vacía".to_string()));
        }

        let inner: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(self.config.base_url.clone())
                    .map_err(|e| ApiError::Config(format!("no se pudo crear el cliente HTTP: {}", e)))?,
            ),
        };

        let credentials = Arc::new(Credentials::new(self.config.api_key));
        let mut pipeline = InterceptedTransport::new(inner.clone())
            .with_interceptor(Arc::new(BearerAuthInterceptor::new(credentials.clone())));
        for interceptor in self.interceptors {
            pipeline = pipeline.with_interceptor(interceptor);
        }

        Ok(ApiClient {
            credentials,
            transport: Arc::new(pipeline),
            token_transport: inner,
            logger: self.logger,
            timeout: self.config.timeout,
        })
    }
}

impl ApiClient {
    /// Cliente de producción con el timeout por defecto
    pub fn new(api_key: impl Into<String>) -> ApiResult<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            transport: None,
            interceptors: Vec::new(),
            logger: None,
        }
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    // ---- Token ----

    /// Token vigente: el cacheado (validado estructuralmente) o uno nuevo
    pub async fn get_token(&self) -> ApiResult<String> {
        match self.credentials.validated().await? {
            Some(token) => Ok(token),
            None => self.refresh_token().await,
        }
    }

    /// Pedir un token nuevo a la plataforma y cachearlo
    pub async fn refresh_token(&self) -> ApiResult<String> {
        log::info!("🔑 Solicitando token a la plataforma");

        let params = json!({ "subject": TOKEN_SUBJECT, "audience": TOKEN_AUDIENCE });
        let request = build_request(HttpMethod::Post, TOKEN_PATH, &params, BodyFormat::Form)?
            .with_query(format!(
                "apikey={}",
                urlencoding::encode(self.credentials.api_key())
            ));
        let response = self.execute(self.token_transport.as_ref(), request).await?;

        let token = response
            .get("jwt")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ApiError::MalformedToken("la respuesta no contiene el campo jwt".to_string())
            })?
            .to_string();

        self.credentials.set(token.clone()).await;
        log::info!("✅ Token obtenido y cacheado");
        Ok(token)
    }

    /// Sustituir el token cacheado (p. ej. uno guardado por otro proceso)
    pub async fn set_token(&self, token: impl Into<String>) {
        self.credentials.set(token).await;
        log::debug!("🔑 Token cacheado sustituido manualmente");
    }

    /// Olvidar el token cacheado; la próxima operación pedirá uno nuevo
    pub async fn clear_token(&self) {
        self.credentials.clear().await;
    }

    pub async fn token_claims(&self) -> ApiResult<Option<TokenClaims>> {
        self.credentials.claims().await
    }

    // ---- Operaciones ----

    /// Listar puntos de recogida (una página)
    pub async fn get_pickup_points(&self, query: PickupPointsQuery) -> ApiResult<Value> {
        self.get_token().await?;
        self.post_json(PICKUP_POINTS_PATH, &query).await
    }

    /// Registrar almacenes; la lista viaja tal cual
    pub async fn add_warehouses<W: Serialize>(&self, warehouses: &[W]) -> ApiResult<Value> {
        self.get_token().await?;
        self.post_json(WAREHOUSE_PATH, &warehouses).await
    }

    /// Crear pedidos
    pub async fn create_orders(&self, orders: &[Order]) -> ApiResult<Value> {
        let params = create_orders_params(orders)?;
        self.get_token().await?;
        self.dispatch(HttpMethod::Post, CREATE_ORDER_PATH, &params, BodyFormat::Json)
            .await
    }

    /// Cancelar un pedido por su id
    pub async fn cancel_order(&self, order_id: &str) -> ApiResult<Value> {
        if order_id.is_empty() {
            return Err(invalid_input("el id del pedido no puede estar vacío"));
        }

        let path = format!("{}/{}", CANCEL_ORDER_PATH, urlencoding::encode(order_id));
        self.get_token().await?;
        self.dispatch(HttpMethod::Delete, &path, &json!({}), BodyFormat::Json)
            .await
    }

    /// Estado actual de varios pedidos
    pub async fn get_orders_status(&self, references: &[OrderReference]) -> ApiResult<Value> {
        let queries = StatusQuery::batch(references)?;
        self.get_token().await?;
        self.post_json(ORDER_STATUS_PATH, &queries).await
    }

    /// Historial de estados de un pedido
    pub async fn get_order_status_history(&self, reference: &OrderReference) -> ApiResult<Value> {
        let query = StatusQuery::from_reference(reference)?;
        self.get_token().await?;
        self.post_json(ORDER_HISTORY_PATH, &query).await
    }

    // ---- Dispatch ----

    async fn post_json<P: Serialize + ?Sized>(&self, path: &str, params: &P) -> ApiResult<Value> {
        let params = serde_json::to_value(params)?;
        self.dispatch(HttpMethod::Post, path, &params, BodyFormat::Json)
            .await
    }

    /// Ejecutar una llamada remota y normalizar su respuesta
    pub async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Value,
        format: BodyFormat,
    ) -> ApiResult<Value> {
        let request = build_request(method, path, params, format)?;
        self.execute(self.transport.as_ref(), request).await
    }

    async fn execute(
        &self,
        transport: &dyn HttpTransport,
        request: HttpRequest,
    ) -> ApiResult<Value> {
        let method = request.method;
        let path = request.path.clone();
        let raw_request = request.to_raw();

        if let Some(logger) = &self.logger {
            logger.info(
                &format!("{} {}", method, path),
                &json!({ "request": raw_request }),
            );
        }

        let response = transport.send(request, self.timeout).await?;

        if let Some(logger) = &self.logger {
            logger.info(
                &format!("{} {} {}", method, path, response.body),
                &json!({ "headers": response.headers, "status": response.status }),
            );
        }

        normalize_response(method, &path, &response, &raw_request)
    }
}

/// Parámetros del endpoint de creación de pedidos
pub fn create_orders_params(orders: &[Order]) -> ApiResult<Value> {
    Ok(serde_json::to_value(CreateOrdersRequest {
        partner_orders: orders,
    })?)
}

fn build_request(
    method: HttpMethod,
    path: &str,
    params: &Value,
    format: BodyFormat,
) -> ApiResult<HttpRequest> {
    let request = HttpRequest::new(method, path);

    let request = match method {
        HttpMethod::Delete => request.with_query(encode_form(params)),
        HttpMethod::Post => match format {
            BodyFormat::Json => request.with_body(RequestBody::json(serde_json::to_string(params)?)),
            BodyFormat::Form => request.with_body(RequestBody::form(encode_form(params))),
        },
    };

    Ok(request)
}

/// Convertir la respuesta en el valor decodificado o en un `RemoteError`
pub fn normalize_response(
    method: HttpMethod,
    path: &str,
    response: &HttpResponse,
    raw_request: &str,
) -> ApiResult<Value> {
    let http_status = i64::from(response.status);
    let remote = |kind, message: String, status| {
        ApiError::Remote(RemoteError::new(
            kind,
            message,
            status,
            response.body.as_str(),
            raw_request,
        ))
    };

    let decoded: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);

    if is_falsy(&decoded) {
        return Err(remote(
            RemoteErrorKind::EmptyResponse,
            format!("Respuesta vacía de {} {}", method, path),
            http_status,
        ));
    }

    if let Some(fault) = decoded.get("fault").filter(|fault| !is_falsy(fault)) {
        let fault_string = fault.get("faultstring").map(value_text).unwrap_or_default();
        return Err(remote(
            RemoteErrorKind::Fault,
            format!("Fallo remoto: {}", fault_string),
            http_status,
        ));
    }

    if let Some(error) = decoded.get("error").filter(|error| !is_falsy(error)) {
        let message = decoded.get("message").map(value_text).unwrap_or_default();
        let body_status = decoded.get("status").map(status_code).unwrap_or(0);
        return Err(remote(
            RemoteErrorKind::Error,
            format!("{}: {}", value_text(error), message),
            body_status,
        ));
    }

    if let Some(status) = decoded.get("status").filter(|status| !status.is_null()) {
        if !matches!(status.as_str(), Some("OK") | Some("ok")) {
            let description = decoded.get("description").map(value_text).unwrap_or_default();
            let id = decoded.get("id").map(value_text).unwrap_or_default();
            return Err(remote(
                RemoteErrorKind::Business,
                format!("{} (id: {})", description, id),
                http_status,
            ));
        }
    }

    Ok(decoded)
}

/// Valores que la plataforma usa como "vacío"
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn status_code(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|n| n as i64))
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
