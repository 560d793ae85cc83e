//! Cliente API para la plataforma de entregas en puntos de recogida (PVZ)
//!
//! Este crate expone un cliente async tipado sobre la API REST de la plataforma:
//! puntos de recogida, almacenes, creación y cancelación de pedidos, y consulta
//! de estados. La autenticación se hace intercambiando la API key por un token
//! bearer (JWT) de vida corta.
//!
//! ```rust,no_run
//! use pvz_client::{ApiClient, ClientConfig, Environment, OrderReference, PickupPointsQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pvz_client::ApiError> {
//!     let config = ClientConfig::new("my-api-key").with_environment(Environment::Test);
//!     let client = ApiClient::with_config(config)?;
//!
//!     let points = client.get_pickup_points(PickupPointsQuery::default()).await?;
//!     println!("{}", points);
//!
//!     let history = client
//!         .get_order_status_history(&OrderReference::by_order_id("ORDER-1"))
//!         .await?;
//!     println!("{}", history);
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use clients::{
    ApiClient, ApiClientBuilder, BodyFormat, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    InterceptedTransport, RequestBody, RequestInterceptor, ReqwestTransport,
};
pub use config::{ClientConfig, Environment};
pub use models::{Order, OrderReference, PickupPointsQuery, StatusQuery, Warehouse};
pub use services::credentials::{BearerAuthInterceptor, Credentials};
pub use utils::errors::{ApiError, ApiResult, RemoteError, RemoteErrorKind, TransportError};
pub use utils::jwt::TokenClaims;
pub use utils::logger::{LogRequestLogger, RequestLogger};
