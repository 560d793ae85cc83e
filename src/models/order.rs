//! Modelo de pedido de partner
//!
//! Un `Order` representa un envío. Se serializa de forma determinista (orden
//! de campos del struct, claves camelCase, opcionales ausentes omitidos) al
//! objeto que espera el endpoint de creación de pedidos.

use serde::{Deserialize, Serialize};

/// Qué hacer con el envío si no se puede entregar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UndeliverableOption {
    Return,
    Utilization,
}

/// Forma de pago en el punto de recogida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Cashless,
    Prepayment,
}

/// Pedido de partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Identificador del pedido en el sistema del remitente
    pub sender_order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    pub brand_name: String,
    pub client_name: String,
    pub client_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    /// Almacén de origen (id devuelto al registrar almacenes)
    pub sender_location: String,
    /// Punto de recogida de destino
    pub receiver_location: String,
    pub undeliverable_option: UndeliverableOption,
    pub cost: OrderCost,
    pub cargoes: Vec<Cargo>,
}

/// Costes del pedido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCost {
    pub delivery_cost: f64,
    pub delivery_cost_currency: String,
    pub payment_value: f64,
    pub payment_currency: String,
    pub payment_type: PaymentType,
    pub price: f64,
    pub price_currency: String,
}

/// Bulto del pedido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub sender_cargo_id: String,
    pub barcodes: Vec<Barcode>,
    /// Dimensiones en milímetros
    pub height: u32,
    pub length: u32,
    pub width: u32,
    /// Peso en gramos
    pub weight: u32,
    pub price: f64,
    pub currency: String,
    pub vat: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_values: Vec<ProductValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    pub value: String,
}

/// Artículo contenido en un bulto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductValue {
    pub name: String,
    pub value: u32,
    pub price: f64,
    pub currency: String,
    pub vat: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "codeTNVED", skip_serializing_if = "Option::is_none")]
    pub code_tnved: Option<String>,
    #[serde(rename = "codeGTD", skip_serializing_if = "Option::is_none")]
    pub code_gtd: Option<String>,
}

/// Cuerpo del endpoint de creación de pedidos
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrdersRequest<'a> {
    pub partner_orders: &'a [Order],
}
