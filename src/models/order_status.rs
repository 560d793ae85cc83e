//! Identificadores de pedido para consultas de estado
//!
//! La plataforma identifica un pedido por su propio id (`vendor_id`, que viaja
//! como `orderId`) o por el id del remitente (`order_id`, que viaja como
//! `senderOrderId`). Hace falta al menos uno; una cadena vacía cuenta como
//! ausente.

use serde::{Deserialize, Serialize};

use crate::utils::errors::{invalid_input, ApiError};

/// Par de identificadores de un pedido
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReference {
    pub order_id: Option<String>,
    pub vendor_id: Option<String>,
}

impl OrderReference {
    pub fn new(order_id: Option<String>, vendor_id: Option<String>) -> Self {
        Self { order_id, vendor_id }
    }

    /// Referencia por id del remitente
    pub fn by_order_id(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            vendor_id: None,
        }
    }

    /// Referencia por id de la plataforma
    pub fn by_vendor_id(vendor_id: impl Into<String>) -> Self {
        Self {
            order_id: None,
            vendor_id: Some(vendor_id.into()),
        }
    }
}

/// Parámetros de consulta de estado tal como viajan por la red
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_order_id: Option<String>,
}

impl StatusQuery {
    /// Construir la consulta; falla si no hay ningún identificador
    pub fn from_reference(reference: &OrderReference) -> Result<Self, ApiError> {
        let query = Self {
            order_id: non_empty(&reference.vendor_id),
            sender_order_id: non_empty(&reference.order_id),
        };

        if query.order_id.is_none() && query.sender_order_id.is_none() {
            return Err(invalid_input("se requiere order_id o vendor_id"));
        }

        Ok(query)
    }

    /// Construir el lote de consultas, indicando el índice del elemento inválido
    pub fn batch(references: &[OrderReference]) -> Result<Vec<Self>, ApiError> {
        references
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                Self::from_reference(reference).map_err(|_| {
                    invalid_input(format!(
                        "se requiere order_id o vendor_id en el elemento de índice {}",
                        index
                    ))
                })
            })
            .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
