//! Modelo de almacén del partner

use serde::{Deserialize, Serialize};

/// Almacén desde el que el partner entrega los envíos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    /// Identificador del almacén en el sistema del partner
    pub partner_location_id: String,
    pub name: String,
    pub region_code: String,
    pub federal_district: String,
    pub region: String,
    pub index: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
    pub coordinates: String,
    pub contact_phone_number: String,
    pub time_zone: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub working_time: Vec<WorkingDay>,
}

/// Horario de un día de la semana (`day_number` 1 = lunes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDay {
    pub day_number: u8,
    pub time_from: String,
    pub time_till: String,
}
