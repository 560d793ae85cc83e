//! Paginación de puntos de recogida

use serde::{Deserialize, Serialize};

/// Página de puntos de recogida a consultar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointsQuery {
    pub page_size: u32,
    pub page_number: u32,
}

impl PickupPointsQuery {
    pub const DEFAULT_PAGE_SIZE: u32 = 1000;

    pub fn new(page_size: u32, page_number: u32) -> Self {
        Self {
            page_size,
            page_number,
        }
    }

    /// Página siguiente con el mismo tamaño
    pub fn next_page(&self) -> Self {
        Self::new(self.page_size, self.page_number.saturating_add(1))
    }
}

impl Default for PickupPointsQuery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, 0)
    }
}
