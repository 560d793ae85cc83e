//! Modelos de datos
//!
//! Este módulo contiene los objetos de valor que se envían a la plataforma.

pub mod order;
pub mod order_status;
pub mod pickup_point;
pub mod warehouse;

pub use order::*;
pub use order_status::*;
pub use pickup_point::*;
pub use warehouse::*;
