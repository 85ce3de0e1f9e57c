//! Downstream reports built after the metrics stage
//!
//! * [`lowest_price`] ranks pharmacy chains by average price per drug
//! * [`top_quantity`] finds the most commonly prescribed quantities per drug

pub mod lowest_price;
pub mod top_quantity;

pub use lowest_price::{calculate_lowest_avg_prices, lowest_price_chains};
pub use top_quantity::{
    QuantityCounts, calculate_top_prescribed_quantities, top_prescribed_quantities,
};
