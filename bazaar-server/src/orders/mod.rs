//! Order placement and fulfillment

pub mod engine;

pub use engine::{OrderLineInput, PlaceOrderRequest};
