//! Core data types for the call auction
//!
//! ## Types
//!
//! - [`Order`]: A limit order collected during the auction window
//! - [`Side`]: Bid or Offer
//! - [`Quote`]: Anything exposing a price and a quantity
//! - [`Fill`]: The executed portion of one order
//! - [`ClearingReceipt`]: SSZ summary of one uncrossed auction
//!
//! Prices and quantities are exact decimals, see [`price`].

mod order;
mod quote;
mod fill;
mod receipt;
pub mod price;

pub use order::{Order, OrderId, Side, UserId};
pub use quote::Quote;
pub use fill::Fill;
pub use receipt::ClearingReceipt;
pub use price::{Price, Quantity};
