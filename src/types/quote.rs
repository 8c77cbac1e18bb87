//! Normalization of priced inputs into `(price, quantity)` pairs.
//!
//! Price discovery works on bare pairs. Anything exposing a price and a
//! quantity can be handed to it: tuples, [`Order`]s, or references to either.

use crate::types::order::Order;
use crate::types::price::{Price, Quantity};

/// A priced quantity on one side of the book.
pub trait Quote {
    fn price(&self) -> Price;
    fn quantity(&self) -> Quantity;

    /// The `(price, quantity)` pair for this quote
    #[inline]
    fn to_pair(&self) -> (Price, Quantity) {
        (self.price(), self.quantity())
    }
}

impl Quote for (Price, Quantity) {
    #[inline]
    fn price(&self) -> Price {
        self.0
    }

    #[inline]
    fn quantity(&self) -> Quantity {
        self.1
    }
}

impl Quote for Order {
    #[inline]
    fn price(&self) -> Price {
        self.price
    }

    #[inline]
    fn quantity(&self) -> Quantity {
        self.quantity
    }
}

impl<T: Quote + ?Sized> Quote for &T {
    #[inline]
    fn price(&self) -> Price {
        (**self).price()
    }

    #[inline]
    fn quantity(&self) -> Quantity {
        (**self).quantity()
    }
}
