//! Order collection for the call auction.
//!
//! ## Components
//!
//! - [`PriceLevel`]: aggregated orders at a single price
//! - [`CallBook`]: the collection window, bids and offers by price
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order | O(log n) |
//! | Cancel order by ID | O(log n + k) |
//! | Best bid/offer | O(log n) |
//! | Price book snapshot | O(levels) |

pub mod level;
pub mod book;

pub use level::PriceLevel;
pub use book::CallBook;
