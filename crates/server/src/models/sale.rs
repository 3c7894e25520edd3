//! Sale domain types.

use chrono::{DateTime, Utc};

use apotheca_core::{Money, SaleId, UserId};

/// A completed checkout (domain type).
///
/// Created exactly once per successful checkout and immutable afterward.
#[derive(Debug, Clone)]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// The attendant who rang the sale up.
    pub attendant: UserId,
    /// Customer name snapshot.
    pub customer_name: String,
    /// Invoice reference in the form `INV<unix_timestamp>`.
    pub invoice_number: String,
    /// When the sale was committed.
    pub sold_at: DateTime<Utc>,
    /// Sum of line totals at checkout time.
    pub total: Money,
}
