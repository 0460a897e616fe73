//! The fixed output field set extracted from a confirmation note

/// Fields extracted from one confirmation note.
///
/// This is the complete, fixed set of output fields; the reconciler stores
/// exactly these and ignores anything else an oracle response carries. Every
/// field is an optional string: "not found in the document" is a typed
/// absence, not a missing key.
///
/// Values are kept as the oracle reported them (amounts, dates and booleans
/// included); normalization is a downstream concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CnFields {
    /// Whether the document is a confirmation note at all.
    pub is_cn: Option<String>,
    /// Transaction operation (purchase, redemption, switch, subscription).
    pub operation_type: Option<String>,
    /// Whether this is a multiseries transaction.
    pub is_multiseries: Option<String>,
    /// Transaction currency code.
    pub currency: Option<String>,
    /// Gross transaction amount.
    pub gross_amount: Option<String>,
    /// Net transaction amount.
    pub net_amount: Option<String>,
    /// Number of units or shares.
    pub units: Option<String>,
    /// Equalization amount.
    pub equalization: Option<String>,
    /// Total fees charged.
    pub fees: Option<String>,
    /// Net asset value price per unit.
    pub nav_price: Option<String>,
    /// NAV date.
    pub nav_date: Option<String>,
    /// Settlement date.
    pub settlement_date: Option<String>,
}

impl CnFields {
    /// Field names in ledger column order.
    pub const NAMES: [&'static str; 12] = [
        "is_cn",
        "operation_type",
        "is_multiseries",
        "currency",
        "gross_amount",
        "net_amount",
        "units",
        "equalization",
        "fees",
        "nav_price",
        "nav_date",
        "settlement_date",
    ];

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let slot = match name {
            "is_cn" => &self.is_cn,
            "operation_type" => &self.operation_type,
            "is_multiseries" => &self.is_multiseries,
            "currency" => &self.currency,
            "gross_amount" => &self.gross_amount,
            "net_amount" => &self.net_amount,
            "units" => &self.units,
            "equalization" => &self.equalization,
            "fees" => &self.fees,
            "nav_price" => &self.nav_price,
            "nav_date" => &self.nav_date,
            "settlement_date" => &self.settlement_date,
            _ => return None,
        };
        slot.as_deref()
    }

    /// Set a field by name. Returns false when the name is not part of the
    /// fixed schema, in which case the value is discarded.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "is_cn" => &mut self.is_cn,
            "operation_type" => &mut self.operation_type,
            "is_multiseries" => &mut self.is_multiseries,
            "currency" => &mut self.currency,
            "gross_amount" => &mut self.gross_amount,
            "net_amount" => &mut self.net_amount,
            "units" => &mut self.units,
            "equalization" => &mut self.equalization,
            "fees" => &mut self.fees,
            "nav_price" => &mut self.nav_price,
            "nav_date" => &mut self.nav_date,
            "settlement_date" => &mut self.settlement_date,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Whether no field carries a value.
    pub fn is_empty(&self) -> bool {
        Self::NAMES.iter().all(|name| self.get(name).is_none())
    }
}
