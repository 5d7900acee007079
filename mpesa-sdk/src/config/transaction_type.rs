use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of merchant account requests are made for.
///
/// Pay bill accounts are identified by their short code; buy goods (till)
/// accounts by their store number. Serializes to the gateway's STK push
/// `TransactionType` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "CustomerPayBillOnline")]
    PayBill,
    #[serde(rename = "CustomerBuyGoodsOnline")]
    BuyGoods,
}

impl TransactionType {
    /// Parse a configured account kind. `paybill` (any case) is a pay bill
    /// account, everything else is treated as buy goods.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("paybill") {
            TransactionType::PayBill
        } else {
            TransactionType::BuyGoods
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::PayBill => "paybill",
            TransactionType::BuyGoods => "buygoods",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
