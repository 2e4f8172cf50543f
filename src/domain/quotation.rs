// ==========================================
// Quotation system - quotation domain model
// ==========================================
// Money is held in satang (1/100 baht) so totals never drift
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// ==========================================
// Money - integer satang
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_satang(satang: i64) -> Self {
        Money(satang)
    }

    /// Rounds to the nearest satang
    ///
    /// # Returns
    /// - None for NaN, infinities and amounts outside the i64 satang range
    pub fn from_baht(baht: f64) -> Option<Self> {
        let satang = (baht * 100.0).round();
        in_i64_range(satang).then(|| Money(satang as i64))
    }

    pub fn satang(&self) -> i64 {
        self.0
    }

    pub fn to_baht(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_mul(self, units: i64) -> Option<Money> {
        self.0.checked_mul(units).map(Money)
    }
}

/// Finite and representable as i64 without saturating
fn in_i64_range(value: f64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_baht())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let baht = f64::deserialize(deserializer)?;
        Money::from_baht(baht)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {}", baht)))
    }
}

/// Unit counts (cars, trips) are whole numbers; negatives count as 0
///
/// # Returns
/// - None for NaN, infinities and counts beyond i64
pub fn to_units(value: f64) -> Option<i64> {
    let rounded = value.round();
    if !in_i64_range(rounded) {
        return None;
    }
    Some(if rounded <= 0.0 { 0 } else { rounded as i64 })
}

// ==========================================
// QuotationTotals - derived monetary totals
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationTotals {
    pub total_sales_price: Money,
    pub total_sales_price_with_options: Money,
    pub total_transport_cost: Money,
    pub grand_total: Money,
}

impl QuotationTotals {
    /// totalSalesPrice = quantity x pricePerUnitWithVat
    /// totalTransportCost = transportTrips x pricePerTrip
    /// grandTotal = totalSalesPriceWithOptions + totalTransportCost
    ///
    /// # Returns
    /// - None when any total overflows
    pub fn compute(
        quantity: i64,
        price_per_unit_with_vat: Money,
        options_price: Money,
        transport_trips: i64,
        price_per_trip: Money,
    ) -> Option<Self> {
        let total_sales_price = price_per_unit_with_vat.checked_mul(quantity)?;
        let total_sales_price_with_options = total_sales_price.checked_add(options_price)?;
        let total_transport_cost = price_per_trip.checked_mul(transport_trips)?;
        Some(Self {
            total_sales_price,
            total_sales_price_with_options,
            total_transport_cost,
            grand_total: total_sales_price_with_options.checked_add(total_transport_cost)?,
        })
    }
}

// ==========================================
// Quotation - persisted quotation
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: Option<i64>,
    pub quotation_number: String,
    pub customer_name: String,
    pub customer_code: Option<String>,
    pub customer_group: Option<String>,
    pub submission_date: NaiveDate,
    pub request_date: Option<NaiveDate>,

    // ===== Master data references =====
    pub sale_member_id: Option<i64>,
    pub car_id: Option<i64>,
    pub province_id: Option<i64>,

    // ===== Pricing =====
    pub additional_options: Option<String>,
    pub quantity: i64,
    pub price_per_unit: Money,
    pub price_per_unit_with_vat: Money,
    pub options_price: Money,
    pub transport_trips: i64,
    pub price_per_trip: Money,
    pub totals: QuotationTotals,

    // ===== Terms & contact =====
    pub payment_terms: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,

    pub source: String,
    pub created_at: DateTime<Utc>,
}
