use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::models::{SaleItem, SaleSummary};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaleLineRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProcessSaleRequest {
    #[serde(default)]
    pub items: Vec<SaleLineRequest>,
    #[serde(default, deserialize_with = "optional_id")]
    #[schema(value_type = Option<i32>)]
    pub customer_id: Option<i32>,
    pub payment_method: Option<String>,
    pub discount_percent: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleReceipt {
    pub success: bool,
    pub message: String,
    pub sale_id: i32,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SaleList {
    #[schema(value_type = Vec<SaleSummary>)]
    pub items: Vec<SaleSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleWithItems {
    pub sale: SaleSummary,
    pub items: Vec<SaleItem>,
}

/// Browser forms submit the selected customer as a string, and an empty
/// selection as `""`.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i32),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i32>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid customer_id `{text}`")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_accepts_numbers_strings_and_blanks() {
        let req: ProcessSaleRequest =
            serde_json::from_str(r#"{"items": [], "customer_id": 7}"#).unwrap();
        assert_eq!(req.customer_id, Some(7));

        let req: ProcessSaleRequest =
            serde_json::from_str(r#"{"items": [], "customer_id": "12"}"#).unwrap();
        assert_eq!(req.customer_id, Some(12));

        let req: ProcessSaleRequest =
            serde_json::from_str(r#"{"items": [], "customer_id": ""}"#).unwrap();
        assert_eq!(req.customer_id, None);

        let req: ProcessSaleRequest =
            serde_json::from_str(r#"{"items": [], "customer_id": null}"#).unwrap();
        assert_eq!(req.customer_id, None);

        let req: ProcessSaleRequest = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert_eq!(req.customer_id, None);
    }

    #[test]
    fn customer_id_rejects_garbage() {
        let res = serde_json::from_str::<ProcessSaleRequest>(r#"{"customer_id": "abc"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn discount_accepts_integers_and_fractions() {
        let req: ProcessSaleRequest = serde_json::from_str(
            r#"{"items": [{"product_id": 1, "quantity": 2}], "discount_percent": 12.5}"#,
        )
        .unwrap();
        assert_eq!(req.discount_percent, Some(Decimal::new(125, 1)));
        assert_eq!(req.items.len(), 1);

        let req: ProcessSaleRequest =
            serde_json::from_str(r#"{"items": [], "discount_percent": 10}"#).unwrap();
        assert_eq!(req.discount_percent, Some(Decimal::from(10)));
    }
}
