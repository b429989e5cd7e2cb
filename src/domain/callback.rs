use serde::Deserialize;

// Query string of the bank's browser redirect. Everything here is client-controlled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "paymentID", alias = "paymentId", default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub shopify_order_id: Option<String>,
    #[serde(rename = "orderID", alias = "orderId", default)]
    pub order_id: Option<String>,
    #[serde(rename = "responseCode", alias = "resposneCode", default)]
    pub response_code: Option<String>,
    #[serde(default)]
    pub opaque: Option<String>,
}

impl CallbackQuery {
    pub fn payment_id(&self) -> Option<&str> {
        non_blank(self.payment_id.as_deref())
    }

    // Order the redirect claims to belong to; our own BackURL parameter wins over the bank's.
    pub fn correlation_id(&self) -> Option<&str> {
        non_blank(self.shopify_order_id.as_deref()).or(non_blank(self.order_id.as_deref()))
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}
