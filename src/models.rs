// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Backend ids arrive as numbers or strings depending on the endpoint.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    #[serde(default)]
    pub date_created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHolding {
    pub ticker: String,
    pub quantity: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashHolding {
    pub name: String,
    pub amount: f64,
    pub interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealEstateHolding {
    pub name: String,
    pub worth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtHolding {
    pub name: String,
    pub amount: f64,
    pub interest: f64,
}

/// Instrument name -> (ISO date -> value).
pub type InstrumentSeries = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stocks: Option<InstrumentSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<InstrumentSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_estate: Option<InstrumentSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt: Option<InstrumentSeries>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Stocks,
    Cash,
    RealEstate,
    Debt,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 4] = [
        AssetCategory::Stocks,
        AssetCategory::Cash,
        AssetCategory::RealEstate,
        AssetCategory::Debt,
    ];

    /// Path segment used by the backend routes.
    pub fn path(self) -> &'static str {
        match self {
            AssetCategory::Stocks => "stocks",
            AssetCategory::Cash => "cash",
            AssetCategory::RealEstate => "real_estate",
            AssetCategory::Debt => "debt",
        }
    }
}

impl HistoricalSeries {
    pub fn category(&self, category: AssetCategory) -> Option<&InstrumentSeries> {
        match category {
            AssetCategory::Stocks => self.stocks.as_ref(),
            AssetCategory::Cash => self.cash.as_ref(),
            AssetCategory::RealEstate => self.real_estate.as_ref(),
            AssetCategory::Debt => self.debt.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub country: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPortfolio {
    pub user_id: String,
    pub portfolio_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAccount {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortfoliosEnvelope {
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortfolioEnvelope {
    #[serde(default)]
    pub portfolio: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortfolioDataEnvelope {
    #[serde(default)]
    pub portfolio_data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartDataEnvelope {
    #[serde(default)]
    pub historical_data: HistoricalSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Add,
    Remove,
}

/// One add/remove form submission. The action is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HoldingOrder {
    Stock(StockHolding),
    Cash(CashHolding),
    RealEstate(RealEstateHolding),
    Debt(DebtHolding),
}

impl HoldingOrder {
    pub fn category(&self) -> AssetCategory {
        match self {
            HoldingOrder::Stock(_) => AssetCategory::Stocks,
            HoldingOrder::Cash(_) => AssetCategory::Cash,
            HoldingOrder::RealEstate(_) => AssetCategory::RealEstate,
            HoldingOrder::Debt(_) => AssetCategory::Debt,
        }
    }

    /// Route for this order, e.g. `/stocks/7` or `/remove_stocks/7`.
    pub fn route(&self, action: OrderAction, portfolio_id: &str) -> String {
        let segment = self.category().path();
        match action {
            OrderAction::Add => format!("/{}/{}", segment, portfolio_id),
            OrderAction::Remove => format!("/remove_{}/{}", segment, portfolio_id),
        }
    }
}
