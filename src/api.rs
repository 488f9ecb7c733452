// src/api.rs
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    CashHolding, ChartDataEnvelope, Credentials, DebtHolding, DeleteAccount, HistoricalSeries,
    HoldingOrder, LoginResponse, MessageResponse, NewPortfolio, OrderAction, Portfolio,
    PortfolioDataEnvelope, PortfolioEnvelope, PortfoliosEnvelope, RealEstateHolding,
    Registration, StockHolding,
};
use log::{error, info, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Thin wrappers over the portfolio backend. A 404 becomes an empty result;
/// nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

#[derive(Deserialize)]
struct StocksEnvelope {
    #[serde(default)]
    stocks: Option<Vec<StockHolding>>,
}

#[derive(Deserialize)]
struct CashEnvelope {
    #[serde(default)]
    cash: Option<Vec<CashHolding>>,
}

#[derive(Deserialize)]
struct RealEstateEnvelope {
    #[serde(default)]
    real_estate: Option<Vec<RealEstateHolding>>,
}

#[derive(Deserialize)]
struct DebtEnvelope {
    #[serde(default)]
    debt: Option<Vec<DebtHolding>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            token: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::from_transport)?;
        Ok(Self {
            base_url: config.api_url.clone(),
            client,
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every subsequent request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Returns `Ok(None)` on 404 so callers can render an empty state.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<Option<T>, ApiError> {
        let response = match self.authorize(request).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from_transport(e);
                error!("{} failed: {}", what, err);
                return Err(err);
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!("{}: not found", what);
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} failed: HTTP {} {}", what, status, body);
            return Err(ApiError::server(status, &body));
        }

        let body = response.text().await.map_err(ApiError::from_transport)?;
        let parsed = serde_json::from_str(&body).map_err(|e| {
            error!("{}: could not parse response: {}", what, e);
            ApiError::from(e)
        })?;
        info!("{} succeeded.", what);
        Ok(Some(parsed))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<Option<T>, ApiError> {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        self.send(request, what).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<Option<T>, ApiError> {
        let request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        self.send(request, what).await
    }

    /// `POST /login`. A 404 here means the login route itself is missing.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post::<LoginResponse, _>("/login", &credentials, "Login")
            .await?
            .ok_or(ApiError::NotFound)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Value, ApiError> {
        self.post::<Value, _>("/register", registration, "Registration")
            .await?
            .ok_or(ApiError::NotFound)
    }

    pub async fn portfolios(&self, user_id: &str) -> Result<Vec<Portfolio>, ApiError> {
        let envelope: Option<PortfoliosEnvelope> = self
            .get(&format!("/portfolios/{}", user_id), "Fetch portfolios")
            .await?;
        Ok(envelope.map(|e| e.portfolios).unwrap_or_default())
    }

    pub async fn portfolio(&self, portfolio_id: &str) -> Result<Option<Value>, ApiError> {
        let envelope: Option<PortfolioEnvelope> = self
            .get(&format!("/portfolio/{}", portfolio_id), "Fetch portfolio")
            .await?;
        Ok(envelope.and_then(|e| e.portfolio))
    }

    pub async fn stocks(&self, portfolio_id: &str) -> Result<Vec<StockHolding>, ApiError> {
        let envelope: Option<StocksEnvelope> = self
            .get(&format!("/stocks/{}", portfolio_id), "Fetch stocks")
            .await?;
        Ok(envelope.and_then(|e| e.stocks).unwrap_or_default())
    }

    pub async fn cash(&self, portfolio_id: &str) -> Result<Vec<CashHolding>, ApiError> {
        let envelope: Option<CashEnvelope> = self
            .get(&format!("/cash/{}", portfolio_id), "Fetch cash")
            .await?;
        Ok(envelope.and_then(|e| e.cash).unwrap_or_default())
    }

    pub async fn real_estate(&self, portfolio_id: &str) -> Result<Vec<RealEstateHolding>, ApiError> {
        let envelope: Option<RealEstateEnvelope> = self
            .get(&format!("/real_estate/{}", portfolio_id), "Fetch real estate")
            .await?;
        Ok(envelope.and_then(|e| e.real_estate).unwrap_or_default())
    }

    pub async fn debt(&self, portfolio_id: &str) -> Result<Vec<DebtHolding>, ApiError> {
        let envelope: Option<DebtEnvelope> = self
            .get(&format!("/debt/{}", portfolio_id), "Fetch debt")
            .await?;
        Ok(envelope.and_then(|e| e.debt).unwrap_or_default())
    }

    pub async fn portfolio_data(&self, portfolio_id: &str) -> Result<Option<Value>, ApiError> {
        let envelope: Option<PortfolioDataEnvelope> = self
            .get(&format!("/portfolio_data/{}", portfolio_id), "Fetch portfolio data")
            .await?;
        Ok(envelope.and_then(|e| e.portfolio_data))
    }

    /// Historical valuations for the net-worth chart; empty on 404.
    pub async fn chart_data(&self, portfolio_id: &str) -> Result<HistoricalSeries, ApiError> {
        let envelope: Option<ChartDataEnvelope> = self
            .get(&format!("/chart_data/{}", portfolio_id), "Fetch chart data")
            .await?;
        Ok(envelope.map(|e| e.historical_data).unwrap_or_default())
    }

    /// Adds or removes one holding. `Ok(None)` means the portfolio was not found.
    pub async fn submit_order(
        &self,
        portfolio_id: &str,
        action: OrderAction,
        order: &HoldingOrder,
    ) -> Result<Option<String>, ApiError> {
        let route = order.route(action, portfolio_id);
        let what = format!("{:?} {}", action, order.category().path());
        let response: Option<MessageResponse> = self.post(&route, order, &what).await?;
        Ok(response.map(|r| r.message.unwrap_or_default()))
    }

    pub async fn add_portfolio(&self, new_portfolio: &NewPortfolio) -> Result<Option<String>, ApiError> {
        let response: Option<MessageResponse> = self
            .post("/add_portfolio", new_portfolio, "Create portfolio")
            .await?;
        Ok(response.map(|r| r.message.unwrap_or_default()))
    }

    pub async fn delete_user(&self, request: &DeleteAccount) -> Result<Option<String>, ApiError> {
        let response: Option<MessageResponse> = self
            .post("/delete_user", request, "Delete account")
            .await?;
        Ok(response.map(|r| r.message.unwrap_or_default()))
    }
}
