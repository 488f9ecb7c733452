// tests/common/mod.rs
#![allow(dead_code)]

use jsonwebtoken::{encode, EncodingKey, Header};
use networth_client::{ApiClient, MemorySessionStore, Session};
use serde_json::{json, Value};
use std::time::Duration;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

pub fn create_token(user_id: &str) -> String {
    encode(
        &Header::default(),
        &json!({"sub": {"user_id": user_id}, "exp": 10000000000u64}),
        &EncodingKey::from_secret("backend_secret".as_ref()),
    )
    .unwrap()
}

pub fn reply(body: Value, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&body), status)
}

pub fn backend() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let login = warp::path("login")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body["username"] == "ada" && body["password"] == "secret" {
                reply(json!({"access_token": create_token("42")}), StatusCode::OK)
            } else if body["username"] == "tokenless" {
                reply(json!({}), StatusCode::OK)
            } else {
                reply(json!({"detail": "Bad username or password"}), StatusCode::BAD_REQUEST)
            }
        });

    let register = warp::path("register")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body["username"] == "ada" {
                reply(json!({"detail": "User already exists"}), StatusCode::BAD_REQUEST)
            } else {
                reply(json!({"access_token": create_token("43")}), StatusCode::OK)
            }
        });

    let portfolios = warp::path!("portfolios" / String)
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .map(|user_id: String, auth: Option<String>| match (user_id.as_str(), auth) {
            ("42", Some(_)) => reply(
                json!({"portfolios": [
                    {"id": 1, "name": "Main", "user_id": 42, "date_created": "2024-01-01"},
                    {"id": 2, "name": "Side", "user_id": 42}
                ]}),
                StatusCode::OK,
            ),
            ("42", None) => reply(json!({"detail": "Not authenticated"}), StatusCode::UNAUTHORIZED),
            _ => reply(json!({"detail": "No portfolios found"}), StatusCode::NOT_FOUND),
        });

    let portfolio = warp::path!("portfolio" / String)
        .and(warp::get())
        .map(|id: String| {
            if id == "1" {
                reply(json!({"portfolio": {"stocks": [{"ticker": "AAPL"}]}}), StatusCode::OK)
            } else {
                reply(json!({"detail": "Portfolio not found"}), StatusCode::NOT_FOUND)
            }
        });

    let stocks = warp::path!("stocks" / String)
        .and(warp::get())
        .map(|id: String| match id.as_str() {
            "1" => reply(
                json!({"stocks": [{"ticker": "AAPL", "quantity": 3.0, "price": 150.0}]}),
                StatusCode::OK,
            ),
            "500" => reply(json!({"detail": "database is down"}), StatusCode::INTERNAL_SERVER_ERROR),
            _ => reply(json!({"detail": "No stocks"}), StatusCode::NOT_FOUND),
        });

    let cash = warp::path!("cash" / String).and(warp::get()).map(|_id: String| {
        reply(
            json!({"cash": [{"name": "Savings", "amount": 1000.0, "interest": 2.5}]}),
            StatusCode::OK,
        )
    });

    let chart = warp::path!("chart_data" / String)
        .and(warp::get())
        .map(|id: String| {
            if id == "1" {
                reply(
                    json!({"historical_data": {
                        "stocks": {"AAPL": {"2024-03-01": 300.0, "2024-01-01": 100.0}},
                        "cash": {"Savings": {"2024-01-01": 50.0}},
                        "debt": {"Loan": {"2024-02-01": 20.0}}
                    }}),
                    StatusCode::OK,
                )
            } else {
                reply(json!({"detail": "Couldn't retrieve historical data"}), StatusCode::NOT_FOUND)
            }
        });

    let add_stock = warp::path!("stocks" / String)
        .and(warp::post())
        .and(warp::body::json())
        .map(|id: String, body: Value| {
            if id == "1" {
                reply(
                    json!({"message": format!("Successfully added {} of {}", body["quantity"], body["ticker"].as_str().unwrap_or(""))}),
                    StatusCode::OK,
                )
            } else {
                reply(json!({"detail": "Portfolio not found"}), StatusCode::NOT_FOUND)
            }
        });

    let remove_cash = warp::path!("remove_cash" / String)
        .and(warp::post())
        .and(warp::body::json())
        .map(|_id: String, body: Value| {
            reply(
                json!({"message": format!("Successfully removed {} of cash", body["amount"])}),
                StatusCode::OK,
            )
        });

    let add_portfolio = warp::path("add_portfolio")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body["user_id"] == "42" && body["portfolio_name"] == "Retirement" {
                reply(json!({"message": "Portfolio created successfully"}), StatusCode::OK)
            } else {
                reply(json!({"detail": "bad request"}), StatusCode::BAD_REQUEST)
            }
        });

    let delete_user = warp::path("delete_user")
        .and(warp::post())
        .and(warp::body::json())
        .map(|body: Value| {
            if body["password"] == "secret" {
                reply(json!({"message": "User deleted successfully!"}), StatusCode::OK)
            } else {
                reply(json!({"detail": "User not found"}), StatusCode::NOT_FOUND)
            }
        });

    let slow = warp::path!("chart_data" / "slow").and_then(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok::<_, Rejection>(reply(json!({}), StatusCode::OK))
    });

    slow.or(login)
        .or(register)
        .or(portfolios)
        .or(portfolio)
        .or(stocks)
        .or(cash)
        .or(chart)
        .or(add_stock)
        .or(remove_cash)
        .or(add_portfolio)
        .or(delete_user)
}

pub fn spawn_backend() -> String {
    let (addr, server) = warp::serve(backend()).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{}", addr)
}

pub async fn logged_in(base_url: &str) -> (Session<MemorySessionStore>, ApiClient) {
    let session = Session::new(MemorySessionStore::default());
    session
        .login(&ApiClient::new(base_url), "ada", "secret")
        .await
        .unwrap();
    let api = ApiClient::new(base_url).with_token(session.access_token().unwrap());
    (session, api)
}

