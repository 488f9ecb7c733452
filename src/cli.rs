// src/cli.rs
use crate::aggregate::{aggregate_with, DebtTreatment};
use crate::api::ApiClient;
use crate::chart::{render_chart, render_table};
use crate::error::ApiError;
use crate::models::{
    CashHolding, DebtHolding, DeleteAccount, HoldingOrder, NewPortfolio, OrderAction,
    RealEstateHolding, Registration, StockHolding,
};
use crate::session::{Session, SessionStore};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "networth")]
#[command(about = "Track portfolios and net worth against the portfolio backend")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides NETWORTH_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Session file (overrides NETWORTH_SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new account
    Register {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List the current user's portfolios
    Portfolios,
    /// Show one portfolio
    Portfolio { id: String },
    /// List holdings, optionally of a single kind
    Holdings {
        id: String,
        #[arg(long, value_enum)]
        kind: Option<HoldingKind>,
    },
    /// Add a holding to a portfolio
    Add {
        #[command(subcommand)]
        holding: HoldingArgs,
    },
    /// Remove a holding from a portfolio
    Remove {
        #[command(subcommand)]
        holding: HoldingArgs,
    },
    /// Net worth over time
    Chart {
        id: String,
        /// Count debt against net worth instead of adding it as recorded
        #[arg(long)]
        subtract_debt: bool,
        #[arg(long)]
        json: bool,
        /// Print a table instead of the line chart
        #[arg(long)]
        table: bool,
        #[arg(long, default_value_t = 80)]
        width: u16,
        #[arg(long, default_value_t = 20)]
        height: u16,
    },
    /// Raw portfolio data as returned by the backend
    PortfolioData { id: String },
    CreatePortfolio { name: String },
    DeleteAccount {
        #[arg(long)]
        password: String,
    },
}

#[derive(Clone, Copy, PartialEq, ValueEnum)]
pub enum HoldingKind {
    Stocks,
    Cash,
    RealEstate,
    Debt,
}

#[derive(Subcommand)]
pub enum HoldingArgs {
    Stock {
        portfolio_id: String,
        ticker: String,
        quantity: f64,
        price: f64,
    },
    Cash {
        portfolio_id: String,
        name: String,
        amount: f64,
        interest: f64,
    },
    RealEstate {
        portfolio_id: String,
        name: String,
        worth: f64,
    },
    Debt {
        portfolio_id: String,
        name: String,
        amount: f64,
        interest: f64,
    },
}

impl HoldingArgs {
    pub fn into_order(self) -> (String, HoldingOrder) {
        match self {
            HoldingArgs::Stock { portfolio_id, ticker, quantity, price } => (
                portfolio_id,
                HoldingOrder::Stock(StockHolding { ticker, quantity, price }),
            ),
            HoldingArgs::Cash { portfolio_id, name, amount, interest } => (
                portfolio_id,
                HoldingOrder::Cash(CashHolding { name, amount, interest }),
            ),
            HoldingArgs::RealEstate { portfolio_id, name, worth } => (
                portfolio_id,
                HoldingOrder::RealEstate(RealEstateHolding { name, worth }),
            ),
            HoldingArgs::Debt { portfolio_id, name, amount, interest } => (
                portfolio_id,
                HoldingOrder::Debt(DebtHolding { name, amount, interest }),
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    /// Shown as-is; the underlying cause only goes to the log.
    #[error("{0}")]
    Login(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Could not write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Server rejections stay deliberately vague; transport failures say so.
pub fn login_failure_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::NoResponse(_) => "No response received",
        ApiError::Request(_) => "Could not reach the server",
        _ => "Invalid credentials",
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(ApiError::from)?;
    writeln!(out, "{}", text)?;
    Ok(())
}

fn write_message<W: Write>(out: &mut W, message: Option<String>, missing: &str) -> Result<(), CliError> {
    match message {
        Some(m) if !m.is_empty() => writeln!(out, "{}", m)?,
        Some(_) => writeln!(out, "Done.")?,
        None => writeln!(out, "{}", missing)?,
    }
    Ok(())
}

pub async fn run<S: SessionStore, W: Write>(
    command: Commands,
    session: &Session<S>,
    api: &ApiClient,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Commands::Register { firstname, lastname, country, email, username, password } => {
            let registration = Registration { firstname, lastname, country, email, username, password };
            api.register(&registration).await?;
            writeln!(out, "Registered {}.", registration.username)?;
        }
        Commands::Login { username, password } => match session.login(api, &username, &password).await {
            Ok(record) => writeln!(out, "Logged in as {} (user {}).", username, record.user_id)?,
            Err(e) => {
                error!("Login failed: {}", e);
                return Err(CliError::Login(login_failure_message(&e)));
            }
        },
        Commands::Logout => {
            session.logout()?;
            writeln!(out, "Logged out.")?;
        }
        Commands::Whoami => match session.current_user()? {
            Some(user_id) => {
                let username = session.current_username()?.unwrap_or_default();
                writeln!(out, "{} (user {})", username, user_id)?;
            }
            None => writeln!(out, "Not logged in.")?,
        },
        Commands::Portfolios => {
            let user_id = session.require_user()?;
            let portfolios = api.portfolios(&user_id).await?;
            if portfolios.is_empty() {
                writeln!(out, "No portfolios found.")?;
            }
            for p in portfolios {
                writeln!(out, "{:>6}  {}", p.id, p.name)?;
            }
        }
        Commands::Portfolio { id } => match api.portfolio(&id).await? {
            Some(portfolio) => write_json(out, &portfolio)?,
            None => writeln!(out, "Portfolio not found.")?,
        },
        Commands::Holdings { id, kind } => {
            let wants = |k: HoldingKind| kind.map_or(true, |selected| selected == k);
            if wants(HoldingKind::Stocks) {
                writeln!(out, "Stocks:")?;
                for s in api.stocks(&id).await? {
                    writeln!(out, "  {:<8} {:>10} @ {:.2}", s.ticker, s.quantity, s.price)?;
                }
            }
            if wants(HoldingKind::Cash) {
                writeln!(out, "Cash:")?;
                for c in api.cash(&id).await? {
                    writeln!(out, "  {:<20} {:>12.2} ({}%)", c.name, c.amount, c.interest)?;
                }
            }
            if wants(HoldingKind::RealEstate) {
                writeln!(out, "Real estate:")?;
                for r in api.real_estate(&id).await? {
                    writeln!(out, "  {:<20} {:>12.2}", r.name, r.worth)?;
                }
            }
            if wants(HoldingKind::Debt) {
                writeln!(out, "Debt:")?;
                for d in api.debt(&id).await? {
                    writeln!(out, "  {:<20} {:>12.2} ({}%)", d.name, d.amount, d.interest)?;
                }
            }
        }
        Commands::Add { holding } => {
            let (portfolio_id, order) = holding.into_order();
            let message = api.submit_order(&portfolio_id, OrderAction::Add, &order).await?;
            write_message(out, message, "Portfolio not found.")?;
        }
        Commands::Remove { holding } => {
            let (portfolio_id, order) = holding.into_order();
            let message = api.submit_order(&portfolio_id, OrderAction::Remove, &order).await?;
            write_message(out, message, "Portfolio not found.")?;
        }
        Commands::Chart { id, subtract_debt, json, table, width, height } => {
            let treatment = if subtract_debt {
                DebtTreatment::Subtract
            } else {
                DebtTreatment::AsRecorded
            };
            let series = api.chart_data(&id).await?;
            let points = aggregate_with(&series, treatment)?;
            info!("Aggregated {} net worth points for portfolio {}", points.len(), id);
            if json {
                write_json(out, &points)?;
            } else if table {
                write!(out, "{}", render_table(&points))?;
            } else {
                write!(out, "{}", render_chart(&points, width, height))?;
            }
        }
        Commands::PortfolioData { id } => match api.portfolio_data(&id).await? {
            Some(data) => write_json(out, &data)?,
            None => writeln!(out, "Portfolio not found.")?,
        },
        Commands::CreatePortfolio { name } => {
            let user_id = session.require_user()?;
            let request = NewPortfolio { user_id, portfolio_name: name };
            let message = api.add_portfolio(&request).await?;
            write_message(out, message, "User not found.")?;
        }
        Commands::DeleteAccount { password } => {
            let user_id = session.require_user()?;
            let message = api.delete_user(&DeleteAccount { user_id, password }).await?;
            if message.is_some() {
                session.logout()?;
            }
            write_message(out, message, "User not found.")?;
        }
    }
    Ok(())
}
