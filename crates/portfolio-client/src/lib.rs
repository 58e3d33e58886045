//! Client library for the portfolio trading API.
//!
//! This crate provides a typed HTTP client for the portfolio backend, the
//! dashboard currency formatting, and the search and order flow of the trade
//! page as an explicit session state machine.
//!
//! # Example
//!
//! ```no_run
//! use portfolio_client::{PortfolioClient, TradeSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portfolio_client::Error> {
//!     let client = PortfolioClient::with_base_url("http://localhost:8080")?;
//!     let portfolio = client.get_portfolio("0f8fad5bd9cb469fa16570867728950e").await?;
//!
//!     let mut session = TradeSession::new(client, portfolio);
//!     println!("Value: {}", session.dashboard().portfolio_value);
//!
//!     if session.search("GME").await?.is_some() {
//!         session.open_order()?;
//!         session.set_quantity(5)?;
//!         let holding = session.confirm_buy().await?;
//!         println!("Holding {} shares", holding.num_shares);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod dashboard;
mod error;
mod trade;
mod types;

pub use client::{ClientConfig, PortfolioClient};
pub use dashboard::{Dashboard, format_money};
pub use error::Error;
pub use trade::{
    OrderTicket, ResultCard, SessionContext, SessionState, TradeApi, TradeSession, max_affordable,
};
pub use types::*;
