//! # Portfolio Trader Backend - REST API Server
//!
//! REST backend for a small portfolio trading demo. A front end searches for
//! securities, shows the first match and records simulated purchases against
//! a portfolio. Built with [Axum](https://crates.io/crates/axum) and
//! documented via [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **CRUD API**: Portfolios and the securities held in them, addressed by
//!   opaque generated links.
//!
//! - **Declared Request Shapes**: Every write validates its JSON body against
//!   an explicit field list and reports the first bad field with a 400.
//!
//! - **Atomic Trades**: Share-count updates are a single store operation, so
//!   concurrent purchases of the same holding are never lost.
//!
//! - **Pluggable Storage**: PostgreSQL via `sqlx`, or an in-memory store when
//!   no database is configured.
//!
//! - **Security Search**: `/api?symbol=` served from configured quotes or
//!   proxied to an upstream quote API.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Route handlers and router configuration |
//! | [`config`] | TOML configuration with environment overrides |
//! | [`db`] | PostgreSQL pool and row types |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`link`] | Opaque link generation |
//! | [`models`] | Documents and request/response DTOs with OpenAPI schemas |
//! | [`search`] | Quote providers behind the search endpoint |
//! | [`state`] | Application state management |
//! | [`store`] | Storage backends |
//! | [`validation`] | Request shape declarations and checks |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api?symbol={ticker}` | Search for a security |
//! | GET | `/portfolio` | List portfolios (development only) |
//! | POST | `/portfolio` | Create a portfolio |
//! | GET | `/portfolio/{link}` | Get a portfolio |
//! | PUT | `/portfolio/{link}` | Update name or value |
//! | DELETE | `/portfolio/{link}` | Delete a portfolio and its holdings |
//! | GET | `/security` | List holdings (development only) |
//! | POST | `/security` | Record a first purchase |
//! | PUT | `/security` | Apply a purchase or sale delta |
//! | GET | `/security/{link}` | Holdings of a portfolio |
//! | DELETE | `/security/{link}` | Delete a holding (symbol in body) |
//!
//! ## Example Usage
//!
//! ```bash
//! # In-memory store, listing routes off
//! cargo run
//!
//! # PostgreSQL store on another port
//! DATABASE_URL=postgres://localhost/portfolio PORT=3000 cargo run
//!
//! # Create a portfolio and buy five shares
//! curl -X POST http://localhost:8080/portfolio \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Ada Lovelace", "value": 100000}'
//!
//! curl -X POST http://localhost:8080/security \
//!   -H "Content-Type: application/json" \
//!   -d '{"link": "<link>", "symbol": "GME", "name": "GameStop", "initialPrice": 20, "numShares": 5}'
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod link;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
pub mod validation;
