//! Search and order flow of the trade page.
//!
//! A [`TradeSession`] owns the active portfolio and walks through
//! `Idle -> Searching -> ResultsDisplayed -> OrderConfirmation` and back.
//! Network failures are logged and handed back to the caller; the session
//! always lands in a state it can continue from.

use crate::client::PortfolioClient;
use crate::dashboard::{Dashboard, format_money};
use crate::error::Error;
use crate::types::{
    CreateSecurityRequest, Portfolio, Quote, SearchResponse, Security, UpdateSecurityRequest,
};
use tracing::{debug, info, warn};


/// Backend operations the order flow needs.
pub trait TradeApi {
    /// Looks up quotes for a ticker.
    fn search(&self, symbol: &str) -> impl Future<Output = Result<SearchResponse, Error>> + Send;

    /// Records a first purchase.
    fn create_security(
        &self,
        request: &CreateSecurityRequest,
    ) -> impl Future<Output = Result<Security, Error>> + Send;

    /// Applies a share delta to an existing holding.
    fn update_security(
        &self,
        request: &UpdateSecurityRequest,
    ) -> impl Future<Output = Result<Security, Error>> + Send;
}

impl TradeApi for PortfolioClient {
    fn search(&self, symbol: &str) -> impl Future<Output = Result<SearchResponse, Error>> + Send {
        PortfolioClient::search(self, symbol)
    }

    fn create_security(
        &self,
        request: &CreateSecurityRequest,
    ) -> impl Future<Output = Result<Security, Error>> + Send {
        PortfolioClient::create_security(self, request)
    }

    fn update_security(
        &self,
        request: &UpdateSecurityRequest,
    ) -> impl Future<Output = Result<Security, Error>> + Send {
        PortfolioClient::update_security(self, request)
    }
}

/// The portfolio a session trades on behalf of.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    /// Active portfolio.
    pub portfolio: Portfolio,
}

/// The single search result on display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    /// Quote backing the card.
    pub quote: Quote,
}

impl ResultCard {
    /// Ticker symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.quote.symbol
    }

    /// Instrument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.quote.name
    }

    /// Text of the share price line.
    #[must_use]
    pub fn price_text(&self) -> String {
        format!("Share Price: {}", format_money(self.quote.last_price))
    }
}

/// An open order form.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTicket {
    /// Result the order was opened from.
    pub card: ResultCard,
    /// Shares to buy.
    pub quantity: i64,
    /// Whether the quantity tracks the largest affordable amount.
    pub buy_max: bool,
}

impl OrderTicket {
    /// Quantity times the last price.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.quantity as f64 * self.card.quote.last_price
    }

    /// Text of the cost line.
    #[must_use]
    pub fn cost_text(&self) -> String {
        format!("Cost: {}", format_money(self.cost()))
    }
}

/// Where the trade page currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Nothing searched, or the last search found nothing.
    Idle,
    /// A search request is in flight.
    Searching,
    /// The first result of the last search is shown.
    ResultsDisplayed(ResultCard),
    /// The order form is open.
    OrderConfirmation(OrderTicket),
}

/// Largest whole number of shares `value` can pay for at `price`.
#[must_use]
pub fn max_affordable(value: f64, price: f64) -> i64 {
    if !price.is_finite() || price <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value / price).floor() as i64
}

/// Search and order session for one portfolio.
#[derive(Debug)]
pub struct TradeSession<A> {
    api: A,
    context: SessionContext,
    dashboard: Dashboard,
    state: SessionState,
}

impl<A: TradeApi> TradeSession<A> {
    /// Opens a session with the dashboard populated from `portfolio`.
    pub fn new(api: A, portfolio: Portfolio) -> Self {
        let dashboard = Dashboard::from_portfolio(&portfolio);
        Self {
            api,
            context: SessionContext { portfolio },
            dashboard,
            state: SessionState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Dashboard header text.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Session context.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Searches for a ticker and displays the first result.
    ///
    /// Returns `Ok(None)` and goes back to idle when nothing matches.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequest`] for a blank ticker, or the API error
    /// if the lookup fails.
    pub async fn search(&mut self, ticker: &str) -> Result<Option<ResultCard>, Error> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(Error::InvalidRequest("ticker is required".to_string()));
        }

        self.state = SessionState::Searching;
        debug!("Searching for {}", ticker);

        match self.api.search(ticker).await {
            Ok(response) => match response.results.into_iter().next() {
                Some(quote) => {
                    let card = ResultCard { quote };
                    self.state = SessionState::ResultsDisplayed(card.clone());
                    Ok(Some(card))
                }
                None => {
                    info!("No results for {}", ticker);
                    self.state = SessionState::Idle;
                    Ok(None)
                }
            },
            Err(e) => {
                warn!("Search for {} failed: {}", ticker, e);
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    /// Opens the order form for the displayed result.
    ///
    /// # Errors
    /// Returns [`Error::InvalidState`] unless a result is displayed.
    pub fn open_order(&mut self) -> Result<&OrderTicket, Error> {
        let card = match &self.state {
            SessionState::ResultsDisplayed(card) => card.clone(),
            _ => return Err(Error::InvalidState("no search result displayed".to_string())),
        };
        self.state = SessionState::OrderConfirmation(OrderTicket {
            card,
            quantity: 0,
            buy_max: false,
        });
        self.ticket()
    }

    /// Sets the number of shares to buy and clears buy max.
    ///
    /// # Errors
    /// Returns [`Error::InvalidState`] unless the order form is open, or
    /// [`Error::InvalidRequest`] for a negative quantity.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<&OrderTicket, Error> {
        if quantity < 0 {
            return Err(Error::InvalidRequest(
                "quantity must not be negative".to_string(),
            ));
        }
        let ticket = self.ticket_mut()?;
        ticket.quantity = quantity;
        ticket.buy_max = false;
        self.ticket()
    }

    /// Toggles buy max. Turning it on sets the quantity to the largest number
    /// of shares the portfolio value covers.
    ///
    /// # Errors
    /// Returns [`Error::InvalidState`] unless the order form is open.
    pub fn toggle_buy_max(&mut self) -> Result<&OrderTicket, Error> {
        let value = self.context.portfolio.value;
        let ticket = self.ticket_mut()?;
        ticket.buy_max = !ticket.buy_max;
        if ticket.buy_max {
            ticket.quantity = max_affordable(value, ticket.card.quote.last_price);
        }
        self.ticket()
    }

    /// Submits the purchase.
    ///
    /// The first purchase of a symbol creates the holding; if the portfolio
    /// already holds it, the quantity is added to the existing holding.
    /// Returns to the result view whether or not the purchase succeeds.
    ///
    /// # Errors
    /// Returns [`Error::InvalidState`] unless the order form is open,
    /// [`Error::InvalidRequest`] for a zero quantity, or the API error.
    pub async fn confirm_buy(&mut self) -> Result<Security, Error> {
        let ticket = self.ticket()?.clone();
        if ticket.quantity <= 0 {
            return Err(Error::InvalidRequest(
                "quantity must be at least one share".to_string(),
            ));
        }

        let quote = &ticket.card.quote;
        let link = self.context.portfolio.link.clone();
        let create = CreateSecurityRequest {
            link: link.clone(),
            symbol: quote.symbol.clone(),
            name: quote.name.clone(),
            initial_price: quote.last_price,
            num_shares: ticket.quantity,
        };

        let result = match self.api.create_security(&create).await {
            Err(Error::Conflict(_)) => {
                debug!("{} already held, adding {} shares", quote.symbol, ticket.quantity);
                let update = UpdateSecurityRequest {
                    link,
                    symbol: quote.symbol.clone(),
                    current_price: quote.last_price,
                    num_shares: ticket.quantity,
                };
                self.api.update_security(&update).await
            }
            other => other,
        };

        match &result {
            Ok(security) => info!(
                "Bought {} {} for {}, now holding {}",
                ticket.quantity,
                security.symbol,
                format_money(ticket.cost()),
                security.num_shares
            ),
            Err(e) => warn!("Purchase of {} failed: {}", quote.symbol, e),
        }

        self.state = SessionState::ResultsDisplayed(ticket.card);
        result
    }

    /// Short selling is not offered; closes the order form.
    ///
    /// # Errors
    /// Returns [`Error::InvalidState`] unless the order form is open.
    pub fn short_sell(&mut self) -> Result<(), Error> {
        let card = self.ticket()?.card.clone();
        info!("Short sell requested for {}", card.symbol());
        self.state = SessionState::ResultsDisplayed(card);
        Ok(())
    }

    /// Closes the order form without trading.
    ///
    /// # Errors
    /// Returns [`Error::InvalidState`] unless the order form is open.
    pub fn cancel(&mut self) -> Result<(), Error> {
        let card = self.ticket()?.card.clone();
        info!("Order for {} cancelled", card.symbol());
        self.state = SessionState::ResultsDisplayed(card);
        Ok(())
    }

    fn ticket(&self) -> Result<&OrderTicket, Error> {
        match &self.state {
            SessionState::OrderConfirmation(ticket) => Ok(ticket),
            _ => Err(Error::InvalidState("no order ticket open".to_string())),
        }
    }

    fn ticket_mut(&mut self) -> Result<&mut OrderTicket, Error> {
        match &mut self.state {
            SessionState::OrderConfirmation(ticket) => Ok(ticket),
            _ => Err(Error::InvalidState("no order ticket open".to_string())),
        }
    }
}
