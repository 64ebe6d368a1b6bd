//! Live price snapshots from the quote provider.

/// Latest bid/ask. A side the provider reports as zero or missing is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quote {
    pub ask: Option<f64>,
    pub bid: Option<f64>,
}

impl Quote {
    /// Ask if usable, else bid.
    pub fn usable_price(&self) -> Option<f64> {
        self.ask
            .filter(|p| is_usable(*p))
            .or_else(|| self.bid.filter(|p| is_usable(*p)))
    }
}

/// Latest executed trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastTrade {
    pub price: f64,
}

impl LastTrade {
    pub fn usable_price(&self) -> Option<f64> {
        Some(self.price).filter(|p| is_usable(*p))
    }
}

fn is_usable(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
