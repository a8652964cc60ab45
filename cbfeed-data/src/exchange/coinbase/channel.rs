#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct CoinbaseChannel(pub &'static str);

impl CoinbaseChannel {
    pub const TICKER: Self = Self("ticker");
    pub const HEARTBEAT: Self = Self("heartbeat");

    // Ticker always comes first, heartbeat is opt-in
    pub fn feed(heartbeat: bool) -> Vec<Self> {
        match heartbeat {
            true => vec![Self::TICKER, Self::HEARTBEAT],
            false => vec![Self::TICKER],
        }
    }
}

impl AsRef<str> for CoinbaseChannel {
    fn as_ref(&self) -> &str {
        self.0
    }
}
