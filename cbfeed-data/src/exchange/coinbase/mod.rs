pub mod channel;

use channel::CoinbaseChannel;

use crate::{
    client::config::FeedConfig,
    error::{ConfigError, SocketError},
    exchange::Connector,
    model::feed_message::FeedMessage,
    protocols::ws::WsMessage,
    shared::subscription_models::{ExchangeId, ProductList, RequestKind, SubscriptionRequest},
};

pub const COINBASE_WS_URL: &str = "wss://ws-feed.exchange.coinbase.com";
pub const COINBASE_SANDBOX_WS_URL: &str = "wss://ws-feed-public.sandbox.exchange.coinbase.com";

/*----- */
// Coinbase connector
/*----- */
#[derive(Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Clone)]
pub struct Coinbase;

impl Connector for Coinbase {
    type Channel = CoinbaseChannel;
    type Message = FeedMessage;

    const ID: ExchangeId = ExchangeId::Coinbase;

    fn url() -> &'static str {
        COINBASE_WS_URL
    }

    fn unsubscribe_channels() -> Vec<Self::Channel> {
        vec![CoinbaseChannel::TICKER]
    }

    fn requests(
        kind: RequestKind,
        channels: &[Self::Channel],
        products: &ProductList,
    ) -> Result<WsMessage, SocketError> {
        SubscriptionRequest::new(kind, channels.iter().map(AsRef::as_ref), products).to_message()
    }
}

impl Coinbase {
    // An explicit url wins over the sandbox switch
    pub fn config(
        url: Option<&str>,
        sandbox: bool,
        heartbeat: bool,
    ) -> Result<FeedConfig<CoinbaseChannel>, ConfigError> {
        let url = match (url, sandbox) {
            (Some(url), _) => url,
            (None, true) => COINBASE_SANDBOX_WS_URL,
            (None, false) => Self::url(),
        };

        FeedConfig::new(url, CoinbaseChannel::feed(heartbeat))
    }
}
