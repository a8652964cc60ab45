use cbfeed_data::{
    client::config::FeedConfig,
    error::ConfigError,
    exchange::coinbase::{channel::CoinbaseChannel, Coinbase},
    shared::subscription_models::ProductList,
};
use clap::Parser;

/// Print Coinbase ticker updates until interrupted, then unsubscribe
#[derive(Debug, Parser)]
#[command(name = "cbfeed-listener", version)]
pub struct Cli {
    /// Product id to subscribe to, repeat or comma separate for several
    #[arg(
        long = "product",
        env = "CBFEED_PRODUCTS",
        value_delimiter = ',',
        default_value = "BTC-USD"
    )]
    pub products: Vec<String>,

    /// Feed endpoint, takes precedence over --sandbox
    #[arg(long, env = "CBFEED_URL")]
    pub url: Option<String>,

    /// Use the public sandbox feed
    #[arg(long)]
    pub sandbox: bool,

    /// Also subscribe to the heartbeat channel
    #[arg(long)]
    pub heartbeat: bool,
}

impl Cli {
    pub fn into_feed(self) -> Result<(FeedConfig<CoinbaseChannel>, ProductList), ConfigError> {
        let config = Coinbase::config(self.url.as_deref(), self.sandbox, self.heartbeat)?;
        let products = ProductList::new(self.products)?;
        Ok((config, products))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let (config, products) = Cli::try_parse_from(["cbfeed-listener"])
            .unwrap()
            .into_feed()
            .unwrap();

        assert_eq!(products.as_slice(), ["BTC-USD"]);
        assert_eq!(config.url.host_str(), Some("ws-feed.exchange.coinbase.com"));
        assert_eq!(config.channels, vec![CoinbaseChannel::TICKER]);
    }

    #[test]
    fn test_products_repeat_and_split() {
        let cli = Cli::try_parse_from([
            "cbfeed-listener",
            "--product",
            "BTC-USD,ETH-USD",
            "--product",
            "SOL-USD",
        ])
        .unwrap();

        assert_eq!(cli.products, ["BTC-USD", "ETH-USD", "SOL-USD"]);
    }

    #[test]
    fn test_sandbox_with_heartbeat() {
        let (config, _) = Cli::try_parse_from(["cbfeed-listener", "--sandbox", "--heartbeat"])
            .unwrap()
            .into_feed()
            .unwrap();

        assert_eq!(
            config.url.host_str(),
            Some("ws-feed-public.sandbox.exchange.coinbase.com")
        );
        assert_eq!(
            config.channels,
            vec![CoinbaseChannel::TICKER, CoinbaseChannel::HEARTBEAT]
        );
    }

    #[test]
    fn test_blank_product_is_rejected() {
        let result = Cli::try_parse_from([
            "cbfeed-listener",
            "--product",
            "BTC-USD",
            "--product",
            " ",
        ])
        .unwrap()
        .into_feed();

        assert!(matches!(result, Err(ConfigError::BlankProduct { position: 1 })));
    }

    #[test]
    fn test_http_url_is_rejected() {
        let result = Cli::try_parse_from(["cbfeed-listener", "--url", "http://localhost:8080"])
            .unwrap()
            .into_feed();

        assert!(matches!(result, Err(ConfigError::UnsupportedScheme { .. })));
    }
}
