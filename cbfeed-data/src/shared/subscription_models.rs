use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{
    error::{ConfigError, SocketError},
    protocols::ws::WsMessage,
};

/*----- */
// Product list
/*----- */
// Ordered, non-empty list of exchange product ids e.g. "BTC-USD"
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ProductList(Vec<String>);

impl ProductList {
    pub fn new<I, S>(product_ids: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let product_ids = product_ids
            .into_iter()
            .map(Into::into)
            .map(|id: String| id.trim().to_string())
            .collect::<Vec<_>>();

        if product_ids.is_empty() {
            return Err(ConfigError::EmptyProducts);
        }

        if let Some(position) = product_ids.iter().position(|id| id.is_empty()) {
            return Err(ConfigError::BlankProduct { position });
        }

        Ok(Self(product_ids))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Display for ProductList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/*----- */
// Subscription request
/*----- */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Subscribe,
    Unsubscribe,
}

// Field order is the wire order: "type" first, then "channels"
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub channels: Vec<ChannelSubscription>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChannelSubscription {
    pub name: String,
    pub product_ids: Vec<String>,
}

impl SubscriptionRequest {
    pub fn new<'a, I>(kind: RequestKind, channels: I, products: &ProductList) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            kind,
            channels: channels
                .into_iter()
                .map(|name| ChannelSubscription {
                    name: name.to_string(),
                    product_ids: products.as_slice().to_vec(),
                })
                .collect(),
        }
    }

    pub fn to_message(&self) -> Result<WsMessage, SocketError> {
        serde_json::to_string(self)
            .map(WsMessage::Text)
            .map_err(SocketError::Serialise)
    }
}

/*----- */
// Exchange IDs
/*----- */
#[derive(Debug, PartialEq, Hash, Eq, Clone, Copy, Ord, PartialOrd, Deserialize, Serialize)]
pub enum ExchangeId {
    Coinbase,
}

impl ExchangeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Coinbase => "coinbase",
        }
    }
}

impl Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_subscribe_request_wire_format() {
        let products = ProductList::new(["BTC-USD"]).unwrap();
        let request = SubscriptionRequest::new(RequestKind::Subscribe, ["ticker"], &products);

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"type":"subscribe","channels":[{"name":"ticker","product_ids":["BTC-USD"]}]}"#
        );
    }

    #[test]
    fn test_unsubscribe_request_wire_format() {
        let products = ProductList::new(["BTC-USD", "ETH-USD"]).unwrap();
        let request = SubscriptionRequest::new(RequestKind::Unsubscribe, ["ticker"], &products);

        match request.to_message().unwrap() {
            WsMessage::Text(text) => assert_eq!(
                text,
                r#"{"type":"unsubscribe","channels":[{"name":"ticker","product_ids":["BTC-USD","ETH-USD"]}]}"#
            ),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_each_channel_is_scoped_to_all_products() {
        let products = ProductList::new(["BTC-USD", "ETH-USD"]).unwrap();
        let request =
            SubscriptionRequest::new(RequestKind::Subscribe, ["ticker", "heartbeat"], &products);

        assert_eq!(request.channels.len(), 2);
        assert_eq!(request.channels[1].name, "heartbeat");
        assert_eq!(request.channels[1].product_ids, products.as_slice());
    }

    #[test]
    fn test_product_list_rejects_empty() {
        let result = ProductList::new(Vec::<String>::new());
        assert!(matches!(result, Err(ConfigError::EmptyProducts)));
    }

    #[test]
    fn test_product_list_rejects_blank_id() {
        let result = ProductList::new(["BTC-USD", "  "]);
        assert!(matches!(result, Err(ConfigError::BlankProduct { position: 1 })));
    }

    #[test]
    fn test_product_list_keeps_order() {
        let products = ProductList::new([" ETH-USD", "BTC-USD "]).unwrap();
        assert_eq!(products.as_slice(), ["ETH-USD", "BTC-USD"]);
        assert_eq!(products.to_string(), "ETH-USD,BTC-USD");
    }
}
