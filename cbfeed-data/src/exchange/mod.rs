pub mod coinbase;

use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;

use crate::{
    error::SocketError,
    model::FeedEvent,
    protocols::ws::WsMessage,
    shared::subscription_models::{ExchangeId, ProductList, RequestKind},
};

/*----- */
// Exchange connector trait
/*----- */
pub trait Connector {
    type Channel: AsRef<str> + Debug + Clone + Send + Sync;
    type Message: FeedEvent + DeserializeOwned + Display + Debug + Send;

    const ID: ExchangeId;

    fn url() -> &'static str;

    // Channels named in the unsubscribe request, independent of what the
    // listener subscribed to
    fn unsubscribe_channels() -> Vec<Self::Channel>;

    fn requests(
        kind: RequestKind,
        channels: &[Self::Channel],
        products: &ProductList,
    ) -> Result<WsMessage, SocketError>;
}
