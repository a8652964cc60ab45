use std::{marker::PhantomData, time::Duration};

use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tracing::debug;
use url::Url;

use crate::{
    error::{ConnectionClosed, SocketError},
    exchange::Connector,
    protocols::ws::{
        connect,
        ws_parser::{process_ws_error, StreamParser, WebSocketParser, NO_CLOSE_FRAME},
        WebSocket, WsMessage,
    },
};

// Upper bound on waiting for the peer to finish the closing handshake
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/*----- */
// Feed connection
/*----- */
// One exclusively owned websocket. Owners call `close` or `abort` on every
// exit path.
pub struct FeedConnection<Exchange> {
    websocket: WebSocket,
    phantom: PhantomData<Exchange>,
}

impl<Exchange> FeedConnection<Exchange>
where
    Exchange: Connector,
{
    pub async fn open(url: &Url) -> Result<Self, SocketError> {
        let websocket = connect(url.as_str()).await?;
        debug!(exchange = %Exchange::ID, %url, "WebSocket connected");

        Ok(Self {
            websocket,
            phantom: PhantomData,
        })
    }

    pub async fn send(&mut self, message: WsMessage) -> Result<(), SocketError> {
        self.websocket.send(message).await.map_err(process_ws_error)
    }

    // Waits for the next data message. Control frames are skipped and a
    // closed peer comes back as `SocketError::ConnectionClosed`.
    pub async fn recv<Output>(&mut self) -> Result<Output, SocketError>
    where
        Output: DeserializeOwned,
    {
        loop {
            let input = match self.websocket.next().await {
                Some(input) => input,
                None => return Err(ConnectionClosed::with_error(NO_CLOSE_FRAME).into()),
            };

            match WebSocketParser::parse::<Output>(input) {
                Some(output) => return output,
                None => continue,
            }
        }
    }

    // Closing handshake, bounded by `CLOSE_TIMEOUT`
    pub async fn close(mut self) {
        self.send_close().await;

        let drain = async { while let Some(Ok(_)) = self.websocket.next().await {} };
        if timeout(CLOSE_TIMEOUT, drain).await.is_err() {
            debug!(
                exchange = %Exchange::ID,
                timeout = ?CLOSE_TIMEOUT,
                "peer did not finish closing handshake"
            );
        }
    }

    // Sends the close frame and drops the socket without waiting for the peer
    pub async fn abort(mut self) {
        self.send_close().await;
        debug!(exchange = %Exchange::ID, "WebSocket aborted");
    }

    async fn send_close(&mut self) {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "".into(),
        };

        // Peer may already be gone, a drain still flushes any close reply
        if let Err(error) = self.websocket.close(Some(frame)).await {
            debug!(exchange = %Exchange::ID, %error, "WebSocket already closing");
        }
    }
}
