use serde::de::DeserializeOwned;
use tokio_tungstenite::tungstenite::{
    error::ProtocolError,
    protocol::{frame::coding::CloseCode, CloseFrame},
};

use crate::error::{ConnectionClosed, SocketError};

use super::{WsError, WsMessage};

// Reason reported when the peer disappears without a closing handshake
pub const NO_CLOSE_FRAME: &str = "no close frame received or sent";

/*----- */
// Websocket parser
/*----- */
pub struct WebSocketParser;

pub trait StreamParser {
    type Message;
    type Error;

    fn parse<Output>(
        input: Result<Self::Message, Self::Error>,
    ) -> Option<Result<Output, SocketError>>
    where
        Output: DeserializeOwned;
}

impl StreamParser for WebSocketParser {
    type Message = WsMessage;
    type Error = WsError;

    fn parse<Output>(
        input: Result<Self::Message, Self::Error>,
    ) -> Option<Result<Output, SocketError>>
    where
        Output: DeserializeOwned,
    {
        match input {
            Ok(ws_message) => match ws_message {
                WsMessage::Text(text) => process_text(text),
                WsMessage::Binary(binary) => process_binary(binary),
                WsMessage::Close(close_frame) => process_close_frame(close_frame),
                // Pings are answered by tungstenite itself
                WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => None,
            },
            Err(ws_err) => Some(Err(process_ws_error(ws_err))),
        }
    }
}

pub fn process_text<ExchangeMessage>(
    payload: String,
) -> Option<Result<ExchangeMessage, SocketError>>
where
    ExchangeMessage: DeserializeOwned,
{
    Some(
        serde_json::from_str::<ExchangeMessage>(&payload)
            .map_err(|error| SocketError::Deserialise { error, payload }),
    )
}

pub fn process_binary<ExchangeMessage>(
    payload: Vec<u8>,
) -> Option<Result<ExchangeMessage, SocketError>>
where
    ExchangeMessage: DeserializeOwned,
{
    Some(
        serde_json::from_slice::<ExchangeMessage>(&payload).map_err(|error| {
            SocketError::Deserialise {
                error,
                payload: String::from_utf8(payload).unwrap_or_else(|x| x.to_string()),
            }
        }),
    )
}

pub fn process_close_frame<ExchangeMessage>(
    close_frame: Option<CloseFrame<'_>>,
) -> Option<Result<ExchangeMessage, SocketError>> {
    Some(Err(classify_close_frame(close_frame).into()))
}

// 1000 and 1001 are the only codes treated as an orderly shutdown
pub fn classify_close_frame(close_frame: Option<CloseFrame<'_>>) -> ConnectionClosed {
    let frame = match close_frame {
        Some(frame) => frame,
        None => return ConnectionClosed::with_error("received close frame without status code"),
    };

    let reason = match frame.reason.is_empty() {
        true => format!("received {}", frame.code),
        false => format!("received {}: {}", frame.code, frame.reason),
    };

    match frame.code {
        CloseCode::Normal | CloseCode::Away => ConnectionClosed::cleanly(reason),
        _ => ConnectionClosed::with_error(reason),
    }
}

pub fn process_ws_error(error: WsError) -> SocketError {
    match is_websocket_disconnected(&error) {
        true => ConnectionClosed::with_error(NO_CLOSE_FRAME).into(),
        false => SocketError::WebSocketError(error),
    }
}

pub fn is_websocket_disconnected(error: &WsError) -> bool {
    matches!(
        error,
        WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Io(_)
            | WsError::Protocol(ProtocolError::SendAfterClosing)
            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}
