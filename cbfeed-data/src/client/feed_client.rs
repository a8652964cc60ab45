use std::{future::Future, io::Write, marker::PhantomData};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{config::FeedConfig, connection::FeedConnection};
use crate::{
    error::{ConnectionClosed, SocketError},
    exchange::Connector,
    model::FeedEvent,
    protocols::ws::WsMessage,
    shared::subscription_models::{ProductList, RequestKind},
};

pub const INTERRUPTED: &str = "Keyboard Interrupt...";

/*----- */
// Outcomes
/*----- */
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ListenOutcome {
    Closed(ConnectionClosed),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnsubscribeOutcome {
    Acknowledged(Map<String, Value>),
    Closed(ConnectionClosed),
    Cancelled,
}

// `unsubscribe` is only present when the listener was cancelled
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub listen: ListenOutcome,
    pub unsubscribe: Option<UnsubscribeOutcome>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    Listening,
    Unsubscribing,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Listening => "listening",
            Phase::Unsubscribing => "unsubscribing",
        }
    }
}

pub fn closure_diagnostic(closed: &ConnectionClosed, phase: Phase) -> String {
    match (phase, closed.clean) {
        (Phase::Listening, false) => format!("Connection closed with error: {}", closed.reason),
        (Phase::Listening, true) => format!(
            "Connection closed correctly with message: {}",
            closed.reason
        ),
        (Phase::Unsubscribing, false) => format!(
            "Connection closed during unsubscribing with error: {}",
            closed.reason
        ),
        (Phase::Unsubscribing, true) => format!(
            "Connection closed during unsubscribing correctly with message: {}",
            closed.reason
        ),
    }
}

/*----- */
// Feed client
/*----- */
pub struct FeedClient<Exchange>
where
    Exchange: Connector,
{
    config: FeedConfig<Exchange::Channel>,
    phantom: PhantomData<Exchange>,
}

impl<Exchange> FeedClient<Exchange>
where
    Exchange: Connector,
{
    pub fn new(config: FeedConfig<Exchange::Channel>) -> Self {
        Self {
            config,
            phantom: PhantomData,
        }
    }

    // Listen until the peer closes or `shutdown` resolves. Only a cancelled
    // listener is followed by an unsubscribe, on a fresh connection, which
    // `abort` cuts short.
    pub async fn run<W, F, A>(
        &self,
        products: &ProductList,
        output: &mut W,
        shutdown: F,
        abort: A,
    ) -> Result<RunOutcome, SocketError>
    where
        W: Write,
        F: Future<Output = ()>,
        A: Future<Output = ()>,
    {
        let listen = self.connect_and_listen(products, output, shutdown).await?;

        let unsubscribe = match listen {
            ListenOutcome::Cancelled => {
                writeln!(output, "{INTERRUPTED}")?;
                Some(self.unsubscribe(products, output, abort).await?)
            }
            ListenOutcome::Closed(_) => None,
        };

        Ok(RunOutcome {
            listen,
            unsubscribe,
        })
    }

    pub async fn connect_and_listen<W, F>(
        &self,
        products: &ProductList,
        output: &mut W,
        shutdown: F,
    ) -> Result<ListenOutcome, SocketError>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let request = Exchange::requests(RequestKind::Subscribe, &self.config.channels, products)?;

        let mut connection = FeedConnection::<Exchange>::open(&self.config.url).await?;
        let result = self
            .listen(&mut connection, request, products, output, shutdown)
            .await;
        connection.close().await;

        match result {
            Err(SocketError::ConnectionClosed(closed)) => {
                Self::report_closure(output, &closed, Phase::Listening)?;
                Ok(ListenOutcome::Closed(closed))
            }
            result => result,
        }
    }

    async fn listen<W, F>(
        &self,
        connection: &mut FeedConnection<Exchange>,
        request: WsMessage,
        products: &ProductList,
        output: &mut W,
        shutdown: F,
    ) -> Result<ListenOutcome, SocketError>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        connection.send(request).await?;

        info!(
            exchange = %Exchange::ID,
            %products,
            channels = ?self.config.channels,
            message = "Subscribed to WebSocket"
        );

        tokio::pin!(shutdown);

        loop {
            let message = tokio::select! {
                _ = &mut shutdown => {
                    info!(exchange = %Exchange::ID, "listener cancelled");
                    return Ok(ListenOutcome::Cancelled);
                }
                message = connection.recv::<Exchange::Message>() => message?,
            };

            debug!(
                exchange = %Exchange::ID,
                kind = message.kind(),
                product_id = message.product_id(),
                latency_ms = message
                    .exchange_time()
                    .map(|time| (Utc::now() - time).num_milliseconds()),
                payload = ?message,
                "received feed message"
            );
            writeln!(output, "{message}")?;
        }
    }

    pub async fn unsubscribe<W, F>(
        &self,
        products: &ProductList,
        output: &mut W,
        shutdown: F,
    ) -> Result<UnsubscribeOutcome, SocketError>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let request = Exchange::requests(
            RequestKind::Unsubscribe,
            &Exchange::unsubscribe_channels(),
            products,
        )?;

        let mut connection = FeedConnection::<Exchange>::open(&self.config.url).await?;
        let result = tokio::select! {
            _ = shutdown => None,
            result = Self::request_response(&mut connection, request) => Some(result),
        };

        let result = match result {
            Some(result) => {
                connection.close().await;
                result
            }
            None => {
                connection.abort().await;
                warn!(exchange = %Exchange::ID, %products, "unsubscribe cancelled");
                writeln!(output, "{INTERRUPTED}")?;
                return Ok(UnsubscribeOutcome::Cancelled);
            }
        };

        match result {
            Ok(response) => {
                let raw = serde_json::to_string(&response).map_err(SocketError::Serialise)?;
                writeln!(output, "{raw}")?;

                info!(exchange = %Exchange::ID, %products, message = "Unsubscribed from WebSocket");
                Ok(UnsubscribeOutcome::Acknowledged(response))
            }
            Err(SocketError::ConnectionClosed(closed)) => {
                Self::report_closure(output, &closed, Phase::Unsubscribing)?;
                Ok(UnsubscribeOutcome::Closed(closed))
            }
            Err(error) => Err(error),
        }
    }

    // Exactly one request out, exactly one response read
    async fn request_response(
        connection: &mut FeedConnection<Exchange>,
        request: WsMessage,
    ) -> Result<Map<String, Value>, SocketError> {
        connection.send(request).await?;
        connection.recv::<Map<String, Value>>().await
    }

    fn report_closure<W>(
        output: &mut W,
        closed: &ConnectionClosed,
        phase: Phase,
    ) -> Result<(), SocketError>
    where
        W: Write,
    {
        match closed.clean {
            true => info!(
                exchange = %Exchange::ID,
                phase = phase.as_str(),
                reason = %closed.reason,
                message = "WebSocket closed by peer"
            ),
            false => warn!(
                exchange = %Exchange::ID,
                phase = phase.as_str(),
                reason = %closed.reason,
                message = "WebSocket closed with error"
            ),
        }

        writeln!(output, "{}", closure_diagnostic(closed, phase))?;
        Ok(())
    }
}
