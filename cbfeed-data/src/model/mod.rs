pub mod feed_message;

use chrono::{DateTime, Utc};

/*----- */
// Feed event
/*----- */
// Fields every inbound feed message exposes for logging
pub trait FeedEvent {
    fn kind(&self) -> &str;

    fn product_id(&self) -> Option<&str>;

    fn exchange_time(&self) -> Option<DateTime<Utc>>;
}
