mod channel;
mod event_types;
mod order_events;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use order_events::{OrderEvents, OrderPaidPublisher};
