//! Event wiring for the order service.
//!
//! Two streams pass through here. Payment confirmations come in from the HTTP layer and are queued for a single
//! settlement handler. Orders that a confirmation has settled go out to every order-paid listener.
//!
//! The settlement handler usually needs the orchestrator, and the orchestrator needs the order-paid publisher, so
//! wiring happens in this order:
//!
//! ```rust,ignore
//! let mut events = OrderEvents::new(100);
//! events.on_order_paid(notify_warehouse);
//! let api = Arc::new(OrderFlowApi::new(db, catalog, payments, config, events.order_paid_publisher()));
//! let confirmations = events.settle_with(move |event| settle(Arc::clone(&api), event));
//! events.start();
//! ```
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::events::{EventHandler, EventProducer, OrderPaidEvent, PaymentSucceededEvent};

/// Fans a settled order out to every order-paid listener.
#[derive(Default, Clone)]
pub struct OrderPaidPublisher {
    listeners: Vec<EventProducer<OrderPaidEvent>>,
}

impl OrderPaidPublisher {
    pub async fn publish(&self, event: OrderPaidEvent) {
        for listener in &self.listeners {
            listener.publish_event(event.clone()).await;
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

pub struct OrderEvents {
    buffer_size: usize,
    order_paid: Vec<EventHandler<OrderPaidEvent>>,
    settlement: Option<EventHandler<PaymentSucceededEvent>>,
}

impl OrderEvents {
    /// `buffer_size` bounds every queue created here.
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size, order_paid: Vec::new(), settlement: None }
    }

    /// Adds a listener that is called once for every order a payment confirmation settles.
    pub fn on_order_paid<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderPaidEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.order_paid.push(EventHandler::new(self.buffer_size, Arc::new(f)));
        self
    }

    /// The publisher for the listeners registered so far. Listeners added later are not reached by it.
    pub fn order_paid_publisher(&self) -> OrderPaidPublisher {
        OrderPaidPublisher { listeners: self.order_paid.iter().map(EventHandler::subscribe).collect() }
    }

    /// Installs the handler that applies queued payment confirmations, replacing any earlier one, and returns the
    /// producer that feeds it.
    pub fn settle_with<F>(&mut self, f: F) -> EventProducer<PaymentSucceededEvent>
    where F: (Fn(PaymentSucceededEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        if self.settlement.is_some() {
            warn!("📬️ A settlement handler was already installed. It has been replaced.");
        }
        let handler = EventHandler::new(self.buffer_size, Arc::new(f));
        let producer = handler.subscribe();
        self.settlement = Some(handler);
        producer
    }

    /// Spawns one task per handler. Each task runs until every producer feeding it has been dropped.
    pub fn start(self) {
        debug!(
            "📬️ Starting {} order paid listener(s). Settlement handler installed: {}",
            self.order_paid.len(),
            self.settlement.is_some()
        );
        for handler in self.order_paid {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.settlement {
            tokio::spawn(handler.start_handler());
        }
    }
}
