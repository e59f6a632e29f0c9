//! Delivery of flattened log items to subscribers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use parking_lot::RwLock;

use eme_logger_core::LogItem;

/// Subscriber for flattened log items.
pub trait LogSubscriber: Send + Sync {
    /// Called for every emitted item that passes the filter.
    fn on_item(&self, item: &LogItem);

    /// Titles this subscriber is interested in. `None` receives everything.
    fn title_filter(&self) -> Option<Vec<String>> {
        None
    }
}

/// Writes every item to `tracing`.
pub struct TracingSubscriber {
    /// Level the items are logged at.
    pub level: tracing::Level,
}

impl TracingSubscriber {
    /// Create a subscriber logging at `INFO`.
    pub fn new() -> Self {
        Self {
            level: tracing::Level::INFO,
        }
    }

    /// Set the log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }
}

impl Default for TracingSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSubscriber for TracingSubscriber {
    fn on_item(&self, item: &LogItem) {
        let fields = item.names.join(",");
        match self.level {
            tracing::Level::ERROR => {
                tracing::error!(title = %item.title, fields = %fields, "EME log item")
            }
            tracing::Level::WARN => {
                tracing::warn!(title = %item.title, fields = %fields, "EME log item")
            }
            tracing::Level::INFO => {
                tracing::info!(title = %item.title, fields = %fields, "EME log item")
            }
            tracing::Level::DEBUG => {
                tracing::debug!(title = %item.title, item = ?item, "EME log item")
            }
            _ => {
                tracing::trace!(title = %item.title, item = ?item, "EME log item")
            }
        }
    }
}

/// Keeps emitted items in memory, up to a limit.
///
/// Items arriving once the limit is reached are counted, not stored.
pub struct CollectingSubscriber {
    items: RwLock<Vec<(SystemTime, LogItem)>>,
    max_items: usize,
    dropped: AtomicUsize,
    titles: Option<Vec<String>>,
}

impl CollectingSubscriber {
    /// Create a collector holding at most `max_items` items.
    pub fn new(max_items: usize) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            max_items,
            dropped: AtomicUsize::new(0),
            titles: None,
        }
    }

    /// Only collect items with one of the given titles.
    pub fn with_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.titles = Some(titles.into_iter().map(Into::into).collect());
        self
    }

    /// Collected items with the time they were received.
    pub fn entries(&self) -> Vec<(SystemTime, LogItem)> {
        self.items.read().clone()
    }

    /// Collected items.
    pub fn items(&self) -> Vec<LogItem> {
        self.items.read().iter().map(|(_, item)| item.clone()).collect()
    }

    /// Items turned away because the collector was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Forget every collected item and reset the drop count.
    pub fn clear(&self) {
        self.items.write().clear();
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Number of collected items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl LogSubscriber for CollectingSubscriber {
    fn on_item(&self, item: &LogItem) {
        let mut items = self.items.write();
        if items.len() < self.max_items {
            items.push((SystemTime::now(), item.clone()));
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn title_filter(&self) -> Option<Vec<String>> {
        self.titles.clone()
    }
}

/// Fans log items out to registered subscribers.
#[derive(Default)]
pub struct LogDispatcher {
    subscribers: RwLock<Vec<Arc<dyn LogSubscriber>>>,
}

impl LogDispatcher {
    /// Create a dispatcher with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber.
    pub fn subscribe(&self, subscriber: Arc<dyn LogSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    /// Remove all subscribers.
    pub fn clear_subscribers(&self) {
        self.subscribers.write().clear();
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Deliver an item to every subscriber whose filter accepts its title.
    pub fn emit(&self, item: &LogItem) {
        let subscribers = self.subscribers.read();
        for subscriber in subscribers.iter() {
            if let Some(filter) = subscriber.title_filter() {
                if !filter.iter().any(|title| *title == item.title) {
                    continue;
                }
            }
            subscriber.on_item(item);
        }
    }
}

impl std::fmt::Debug for LogDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogDispatcher")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
