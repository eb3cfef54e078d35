use syncline_protocol::EventKey;

/// The log row currently highlighted by the host.
///
/// The engine never touches this; hosts update it from their click handler
/// and read it back when rendering the log view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowHighlight {
    current: Option<EventKey>,
}

impl RowHighlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight `key`, returning the row that was highlighted before.
    pub fn select(&mut self, key: EventKey) -> Option<EventKey> {
        self.current.replace(key)
    }

    pub fn current(&self) -> Option<&EventKey> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) -> Option<EventKey> {
        self.current.take()
    }
}
