//! Network link and broker session traits

use crate::command::Inbox;

/// Network transport (the wireless link)
///
/// Requests are fire-and-forget: the result of a (re)connect is observed
/// through [`LinkTransport::is_connected`] on a later tick.
pub trait LinkTransport {
    /// Start the initial association
    fn connect(&mut self);

    /// Check if the link is up
    fn is_connected(&self) -> bool;

    /// Ask the transport to re-associate
    fn reconnect(&mut self);
}

/// Publish/subscribe session with the broker
pub trait BrokerSession {
    /// Open a session as `client_id`
    ///
    /// Returns true if the session is established.
    fn connect(&mut self, client_id: &str) -> bool;

    /// Check if the session is up
    fn is_connected(&self) -> bool;

    /// Subscribe to `topic`
    ///
    /// Returns true if the request was accepted.
    fn subscribe(&mut self, topic: &str) -> bool;

    /// Publish `payload` on `topic`
    ///
    /// Best effort. Returns false if the message was not handed over;
    /// the caller must not assume a retry.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool;

    /// Move messages that arrived since the last call into `inbox`
    ///
    /// Must be called once per tick while connected.
    fn pump_incoming(&mut self, inbox: &mut Inbox);
}
