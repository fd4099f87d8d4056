//! Broker session monitor

use super::status::ConnectionStatus;
use super::timer::ReconnectTimer;
use crate::command::Inbox;
use crate::config::RetryPolicy;
use crate::traits::BrokerSession;

/// Tracks the broker session and drives bounded reconnection
///
/// The broker is a strict dependent of the link: this monitor never
/// touches the link, it only reads the link status handed in by the
/// caller. The reconnect budget only runs while the link is up, so the
/// link recovering always gives the broker a fresh budget.
///
/// Subscriptions are not assumed to survive a reconnect. Every new
/// session is subscribed to the command topic again.
#[derive(Debug)]
pub struct BrokerMonitor<B> {
    session: B,
    client_id: &'static str,
    command_topic: &'static str,
    status: ConnectionStatus,
    timer: ReconnectTimer,
    retry: RetryPolicy,
    subscribed: bool,
}

impl<B: BrokerSession> BrokerMonitor<B> {
    pub fn new(
        session: B,
        client_id: &'static str,
        command_topic: &'static str,
        budget_ms: u32,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            session,
            client_id,
            command_topic,
            status: ConnectionStatus::Disconnected,
            timer: ReconnectTimer::new(budget_ms, 0),
            retry,
            subscribed: false,
        }
    }

    /// Arm the budget; the first connect waits for the link
    pub fn start(&mut self, now_ms: u32) {
        self.timer.restart(now_ms);
    }

    /// Poll the session and update the status
    pub fn check(&mut self, now_ms: u32, link: ConnectionStatus) -> ConnectionStatus {
        if !link.is_connected() {
            self.status = ConnectionStatus::Disconnected;
            self.subscribed = false;
            self.timer.restart(now_ms);
            return self.status;
        }

        if self.session.is_connected() {
            // Session may have come up asynchronously after a request
            if !self.subscribed {
                self.subscribed = self.session.subscribe(self.command_topic);
            }
            self.status = ConnectionStatus::Connected;
            return self.status;
        }

        self.subscribed = false;
        self.status = match self.status {
            ConnectionStatus::Connected => self.attempt(now_ms),
            ConnectionStatus::Disconnected if self.timer.expired(now_ms) => {
                self.timer.mark_timed_out(now_ms);
                ConnectionStatus::TimedOut
            }
            ConnectionStatus::Disconnected => self.attempt(now_ms),
            ConnectionStatus::TimedOut if self.timer.retry_allowed(self.retry, now_ms) => {
                self.attempt(now_ms)
            }
            ConnectionStatus::TimedOut => ConnectionStatus::TimedOut,
        };
        self.status
    }

    fn attempt(&mut self, now_ms: u32) -> ConnectionStatus {
        self.timer.restart(now_ms);
        if self.session.connect(self.client_id) {
            self.subscribed = self.session.subscribe(self.command_topic);
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// Publish a message, at most once
    ///
    /// Returns false if the session is down or refused the message. Nothing
    /// is retried.
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        if !self.status.is_connected() {
            return false;
        }
        self.session.publish(topic, payload)
    }

    /// Let the session deliver inbound messages into `inbox`
    pub fn pump_incoming(&mut self, inbox: &mut Inbox) {
        if self.status.is_connected() {
            self.session.pump_incoming(inbox);
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_timed_out(&self) -> bool {
        self.status.is_timed_out()
    }

    /// Check if the current session holds the command subscription
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn timer(&self) -> &ReconnectTimer {
        &self.timer
    }

    pub fn session(&self) -> &B {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut B {
        &mut self.session
    }
}
