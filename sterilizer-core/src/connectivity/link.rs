//! Wireless link monitor

use super::status::ConnectionStatus;
use super::timer::ReconnectTimer;
use crate::config::RetryPolicy;
use crate::traits::LinkTransport;

/// Tracks the wireless link and drives bounded reconnection
///
/// While the link is down every check issues a reconnect request, until
/// the time since the last attempt reaches the budget. At that point the
/// monitor reports [`ConnectionStatus::TimedOut`] and stops asking, so a
/// dead access point shows up on the indicator instead of being hammered.
#[derive(Debug)]
pub struct LinkMonitor<T> {
    transport: T,
    status: ConnectionStatus,
    timer: ReconnectTimer,
    retry: RetryPolicy,
    reconnects: u32,
}

impl<T: LinkTransport> LinkMonitor<T> {
    /// Create a monitor; no request is issued until [`LinkMonitor::start`]
    pub fn new(transport: T, budget_ms: u32, retry: RetryPolicy) -> Self {
        Self {
            transport,
            status: ConnectionStatus::Disconnected,
            timer: ReconnectTimer::new(budget_ms, 0),
            retry,
            reconnects: 0,
        }
    }

    /// Start the initial association and arm the budget
    pub fn start(&mut self, now_ms: u32) {
        self.transport.connect();
        self.timer.restart(now_ms);
    }

    /// Poll the transport and update the status
    pub fn check(&mut self, now_ms: u32) -> ConnectionStatus {
        if self.transport.is_connected() {
            self.status = ConnectionStatus::Connected;
            return self.status;
        }

        self.status = match self.status {
            // Fresh drop: retry immediately, the drop starts a new budget
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
        self.transport.reconnect();
        self.timer.restart(now_ms);
        self.reconnects = self.reconnects.wrapping_add(1);
        ConnectionStatus::Disconnected
    }

    /// Status from the last check
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_timed_out(&self) -> bool {
        self.status.is_timed_out()
    }

    pub fn timer(&self) -> &ReconnectTimer {
        &self.timer
    }

    /// Reconnect requests issued so far
    pub fn reconnects(&self) -> u32 {
        self.reconnects
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
