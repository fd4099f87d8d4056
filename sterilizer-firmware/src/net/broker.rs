//! MQTT session proxy

use defmt::*;
use heapless::{String, Vec};
use portable_atomic::Ordering;
use sterilizer_core::command::Inbox;
use sterilizer_core::traits::BrokerSession;
use sterilizer_protocol::DEVICE_TOPIC;

use crate::channels::{ClientId, OutboundMessage, BROKER_REQUEST, BROKER_UP, INBOUND, OUTBOX};

/// Controller-side handle on the MQTT task
///
/// The MQTT task subscribes to the command topic itself before raising
/// `BROKER_UP`, so `subscribe` only confirms that topic.
pub struct MqttSession;

impl BrokerSession for MqttSession {
    fn connect(&mut self, client_id: &str) -> bool {
        if self.is_connected() {
            return true;
        }
        match ClientId::try_from(client_id) {
            Ok(id) => BROKER_REQUEST.signal(id),
            Err(_) => warn!("Client ID too long: {}", client_id),
        }
        false
    }

    fn is_connected(&self) -> bool {
        BROKER_UP.load(Ordering::Acquire)
    }

    fn subscribe(&mut self, topic: &str) -> bool {
        if topic != DEVICE_TOPIC {
            warn!("Subscription to {} not supported", topic);
            return false;
        }
        self.is_connected()
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        if !self.is_connected() {
            return false;
        }
        let Ok(topic) = String::try_from(topic) else {
            warn!("Topic too long: {}", topic);
            return false;
        };
        let Ok(payload) = Vec::from_slice(payload) else {
            warn!("Payload too long ({} bytes)", payload.len());
            return false;
        };
        OUTBOX.try_send(OutboundMessage { topic, payload }).is_ok()
    }

    fn pump_incoming(&mut self, inbox: &mut Inbox) {
        while let Ok(payload) = INBOUND.try_receive() {
            let len = payload.len();
            if inbox.push_payload(payload).is_err() {
                warn!("Inbox full, dropped {} byte command", len);
            }
        }
    }
}
