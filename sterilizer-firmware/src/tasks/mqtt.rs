//! MQTT task
//!
//! Opens the broker session when the controller asks for one, then
//! shuttles messages until the session drops:
//! - payloads on the command topic go to `INBOUND`
//! - notifications from `OUTBOX` are published with QoS 0

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::tcp::{ConnectError, TcpSocket};
use embassy_net::{IpEndpoint, Ipv4Address, Stack};
use embassy_time::Duration;
use myrtio_mqtt::{MqttClient, MqttEvent, MqttOptions, QoS, TcpTransport};
use portable_atomic::Ordering;

use sterilizer_protocol::{Payload, BROKER_PORT, DEVICE_TOPIC};

use crate::channels::{BROKER_REQUEST, BROKER_UP, INBOUND, LINK_UP, OUTBOX};
use crate::config::{BROKER_ADDR, MQTT_READ_TIMEOUT_S, MQTT_SOCKET_BUFFER};

/// Why a session ended
#[derive(Debug)]
enum SessionError {
    /// TCP connection to the broker failed
    Tcp(ConnectError),
    /// The MQTT exchange failed or the broker closed the connection
    Mqtt,
}

/// MQTT task - one broker session at a time
#[embassy_executor::task]
pub async fn mqtt_task(stack: Stack<'static>) {
    info!("MQTT task started");

    let mut rx_buffer = [0u8; MQTT_SOCKET_BUFFER];
    let mut tx_buffer = [0u8; MQTT_SOCKET_BUFFER];

    loop {
        let client_id = BROKER_REQUEST.wait().await;

        if !LINK_UP.load(Ordering::Acquire) {
            debug!("Broker requested without a link, ignoring");
            continue;
        }

        match run_session(stack, &client_id, &mut rx_buffer, &mut tx_buffer).await {
            Ok(()) => info!("MQTT session closed"),
            Err(SessionError::Tcp(e)) => warn!("Broker unreachable: {:?}", e),
            Err(SessionError::Mqtt) => warn!("MQTT session failed"),
        }
        BROKER_UP.store(false, Ordering::Release);
    }
}

/// Connect, subscribe, then serve the session until it fails
async fn run_session(
    stack: Stack<'static>,
    client_id: &str,
    rx_buffer: &mut [u8],
    tx_buffer: &mut [u8],
) -> Result<(), SessionError> {
    let mut socket = TcpSocket::new(stack, rx_buffer, tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(30)));

    let [a, b, c, d] = BROKER_ADDR;
    let endpoint = IpEndpoint::new(Ipv4Address::new(a, b, c, d).into(), BROKER_PORT);
    info!("Connecting to broker {}", endpoint);
    socket.connect(endpoint).await.map_err(SessionError::Tcp)?;

    let transport = TcpTransport::new(socket, Duration::from_secs(MQTT_READ_TIMEOUT_S));
    let mut client = MqttClient::<_, 5, 256>::new(transport, MqttOptions::new(client_id));

    client.connect().await.map_err(|e| {
        warn!("CONNECT rejected: {:?}", Debug2Format(&e));
        SessionError::Mqtt
    })?;
    client
        .subscribe(DEVICE_TOPIC, QoS::AtMostOnce)
        .await
        .map_err(|e| {
            warn!("SUBSCRIBE failed: {:?}", Debug2Format(&e));
            SessionError::Mqtt
        })?;

    // Anything queued while the session was down is stale
    OUTBOX.clear();
    BROKER_UP.store(true, Ordering::Release);
    info!(
        "MQTT connected as {}, subscribed to {}",
        client_id, DEVICE_TOPIC
    );

    loop {
        if !LINK_UP.load(Ordering::Acquire) {
            return Ok(());
        }

        let message = match select(client.poll(), OUTBOX.receive()).await {
            Either::First(Ok(Some(MqttEvent::Publish(publish)))) => {
                if publish.topic == DEVICE_TOPIC
                    && INBOUND.try_send(Payload::from_wire(publish.payload)).is_err()
                {
                    warn!("Inbound queue full, command dropped");
                }
                continue;
            }
            Either::First(Ok(_)) => continue,
            Either::First(Err(e)) => {
                warn!("MQTT poll failed: {:?}", Debug2Format(&e));
                return Err(SessionError::Mqtt);
            }
            Either::Second(message) => message,
        };

        client
            .publish(&message.topic, &message.payload, QoS::AtMostOnce)
            .await
            .map_err(|e| {
                warn!("PUBLISH failed: {:?}", Debug2Format(&e));
                SessionError::Mqtt
            })?;
        debug!(
            "Published {} bytes to {}",
            message.payload.len(),
            message.topic
        );
    }
}
