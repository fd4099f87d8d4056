//! Wi-Fi link proxy

use portable_atomic::Ordering;
use sterilizer_core::traits::LinkTransport;

use crate::channels::{LinkRequest, LINK_REQUEST, LINK_UP};

/// Controller-side handle on the Wi-Fi task
pub struct WifiLink;

impl LinkTransport for WifiLink {
    fn connect(&mut self) {
        LINK_REQUEST.signal(LinkRequest::Join);
    }

    fn is_connected(&self) -> bool {
        LINK_UP.load(Ordering::Acquire)
    }

    fn reconnect(&mut self) {
        LINK_REQUEST.signal(LinkRequest::Rejoin);
    }
}
