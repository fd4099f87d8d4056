//! LED strip task
//!
//! The controller renders into a [`FrameSender`], which hands complete
//! frames to this task. Only the newest frame is kept, so a slow write
//! skips frames instead of stalling the tick.

use core::convert::Infallible;

use defmt::*;
use embassy_rp::peripherals::PIO1;
use embassy_rp::pio_programs::ws2812::{Grb, PioWs2812};
use smart_leds::{SmartLedsWrite, RGB8};
use sterilizer_core::config::STRIP_LEN;

use crate::channels::{Frame, FRAME};

/// `SmartLedsWrite` sink that forwards frames to the LED task
pub struct FrameSender;

impl SmartLedsWrite for FrameSender {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let mut frame: Frame = [RGB8::default(); STRIP_LEN];
        for (cell, color) in frame.iter_mut().zip(iterator) {
            *cell = color.into();
        }
        FRAME.signal(frame);
        Ok(())
    }
}

/// LED task - writes frames to the WS2812 strip
#[embassy_executor::task]
pub async fn led_task(mut ws2812: PioWs2812<'static, PIO1, 0, STRIP_LEN, Grb>) {
    info!("LED task started");

    // Clear whatever the strip latched at power-up
    ws2812.write(&[RGB8::default(); STRIP_LEN]).await;

    loop {
        let frame = FRAME.wait().await;
        ws2812.write(&frame).await;
        trace!("Frame written");
    }
}
