//! Rotate, left and right buttons with async debouncing.

use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::gpio::{
    Input,
    InputConfig,
    Pull,
};

use crate::{
    ButtonResources,
    input::{
        InputArbiter,
        Intent,
    },
};

/// The three game buttons, active low.
pub struct Buttons {
    pub rotate: Input<'static>,
    pub left: Input<'static>,
    pub right: Input<'static>,
}

const DEBOUNCE_MS: u64 = 20;

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            rotate: Input::new(res.rotate, pull_up),
            left: Input::new(res.left, pull_up),
            right: Input::new(res.right, pull_up),
        }
    }
}

impl Buttons {
    /// Split into `(button, intent)` pairs, one per forwarding task.
    pub fn into_intents(self) -> [(Input<'static>, Intent); 3] {
        [
            (self.left, Intent::Left),
            (self.right, Intent::Right),
            (self.rotate, Intent::Rotate),
        ]
    }

    /// Latch `intent` on every debounced press of `button`. Never returns.
    pub async fn forward(button: &mut Input<'_>, intent: Intent, input: &InputArbiter) {
        loop {
            Self::debounce_press(button).await;
            input.press(intent);
            trace!("press {}", intent);
            Self::debounce_release(button).await;
        }
    }

    /// Wait for a debounced button press (falling edge, active low).
    pub async fn debounce_press(button: &mut Input<'_>) {
        loop {
            button.wait_for_falling_edge().await;
            Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
            if button.is_low() {
                return;
            }
        }
    }

    /// Wait for a debounced button release (rising edge).
    pub async fn debounce_release(button: &mut Input<'_>) {
        loop {
            button.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
            if button.is_high() {
                return;
            }
        }
    }
}
