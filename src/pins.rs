//! GPIO assignments for the traffic-light board.
//!
//! Single source of truth: the firmware binary and the default
//! [`DriverConfig`](crate::config::DriverConfig) reference these rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic ranger
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a measurement.
pub const ULTRASONIC_TRIGGER_GPIO: u8 = 5;
/// Digital input: HIGH for the round-trip time of the ping.
/// The HC-SR04 echo is 5 V; it goes through a divider on the board.
pub const ULTRASONIC_ECHO_GPIO: u8 = 18;

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// Hub device that receives the colour commands.
pub const INDICATOR_CHANNEL: &str = "rgbSwitch1";


// ---------------------------------------------------------------------------
// Hub link (UART1; UART0 stays the log console)
// ---------------------------------------------------------------------------

pub const HUB_UART_TX_GPIO: u8 = 17;
pub const HUB_UART_RX_GPIO: u8 = 16;
pub const HUB_UART_BAUD: u32 = 115_200;
