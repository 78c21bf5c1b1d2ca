//! Sensor drivers.
//!
//! Each driver implements [`DistanceSensor`](crate::app::ports::DistanceSensor)
//! so the traffic-light core can range without knowing the part.

pub mod ultrasonic;

pub use ultrasonic::HcSr04;
