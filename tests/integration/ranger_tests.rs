//! HC-SR04 timing against simulated pins.

use crate::mock_hw::{BrokenTrigger, sim_ranger};

use trafficlight::app::ports::DistanceSensor;
use trafficlight::error::SensorError;
use trafficlight::sensors::HcSr04;

#[test]
fn pulse_width_is_edge_to_edge() {
    let sim = sim_ranger(Some(100), 580);
    let mut ranger = HcSr04::new(sim.trigger, sim.echo, sim.delay, sim.clock, 30_000).unwrap();

    assert_eq!(ranger.measure_pulse_us(), Ok(580));
    // The simulated echo has fallen for good, so a second ping hears nothing.
    assert_eq!(ranger.measure(), Err(SensorError::NoEcho));
}

#[test]
fn first_ping_reads_expected_distance() {
    let sim = sim_ranger(Some(100), 580);
    let mut ranger = HcSr04::new(sim.trigger, sim.echo, sim.delay, sim.clock, 30_000).unwrap();
    let cm = ranger.measure().unwrap();
    assert!((cm - 9.86).abs() < 0.01, "got {cm}");
}

#[test]
fn missing_echo_is_no_echo() {
    let sim = sim_ranger(None, 0);
    let mut ranger = HcSr04::new(sim.trigger, sim.echo, sim.delay, sim.clock, 500).unwrap();
    assert_eq!(ranger.measure(), Err(SensorError::NoEcho));
}

#[test]
fn overlong_pulse_is_echo_timeout() {
    let sim = sim_ranger(Some(100), 5_000);
    let mut ranger = HcSr04::new(sim.trigger, sim.echo, sim.delay, sim.clock, 1_000).unwrap();
    assert_eq!(ranger.measure(), Err(SensorError::EchoTimeout));
}

#[test]
fn trigger_fault_is_gpio_error() {
    let sim = sim_ranger(Some(100), 580);
    let result = HcSr04::new(BrokenTrigger, sim.echo, sim.delay, sim.clock, 30_000);
    assert_eq!(result.err(), Some(SensorError::Gpio));
}

#[test]
fn trigger_pulse_sequence() {
    let sim = sim_ranger(Some(100), 580);
    let mut ranger = HcSr04::new(sim.trigger, sim.echo, sim.delay, sim.clock, 30_000).unwrap();
    ranger.measure().unwrap();

    let (trigger, _echo) = ranger.release();
    // Parked low at construction, then low, high, low for the ping.
    assert_eq!(*trigger.levels.borrow(), vec![false, false, true, false]);
}

#[test]
fn leftover_echo_tail_is_not_measured() {
    // Echo is still high from an earlier ping and drops at 200 µs; no new
    // echo follows, so there is no reading at all.
    let sim = sim_ranger(Some(0), 200);
    let mut ranger = HcSr04::new(sim.trigger, sim.echo, sim.delay, sim.clock, 30_000).unwrap();
    assert_eq!(ranger.measure(), Err(SensorError::NoEcho));
}

#[test]
fn echo_that_never_drops_is_stuck() {
    let sim = sim_ranger(Some(0), 10_000);
    let levels = sim.trigger.levels.clone();
    let mut ranger = HcSr04::new(sim.trigger, sim.echo, sim.delay, sim.clock, 1_000).unwrap();
    assert_eq!(ranger.measure(), Err(SensorError::EchoStuck));
    // No ping was fired on top of the stuck line.
    assert_eq!(*levels.borrow(), vec![false]);
}
