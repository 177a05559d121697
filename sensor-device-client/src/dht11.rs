//! Simulated DHT11 sensor
//!
//! The sensor answers a read with a 5 byte frame: humidity integral and
//! decimal part, temperature integral and decimal part, then a checksum
//! equal to the low byte of the sum of the first four bytes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

pub const FRAME_LEN: usize = 5;

/// Measurement range the simulation stays within
const TEMPERATURE_RANGE: (f64, f64) = (0.0, 50.0);
const HUMIDITY_RANGE: (f64, f64) = (20.0, 90.0);

/// Largest change between two consecutive reads
const TEMPERATURE_STEP: f64 = 0.5;
const HUMIDITY_STEP: f64 = 2.0;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Dht11Error {
    #[error("Checksum failed (frame says {expected:#04x}, computed {computed:#04x})")]
    Checksum { expected: u8, computed: u8 },
}

/// Decoded measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub temperature: f64,
    pub humidity: f64,
}

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Split a value into its integral part and tenths, as the sensor encodes it
fn split_tenths(value: f64) -> (u8, u8) {
    let tenths = (value.clamp(0.0, 255.9) * 10.0).round() as u16;
    ((tenths / 10) as u8, (tenths % 10) as u8)
}

pub fn encode_frame(sample: SensorSample) -> [u8; FRAME_LEN] {
    let (humidity_int, humidity_dec) = split_tenths(sample.humidity);
    let (temperature_int, temperature_dec) = split_tenths(sample.temperature);
    let mut frame = [humidity_int, humidity_dec, temperature_int, temperature_dec, 0];
    frame[4] = checksum(&frame[..4]);
    frame
}

pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Result<SensorSample, Dht11Error> {
    let computed = checksum(&frame[..4]);
    if computed != frame[4] {
        return Err(Dht11Error::Checksum {
            expected: frame[4],
            computed,
        });
    }

    Ok(SensorSample {
        humidity: f64::from(frame[0]) + f64::from(frame[1]) / 10.0,
        temperature: f64::from(frame[2]) + f64::from(frame[3]) / 10.0,
    })
}

/// Sensor whose readings drift slowly and now and then fail the checksum
pub struct SimulatedDht11<R = StdRng> {
    current: SensorSample,
    failure_rate: f64,
    rng: R,
}

impl SimulatedDht11<StdRng> {
    pub fn new(initial: SensorSample, failure_rate: f64) -> Self {
        Self::with_rng(initial, failure_rate, StdRng::from_entropy())
    }
}

impl<R: Rng> SimulatedDht11<R> {
    /// `failure_rate` is clamped to `0.0..=1.0`; NaN means the sensor never fails
    pub fn with_rng(initial: SensorSample, failure_rate: f64, rng: R) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            current: initial,
            failure_rate,
            rng,
        }
    }

    /// Advance the simulated climate and return the raw frame the sensor sends
    pub fn sample_frame(&mut self) -> [u8; FRAME_LEN] {
        let dt = self.rng.gen_range(-TEMPERATURE_STEP..=TEMPERATURE_STEP);
        let dh = self.rng.gen_range(-HUMIDITY_STEP..=HUMIDITY_STEP);
        self.current.temperature =
            (self.current.temperature + dt).clamp(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1);
        self.current.humidity =
            (self.current.humidity + dh).clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);

        let mut frame = encode_frame(self.current);
        if self.rng.gen_bool(self.failure_rate) {
            // Bit error on the wire
            frame[self.rng.gen_range(0..4)] ^= 0x01;
        }
        frame
    }

    pub fn read(&mut self) -> Result<SensorSample, Dht11Error> {
        decode_frame(&self.sample_frame())
    }
}
