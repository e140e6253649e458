mod controller;
mod led;
mod sensor;

pub use controller::{EventController, Outcome, SessionState};
pub use led::{LedIndicator, PIXEL};
pub use sensor::{PublishReport, SENSOR_PERIOD, Sampler, format_value, publish_reading};
