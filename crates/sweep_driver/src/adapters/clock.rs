use sweep_core::naming::TIMESTAMP_FORMAT;

/// Supplies the timestamp embedded in artifact names.
pub trait Clock {
    fn timestamp(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}
