//! Progress reporting.
//!
//! The optimizer never prints on its own; it hands human-readable messages to
//! a [`Reporter`] together with a verbosity level. Swapping reporters never
//! changes optimization results.

/// Sink for progress messages.
pub trait Reporter {
    /// Receive `message`, emitted at verbosity `level` (1 = normal, 2 = detailed).
    fn report(&mut self, message: &str, level: u8);
}

/// Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&mut self, _message: &str, _level: u8) {}
}

/// Forwards messages to the `log` facade.
///
/// Messages with `level <= verbose` are logged at `info`, more detailed ones
/// at `debug`. `verbose == 0` silences everything.
#[derive(Debug, Clone, Copy)]
pub struct LogReporter {
    pub verbose: u8,
}

impl LogReporter {
    pub fn new(verbose: u8) -> Self {
        Self { verbose }
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self { verbose: 1 }
    }
}

impl Reporter for LogReporter {
    fn report(&mut self, message: &str, level: u8) {
        if self.verbose == 0 {
            return;
        }
        if level <= self.verbose {
            log::info!("{}", message);
        } else {
            log::debug!("{}", message);
        }
    }
}

/// Collects messages in memory, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct VecReporter {
    pub messages: Vec<(String, u8)>,
}

impl Reporter for VecReporter {
    fn report(&mut self, message: &str, level: u8) {
        self.messages.push((message.to_string(), level));
    }
}
