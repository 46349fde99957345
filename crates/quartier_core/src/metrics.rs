//! Happiness time series and structured logging.

/// Append-only log of per-step happiness percentages.
///
/// One value is appended per completed step and never mutated afterwards;
/// the length always equals the number of steps completed so far. Every
/// value is `100 × happy / occupied`, so the series stays in `[0, 100]`.
#[derive(Debug, Clone, Default)]
pub struct HappinessLog {
    values: Vec<f64>,
}

impl HappinessLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, value: f64) {
        debug_assert!((0.0..=100.0).contains(&value));
        self.values.push(value);
    }

    /// The full series, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// The most recent step's happiness, if any step has completed.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
