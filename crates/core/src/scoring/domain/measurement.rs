/// Outcome of a step that depends on an optional external collaborator.
///
/// `Degraded` carries the configured fallback value and why it was used, so
/// callers always get a value while tests can still see the degraded path.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement<T> {
    Measured(T),
    Degraded { value: T, reason: String },
}

impl<T> Measurement<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Measurement::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Measurement::Measured(value) | Measurement::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Measurement::Measured(value) | Measurement::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Measurement::Degraded { .. })
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            Measurement::Measured(_) => None,
            Measurement::Degraded { reason, .. } => Some(reason),
        }
    }
}
