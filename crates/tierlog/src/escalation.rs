//! What happens after a DPanic, Panic or Fatal entry is written

use tierlog_core::Severity;

/// Post-write action for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Continue,
    /// Return a [`Fault`] to the caller
    Fault,
    /// Terminate the process with this exit code
    Exit(i32),
}

impl Escalation {
    pub fn for_level(level: Severity, development: bool) -> Self {
        match level {
            Severity::DPanic if development => Escalation::Fault,
            Severity::Panic => Escalation::Fault,
            Severity::Fatal => Escalation::Exit(1),
            _ => Escalation::Continue,
        }
    }
}

/// Raised by Panic entries, and by DPanic entries in development mode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{level}: {message}")]
#[must_use]
pub struct Fault {
    pub level: Severity,
    pub message: String,
}

impl Fault {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Unwind with this fault's message
    #[track_caller]
    pub fn raise(self) -> ! {
        panic!("{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        for development in [false, true] {
            for level in [Severity::Debug, Severity::Info, Severity::Warn, Severity::Error] {
                assert_eq!(Escalation::for_level(level, development), Escalation::Continue);
            }
            assert_eq!(Escalation::for_level(Severity::Panic, development), Escalation::Fault);
            assert_eq!(Escalation::for_level(Severity::Fatal, development), Escalation::Exit(1));
        }
        assert_eq!(Escalation::for_level(Severity::DPanic, false), Escalation::Continue);
        assert_eq!(Escalation::for_level(Severity::DPanic, true), Escalation::Fault);
    }

    #[test]
    fn test_fault_display() {
        let fault = Fault::new(Severity::Panic, "index out of sync");
        assert_eq!(fault.to_string(), "panic: index out of sync");
    }

    #[test]
    #[should_panic(expected = "dpanic: unreachable state")]
    fn test_fault_raise() {
        Fault::new(Severity::DPanic, "unreachable state").raise();
    }
}
