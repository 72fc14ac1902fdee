//! Failure accounting and the exit decision of a run.

use diplo_types::TranscriptPage;
use itertools::Itertools;

/// How a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Everything rendered, or the failures were within tolerance.
    Success,
    /// More pages failed than tolerated, or the run did not complete.
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

#[derive(Debug)]
pub struct ConversionReport<'a> {
    failed: &'a [TranscriptPage],
    tries: usize,
    tolerance: usize,
}

impl<'a> ConversionReport<'a> {
    pub fn new(failed: &'a [TranscriptPage], tries: usize, tolerance: usize) -> Self {
        Self {
            failed,
            tries,
            tolerance,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.failed.len() > self.tolerance {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }

    /// Logs the terminal failures and returns the exit decision.
    pub fn conclude(&self) -> ExitStatus {
        if !self.failed.is_empty() {
            log::error!(
                "Conversion of the following {} pages failed after {} tries:\n {}",
                self.failed.len(),
                self.tries,
                self.failed.iter().join("\n ")
            );
        }
        let status = self.exit_status();
        match status {
            ExitStatus::Failure => log::error!(
                "These are more than the {} tolerated failures.",
                self.tolerance
            ),
            ExitStatus::Success if !self.failed.is_empty() => {
                log::info!("Up to {} failures are tolerated.", self.tolerance)
            }
            ExitStatus::Success => {}
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pages;

    #[test]
    fn test_failures_within_tolerance_succeed() {
        let failed = pages("A", 2);
        assert_eq!(ConversionReport::new(&failed, 3, 2).conclude(), ExitStatus::Success);
    }

    #[test]
    fn test_failures_over_tolerance_fail() {
        let failed = pages("A", 3);
        let report = ConversionReport::new(&failed, 3, 2);
        assert_eq!(report.conclude(), ExitStatus::Failure);
        assert_eq!(report.exit_status().code(), 1);
    }

    #[test]
    fn test_no_failures_with_zero_tolerance() {
        assert_eq!(ConversionReport::new(&[], 1, 0).conclude(), ExitStatus::Success);
        assert_eq!(ExitStatus::Success.code(), 0);
    }

    #[test]
    fn test_single_failure_with_zero_tolerance() {
        let failed = pages("A", 1);
        assert_eq!(ConversionReport::new(&failed, 2, 0).exit_status(), ExitStatus::Failure);
    }
}
