use std::fmt;

use crate::pipeline::{ConversionResult, SkipReason};

/// Tally of a run.
///
/// `passthrough` is part of `succeeded` and `unsupported` is part of
/// `failed`. `unprocessed` counts records a cancelled run never finished.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Summary {
	pub total: usize,
	pub succeeded: usize,
	pub passthrough: usize,
	pub failed: usize,
	pub unsupported: usize,
	pub skipped: usize,
	pub unprocessed: usize,
}

impl Summary {
	pub fn new(total: usize) -> Self {
		Self {
			total,
			unprocessed: total,
			..Default::default()
		}
	}

	pub fn record(&mut self, result: &ConversionResult) {
		match result {
			ConversionResult::Succeeded(_) => self.succeeded += 1,
			ConversionResult::Skipped(SkipReason::AlreadyPng { .. }) => {
				self.succeeded += 1;
				self.passthrough += 1;
			}
			ConversionResult::Skipped(SkipReason::UnsupportedFormat { .. }) => {
				self.failed += 1;
				self.unsupported += 1;
			}
			ConversionResult::Skipped(SkipReason::UnresolvableSource) => self.skipped += 1,
			ConversionResult::Failed(_) => self.failed += 1,
		}
	}

	pub fn processed(&self) -> usize {
		self.succeeded + self.failed + self.skipped
	}

	pub fn finish(mut self) -> Self {
		self.unprocessed = self.total.saturating_sub(self.processed());
		self
	}
}

impl fmt::Display for Summary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let rule = "=".repeat(40);

		writeln!(f, "{rule}")?;
		writeln!(f, "Conversion summary")?;
		writeln!(f, "{rule}")?;
		writeln!(f, "{:<14}{:>8}  (passthrough {})", "Succeeded", self.succeeded, self.passthrough)?;
		writeln!(f, "{:<14}{:>8}  (unsupported {})", "Failed", self.failed, self.unsupported)?;
		writeln!(f, "{:<14}{:>8}", "Skipped", self.skipped)?;
		if self.unprocessed > 0 {
			writeln!(f, "{:<14}{:>8}", "Unprocessed", self.unprocessed)?;
		}
		writeln!(f, "{:<14}{:>8}", "Total", self.total)?;
		write!(f, "{rule}")
	}
}
