//! Observability helpers for loopback flows.
//!
//! # Feature Flags
//!
//! - Structured spans named `oauth2_loopback.flow` carry a `stage` field and are always emitted.
//! - Enable `metrics` to increment the `oauth2_loopback_flow_total` counter for every
//!   attempt/success/failure, labeled by `outcome`.

// self
use crate::_prelude::*;

/// Outcome labels recorded for each flow attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to the flow orchestrator.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Creates the span wrapping one flow stage.
pub fn flow_span(stage: &'static str) -> tracing::Span {
	tracing::info_span!("oauth2_loopback.flow", stage)
}

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_loopback_flow_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_flow_outcome_noop_without_metrics() {
		record_flow_outcome(FlowOutcome::Failure);
	}

	#[test]
	fn outcome_labels_are_stable() {
		assert_eq!(FlowOutcome::Attempt.as_str(), "attempt");
		assert_eq!(FlowOutcome::Success.to_string(), "success");
		assert_eq!(FlowOutcome::Failure.as_str(), "failure");
	}
}
