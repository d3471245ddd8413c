use serde::Deserialize;

/// What to do after the connection closes.
///
/// The default keeps a single connection for the whole session and never
/// retries.
#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReconnectPolicy {
	/// Keep one connection; a close is final.
	#[default]
	Never,
	/// Retry after a growing delay.
	Exponential {
		/// Delay before the first retry.
		#[serde(default = "default_initial_ms")]
		initial_ms: u32,
		/// Upper bound for any delay.
		#[serde(default = "default_max_ms")]
		max_ms: u32,
		/// Growth per attempt; values below 1 are treated as 1.
		#[serde(default = "default_factor")]
		factor: f64,
		/// Give up after this many retries without an open connection.
		#[serde(default)]
		max_attempts: Option<u32>,
	},
}

fn default_initial_ms() -> u32 {
	500
}

fn default_max_ms() -> u32 {
	30_000
}

fn default_factor() -> f64 {
	2.0
}

impl ReconnectPolicy {
	/// Exponential backoff with the default timings and no attempt cap.
	pub fn exponential() -> Self {
		ReconnectPolicy::Exponential {
			initial_ms: default_initial_ms(),
			max_ms: default_max_ms(),
			factor: default_factor(),
			max_attempts: None,
		}
	}

	/// Delay before retry number `attempt` (zero based), or `None` to give up.
	pub fn delay_ms(&self, attempt: u32) -> Option<u32> {
		match *self {
			ReconnectPolicy::Never => None,
			ReconnectPolicy::Exponential {
				initial_ms,
				max_ms,
				factor,
				max_attempts,
			} => {
				if max_attempts.is_some_and(|max| attempt >= max) {
					return None;
				}
				let delay = f64::from(initial_ms) * factor.max(1.0).powi(attempt as i32);
				Some(delay.min(f64::from(max_ms)) as u32)
			}
		}
	}
}

/// Browser timers take a signed 32-bit delay; larger values wrap negative and
/// fire at once, so clamp instead.
pub fn timer_delay(delay_ms: u32) -> i32 {
	i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn never_gives_up_immediately() {
		assert_eq!(ReconnectPolicy::Never.delay_ms(0), None);
	}

	#[test]
	fn exponential_doubles_up_to_cap() {
		let policy = ReconnectPolicy::Exponential {
			initial_ms: 100,
			max_ms: 1_000,
			factor: 2.0,
			max_attempts: None,
		};
		let delays: Vec<_> = (0..6).map(|a| policy.delay_ms(a).unwrap()).collect();
		assert_eq!(delays, [100, 200, 400, 800, 1_000, 1_000]);
	}

	#[test]
	fn exponential_respects_attempt_cap() {
		let policy = ReconnectPolicy::Exponential {
			initial_ms: 100,
			max_ms: 1_000,
			factor: 2.0,
			max_attempts: Some(2),
		};
		assert!(policy.delay_ms(1).is_some());
		assert_eq!(policy.delay_ms(2), None);
	}

	#[test]
	fn oversized_delays_clamp_to_a_positive_timer() {
		let policy: ReconnectPolicy = serde_json::from_str(
			r#"{"mode":"exponential","initial_ms":3000000000,"max_ms":4000000000}"#,
		)
		.unwrap();
		let delay = policy.delay_ms(0).unwrap();
		assert_eq!(delay, 3_000_000_000);
		assert_eq!(timer_delay(delay), i32::MAX);
		assert_eq!(timer_delay(policy.delay_ms(3).unwrap()), i32::MAX);
		assert_eq!(timer_delay(u32::MAX), i32::MAX);
		assert_eq!(timer_delay(1_500), 1_500);
	}

	#[test]
	fn deserializes_with_defaults() {
		let policy: ReconnectPolicy =
			serde_json::from_str(r#"{"mode":"exponential","max_attempts":5}"#).unwrap();
		assert_eq!(
			policy,
			ReconnectPolicy::Exponential {
				initial_ms: 500,
				max_ms: 30_000,
				factor: 2.0,
				max_attempts: Some(5),
			}
		);
		let never: ReconnectPolicy = serde_json::from_str(r#"{"mode":"never"}"#).unwrap();
		assert_eq!(never, ReconnectPolicy::Never);
	}
}
