/// Environment variable switching on verbose tracing.
pub const DEBUG_VAR: &str = "DEBUG";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
	/// Print debug tracing, plus the source and generated code after a run.
	pub debug: bool,
}

impl Config {
	/// Read `DEBUG` from the environment.
	pub fn from_env() -> Self { Self { debug: debug_enabled(std::env::var(DEBUG_VAR).ok().as_deref()) } }

	/// A command-line flag can only switch debugging on.
	pub fn with_debug(self, flag: bool) -> Self { Self { debug: self.debug || flag } }
}

/// Only `true`, in any case, enables debugging.
pub fn debug_enabled(value: Option<&str>) -> bool { value.is_some_and(|value| value.trim().eq_ignore_ascii_case("true")) }

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_true_enables_debug() {
		assert!(debug_enabled(Some("true")));
		assert!(debug_enabled(Some("TRUE")));
		assert!(debug_enabled(Some(" True ")));
		assert!(!debug_enabled(Some("1")));
		assert!(!debug_enabled(Some("yes")));
		assert!(!debug_enabled(Some("")));
		assert!(!debug_enabled(None));
	}

	#[test]
	fn flag_switches_debug_on() {
		assert!(Config::default().with_debug(true).debug);
		assert!(!Config::default().with_debug(false).debug);
		assert!(Config { debug: true }.with_debug(false).debug);
	}
}
