//! Platform browser launching for the authorization URL.

// std
use std::{
	io,
	process::{Command, Stdio},
};
// self
use crate::_prelude::*;

/// Launches the user's browser at an authorization URL.
///
/// Launch failures never abort a flow; the orchestrator logs a manual fallback instruction and
/// keeps waiting for the callback.
pub trait BrowserLauncher
where
	Self: Send + Sync,
{
	/// Opens the browser at `url` without blocking the flow.
	fn open(&self, url: &Url) -> io::Result<()>;
}

/// Default launcher shelling out to the platform opener as a detached child process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemBrowser;
impl BrowserLauncher for SystemBrowser {
	// The opener must outlive this process; it is never waited on.
	#[allow(clippy::zombie_processes)]
	fn open(&self, url: &Url) -> io::Result<()> {
		let mut command = open_command(url.as_str());

		command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
		command.spawn().map(drop)
	}
}

fn open_command(url: &str) -> Command {
	#[cfg(target_os = "macos")]
	{
		let mut command = Command::new("open");

		command.arg(url);

		command
	}
	#[cfg(target_os = "windows")]
	{
		let mut command = Command::new("cmd");

		// The empty argument fills `start`'s window-title slot so it cannot swallow the URL.
		command.args(["/C", "start", "", url]);

		command
	}
	#[cfg(not(any(target_os = "macos", target_os = "windows")))]
	{
		let mut command = Command::new("xdg-open");

		command.arg(url);

		command
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn opener_matches_the_target_platform() {
		let command = open_command("https://example.com/");
		let program = command.get_program().to_string_lossy().into_owned();

		#[cfg(target_os = "macos")]
		assert_eq!(program, "open");
		#[cfg(target_os = "windows")]
		assert_eq!(program, "cmd");
		#[cfg(not(any(target_os = "macos", target_os = "windows")))]
		assert_eq!(program, "xdg-open");
	}

	#[test]
	fn opener_receives_the_url_as_an_argument() {
		let command = open_command("https://example.com/authorize");
		let args: Vec<_> =
			command.get_args().map(|arg| arg.to_string_lossy().into_owned()).collect();

		assert!(args.iter().any(|arg| arg == "https://example.com/authorize"));
	}
}
