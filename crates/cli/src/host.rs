//! A terminal stand-in for the web view.
//!
//! The user opens printed URLs in a real browser and reports back what
//! happened through line commands on stdin.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use colored::Colorize;
use evc::{Alert, CANCEL_LABEL, ConnectHost, CookieAccessor, PageBodyAccessor, RETRY_LABEL, SessionDriver, decode_js_string};
use parking_lot::Mutex;
use url::Url;

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
	/// The browser is about to navigate to this URL.
	Navigate(String),
	/// Cookie header of the current page.
	Cookies(String),
	/// File holding the current page's content.
	Body(PathBuf),
	/// The user is back from an external tab.
	Return,
	Retry,
	Cancel,
	Close,
	Help,
}

pub const HELP: &str = "\
commands:
  nav <url>         report a navigation attempt
  cookies <string>  set the cookie string of the current page
  body <file>       read the current page content from a file
  return            back from an external tab
  retry | cancel    answer a pending alert
  close             abandon the flow";

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<HostCommand, String> {
	let line = line.trim();
	let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
	let rest = rest.trim();
	let argument = |name: &str| {
		if rest.is_empty() {
			Err(format!("`{word}` needs {name}"))
		} else {
			Ok(rest.to_string())
		}
	};

	match word {
		"nav" | "navigate" => argument("a url").map(HostCommand::Navigate),
		"cookies" => argument("a cookie string").map(HostCommand::Cookies),
		"body" => argument("a file path").map(|p| HostCommand::Body(PathBuf::from(p))),
		"return" => Ok(HostCommand::Return),
		"r" | "retry" => Ok(HostCommand::Retry),
		"c" | "cancel" => Ok(HostCommand::Cancel),
		"close" | "quit" => Ok(HostCommand::Close),
		"help" | "?" | "" => Ok(HostCommand::Help),
		other => Err(format!("unknown command `{other}`; type `help`")),
	}
}

#[derive(Default)]
struct PageState {
	cookies: Option<String>,
	body: Option<String>,
	alert: Option<Alert>,
}

/// Prints host commands to `W` and keeps the page state the user reports.
pub struct TerminalHost<W> {
	out: Mutex<W>,
	page: Mutex<PageState>,
}

impl TerminalHost<std::io::Stdout> {
	pub fn stdout() -> Self {
		Self::new(std::io::stdout())
	}
}

impl<W: Write + Send> TerminalHost<W> {
	pub fn new(out: W) -> Self {
		Self {
			out: Mutex::new(out),
			page: Mutex::new(PageState::default()),
		}
	}

	/// Prints one line; a closed terminal is not an error worth surfacing.
	pub fn say(&self, line: impl std::fmt::Display) {
		let mut out = self.out.lock();
		let _ = writeln!(out, "{line}");
		let _ = out.flush();
	}

	pub fn has_pending_alert(&self) -> bool {
		self.page.lock().alert.is_some()
	}

	/// Runs `command` against `driver`.
	pub async fn apply(&self, driver: &SessionDriver, command: HostCommand) {
		match command {
			HostCommand::Navigate(url) => {
				if !driver.on_navigation_attempt(&url) {
					self.say(format!("{} {url}", "loading".dimmed()));
				}
			}
			HostCommand::Cookies(cookies) => {
				self.page.lock().cookies = Some(cookies);
				self.say("cookies set".dimmed());
			}
			HostCommand::Body(path) => match tokio::fs::read_to_string(&path).await {
				Ok(body) => {
					self.page.lock().body = decode_js_string(&body);
					self.say(format!("{} {}", "body read from".dimmed(), path.display()));
				}
				Err(e) => self.say(format!("{} {}: {e}", "cannot read".red(), path.display())),
			},
			HostCommand::Return => driver.on_external_tab_return(),
			HostCommand::Retry | HostCommand::Cancel => {
				let alert = self.page.lock().alert.take();
				match (alert, command) {
					(Some(alert), HostCommand::Retry) => alert.retry(),
					(Some(alert), _) => alert.cancel(),
					(None, _) => self.say("no pending alert".dimmed()),
				}
			}
			HostCommand::Close => driver.force_close(),
			HostCommand::Help => self.say(HELP),
		}
	}
}

#[async_trait]
impl<W: Write + Send> PageBodyAccessor for TerminalHost<W> {
	async fn page_body(&self) -> Option<String> {
		self.page.lock().body.clone()
	}
}

impl<W: Write + Send> CookieAccessor for TerminalHost<W> {
	fn cookies_for(&self, _url: &str) -> Option<String> {
		self.page.lock().cookies.clone()
	}
}

impl<W: Write + Send> ConnectHost for TerminalHost<W> {
	fn load_url(&self, url: &Url) {
		self.say(format!("{} {}", "open:".green().bold(), url));
	}

	fn hide(&self) {
		self.say("flow closed".dimmed());
	}

	fn open_external_tab(&self, url: &str) {
		self.say(format!("{} {url}", "open in a new tab, then type `return`:".cyan().bold()));
	}

	fn show_alert(&self, alert: Alert) {
		let prompt = format!(
			"{} {}\n{}\n[r]{} / [c]{}",
			"!".yellow().bold(),
			alert.title().bold(),
			alert.message(),
			&RETRY_LABEL[1..].to_lowercase(),
			&CANCEL_LABEL[1..].to_lowercase(),
		);
		self.page.lock().alert = Some(alert);
		self.say(prompt);
	}
}
