//! Minimal HTML status pages rendered to the user's browser.

/// Response payload paired with its HTTP status line.
#[derive(Clone, Debug)]
pub(crate) struct Page {
	status: &'static str,
	body: String,
}
impl Page {
	/// Serializes the page into a complete HTTP/1.1 response.
	pub(crate) fn to_http(&self) -> String {
		format!(
			"HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
			self.status,
			self.body.len(),
			self.body,
		)
	}

	#[cfg(test)]
	pub(crate) fn status(&self) -> &'static str {
		self.status
	}

	#[cfg(test)]
	pub(crate) fn body(&self) -> &str {
		&self.body
	}
}

pub(crate) fn success() -> Page {
	Page {
		status: "200 OK",
		body: render(
			"Authentication Successful",
			"success",
			"Authentication Successful!",
			Some("You can close this window and return to the terminal."),
		),
	}
}

pub(crate) fn provider_error(detail: &str) -> Page {
	Page {
		status: "200 OK",
		body: render(
			"Authentication Failed",
			"error",
			"Authentication Failed",
			Some(&format!("Error: {}", escape(detail))),
		),
	}
}

pub(crate) fn security_error() -> Page {
	Page {
		status: "400 Bad Request",
		body: render(
			"Security Error",
			"error",
			"Security Error",
			Some("State parameter mismatch. Possible CSRF attack."),
		),
	}
}

pub(crate) fn missing_code() -> Page {
	Page {
		status: "400 Bad Request",
		body: render("Authentication Error", "error", "No authorization code received", None),
	}
}

pub(crate) fn exchange_failed(detail: &str) -> Page {
	Page {
		status: "500 Internal Server Error",
		body: render(
			"Token Exchange Failed",
			"error",
			"Token Exchange Failed",
			Some(&escape(detail)),
		),
	}
}

pub(crate) fn not_found() -> Page {
	Page { status: "404 Not Found", body: render("Not Found", "error", "Not found", None) }
}

fn render(title: &str, class: &str, heading: &str, detail: Option<&str>) -> String {
	let detail = detail.map(|text| format!("<p>{text}</p>")).unwrap_or_default();

	format!(
		"<!DOCTYPE html>\
		<html>\
		<head>\
		<title>{title}</title>\
		<style>\
		body {{ font-family: system-ui; padding: 40px; text-align: center; }} \
		.error {{ color: #d32f2f; }} \
		.success {{ color: #2e7d32; }}\
		</style>\
		</head>\
		<body>\
		<h1 class=\"{class}\">{heading}</h1>\
		{detail}\
		<p>You can close this window.</p>\
		</body>\
		</html>",
	)
}

// Callback query values flow straight into the page, so angle brackets and friends must not
// survive as markup.
fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}

	escaped
}
