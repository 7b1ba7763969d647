//! One-shot localhost callback listener speaking just enough HTTP/1.1.

// std
use std::{io, net::SocketAddr};
// crates.io
use tokio::{
	io::{AsyncReadExt, AsyncWriteExt},
	net::{TcpListener, TcpStream},
};
// self
use crate::{
	_prelude::*,
	flows::pages::{self, Page},
};

const CALLBACK_PATH: &str = "/callback";
const MAX_REQUEST_BYTES: usize = 8 * 1024;

/// Query parameters extracted from a callback request.
#[derive(Clone, Debug, Default)]
pub(crate) struct CallbackQuery {
	pub(crate) code: Option<String>,
	pub(crate) state: Option<String>,
	pub(crate) error: Option<String>,
}

/// Listener bound to the loopback interface for exactly one flow session.
///
/// Dropping the listener closes the port; the orchestrator owns it for the lifetime of a single
/// `authorize` call, which is what guarantees close-exactly-once on every exit branch.
pub(crate) struct CallbackListener {
	listener: TcpListener,
}
impl CallbackListener {
	/// Binds the loopback callback port, mapping bind conflicts to [`Error::PortInUse`].
	pub(crate) async fn bind(port: u16) -> Result<Self> {
		let addr = SocketAddr::from(([127, 0, 0, 1], port));
		let listener = TcpListener::bind(addr).await.map_err(|e| {
			if e.kind() == io::ErrorKind::AddrInUse {
				Error::PortInUse { port, source: e }
			} else {
				Error::Listener(e)
			}
		})?;

		Ok(Self { listener })
	}

	/// Serves non-callback requests with a not-found page and returns the first request that
	/// reaches the callback path, paired with its still-open connection.
	pub(crate) async fn next_callback(&mut self) -> Result<(CallbackQuery, CallbackResponder)> {
		loop {
			let (mut stream, _) = self.listener.accept().await.map_err(Error::Listener)?;
			let target = match read_request_target(&mut stream).await {
				Ok(Some(target)) => target,
				// Aborted or unparsable request; drop the connection and keep waiting.
				Ok(None) | Err(_) => continue,
			};
			let (path, query) = split_target(&target);

			if path != CALLBACK_PATH {
				let _ = respond(&mut stream, &pages::not_found()).await;

				continue;
			}

			return Ok((parse_query(query), CallbackResponder { stream }));
		}
	}
}

/// Connection handle used to render the terminal status page for the callback request.
pub(crate) struct CallbackResponder {
	stream: TcpStream,
}
impl CallbackResponder {
	/// Writes the page and closes the connection. Delivery failures are only logged; by the time
	/// this runs the flow outcome is already decided.
	pub(crate) async fn send(mut self, page: Page) {
		if let Err(e) = respond(&mut self.stream, &page).await {
			tracing::debug!("Failed to deliver the callback status page: {e}.");
		}
	}
}

async fn read_request_target(stream: &mut TcpStream) -> io::Result<Option<String>> {
	let mut buf = Vec::with_capacity(1_024);
	let mut chunk = [0_u8; 1_024];

	while !headers_complete(&buf) && buf.len() < MAX_REQUEST_BYTES {
		let read = stream.read(&mut chunk).await?;

		if read == 0 {
			break;
		}

		buf.extend_from_slice(&chunk[..read]);
	}

	Ok(parse_request_target(&buf))
}

fn headers_complete(buf: &[u8]) -> bool {
	buf.windows(4).any(|window| window == b"\r\n\r\n")
}

fn parse_request_target(buf: &[u8]) -> Option<String> {
	let text = String::from_utf8_lossy(buf);
	let request_line = text.lines().next()?;
	let mut parts = request_line.split_whitespace();
	let _method = parts.next()?;

	parts.next().map(str::to_owned)
}

fn split_target(target: &str) -> (&str, Option<&str>) {
	match target.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (target, None),
	}
}

fn parse_query(query: Option<&str>) -> CallbackQuery {
	let mut parsed = CallbackQuery::default();
	let Some(query) = query else {
		return parsed;
	};

	for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
		match key.as_ref() {
			"code" => parsed.code = Some(value.into_owned()),
			"state" => parsed.state = Some(value.into_owned()),
			"error" => parsed.error = Some(value.into_owned()),
			_ => {},
		}
	}

	parsed
}

async fn respond(stream: &mut TcpStream, page: &Page) -> io::Result<()> {
	stream.write_all(page.to_http().as_bytes()).await?;
	stream.shutdown().await
}
