//! Fake command node for dispatch tests.
//!
//! Provides a minimal HTTP endpoint that accepts a single connection, records
//! the request line and answers with a canned status, so pipeline and CLI
//! tests can verify what was sent without a real robot.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

const ACCEPT_WINDOW: Duration = Duration::from_secs(5);
const SILENT_HOLD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
enum Reply {
    Status(String),
    Silent,
}

/// A mock command node serving exactly one request.
pub struct FakeNode {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeNode {
    /// Spawns a node answering with `status`, for example `"200 OK"`.
    pub fn spawn(status: &str) -> Result<Self> {
        Self::spawn_with(Reply::Status(status.to_owned()))
    }

    /// Spawns a node that reads the request but never answers.
    pub fn spawn_silent() -> Result<Self> {
        Self::spawn_with(Reply::Silent)
    }

    fn spawn_with(reply: Reply) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake node")?;
        listener
            .set_nonblocking(true)
            .context("fake node nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, &reply, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    /// Port the node listens on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` string addressing this node.
    #[must_use]
    pub fn target(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Waits for the node thread and returns the recorded request lines.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake node thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake node result: {error}"))?
            .take()
        {
            outcome.context("fake node failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        reply: &Reply,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + ACCEPT_WINDOW;
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("blocking client stream")?;
                    Self::record_request(&stream, requests)?;
                    return Self::answer(stream, reply);
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                // Nobody connected, e.g. the address was rejected before
                // dispatch; exit cleanly so tests do not hang.
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn record_request(stream: &TcpStream, requests: &Arc<Mutex<Vec<String>>>) -> Result<()> {
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let mut request_line = String::new();
        if reader
            .read_line(&mut request_line)
            .context("read request line")?
            == 0
        {
            return Ok(());
        }
        // Drain headers up to the blank line ending the request head.
        let mut header = String::new();
        while reader.read_line(&mut header).context("read header")? > 0 {
            if header.trim_end().is_empty() {
                break;
            }
            header.clear();
        }
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(request_line.trim_end().to_owned());
        Ok(())
    }

    fn answer(mut stream: TcpStream, reply: &Reply) -> Result<()> {
        match reply {
            Reply::Status(status) => {
                write!(
                    stream,
                    "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                )
                .context("write response")?;
                stream.flush().context("flush response")
            }
            Reply::Silent => {
                thread::sleep(SILENT_HOLD);
                Ok(())
            }
        }
    }
}

impl Drop for FakeNode {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

/// Returns a local port with nothing listening on it.
pub fn unreachable_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind probe listener")?;
    let port = listener.local_addr().context("probe addr")?.port();
    drop(listener);
    Ok(port)
}
