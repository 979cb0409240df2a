//! Prompt-synchronized client for an interactive simulator process.
//!
//! [`ReplClient`] owns one spawned REPL (by default `clashi`) and its pipes.
//! Commands are written to stdin one at a time; the client then blocks until
//! the prompt literal reappears on the combined stdout/stderr stream or the
//! command's timeout elapses. Two reader threads forward output chunks over
//! a channel so the wait can be bounded.
//!
//! # Usage
//!
//! ```ignore
//! use clashtb_repl::{ReplClient, ReplOptions};
//!
//! let mut clashi = ReplClient::start(ReplOptions::default())?;
//! clashi.load(Path::new("Top.hs"))?;
//! let outputs = clashi.sample_n(4, "topEntity", "(fromList [0,1,0,0])", false)?;
//! ```

use std::fmt;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, trace, warn};

use crate::error::ReplError;
use crate::filter::filter_output;
use crate::simulator::Simulator;
use crate::tuple_parser::parse_sample_n;

/// Default prompt literal of `clashi`.
pub const DEFAULT_PROMPT: &str = "clashi>";

/// How to start and talk to the simulator.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplOptions {
    /// Program to spawn.
    ///
    /// Only this process is killed on timeout or termination. A wrapper
    /// script should `exec` the simulator (`sh -c 'exec clashi'`) so that
    /// the killed process is the simulator itself.
    pub executable: String,
    /// Extra program arguments.
    pub args: Vec<String>,
    /// Literal the process prints when ready for a command.
    pub prompt: String,
    /// Bound on the wait for the first prompt.
    pub startup_timeout: Duration,
    /// Bound on each command.
    pub command_timeout: Duration,
    /// Clock domain named in `sampleN` commands.
    pub clock_domain: String,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            executable: "clashi".into(),
            args: Vec::new(),
            prompt: DEFAULT_PROMPT.into(),
            startup_timeout: Duration::from_secs(60),
            command_timeout: Duration::from_secs(20),
            clock_domain: "System".into(),
        }
    }
}

/// Lifecycle state of a [`ReplClient`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClientState {
    /// The process is starting and the first prompt has not been seen.
    Unstarted,
    /// The prompt has been seen and no command is in flight.
    Ready,
    /// A command is in flight.
    Busy,
    /// The process has been killed or has exited.
    Terminated,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientState::Unstarted => write!(f, "unstarted"),
            ClientState::Ready => write!(f, "ready"),
            ClientState::Busy => write!(f, "busy"),
            ClientState::Terminated => write!(f, "terminated"),
        }
    }
}

/// An owned simulator process driven through its prompt.
///
/// The client is not shareable across threads for concurrent commands; every
/// method that talks to the process takes `&mut self`. Dropping the client
/// kills the process.
pub struct ReplClient {
    options: ReplOptions,
    child: Child,
    stdin: Option<ChildStdin>,
    output: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    state: ClientState,
}

impl ReplClient {
    /// Spawns the simulator and waits for its first prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ReplError::NotFound`] if the executable cannot be located,
    /// [`ReplError::Timeout`] if no prompt appears within the startup bound,
    /// and [`ReplError::Exited`] if the process quits first.
    pub fn start(options: ReplOptions) -> Result<Self, ReplError> {
        let mut child = Command::new(&options.executable)
            .args(&options.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ReplError::NotFound {
                    executable: options.executable.clone(),
                },
                _ => ReplError::Io(e),
            })?;
        info!(executable = %options.executable, pid = child.id(), "started simulator");

        let (sender, receiver) = channel::unbounded();
        if let Some(stdout) = child.stdout.take() {
            forward(stdout, sender.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward(stderr, sender);
        }
        let stdin = child.stdin.take();

        let mut client = Self {
            options,
            child,
            stdin,
            output: receiver,
            pending: Vec::new(),
            state: ClientState::Unstarted,
        };
        let timeout = client.options.startup_timeout;
        let banner = client.wait_for_prompt("<startup>", timeout)?;
        trace!(banner = %banner, "simulator banner");
        client.state = ClientState::Ready;
        Ok(client)
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// The options the client was started with.
    pub fn options(&self) -> &ReplOptions {
        &self.options
    }

    /// Runs one command with the default command timeout.
    pub fn run_command(&mut self, command: &str) -> Result<String, ReplError> {
        let timeout = self.options.command_timeout;
        self.run_command_with_timeout(command, timeout)
    }

    /// Runs one command and returns its filtered output.
    ///
    /// # Errors
    ///
    /// Fails fast unless the client is ready. A timeout kills the process
    /// and leaves the client terminated. Error text in the output yields
    /// [`ReplError::Protocol`]; the client stays ready.
    pub fn run_command_with_timeout(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<String, ReplError> {
        match self.state {
            ClientState::Ready => {}
            ClientState::Terminated => return Err(ReplError::Terminated),
            state => return Err(ReplError::NotReady { state }),
        }

        self.state = ClientState::Busy;
        debug!(command, "sending command");
        if let Err(e) = self.send(command) {
            self.terminate();
            return Err(e.into());
        }

        let raw = self.wait_for_prompt(command, timeout)?;
        trace!(raw = %raw, "captured output");
        self.state = ClientState::Ready;
        filter_output(&raw, command)
    }

    /// Loads a design file with `:l`.
    pub fn load(&mut self, path: &Path) -> Result<(), ReplError> {
        info!(path = %path.display(), "loading design");
        self.run_command(&format!(":l {}", path.display()))?;
        Ok(())
    }

    /// Runs `entity` applied to `inputs` for `count` clock cycles and returns
    /// the raw values of each output.
    pub fn sample_n(
        &mut self,
        count: usize,
        entity: &str,
        inputs: &str,
        single_value: bool,
    ) -> Result<Vec<Vec<String>>, ReplError> {
        let command = sample_n_command(&self.options.clock_domain, count, entity, inputs);
        let output = self.run_command(&command)?;
        let line = output
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        parse_sample_n(line, single_value)
    }

    /// Evaluates `function` applied to `args` and returns the trimmed result.
    pub fn evaluate(&mut self, function: &str, args: &[String]) -> Result<String, ReplError> {
        let command = std::iter::once(function)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(self.run_command(&command)?.trim().to_string())
    }

    /// Kills the process. Calling this more than once is harmless.
    ///
    /// Only the spawned process is killed; processes it started itself are
    /// not signalled.
    pub fn terminate(&mut self) {
        if self.state != ClientState::Terminated {
            debug!(pid = self.child.id(), "terminating simulator");
        }
        self.state = ClientState::Terminated;
        self.stdin = None;
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn send(&mut self, command: &str) -> io::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdin is closed"))?;
        stdin.write_all(command.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()
    }

    /// Collects output until the prompt appears, returning the text before it.
    fn wait_for_prompt(&mut self, command: &str, timeout: Duration) -> Result<String, ReplError> {
        let prompt = self.options.prompt.as_bytes().to_vec();
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(at) = find(&self.pending, &prompt) {
                let rest = self.pending.split_off(at + prompt.len());
                self.pending.truncate(at);
                let before = std::mem::replace(&mut self.pending, rest);
                return Ok(String::from_utf8_lossy(&before).into_owned());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timed_out(command, timeout));
            }
            match self.output.recv_timeout(deadline - now) {
                Ok(chunk) => self.pending.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Timeout) => return Err(self.timed_out(command, timeout)),
                Err(RecvTimeoutError::Disconnected) => {
                    let output = String::from_utf8_lossy(&self.pending).into_owned();
                    self.pending.clear();
                    self.terminate();
                    return Err(ReplError::Exited { output });
                }
            }
        }
    }

    /// Kills the process after a missed deadline. Output still streaming in
    /// does not extend the deadline.
    fn timed_out(&mut self, command: &str, timeout: Duration) -> ReplError {
        warn!(command, ?timeout, "no prompt before timeout, killing simulator");
        self.pending.clear();
        self.terminate();
        ReplError::Timeout {
            command: command.to_string(),
            timeout,
        }
    }
}

impl Simulator for ReplClient {
    fn load(&mut self, path: &Path) -> Result<(), ReplError> {
        ReplClient::load(self, path)
    }

    fn sample_n(
        &mut self,
        count: usize,
        entity: &str,
        inputs: &str,
        single_value: bool,
    ) -> Result<Vec<Vec<String>>, ReplError> {
        ReplClient::sample_n(self, count, entity, inputs, single_value)
    }

    fn evaluate(&mut self, function: &str, args: &[String]) -> Result<String, ReplError> {
        ReplClient::evaluate(self, function, args)
    }
}

impl Drop for ReplClient {
    fn drop(&mut self) {
        self.terminate();
    }
}

impl fmt::Debug for ReplClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplClient")
            .field("executable", &self.options.executable)
            .field("pid", &self.child.id())
            .field("state", &self.state)
            .finish()
    }
}

/// Builds the `sampleN` command text.
pub fn sample_n_command(clock_domain: &str, count: usize, entity: &str, inputs: &str) -> String {
    format!("sampleN @{clock_domain} {count} ({entity} {inputs})")
}

/// Forwards everything read from `source` to `sender` until end of file.
fn forward<R: Read + Send + 'static>(mut source: R, sender: Sender<Vec<u8>>) {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match source.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if sender.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
