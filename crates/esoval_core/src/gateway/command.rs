//! External pricing oracle driven over stdin/stdout.
//!
//! Each valuation spawns the configured program, writes the parameter set to
//! its stdin as one JSON object, and reads the valuation back as the last
//! non-empty line of stdout.

use std::ffi::OsString;
use std::io::{self, ErrorKind, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::EvaluationError;
use crate::parameters::ParameterSet;

use super::ValuationGateway;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Gateway that delegates every valuation to an external program.
#[derive(Debug, Clone)]
pub struct CommandGateway {
    program: OsString,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl CommandGateway {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Kill the oracle and fail the call if it runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn spawn(&self) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

impl ValuationGateway for CommandGateway {
    fn evaluate(&self, parameters: &ParameterSet) -> Result<f64, EvaluationError> {
        let input = serde_json::to_vec(parameters).map_err(|e| {
            EvaluationError::failed(format!("failed to encode parameters: {e}"), parameters)
        })?;

        let mut child = self.spawn().map_err(|e| {
            EvaluationError::failed(
                format!("failed to start {}: {e}", self.program.to_string_lossy()),
                parameters,
            )
        })?;

        let stdout = read_pipe(child.stdout.take());
        let stderr = read_pipe(child.stderr.take());
        let stdin = write_pipe(child.stdin.take(), input);

        let status = match self.timeout {
            Some(limit) => match wait_with_deadline(&mut child, limit) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    // Pipe threads are left detached: a grandchild may still hold the pipes.
                    return Err(EvaluationError::Timeout {
                        after: limit,
                        parameters: Box::new(parameters.clone()),
                    });
                }
                Err(e) => return Err(EvaluationError::failed(e.to_string(), parameters)),
            },
            None => child
                .wait()
                .map_err(|e| EvaluationError::failed(e.to_string(), parameters))?,
        };

        join_pipe(stdin).map_err(|e| {
            EvaluationError::failed(format!("failed to write parameters: {e}"), parameters)
        })?;
        let stdout = join_pipe(stdout).map_err(|e| EvaluationError::failed(e.to_string(), parameters))?;
        let stderr = join_pipe(stderr).unwrap_or_default();

        if !status.success() {
            let reason = match stderr.trim() {
                "" => format!("oracle exited with {status}"),
                message => message.to_string(),
            };
            return Err(EvaluationError::rejected(reason, parameters));
        }

        parse_valuation(&stdout).ok_or_else(|| EvaluationError::MalformedOutput {
            output: stdout.trim().to_string(),
            parameters: Box::new(parameters.clone()),
        })
    }
}

fn read_pipe<R>(pipe: Option<R>) -> JoinHandle<io::Result<String>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut buffer)?;
        }
        Ok(buffer)
    })
}

/// Feed `input` to the child's stdin and close it. A child that exits without
/// reading everything is not an error here; its exit status decides.
fn write_pipe(pipe: Option<ChildStdin>, input: Vec<u8>) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || {
        let Some(mut pipe) = pipe else {
            return Ok(());
        };
        match pipe.write_all(&input) {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
            result => result,
        }
    })
}

fn join_pipe<T>(handle: JoinHandle<io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .map_err(|_| io::Error::other("pipe reader panicked"))?
}

/// Wait for the child, killing it once `limit` elapses. `Ok(None)` means it timed out.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= limit {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn parse_valuation(output: &str) -> Option<f64> {
    output
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .and_then(|line| line.parse().ok())
}
