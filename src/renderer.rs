//! The external rendering engine, run as one subprocess per page.

use crate::config::EngineSettings;
use diplo_traits::{Interrupt, RenderJob, RenderOutcome, Renderer};
use itertools::Itertools;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// How long output is still read once the renderer has exited.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// Runs `<binary> [<debug flag>] [<flags>…] <script> <server url> <json> <svg>
/// [<links> <overlay>]` for every page.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    binary: String,
    flags: Vec<String>,
    script: String,
    debug_flag: Option<String>,
    timeout: Option<Duration>,
    interrupt: Interrupt,
}

impl ProcessRenderer {
    pub fn new(engine: &EngineSettings, interrupt: Interrupt) -> Self {
        Self {
            binary: engine.binary.clone(),
            flags: engine.flags.clone(),
            script: engine.script.clone(),
            debug_flag: None,
            timeout: None,
            interrupt,
        }
    }

    /// Passes the engine's debug flag first, if it has one.
    pub fn with_debug(mut self, debug: bool, flag: &str) -> Self {
        self.debug_flag = (debug && !flag.is_empty()).then(|| flag.to_string());
        self
    }

    /// Kills renders that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn base_arguments(&self, server_url: &str) -> Vec<String> {
        self.debug_flag
            .iter()
            .chain(self.flags.iter())
            .cloned()
            .chain([self.script.clone(), server_url.to_string()])
            .collect()
    }

    /// The arguments for one job, without the binary.
    pub fn arguments(&self, job: &RenderJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .base_arguments(&job.server_url)
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(job.json.clone().into_os_string());
        args.push(job.svg.clone().into_os_string());
        if let Some(links) = &job.links {
            args.push(links.source.clone().into_os_string());
            args.push(links.overlay.clone().into_os_string());
        }
        args
    }

    fn run(&self, job: &RenderJob) -> RenderOutcome {
        for output in job.outputs() {
            if let Some(parent) = output.parent()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                return RenderOutcome::failed(format!(
                    "Cannot create {}: {}",
                    parent.display(),
                    e
                ));
            }
        }

        let args = self.arguments(job);
        log::debug!(
            "{} {}",
            self.binary,
            args.iter().map(|a| a.to_string_lossy()).join(" ")
        );
        let mut command = Command::new(&self.binary);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // own process group, so helpers the engine forks can be killed with it
            command.process_group(0);
        }
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return RenderOutcome::failed(format!("Failed to start {}: {}", self.binary, e)),
        };

        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            forward(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward(stderr, tx.clone());
        }
        drop(tx);
        let started = Instant::now();

        let status: Result<ExitStatus, String> = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Ok(status),
                Ok(None) => {}
                Err(e) => break Err(format!("Failed to wait for {}: {}", self.binary, e)),
            }
            let reason = if self.interrupt.is_triggered() {
                Some("Interrupted".to_string())
            } else {
                self.timeout
                    .filter(|t| started.elapsed() >= *t)
                    .map(|t| format!("Killed after {}s", t.as_secs_f32()))
            };
            if let Some(reason) = reason {
                terminate(&mut child);
                break Err(reason);
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        let mut output = dedup_lines(collect_lines(&rx, OUTPUT_GRACE));

        match status {
            Ok(status) if status.success() => RenderOutcome::succeeded(output),
            Ok(status) => {
                output.insert_str(0, &format!("Exit status {}\n", status));
                RenderOutcome::failed(output)
            }
            Err(reason) => {
                output.insert_str(0, &format!("{}\n", reason));
                RenderOutcome::failed(output)
            }
        }
    }
}

impl Renderer for ProcessRenderer {
    fn render(&self, job: &RenderJob) -> RenderOutcome {
        self.run(job)
    }

    fn command_line(&self, server_url: &str) -> Option<String> {
        Some(format!(
            "{} {} <input> <output> [<links> <linkoutput>]",
            self.binary,
            self.base_arguments(server_url).join(" ")
        ))
    }

    fn name(&self) -> &'static str {
        "ProcessRenderer"
    }
}

/// Forwards the lines of a pipe into `tx` from its own thread, so a chatty
/// renderer never blocks on a full pipe buffer. Both pipes share one channel
/// and their lines arrive interleaved as they are written.
fn forward<R: Read + Send + 'static>(reader: R, tx: Sender<String>) {
    std::thread::spawn(move || {
        for line in BufReader::new(reader).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

/// Receives output lines until both pipes are closed or `grace` has passed.
///
/// A process that inherited the pipes and outlived the renderer keeps them
/// open; its remaining output is dropped.
fn collect_lines(rx: &Receiver<String>, grace: Duration) -> Vec<String> {
    let deadline = Instant::now() + grace;
    let mut lines = Vec::new();
    loop {
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(line) => lines.push(line),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                log::debug!("Renderer output still open after {:?}, not waiting", grace);
                break;
            }
        }
    }
    lines
}

/// Kills the renderer and everything in its process group.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        // a negative pid addresses the whole group
        let group = format!("-{}", child.id());
        if let Err(e) = Command::new("kill")
            .args(["-s", "KILL", "--", &group])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            log::debug!("Cannot kill process group {}: {}", group, e);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

/// Joins lines, keeping only the first occurrence of each.
pub fn dedup_lines(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().unique().join("\n")
}
