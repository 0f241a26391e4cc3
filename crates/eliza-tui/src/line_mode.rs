//! Line-oriented chat on plain stdin/stdout.
//!
//! Each turn is printed as it is rendered; the composing indicator is a
//! transient status line that is erased before the reply is printed.

use std::borrow::Cow;
use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor::MoveToColumn,
    queue,
    terminal::{Clear, ClearType},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use eliza_engine::{
    Config, ExchangeController, ExchangeOutcome, HttpClient, PersistenceClient, Renderer,
    Session, Submission, Turn,
};

/// Words that end a line session.
const QUIT_WORDS: [&str; 3] = ["quit", "exit", "bye"];

/// Printed when the user says goodbye.
pub const FAREWELL: &str = "Thank you for sharing with me today. Take care of yourself.";

/// Printed when input ends without a goodbye.
pub const EOF_FAREWELL: &str = "I understand you need to go. Take care!";

const COMPOSING_TEXT: &str = "Eliza is typing...";

/// Renderer that writes turns as text lines.
pub struct LineRenderer<W: Write> {
    out: W,
    composing: bool,
}

impl<W: Write> LineRenderer<W> {
    /// Create a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            composing: false,
        }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Print the input prompt.
    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    /// Print a line from the responder that is not part of the transcript.
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "Eliza: {text}")?;
        self.out.flush()
    }

    fn write_turn(&mut self, turn: &Turn) -> io::Result<()> {
        writeln!(
            self.out,
            "[{}] {}: {}",
            turn.time_label(),
            turn.speaker.label(),
            turn.text
        )?;
        self.out.flush()
    }

    fn write_indicator(&mut self) -> io::Result<()> {
        write!(self.out, "{COMPOSING_TEXT}")?;
        self.out.flush()
    }

    fn clear_indicator(&mut self) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for LineRenderer<W> {
    fn render_turn(&mut self, turn: &Turn) {
        if let Err(e) = self.write_turn(turn) {
            warn!(error = %e, "Failed to print turn");
        }
    }

    fn show_composing_indicator(&mut self) {
        if self.composing {
            return;
        }
        self.composing = true;
        if let Err(e) = self.write_indicator() {
            warn!(error = %e, "Failed to print composing indicator");
        }
    }

    fn hide_composing_indicator(&mut self) {
        if !self.composing {
            return;
        }
        self.composing = false;
        if let Err(e) = self.clear_indicator() {
            warn!(error = %e, "Failed to clear composing indicator");
        }
    }
}

fn is_quit_word(line: &str) -> bool {
    let word = line.trim().to_lowercase();
    QUIT_WORDS.contains(&word.as_str())
}

/// Read lines from `input` and run an exchange for each until a quit word,
/// end of input, or `interrupt` resolves.
///
/// An interrupt while a reply is pending aborts that exchange. Returns the
/// persistence task of the last settled exchange.
pub async fn drive_lines<W, R, I>(
    controller: &mut ExchangeController<LineRenderer<W>>,
    mut input: R,
    interrupt: I,
) -> io::Result<Option<JoinHandle<()>>>
where
    W: Write + Send,
    R: AsyncBufRead + Unpin,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    let mut last_persist = None;
    let mut buf = Vec::new();

    loop {
        controller.renderer_mut().prompt()?;

        buf.clear();
        let read = tokio::select! {
            read = input.read_until(b'\n', &mut buf) => read?,
            () = &mut interrupt => {
                debug!("Interrupted at prompt");
                say_goodbye(controller, EOF_FAREWELL)?;
                break;
            }
        };

        if read == 0 {
            say_goodbye(controller, EOF_FAREWELL)?;
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        if matches!(line, Cow::Owned(_)) {
            warn!("Input line was not valid UTF-8, replacing invalid bytes");
        }

        if is_quit_word(&line) {
            controller.renderer_mut().say(FAREWELL)?;
            break;
        }

        match controller.submit(&line) {
            Submission::Started => {
                let outcome = tokio::select! {
                    outcome = controller.settle() => outcome,
                    () = &mut interrupt => {
                        debug!("Interrupted while awaiting a reply");
                        controller.abort();
                        say_goodbye(controller, EOF_FAREWELL)?;
                        break;
                    }
                };
                if let Some(ExchangeOutcome {
                    persist_task: Some(task),
                    ..
                }) = outcome
                {
                    last_persist = Some(task);
                }
            }
            Submission::Ignored | Submission::Busy => {}
        }
    }

    Ok(last_persist)
}

fn say_goodbye<W: Write>(
    controller: &mut ExchangeController<LineRenderer<W>>,
    farewell: &str,
) -> io::Result<()> {
    let renderer = controller.renderer_mut();
    writeln!(renderer.out)?;
    renderer.say(farewell)
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Run a line-oriented session on stdin/stdout.
pub async fn run_line_mode(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(HttpClient::from_config(config)?);
    let persistence = if config.persist_sessions {
        PersistenceClient::new(client.clone())
    } else {
        PersistenceClient::disabled()
    };

    let mut controller = ExchangeController::new(
        Session::start(config.greeting.clone()),
        LineRenderer::new(io::stdout()),
        client,
        persistence,
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let last_persist = drive_lines(&mut controller, stdin, ctrl_c()).await?;

    // Give the final save a chance to land before the runtime shuts down
    if let Some(task) = last_persist {
        let wait = Duration::from_secs(config.request_timeout_seconds);
        if tokio::time::timeout(wait, task).await.is_err() {
            debug!("Final session save still pending at exit");
        }
    }

    Ok(())
}
