//! Interactive read-eval-print loop over a `Session`.
//!
//! One exchange completes (or fails) before the next line is read. Every
//! line except `exit` is sent as typed. Exchange failures are reported and
//! the loop keeps going; only I/O errors on the terminal itself end it early.

use std::time::Duration;

use gemchat_ai::{ExchangeContext, ExchangeError, Session};
use gemchat_common::GemchatError;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::input::{Input, LineSource, ThreadedLines};
use crate::signal::interrupted;

pub const EXIT_COMMAND: &str = "exit";
pub const BANNER: &str = "Start chatting with the model (type 'exit' to quit):";
pub const PROMPT: &str = "You: ";
pub const REPLY_PREFIX: &str = "Model: ";

/// Counters reported when the loop ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplStats {
    pub exchanges: usize,
    pub failures: usize,
}

pub struct Repl<'a> {
    session: &'a Session,
    timeout: Duration,
    handle_interrupts: bool,
}

impl<'a> Repl<'a> {
    pub fn new(session: &'a Session, timeout: Duration) -> Self {
        Self {
            session,
            timeout,
            handle_interrupts: false,
        }
    }

    /// Ctrl-C during an exchange cancels just that exchange.
    pub fn with_interrupts(mut self) -> Self {
        self.handle_interrupts = true;
        self
    }

    pub async fn run<S, W>(&self, mut input: S, mut output: W) -> std::io::Result<ReplStats>
    where
        S: LineSource,
        W: AsyncWrite + Unpin,
    {
        let mut stats = ReplStats::default();

        output.write_all(format!("{BANNER}\n").as_bytes()).await?;

        loop {
            if !input.draws_prompt() {
                output.write_all(PROMPT.as_bytes()).await?;
            }
            output.flush().await?;

            let read = if self.handle_interrupts {
                tokio::select! {
                    read = input.read_line(PROMPT) => read?,
                    _ = interrupted() => Input::Interrupted,
                }
            } else {
                input.read_line(PROMPT).await?
            };

            let line = match read {
                Input::Line(line) => line,
                Input::Interrupted => {
                    debug!("interrupted at prompt");
                    break;
                }
                Input::Eof => {
                    // Leave the prompt on its own line.
                    output.write_all(b"\n").await?;
                    break;
                }
            };

            if line == EXIT_COMMAND {
                break;
            }

            stats.exchanges += 1;
            match self.exchange(&line).await {
                Ok(reply) => {
                    output
                        .write_all(format!("{REPLY_PREFIX}{reply}").as_bytes())
                        .await?;
                    if !reply.ends_with('\n') {
                        output.write_all(b"\n").await?;
                    }
                }
                Err(e) => {
                    stats.failures += 1;
                    warn!(error = %e, "exchange failed");
                    output.write_all(format!("Error: {e}\n").as_bytes()).await?;
                }
            }
        }

        output.flush().await?;
        debug!(
            exchanges = stats.exchanges,
            failures = stats.failures,
            "interactive loop finished"
        );
        Ok(stats)
    }

    async fn exchange(&self, line: &str) -> Result<String, ExchangeError> {
        let ctx = ExchangeContext::new().with_timeout(self.timeout);
        if !self.handle_interrupts {
            return self.session.exchange(&ctx, line).await;
        }

        tokio::select! {
            result = self.session.exchange(&ctx, line) => result,
            _ = interrupted() => {
                ctx.cancel();
                Err(ExchangeError::Cancelled)
            }
        }
    }
}

/// Run the loop on the terminal: rustyline for input, stdout for replies.
pub async fn run_stdio(session: &Session, timeout: Duration) -> Result<ReplStats, GemchatError> {
    let input = ThreadedLines::terminal()?;
    let stats = Repl::new(session, timeout)
        .with_interrupts()
        .run(input, tokio::io::stdout())
        .await?;
    Ok(stats)
}

/// Single exchange for `gemchat ask`: reply text goes to `output`.
pub async fn ask<W>(
    session: &Session,
    text: &str,
    timeout: Duration,
    mut output: W,
) -> Result<(), GemchatError>
where
    W: AsyncWrite + Unpin,
{
    let ctx = ExchangeContext::new().with_timeout(timeout);
    let reply = tokio::select! {
        result = session.exchange(&ctx, text) => result,
        _ = interrupted() => Err(ExchangeError::Cancelled),
    }
    .map_err(|e| GemchatError::Ai(e.to_string()))?;

    output.write_all(reply.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_ai::testing::ScriptedBackend;
    use gemchat_ai::{AiError, GenerativeBackend, Reply};
    use std::sync::Arc;
    use tokio::io::AsyncBufReadExt;

    fn session_over(backend: &Arc<ScriptedBackend>) -> Session {
        Session::from_shared(backend.clone() as Arc<dyn GenerativeBackend>)
    }

    async fn run_script(backend: &Arc<ScriptedBackend>, input: &str) -> (ReplStats, String) {
        let session = session_over(backend);
        let mut output = Vec::new();
        let stats = Repl::new(&session, Duration::from_secs(5))
            .run(input.as_bytes().lines(), &mut output)
            .await
            .unwrap();
        (stats, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn exit_stops_without_exchanging() {
        let backend = Arc::new(ScriptedBackend::new().with_text("unused"));
        let (stats, output) = run_script(&backend, "exit\nhello\n").await;

        assert_eq!(stats, ReplStats::default());
        assert_eq!(backend.call_count(), 0);
        assert_eq!(output, format!("{BANNER}\n{PROMPT}"));
    }

    #[tokio::test]
    async fn each_line_is_one_exchange() {
        let backend = Arc::new(ScriptedBackend::new().with_text("hi there").with_text("bye"));
        let (stats, output) = run_script(&backend, "hello\nsee you\nexit\n").await;

        assert_eq!(stats.exchanges, 2);
        assert_eq!(backend.call_count(), 2);
        let requests = backend.requests();
        assert_eq!(requests[0].text(), "hello");
        assert_eq!(requests[1].text(), "see you");
        assert_eq!(
            output,
            format!("{BANNER}\n{PROMPT}Model: hi there\n{PROMPT}Model: bye\n{PROMPT}")
        );
    }

    #[tokio::test]
    async fn end_of_input_terminates() {
        let backend = Arc::new(ScriptedBackend::new().with_text("answer"));
        let (stats, output) = run_script(&backend, "question").await;

        assert_eq!(stats.exchanges, 1);
        assert!(output.ends_with(&format!("Model: answer\n{PROMPT}\n")));
    }

    #[tokio::test]
    async fn errors_are_reported_and_loop_continues() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_error(AiError::NetworkError("connection reset".into()))
                .with_reply(Reply::default())
                .with_text("recovered"),
        );
        let (stats, output) = run_script(&backend, "one\ntwo\nthree\n").await;

        assert_eq!(stats, ReplStats { exchanges: 3, failures: 2 });
        assert!(output.contains("Error: backend error: Network error: connection reset\n"));
        assert!(output.contains("Error: malformed reply: no candidates in reply\n"));
        assert!(output.contains("Model: recovered\n"));
    }

    #[tokio::test]
    async fn whitespace_lines_are_sent_verbatim() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .with_text("a")
                .with_text("b")
                .with_text("c"),
        );
        let (stats, _) = run_script(&backend, "   \n exit\nhello\n").await;

        assert_eq!(stats.exchanges, 3);
        let sent: Vec<String> = backend.requests().iter().map(|r| r.text()).collect();
        assert_eq!(sent, vec!["   ", " exit", "hello"]);
    }

    #[tokio::test]
    async fn empty_line_is_one_exchange() {
        let backend = Arc::new(ScriptedBackend::new().with_text("ok"));
        let (stats, _) = run_script(&backend, "\nexit\n").await;

        assert_eq!(stats.exchanges, 1);
        assert_eq!(backend.requests()[0].text(), "");
    }

    #[tokio::test]
    async fn exit_with_crlf_stops() {
        let backend = Arc::new(ScriptedBackend::new());
        let (stats, _) = run_script(&backend, "exit\r\nhello\n").await;

        assert_eq!(stats.exchanges, 0);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn interrupt_at_prompt_ends_loop() {
        let backend = Arc::new(ScriptedBackend::new().with_text("one"));
        let session = session_over(&backend);
        let input = ThreadedLines::spawn(|| {
            let mut script = vec![Input::Interrupted, Input::Line("first".into())];
            Ok(move |_: &str| -> std::io::Result<Input> {
                Ok(script.pop().unwrap_or(Input::Eof))
            })
        })
        .unwrap();
        let mut output = Vec::new();

        let stats = Repl::new(&session, Duration::from_secs(5))
            .run(input, &mut output)
            .await
            .unwrap();

        assert_eq!(stats, ReplStats { exchanges: 1, failures: 0 });
        assert_eq!(backend.requests()[0].text(), "first");
        // The threaded reader draws its own prompt.
        assert_eq!(String::from_utf8(output).unwrap(), format!("{BANNER}\nModel: one\n"));
    }

    #[tokio::test]
    async fn empty_reply_still_ends_line() {
        let backend = Arc::new(ScriptedBackend::new().with_reply(Reply::with_parts(Vec::new())));
        let (_, output) = run_script(&backend, "hi\nexit\n").await;
        assert!(output.contains("Model: \nYou: "));
    }

    #[tokio::test]
    async fn ask_writes_flattened_reply() {
        let backend = Arc::new(ScriptedBackend::new().with_text("once upon a time"));
        let session = session_over(&backend);
        let mut output = Vec::new();

        ask(&session, "tell a story", Duration::from_secs(5), &mut output)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "once upon a time\n");
        assert_eq!(backend.requests()[0].text(), "tell a story");
    }

    #[tokio::test]
    async fn ask_surfaces_failure() {
        let backend = Arc::new(ScriptedBackend::new().with_error(AiError::RateLimited));
        let session = session_over(&backend);
        let mut output = Vec::new();

        let err = ask(&session, "hi", Duration::from_secs(5), &mut output)
            .await
            .unwrap_err();

        assert!(matches!(err, GemchatError::Ai(ref msg) if msg.contains("Rate limited")));
        assert!(output.is_empty());
    }
}
