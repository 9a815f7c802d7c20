//! Line sources for the interactive loop.
//!
//! Terminal input is read with rustyline on a dedicated thread. The thread
//! only reads when the loop asks for a line, and it is never joined, so a
//! read left pending at exit cannot hold up runtime shutdown.

use std::io;
use std::sync::mpsc as std_mpsc;

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;

/// One read from a [`LineSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A line with its line ending removed.
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    Eof,
}

#[async_trait]
pub trait LineSource: Send {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Input>;

    /// True when `read_line` draws `prompt` itself.
    fn draws_prompt(&self) -> bool {
        false
    }
}

#[async_trait]
impl<R> LineSource for Lines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn read_line(&mut self, _prompt: &str) -> io::Result<Input> {
        Ok(match self.next_line().await? {
            Some(line) => Input::Line(line),
            None => Input::Eof,
        })
    }
}

/// Blocking line reader running on its own thread.
pub struct ThreadedLines {
    prompts: std_mpsc::Sender<String>,
    inputs: mpsc::Receiver<io::Result<Input>>,
}

impl ThreadedLines {
    /// Start the reader thread. `make` runs on that thread, so the reader it
    /// builds does not need to be `Send`.
    pub fn spawn<M, F>(make: M) -> io::Result<Self>
    where
        M: FnOnce() -> io::Result<F> + Send + 'static,
        F: FnMut(&str) -> io::Result<Input>,
    {
        let (prompts, prompt_rx) = std_mpsc::channel::<String>();
        let (input_tx, inputs) = mpsc::channel(1);
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);

        std::thread::Builder::new()
            .name("gemchat-input".into())
            .spawn(move || {
                let mut read = match make() {
                    Ok(read) => {
                        let _ = ready_tx.send(Ok(()));
                        read
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                while let Ok(prompt) = prompt_rx.recv() {
                    if input_tx.blocking_send(read(&prompt)).is_err() {
                        break;
                    }
                }
                tracing::debug!("input thread finished");
            })?;

        ready_rx
            .recv()
            .map_err(|_| io::Error::other("input thread exited during startup"))??;
        Ok(Self { prompts, inputs })
    }

    /// rustyline editor on the controlling terminal, with in-memory history.
    pub fn terminal() -> io::Result<Self> {
        Self::spawn(|| {
            let mut editor = DefaultEditor::new().map_err(io::Error::other)?;
            Ok(move |prompt: &str| -> io::Result<Input> {
                match editor.readline(prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = editor.add_history_entry(line.as_str());
                        }
                        Ok(Input::Line(line))
                    }
                    Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                    Err(ReadlineError::Eof) => Ok(Input::Eof),
                    Err(e) => Err(io::Error::other(e)),
                }
            })
        })
    }
}

#[async_trait]
impl LineSource for ThreadedLines {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        if self.prompts.send(prompt.to_string()).is_err() {
            return Ok(Input::Eof);
        }
        self.inputs.recv().await.unwrap_or(Ok(Input::Eof))
    }

    fn draws_prompt(&self) -> bool {
        true
    }
}
