//! Output sinks the evaluator writes to.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

/// Collaborator receiving everything a program prints.
///
/// Called synchronously from the evaluator.
pub trait OutputSink {
    fn emit(&mut self, text: &str);

    /// Erases everything emitted so far.
    fn clear(&mut self);

    /// Asks for a line of text, re-asking until the answer is non-empty.
    ///
    /// Returns `None` once no more input can be obtained.
    fn prompt(&mut self, message: &str) -> Option<String>;
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn emit(&mut self, text: &str) {
        (**self).emit(text);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        (**self).prompt(message)
    }
}

/// Sink writing to stdout and reading prompts from stdin.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&mut self, text: &str) {
        println!("{}", text);
    }

    fn clear(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        loop {
            print!("{} ", message);
            let _ = io::stdout().flush();

            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {
                    let answer = line.trim_end_matches(['\r', '\n']);
                    if !answer.is_empty() {
                        return Some(answer.to_string());
                    }
                }
            }
        }
    }
}

/// In-memory sink: keeps emitted lines and answers prompts from a queue.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Vec<String>,
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues answers handed out by [`OutputSink::prompt`], in order.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Prompt messages shown so far, including repeated ones.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn transcript(&self) -> String {
        self.lines.join("\n")
    }
}

impl OutputSink for BufferSink {
    fn emit(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn clear(&mut self) {
        self.lines.clear();
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        loop {
            self.prompts.push(message.to_string());
            let answer = self.answers.pop_front()?;
            if !answer.is_empty() {
                return Some(answer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_clear_drops_lines() {
        let mut sink = BufferSink::new();
        sink.emit("a");
        sink.emit("b");
        assert_eq!(sink.transcript(), "a\nb");

        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn buffer_sink_prompt_skips_empty_answers() {
        let mut sink = BufferSink::with_answers(["", "", "flex"]);
        assert_eq!(sink.prompt("name?"), Some("flex".to_string()));
        assert_eq!(sink.prompts().len(), 3);
        assert_eq!(sink.prompt("again?"), None);
    }
}
