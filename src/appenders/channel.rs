//! Forwards finished lines to another thread

use crate::core::{Appender, LoggerError, Result};
use crossbeam_channel::Sender;

/// Sends every line into a channel; the receiver decides what to do with it
pub struct ChannelAppender {
    name: String,
    sender: Sender<String>,
}

impl ChannelAppender {
    pub fn new(name: impl Into<String>, sender: Sender<String>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }
}

impl Appender for ChannelAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        self.sender
            .send(line.to_string())
            .map_err(|_| LoggerError::writer(format!("channel '{}' disconnected", self.name)))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_lines_arrive_in_order() {
        let (tx, rx) = unbounded();
        let mut appender = ChannelAppender::new("relay", tx);
        appender.append("one").unwrap();
        appender.append("two").unwrap();

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn test_disconnected_receiver_is_writer_error() {
        let (tx, rx) = unbounded();
        drop(rx);
        let mut appender = ChannelAppender::new("relay", tx);
        assert!(matches!(
            appender.append("lost"),
            Err(LoggerError::WriterError(_))
        ));
    }
}
