//! Output plumbing shared by the commands
//!
//! Reports go either straight to stdout or through a `minus` pager when a
//! human is looking at a terminal.

use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Adapter that lets the pager be used wherever a `Write` is expected
///
/// `minus::Pager` only accepts `&str` chunks, so every write must be valid UTF-8.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where a command's report ends up
pub enum Output {
    Stdout,
    Paged(Pager),
}

impl Output {
    /// Page only when stdout is a terminal and paging was not turned off
    pub fn detect(no_pager: bool) -> Self {
        if no_pager || !io::stdout().is_terminal() {
            return Output::Stdout;
        }

        Output::Paged(Pager::new())
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, Output::Paged(_))
    }

    pub fn writer(&self) -> Box<dyn Write> {
        match self {
            Output::Stdout => Box::new(io::stdout()),
            Output::Paged(pager) => Box::new(PagerWriter::new(pager.clone())),
        }
    }

    /// Hand the collected report to the pager, blocking until it is closed
    pub fn finish(self) -> anyhow::Result<()> {
        if let Output::Paged(pager) = self {
            minus::page_all(pager)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_pager_writes_to_stdout() {
        let output = Output::detect(true);

        assert!(!output.is_paged());
        assert!(output.finish().is_ok());
    }

    #[test]
    fn test_pager_writer_accepts_utf8_chunks() {
        let mut writer = PagerWriter::new(Pager::new());

        assert_eq!(writer.write("ä diff\n".as_bytes()).unwrap(), 8);
        assert!(writer.write(&[0xff, 0xfe]).is_err());
    }
}
