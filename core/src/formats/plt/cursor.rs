use std::io::BufRead;

use super::err::Error;

/// A forward-only, line-indexed cursor over a [`BufRead`].
///
/// `position` is the zero-based index of the next line to be read, it never decreases.
#[derive(Debug)]
pub struct LineCursor<R> {
    rdr: R,
    position: usize,
    buf: String,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(rdr: R) -> Self {
        Self {
            rdr,
            position: 0,
            buf: String::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Reads the next line into `buf`, returns `false` at the end of the input.
    fn fill(&mut self) -> Result<bool, Error> {
        self.buf.clear();
        if self.rdr.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        self.position += 1;
        Ok(true)
    }

    fn current(&self) -> &str {
        self.buf.trim_end_matches(&['\r', '\n'][..])
    }

    /// Returns the next line without its line ending, or `None` at the end of the input.
    pub fn next_line(&mut self) -> Result<Option<&str>, Error> {
        if self.fill()? {
            Ok(Some(self.current()))
        } else {
            Ok(None)
        }
    }

    /// Discards lines until the next line to be read is `target`.
    pub fn advance_to(&mut self, target: usize) -> Result<(), Error> {
        if target < self.position {
            return Err(Error::CursorRegression {
                position: self.position,
                target,
            });
        }
        while self.position < target {
            if !self.fill()? {
                return Err(Error::UnexpectedEof {
                    line: self.position,
                    target,
                });
            }
        }
        Ok(())
    }

    /// Passes the next `n` lines and their indices to `f`.
    ///
    /// Stops early at the end of the input, returns the number of lines actually consumed.
    pub fn consume<E>(
        &mut self,
        n: usize,
        mut f: impl FnMut(usize, &str) -> Result<(), E>,
    ) -> Result<usize, E>
    where
        E: From<Error>,
    {
        for i in 0..n {
            let line = self.position;
            if !self.fill()? {
                return Ok(i);
            }
            f(line, self.current())?;
        }
        Ok(n)
    }
}
