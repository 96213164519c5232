//! Chunked stream to line sequence.
//!
//! V8 writes its logs while the program runs, so the reader never assumes a
//! whole file fits in one read. Lines are assembled from fixed-size chunks and
//! the remainder of each chunk is carried over to the next read.

use std::io::{self, ErrorKind, Read};

/// Lazy iterator over the complete lines of a byte stream
///
/// Only newline-terminated lines are yielded; a trailing fragment without a
/// newline is dropped when the stream ends. Calling [`lines`] again on a fresh
/// reader starts a new, independent sequence.
pub struct Lines<R> {
    reader: R,
    buffer: Vec<u8>,
    chunk: Vec<u8>,
    /// Start of the first line not yet yielded
    start: usize,
    /// Bytes before this offset are known to contain no newline
    scanned: usize,
    done: bool,
}

/// Split a stream into lines, reading `chunk_size` bytes at a time
pub fn lines<R: Read>(reader: R, chunk_size: usize) -> Lines<R> {
    Lines {
        reader,
        buffer: Vec::new(),
        chunk: vec![0; chunk_size.max(1)],
        start: 0,
        scanned: 0,
        done: false,
    }
}

impl<R: Read> Lines<R> {
    /// Take the next complete line out of the carry-over buffer
    fn take_buffered_line(&mut self) -> Option<io::Result<String>> {
        let newline = self.buffer[self.scanned..]
            .iter()
            .position(|byte| *byte == b'\n')
            .map(|offset| self.scanned + offset);

        let Some(end) = newline else {
            self.scanned = self.buffer.len();
            return None;
        };

        let line = String::from_utf8(self.buffer[self.start..end].to_vec())
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e));
        self.start = end + 1;
        self.scanned = self.start;
        Some(line)
    }

    /// Drop consumed bytes and append one more chunk; false at end of stream
    fn fill(&mut self) -> io::Result<bool> {
        self.buffer.drain(..self.start);
        self.scanned -= self.start;
        self.start = 0;

        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.buffer.extend_from_slice(&self.chunk[..n]);
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.take_buffered_line() {
                return Some(line);
            }

            if self.done {
                return None;
            }

            match self.fill() {
                Ok(true) => {}
                Ok(false) => {
                    // Unterminated tail is not a complete line
                    self.done = true;
                    self.buffer.clear();
                    self.start = 0;
                    self.scanned = 0;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &str, chunk_size: usize) -> Vec<String> {
        lines(Cursor::new(input.as_bytes().to_vec()), chunk_size)
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_lines_across_chunk_boundaries() {
        let input = "first line\nsecond\n\nfourth one\n";
        for chunk_size in 1..input.len() + 2 {
            assert_eq!(
                collect(input, chunk_size),
                vec!["first line", "second", "", "fourth one"],
                "chunk size {}",
                chunk_size
            );
        }
    }

    #[test]
    fn test_unterminated_tail_is_dropped() {
        assert_eq!(collect("a\nb\npartial", 3), vec!["a", "b"]);
        assert!(collect("no newline at all", 4).is_empty());
    }

    #[test]
    fn test_empty_stream() {
        assert!(collect("", 8).is_empty());
    }

    #[test]
    fn test_multibyte_split_by_chunk() {
        assert_eq!(collect("1μs\n2μs\n", 2), vec!["1μs", "2μs"]);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let mut reader = lines(Cursor::new(vec![0xff, 0xfe, b'\n']), 8);
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_error_ends_sequence() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(ErrorKind::Other, "disk gone"))
            }
        }

        let mut reader = lines(Broken, 8);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
