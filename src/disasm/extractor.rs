//! Pull one code object's disassembly out of the `--print-opt-code` dump.

use crate::parser::lines::lines;
use log::debug;
use std::io::{self, Read};

/// Collect the instruction block that follows the line starting with `address`
///
/// The matching line itself is skipped. Lines are copied up to and including
/// the first blank line, which terminates the block. Returns an empty block if
/// the address never appears.
///
/// # Errors
/// Any I/O error of the underlying stream.
pub fn extract_optimized_code<R: Read>(
    reader: R,
    chunk_size: usize,
    address: &str,
) -> io::Result<Vec<String>> {
    let mut block = Vec::new();
    if address.is_empty() {
        return Ok(block);
    }

    let mut found = false;
    for line in lines(reader, chunk_size) {
        let line = line?;

        if !found {
            found = starts_with_address(&line, address);
            continue;
        }

        let terminator = line.is_empty();
        block.push(line);
        if terminator {
            break;
        }
    }

    if found {
        debug!("Extracted {} lines of code at {}", block.len(), address);
    } else {
        debug!("No optimized code found at {}", address);
    }

    Ok(block)
}

/// Case-insensitive address prefix match
fn starts_with_address(line: &str, address: &str) -> bool {
    line.get(..address.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DUMP: &str = "\
--- Optimized code ---
0x1000 header for f
0x1000     0  55  push rbp
0x1001     1  c3  ret

0x2000 header for g
0x2000     0  90  nop

";

    fn extract(address: &str) -> Vec<String> {
        extract_optimized_code(Cursor::new(DUMP), 7, address).unwrap()
    }

    #[test]
    fn test_block_after_address_line() {
        assert_eq!(
            extract("0x1000"),
            vec!["0x1000     0  55  push rbp", "0x1001     1  c3  ret", ""]
        );
    }

    #[test]
    fn test_second_block() {
        assert_eq!(extract("0x2000"), vec!["0x2000     0  90  nop", ""]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let dump = "0xABC code\n0xabc     0  c3  ret\n\n";
        let block = extract_optimized_code(Cursor::new(dump), 64, "0xabc").unwrap();
        assert_eq!(block, vec!["0xabc     0  c3  ret", ""]);
    }

    #[test]
    fn test_unknown_address_is_empty() {
        assert!(extract("0x3000").is_empty());
        assert!(extract("").is_empty());
    }
}
