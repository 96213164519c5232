//! Readable control flow for V8 optimized code.
//!
//! V8 prints one instruction per line:
//!
//! ```text
//! 0x2a8a00084047     7  483bd9               REX.W cmpq rbx,rcx
//! 0x2a8a0008404a     a  740d                 jz 0x2a8a00084059  <+0x19>
//! ```
//!
//! Jumps to addresses inside the block are rewritten to labels, and a label
//! definition line is inserted before each jump target. Label names depend on
//! how often and from which direction a target is reached, so all jumps are
//! counted in a discovery pass before anything is rendered.

use super::labels::LabelCache;
use crate::utils::config::INSTRUCTION_SEARCH_OFFSET;
use log::debug;

const ADDRESS_PREFIX: &str = "0x";
const WIDTH_PREFIX: &str = "REX.W";

/// Address and instruction text of one disassembly line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionLine<'a> {
    pub address: &'a str,
    pub instruction: &'a str,
}

/// Split a disassembly line into address and instruction
///
/// The address is everything before the first space. The instruction starts
/// after the first space found at or past the fixed instruction column, with
/// a leading `REX.W` prefix dropped.
pub fn split_line(line: &str) -> InstructionLine<'_> {
    let address = line.split(' ').next().unwrap_or_default();

    let instruction = line
        .get(INSTRUCTION_SEARCH_OFFSET..)
        .and_then(|rest| rest.find(' '))
        .map(|offset| line[INSTRUCTION_SEARCH_OFFSET + offset..].trim_start())
        .unwrap_or_default();

    let instruction = instruction
        .strip_prefix(WIDTH_PREFIX)
        .map(str::trim_start)
        .unwrap_or(instruction);

    InstructionLine {
        address,
        instruction,
    }
}

/// A jump instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Jump<'a> {
    /// Jump to a literal address
    Direct { mnemonic: &'a str, target: &'a str },

    /// Jump through a register or memory operand
    Indirect { mnemonic: &'a str, operand: &'a str },
}

/// Recognize the jump family by its leading `j`
fn parse_jump(instruction: &str) -> Option<Jump<'_>> {
    if !instruction.starts_with('j') {
        return None;
    }

    let mut words = instruction.split_whitespace();
    let mnemonic = words.next()?;
    let operand = words.next()?;

    if operand.starts_with(ADDRESS_PREFIX) {
        Some(Jump::Direct {
            mnemonic,
            target: operand,
        })
    } else {
        Some(Jump::Indirect { mnemonic, operand })
    }
}

/// Address span a block's jumps may target
///
/// Bounds are compared as text, the way V8 prints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodeRange<'a> {
    start: &'a str,
    end: &'a str,
}

impl<'a> CodeRange<'a> {
    /// From the first line to the second-to-last (the last is the block's
    /// terminating blank line)
    fn of_block<S: AsRef<str>>(lines: &'a [S]) -> Option<Self> {
        if lines.len() < 2 {
            return None;
        }

        Some(Self {
            start: split_line(lines[0].as_ref()).address,
            end: split_line(lines[lines.len() - 2].as_ref()).address,
        })
    }

    fn contains(&self, address: &str) -> bool {
        !(address > self.end || address < self.start)
    }
}

/// Render a block with jump targets replaced by labels
///
/// `context` identifies the rendered document; labels created here remember
/// it so they can be found again by output line. The cache keeps labels
/// between calls, but ids of new labels start at zero for every call.
pub fn decompile<S: AsRef<str>>(lines: &[S], context: &str, labels: &mut LabelCache) -> String {
    labels.restart_ids();
    let range = CodeRange::of_block(lines);
    match &range {
        Some(range) => debug!("Code range {} - {}", range.start, range.end),
        None => debug!("Block of {} lines has no code range", lines.len()),
    }

    discover_labels(lines, range.as_ref(), context, labels);
    render(lines, range.as_ref(), labels).join("\n")
}

/// First pass: create labels and collect jump statistics
fn discover_labels<S: AsRef<str>>(
    lines: &[S],
    range: Option<&CodeRange<'_>>,
    context: &str,
    labels: &mut LabelCache,
) {
    let Some(range) = range else {
        return;
    };

    for line in lines {
        let InstructionLine {
            address,
            instruction,
        } = split_line(line.as_ref());

        let Some(Jump::Direct { target, .. }) = parse_jump(instruction) else {
            continue;
        };
        if !range.contains(target) {
            continue;
        }

        let label = labels.get_or_insert(target, context);
        label.backward |= target < address;
        label.forward |= target > address;
        label.jump_count += 1;
    }
}

/// Second pass: emit label definitions and rewritten jumps
fn render<S: AsRef<str>>(
    lines: &[S],
    range: Option<&CodeRange<'_>>,
    labels: &mut LabelCache,
) -> Vec<String> {
    let mut output = Vec::with_capacity(lines.len());

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }

        let InstructionLine {
            address,
            instruction,
        } = split_line(line);

        if let Some(label) = labels.get_mut(address) {
            label.line = Some(output.len());
            output.push(format!("{}:", label.display_name()));
        }

        let rendered = match parse_jump(instruction) {
            None => format!("  {}", instruction),
            Some(Jump::Indirect { mnemonic, operand }) => format!("  {} {}", mnemonic, operand),
            Some(Jump::Direct { mnemonic, target }) => {
                let in_range = range.is_some_and(|range| range.contains(target));
                match labels.get_mut(target).filter(|_| in_range) {
                    Some(label) => {
                        label.referenced_at.push(output.len());
                        format!("  {} {}", mnemonic, label.display_name())
                    }
                    None => format!("  {} {} (outside)", mnemonic, target),
                }
            }
        };
        output.push(rendered);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line() {
        let line = split_line("0x2a8a00084047     7  483bd9               REX.W cmpq rbx,rcx");
        assert_eq!(line.address, "0x2a8a00084047");
        assert_eq!(line.instruction, "cmpq rbx,rcx");
    }

    #[test]
    fn test_split_short_line() {
        let line = split_line("0x10 nop");
        assert_eq!(line.address, "0x10");
        assert_eq!(line.instruction, "");
        assert_eq!(split_line(""), InstructionLine { address: "", instruction: "" });
    }

    #[test]
    fn test_parse_jump() {
        assert_eq!(
            parse_jump("jz 0x2a8a00084059  <+0x19>"),
            Some(Jump::Direct {
                mnemonic: "jz",
                target: "0x2a8a00084059"
            })
        );
        assert_eq!(
            parse_jump("jmp rbx"),
            Some(Jump::Indirect {
                mnemonic: "jmp",
                operand: "rbx"
            })
        );
        assert_eq!(parse_jump("jmp"), None);
        assert_eq!(parse_jump("movq rax,rbx"), None);
    }

    #[test]
    fn test_range_uses_second_to_last_line() {
        let lines = [
            "0x10                         nop",
            "0x20                         nop",
            "",
        ];
        let range = CodeRange::of_block(&lines).unwrap();
        assert_eq!(range.start, "0x10");
        assert_eq!(range.end, "0x20");
        assert!(range.contains("0x18"));
        assert!(!range.contains("0x21"));
        assert!(CodeRange::of_block(&lines[..1]).is_none());
    }
}
