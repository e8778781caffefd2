// ABOUTME: Splits document text into blank-line-delimited blocks
// ABOUTME: Works over in-memory text or any buffered reader, preserving line content

use std::io::BufRead;

/// A run of contiguous non-blank lines, kept exactly as read (line endings included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    raw: String,
}

impl Block {
    fn from_lines(lines: Vec<&str>) -> Self {
        Self { raw: lines.concat() }
    }

    /// Original text of the block.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Each line trimmed and joined with single spaces, so that a region
    /// spanning several lines can be matched as one unit.
    pub fn flattened(&self) -> String {
        self.raw
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn line_count(&self) -> usize {
        self.raw.lines().count()
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Lazy block iterator over borrowed text. Cloning restarts from the same position.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    lines: std::str::SplitInclusive<'a, char>,
}

/// Split `text` into blocks.
pub fn split_blocks(text: &str) -> Blocks<'_> {
    Blocks {
        lines: text.split_inclusive('\n'),
    }
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let mut pending = Vec::new();
        for line in self.lines.by_ref() {
            if is_blank(line) {
                if !pending.is_empty() {
                    return Some(Block::from_lines(pending));
                }
            } else {
                pending.push(line);
            }
        }

        if pending.is_empty() {
            None
        } else {
            Some(Block::from_lines(pending))
        }
    }
}

/// Streaming block iterator over a reader, for documents read from disk.
pub struct BlockReader<R> {
    reader: R,
    done: bool,
}

impl<R: BufRead> BlockReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for BlockReader<R> {
    type Item = std::io::Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut pending = String::new();
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) if is_blank(&line) => {
                    if !pending.is_empty() {
                        break;
                    }
                }
                Ok(_) => pending.push_str(&line),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        if pending.is_empty() {
            None
        } else {
            Some(Ok(Block { raw: pending }))
        }
    }
}
