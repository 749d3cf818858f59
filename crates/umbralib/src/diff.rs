//! Line diff helpers for mapping lines between two revisions of a document.

use std::collections::BTreeMap;

use difference::{Changeset, Difference};

use crate::document::TextDocument;

/// Kind of edit an opcode describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One edit over half-open, 0-based line ranges of the two documents.
///
/// Opcodes are emitted in order and together cover both documents
/// completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: DiffTag,
    pub src_start: usize,
    pub src_end: usize,
    pub dst_start: usize,
    pub dst_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Same,
    Add,
    Rem,
}

/// Compute an LCS line diff between `src` and `dst`.
///
/// An empty document is treated as a single empty line, so two empty
/// documents compare equal with one unmodified line.
pub fn diff_and_get_opcodes(src: &TextDocument, dst: &TextDocument) -> Vec<Opcode> {
    let src_text = src.lines().join("\n");
    let dst_text = dst.lines().join("\n");
    let changeset = Changeset::new(&src_text, &dst_text, "\n");

    // Coalesce the chunked diff into per-kind line counts.
    let mut runs: Vec<(RunKind, usize)> = Vec::new();
    for diff in &changeset.diffs {
        let (kind, chunk) = match diff {
            Difference::Same(chunk) => (RunKind::Same, chunk),
            Difference::Add(chunk) => (RunKind::Add, chunk),
            Difference::Rem(chunk) => (RunKind::Rem, chunk),
        };
        let count = chunk.split('\n').count();
        match runs.last_mut() {
            Some((last, total)) if *last == kind => *total += count,
            _ => runs.push((kind, count)),
        }
    }

    let mut opcodes = Vec::new();
    let mut src_line = 0;
    let mut dst_line = 0;
    let mut index = 0;
    while index < runs.len() {
        match runs[index] {
            (RunKind::Same, count) => {
                opcodes.push(Opcode {
                    tag: DiffTag::Equal,
                    src_start: src_line,
                    src_end: src_line + count,
                    dst_start: dst_line,
                    dst_end: dst_line + count,
                });
                src_line += count;
                dst_line += count;
                index += 1;
            }
            (RunKind::Rem, removed) => {
                if let Some(&(RunKind::Add, added)) = runs.get(index + 1) {
                    opcodes.push(Opcode {
                        tag: DiffTag::Replace,
                        src_start: src_line,
                        src_end: src_line + removed,
                        dst_start: dst_line,
                        dst_end: dst_line + added,
                    });
                    src_line += removed;
                    dst_line += added;
                    index += 2;
                } else {
                    opcodes.push(Opcode {
                        tag: DiffTag::Delete,
                        src_start: src_line,
                        src_end: src_line + removed,
                        dst_start: dst_line,
                        dst_end: dst_line,
                    });
                    src_line += removed;
                    index += 1;
                }
            }
            (RunKind::Add, added) => {
                if let Some(&(RunKind::Rem, removed)) = runs.get(index + 1) {
                    opcodes.push(Opcode {
                        tag: DiffTag::Replace,
                        src_start: src_line,
                        src_end: src_line + removed,
                        dst_start: dst_line,
                        dst_end: dst_line + added,
                    });
                    src_line += removed;
                    dst_line += added;
                    index += 2;
                } else {
                    opcodes.push(Opcode {
                        tag: DiffTag::Insert,
                        src_start: src_line,
                        src_end: src_line,
                        dst_start: dst_line,
                        dst_end: dst_line + added,
                    });
                    dst_line += added;
                    index += 1;
                }
            }
        }
    }
    opcodes
}

/// Map 1-based line numbers of unmodified lines in `dst` back to their
/// 1-based line numbers in `src`.
pub fn map_unmodified_lines(src: &TextDocument, dst: &TextDocument) -> BTreeMap<usize, usize> {
    let mut result = BTreeMap::new();
    for opcode in diff_and_get_opcodes(src, dst) {
        if opcode.tag != DiffTag::Equal {
            continue;
        }
        for offset in 0..(opcode.src_end - opcode.src_start) {
            result.insert(opcode.dst_start + offset + 1, opcode.src_start + offset + 1);
        }
    }
    result
}
