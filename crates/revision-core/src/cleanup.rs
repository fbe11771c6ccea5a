//! Edit script cleanup passes.
//!
//! A minimal edit script is often not the one a human would write. Diffing `"The cat"` against
//! `"The cow"` can legitimately match the `'a'`-less tails in odd places, and a short equality
//! sandwiched between large edits carries no information. The passes here rewrite a script so its
//! boundaries follow words, lines and blank lines, while keeping both reconstruction invariants:
//!
//! - `Equal + Insert` texts still concatenate to `next`
//! - `Equal + Delete` texts still concatenate to `previous`
//!
//! Passes:
//!
//! - [`cleanup_merge`]: coalesce adjacent operations of the same kind, factor common affixes out
//!   of delete/insert pairs, and slide single edits to absorb neighbouring equalities
//! - [`cleanup_semantic_lossless`]: shift single edits sideways to the best-scoring boundary
//! - [`cleanup_semantic`]: eliminate low-information equalities, then run the lossless pass and
//!   extract overlaps between adjacent deletions and insertions

use crate::ops::{Chunk, EditKind, EditOp, chunks_from_ops, ops_from_chunks};
use crate::text::{common_overlap, common_prefix, common_suffix};
use std::mem;

/// Reorder and merge like edit sections. Any edit section can move as long as it doesn't cross an
/// equality.
pub fn cleanup_merge(ops: &mut Vec<EditOp>) {
    let mut chunks = chunks_from_ops(ops);
    merge_chunks(&mut chunks);
    *ops = ops_from_chunks(chunks);
}

/// Reduce the number of edits by eliminating semantically trivial equalities.
///
/// # Example
///
/// ```rust
/// use revision_core::EditOp;
/// use revision_core::cleanup::cleanup_semantic;
///
/// let mut ops = vec![EditOp::delete("a"), EditOp::equal("b"), EditOp::delete("c")];
/// cleanup_semantic(&mut ops);
/// assert_eq!(ops, vec![EditOp::delete("abc"), EditOp::insert("b")]);
/// ```
pub fn cleanup_semantic(ops: &mut Vec<EditOp>) {
    let mut chunks = chunks_from_ops(ops);
    semantic_chunks(&mut chunks);
    *ops = ops_from_chunks(chunks);
}

/// Slide single edits surrounded by equalities to align with word and line boundaries.
///
/// Example: `The c<ins>at c</ins>ame.` becomes `The <ins>cat </ins>came.`
pub fn cleanup_semantic_lossless(ops: &mut Vec<EditOp>) {
    let mut chunks = chunks_from_ops(ops);
    semantic_lossless_chunks(&mut chunks);
    *ops = ops_from_chunks(chunks);
}

pub(crate) fn merge_chunks<T: PartialEq + Clone>(chunks: &mut Vec<Chunk<T>>) {
    chunks.retain(|chunk| !chunk.items.is_empty());
    // Sentinel equality flushes the trailing edit run.
    chunks.push(Chunk::new(EditKind::Equal, Vec::new()));

    let mut pointer = 0;
    let mut count_delete = 0;
    let mut count_insert = 0;
    let mut text_delete: Vec<T> = Vec::new();
    let mut text_insert: Vec<T> = Vec::new();

    while pointer < chunks.len() {
        match chunks[pointer].kind {
            EditKind::Insert => {
                count_insert += 1;
                text_insert.extend_from_slice(&chunks[pointer].items);
                pointer += 1;
            }
            EditKind::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&chunks[pointer].items);
                pointer += 1;
            }
            EditKind::Equal => {
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        let prefix = common_prefix(&text_insert, &text_delete);
                        if prefix != 0 {
                            let run_start = pointer - count_delete - count_insert;
                            if run_start > 0 && chunks[run_start - 1].kind == EditKind::Equal {
                                chunks[run_start - 1]
                                    .items
                                    .extend_from_slice(&text_insert[..prefix]);
                            } else {
                                chunks.insert(
                                    0,
                                    Chunk::from_slice(EditKind::Equal, &text_insert[..prefix]),
                                );
                                pointer += 1;
                            }
                            text_insert.drain(..prefix);
                            text_delete.drain(..prefix);
                        }

                        let suffix = common_suffix(&text_insert, &text_delete);
                        if suffix != 0 {
                            let mut items = text_insert.split_off(text_insert.len() - suffix);
                            text_delete.truncate(text_delete.len() - suffix);
                            items.append(&mut chunks[pointer].items);
                            chunks[pointer].items = items;
                        }
                    }

                    let run_start = pointer - count_delete - count_insert;
                    let mut merged = Vec::with_capacity(2);
                    if !text_delete.is_empty() {
                        merged.push(Chunk::new(EditKind::Delete, mem::take(&mut text_delete)));
                    }
                    if !text_insert.is_empty() {
                        merged.push(Chunk::new(EditKind::Insert, mem::take(&mut text_insert)));
                    }
                    let merged_len = merged.len();
                    chunks.splice(run_start..pointer, merged);
                    pointer = run_start + merged_len + 1;
                } else if pointer != 0 && chunks[pointer - 1].kind == EditKind::Equal {
                    let items = chunks.remove(pointer).items;
                    chunks[pointer - 1].items.extend(items);
                } else {
                    pointer += 1;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }
    if chunks.last().is_some_and(|chunk| chunk.items.is_empty()) {
        chunks.pop();
    }

    // Second pass: a single edit surrounded by equalities can sometimes be shifted sideways to
    // eliminate one of them, e.g. `A<ins>BA</ins>C` -> `<ins>AB</ins>AC`.
    let mut changes = false;
    let mut pointer = 1;
    while pointer + 1 < chunks.len() {
        if chunks[pointer - 1].kind == EditKind::Equal
            && chunks[pointer + 1].kind == EditKind::Equal
        {
            if chunks[pointer].items.ends_with(&chunks[pointer - 1].items) {
                let before = chunks[pointer - 1].items.clone();
                let edit_len = chunks[pointer].items.len() - before.len();

                let mut edit = before.clone();
                edit.extend_from_slice(&chunks[pointer].items[..edit_len]);
                chunks[pointer].items = edit;

                let mut after = before;
                after.append(&mut chunks[pointer + 1].items);
                chunks[pointer + 1].items = after;

                chunks.remove(pointer - 1);
                changes = true;
            } else if chunks[pointer].items.starts_with(&chunks[pointer + 1].items) {
                let after = chunks[pointer + 1].items.clone();
                chunks[pointer - 1].items.extend_from_slice(&after);

                let edit = &mut chunks[pointer].items;
                edit.drain(..after.len());
                edit.extend_from_slice(&after);

                chunks.remove(pointer + 1);
                changes = true;
            }
        }
        pointer += 1;
    }
    if changes {
        merge_chunks(chunks);
    }
}

pub(crate) fn semantic_chunks(chunks: &mut Vec<Chunk<char>>) {
    let mut changes = false;
    // Indices of equalities seen so far; the top is the candidate for elimination.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;

    // Edit lengths before and after the candidate equality.
    let mut inserted_before = 0;
    let mut deleted_before = 0;
    let mut inserted_after = 0;
    let mut deleted_after = 0;

    let mut pointer = 0;
    while pointer < chunks.len() {
        if chunks[pointer].kind == EditKind::Equal {
            equalities.push(pointer);
            inserted_before = inserted_after;
            deleted_before = deleted_after;
            inserted_after = 0;
            deleted_after = 0;
            last_equality = Some(chunks[pointer].items.clone());
            pointer += 1;
            continue;
        }

        if chunks[pointer].kind == EditKind::Insert {
            inserted_after += chunks[pointer].items.len();
        } else {
            deleted_after += chunks[pointer].items.len();
        }

        let eliminate = match &last_equality {
            Some(equality) if !equality.is_empty() => {
                equality.len() <= inserted_before.max(deleted_before)
                    && equality.len() <= inserted_after.max(deleted_after)
            }
            _ => false,
        };

        if eliminate {
            if let (Some(equality), Some(&at)) = (last_equality.take(), equalities.last()) {
                // Replace the equality by a delete/insert pair of the same text.
                chunks.insert(at, Chunk::new(EditKind::Delete, equality));
                chunks[at + 1].kind = EditKind::Insert;

                // Drop the eliminated equality and re-evaluate the one before it.
                equalities.pop();
                equalities.pop();
                pointer = equalities.last().map_or(0, |&i| i + 1);

                inserted_before = 0;
                deleted_before = 0;
                inserted_after = 0;
                deleted_after = 0;
                changes = true;
                continue;
            }
        }
        pointer += 1;
    }

    if changes {
        merge_chunks(chunks);
    }
    semantic_lossless_chunks(chunks);

    // Extract overlaps between a deletion and the insertion that follows it:
    //   <del>abcxxx</del><ins>xxxdef</ins> -> <del>abc</del>xxx<ins>def</ins>
    //   <del>xxxabc</del><ins>defxxx</ins> -> <ins>def</ins>xxx<del>abc</del>
    // Only when the overlap is at least half of one of the edits.
    let mut pointer = 1;
    while pointer < chunks.len() {
        if chunks[pointer - 1].kind == EditKind::Delete && chunks[pointer].kind == EditKind::Insert
        {
            let deletion = chunks[pointer - 1].items.clone();
            let insertion = chunks[pointer].items.clone();
            let forward = common_overlap(&deletion, &insertion);
            let backward = common_overlap(&insertion, &deletion);

            if forward >= backward {
                if forward * 2 >= deletion.len() || forward * 2 >= insertion.len() {
                    chunks.insert(
                        pointer,
                        Chunk::from_slice(EditKind::Equal, &insertion[..forward]),
                    );
                    chunks[pointer - 1].items = deletion[..deletion.len() - forward].to_vec();
                    chunks[pointer + 1].items = insertion[forward..].to_vec();
                    pointer += 1;
                }
            } else if backward * 2 >= deletion.len() || backward * 2 >= insertion.len() {
                chunks.insert(
                    pointer,
                    Chunk::from_slice(EditKind::Equal, &deletion[..backward]),
                );
                chunks[pointer - 1] = Chunk::from_slice(
                    EditKind::Insert,
                    &insertion[..insertion.len() - backward],
                );
                chunks[pointer + 1] = Chunk::from_slice(EditKind::Delete, &deletion[backward..]);
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
    chunks.retain(|chunk| !chunk.items.is_empty());
}

pub(crate) fn semantic_lossless_chunks(chunks: &mut Vec<Chunk<char>>) {
    let mut pointer = 1;
    while pointer + 1 < chunks.len() {
        if chunks[pointer - 1].kind != EditKind::Equal
            || chunks[pointer + 1].kind != EditKind::Equal
        {
            pointer += 1;
            continue;
        }

        // Lay the three sections out as one run; the edit is a window sliding over it.
        let before_len = chunks[pointer - 1].items.len();
        let edit_len = chunks[pointer].items.len();
        let mut all = Vec::with_capacity(before_len + edit_len + chunks[pointer + 1].items.len());
        all.extend_from_slice(&chunks[pointer - 1].items);
        all.extend_from_slice(&chunks[pointer].items);
        all.extend_from_slice(&chunks[pointer + 1].items);

        // Shift the edit as far left as possible.
        let shift = common_suffix(&chunks[pointer - 1].items, &chunks[pointer].items);
        let mut start = before_len - shift;

        let score_at = |start: usize| {
            let edit = &all[start..start + edit_len];
            semantic_score(&all[..start], edit) + semantic_score(edit, &all[start + edit_len..])
        };

        // Then step right one character at a time, keeping the best (rightmost on ties) fit.
        let mut best_start = start;
        let mut best_score = score_at(start);
        while start + edit_len < all.len() && all[start] == all[start + edit_len] {
            start += 1;
            let score = score_at(start);
            if score >= best_score {
                best_score = score;
                best_start = start;
            }
        }

        if best_start != before_len {
            let mut edit_at = pointer;
            let mut removed = 0;
            if best_start > 0 {
                chunks[edit_at - 1].items = all[..best_start].to_vec();
            } else {
                chunks.remove(edit_at - 1);
                edit_at -= 1;
                removed += 1;
            }
            chunks[edit_at].items = all[best_start..best_start + edit_len].to_vec();
            if best_start + edit_len < all.len() {
                chunks[edit_at + 1].items = all[best_start + edit_len..].to_vec();
            } else {
                chunks.remove(edit_at + 1);
                removed += 1;
            }
            // A swallowed equality means the edit may now border another one; look again.
            pointer = (pointer + 1 - removed).max(1);
            continue;
        }
        pointer += 1;
    }
}

/// Score how natural the boundary between `one` and `two` is.
///
/// 6 = an edge of the text, 5 = blank line, 4 = line break, 3 = end of sentence,
/// 2 = whitespace, 1 = non-alphanumeric, 0 = inside a word.
fn semantic_score(one: &[char], two: &[char]) -> u8 {
    let (Some(&last), Some(&first)) = (one.last(), two.first()) else {
        return 6;
    };

    let non_alnum1 = !last.is_alphanumeric();
    let non_alnum2 = !first.is_alphanumeric();
    let whitespace1 = non_alnum1 && last.is_whitespace();
    let whitespace2 = non_alnum2 && first.is_whitespace();
    let line_break1 = whitespace1 && matches!(last, '\r' | '\n');
    let line_break2 = whitespace2 && matches!(first, '\r' | '\n');
    let blank_line1 = line_break1 && ends_with_blank_line(one);
    let blank_line2 = line_break2 && starts_with_blank_line(two);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alnum1 && !whitespace1 && whitespace2 {
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alnum1 || non_alnum2 {
        1
    } else {
        0
    }
}

/// `\n\r?\n` at the end.
fn ends_with_blank_line(text: &[char]) -> bool {
    text.ends_with(&['\n', '\n']) || text.ends_with(&['\n', '\r', '\n'])
}

/// `\r?\n\r?\n` at the start.
fn starts_with_blank_line(text: &[char]) -> bool {
    let rest = text.strip_prefix(&['\r']).unwrap_or(text);
    let Some(rest) = rest.strip_prefix(&['\n']) else {
        return false;
    };
    let rest = rest.strip_prefix(&['\r']).unwrap_or(rest);
    rest.starts_with(&['\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_semantic_score_ranks_boundaries() {
        assert_eq!(semantic_score(&c(""), &c("a")), 6);
        assert_eq!(semantic_score(&c("a\n\n"), &c("b")), 5);
        assert_eq!(semantic_score(&c("a"), &c("\r\n\r\nb")), 5);
        assert_eq!(semantic_score(&c("a\n"), &c("b")), 4);
        assert_eq!(semantic_score(&c("end."), &c(" next")), 3);
        assert_eq!(semantic_score(&c("word"), &c(" next")), 2);
        assert_eq!(semantic_score(&c("dash-"), &c("word")), 1);
        assert_eq!(semantic_score(&c("wor"), &c("d")), 0);
        // Non-ASCII letters count as word characters.
        assert_eq!(semantic_score(&c("caf"), &c("é")), 0);
    }

    #[test]
    fn test_blank_line_detection() {
        assert!(ends_with_blank_line(&c("x\n\n")));
        assert!(ends_with_blank_line(&c("x\n\r\n")));
        assert!(!ends_with_blank_line(&c("x\r\n")));
        assert!(starts_with_blank_line(&c("\n\nx")));
        assert!(starts_with_blank_line(&c("\r\n\r\nx")));
        assert!(starts_with_blank_line(&c("\r\n\nx")));
        assert!(!starts_with_blank_line(&c("\r\nx")));
    }
}
