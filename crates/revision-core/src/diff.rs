//! Character diff.
//!
//! Computes an edit script between two snapshots using Myers' O(ND) algorithm with
//! middle-snake bisection, preceded by cheap shortcuts (common prefix/suffix trimming, containment,
//! single-token inputs) and, for long inputs, a line-mode pre-pass.
//!
//! All offsets and lengths are expressed in **characters** (Unicode scalar values). The result is
//! deterministic: the algorithm never consults a clock and never iterates an unordered container.
//!
//! # Complexity
//!
//! Bisection is O((N + M) · D) in time where `D` is the edit distance, and O(N + M) in space. Two
//! knobs in [`DiffOptions`] bound the cost on large or very different inputs:
//!
//! - [`DiffOptions::line_mode_threshold`]: diff whole lines first, then refine changed blocks
//! - [`DiffOptions::edit_budget`]: cap the number of bisection rounds and degrade to a coarse
//!   delete-then-insert script when exceeded

use crate::cleanup::{merge_chunks, semantic_chunks};
use crate::ops::{Chunk, EditKind, EditOp, ops_from_chunks};
use crate::text::{common_prefix, common_suffix, find_subslice, split_lines_keep_ends, to_chars};
use std::collections::HashMap;

/// Default cap on Myers rounds per bisection.
///
/// A bisection that needs more rounds than this degrades to delete-then-insert for its region, so
/// work per bisection is bounded regardless of input length.
pub const DEFAULT_EDIT_BUDGET: usize = 4096;

/// Options that control how a diff is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// When both changed regions are longer than this many characters, diff by lines first.
    ///
    /// `None` disables the line-mode pre-pass.
    pub line_mode_threshold: Option<usize>,
    /// Maximum number of Myers rounds per bisection. `None` means unbounded (exact).
    ///
    /// Defaults to [`DEFAULT_EDIT_BUDGET`].
    pub edit_budget: Option<usize>,
    /// If `true`, run the semantic cleanup pass over the raw edit script.
    pub semantic_cleanup: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            line_mode_threshold: Some(100),
            edit_budget: Some(DEFAULT_EDIT_BUDGET),
            semantic_cleanup: true,
        }
    }
}

impl DiffOptions {
    /// Options producing the raw, minimal edit script (no line mode, no semantic cleanup).
    pub fn raw() -> Self {
        Self {
            line_mode_threshold: None,
            edit_budget: None,
            semantic_cleanup: false,
        }
    }
}

/// Diff `previous` against `next` with default options.
///
/// # Example
///
/// ```rust
/// use revision_core::{EditOp, diff};
///
/// let ops = diff("abc", "abXc");
/// assert_eq!(
///     ops,
///     vec![EditOp::equal("ab"), EditOp::insert("X"), EditOp::equal("c")]
/// );
/// ```
pub fn diff(previous: &str, next: &str) -> Vec<EditOp> {
    diff_with(previous, next, DiffOptions::default())
}

/// Diff `previous` against `next` with explicit options.
pub fn diff_with(previous: &str, next: &str, options: DiffOptions) -> Vec<EditOp> {
    let previous = to_chars(previous);
    let next = to_chars(next);

    let differ = Differ { options };
    let mut chunks = differ.diff_chars(&previous, &next);
    if options.semantic_cleanup {
        semantic_chunks(&mut chunks);
    }
    ops_from_chunks(chunks)
}

struct Differ {
    options: DiffOptions,
}

impl Differ {
    /// Character-level entry point; may take the line-mode path.
    fn diff_chars(&self, a: &[char], b: &[char]) -> Vec<Chunk<char>> {
        let Some(threshold) = self.options.line_mode_threshold else {
            return self.diff_slices(a, b);
        };

        let prefix = common_prefix(a, b);
        let suffix = common_suffix(&a[prefix..], &b[prefix..]);
        let middle_a = &a[prefix..a.len() - suffix];
        let middle_b = &b[prefix..b.len() - suffix];

        if middle_a.len() <= threshold
            || middle_b.len() <= threshold
            || is_contained(middle_a, middle_b)
        {
            return self.diff_slices(a, b);
        }

        let mut chunks = Vec::new();
        if prefix > 0 {
            chunks.push(Chunk::from_slice(EditKind::Equal, &a[..prefix]));
        }
        chunks.extend(self.line_mode(middle_a, middle_b));
        if suffix > 0 {
            chunks.push(Chunk::from_slice(EditKind::Equal, &a[a.len() - suffix..]));
        }
        merge_chunks(&mut chunks);
        chunks
    }

    /// Generic token diff: trim common affixes, diff the middle, merge.
    fn diff_slices<T: PartialEq + Clone>(&self, a: &[T], b: &[T]) -> Vec<Chunk<T>> {
        if a == b {
            if a.is_empty() {
                return Vec::new();
            }
            return vec![Chunk::from_slice(EditKind::Equal, a)];
        }

        let prefix = common_prefix(a, b);
        let suffix = common_suffix(&a[prefix..], &b[prefix..]);

        let mut chunks = Vec::new();
        if prefix > 0 {
            chunks.push(Chunk::from_slice(EditKind::Equal, &a[..prefix]));
        }
        chunks.extend(self.compute(&a[prefix..a.len() - suffix], &b[prefix..b.len() - suffix]));
        if suffix > 0 {
            chunks.push(Chunk::from_slice(EditKind::Equal, &a[a.len() - suffix..]));
        }
        merge_chunks(&mut chunks);
        chunks
    }

    /// Diff two inputs that share no common prefix or suffix.
    fn compute<T: PartialEq + Clone>(&self, a: &[T], b: &[T]) -> Vec<Chunk<T>> {
        if a.is_empty() {
            return vec![Chunk::from_slice(EditKind::Insert, b)];
        }
        if b.is_empty() {
            return vec![Chunk::from_slice(EditKind::Delete, a)];
        }

        let (long, short, outer) = if a.len() > b.len() {
            (a, b, EditKind::Delete)
        } else {
            (b, a, EditKind::Insert)
        };

        // Shorter input is entirely inside the longer one.
        if let Some(at) = find_subslice(long, short) {
            return vec![
                Chunk::from_slice(outer, &long[..at]),
                Chunk::from_slice(EditKind::Equal, short),
                Chunk::from_slice(outer, &long[at + short.len()..]),
            ];
        }

        // A single token that is not contained cannot be part of any common subsequence.
        if short.len() == 1 {
            return vec![
                Chunk::from_slice(EditKind::Delete, a),
                Chunk::from_slice(EditKind::Insert, b),
            ];
        }

        self.bisect(a, b)
    }

    /// Find the middle snake of the edit graph, split there, and recurse.
    fn bisect<T: PartialEq + Clone>(&self, a: &[T], b: &[T]) -> Vec<Chunk<T>> {
        let n = a.len() as isize;
        let m = b.len() as isize;
        let max_d = (n + m + 1) / 2;
        let v_offset = max_d;
        let v_len = 2 * max_d + 2;

        // `-1` marks a diagonal not reached yet.
        let mut v1 = vec![-1isize; v_len as usize];
        let mut v2 = vec![-1isize; v_len as usize];
        v1[(v_offset + 1) as usize] = 0;
        v2[(v_offset + 1) as usize] = 0;

        let delta = n - m;
        // With an odd delta the forward path collides with the reverse one; otherwise reverse.
        let front = delta % 2 != 0;

        // Diagonals that ran off the edit graph are skipped in later rounds.
        let mut k1_start = 0;
        let mut k1_end = 0;
        let mut k2_start = 0;
        let mut k2_end = 0;

        let rounds = match self.options.edit_budget {
            Some(budget) => (budget as isize).min(max_d),
            None => max_d,
        };

        for d in 0..rounds {
            let mut k1 = -d + k1_start;
            while k1 <= d - k1_end {
                let k1_offset = (v_offset + k1) as usize;
                let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                    v1[k1_offset + 1]
                } else {
                    v1[k1_offset - 1] + 1
                };
                let mut y1 = x1 - k1;
                while x1 >= 0 && y1 >= 0 && x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                    x1 += 1;
                    y1 += 1;
                }
                v1[k1_offset] = x1;

                if x1 > n {
                    k1_end += 2;
                } else if y1 > m {
                    k1_start += 2;
                } else if front {
                    let k2_offset = v_offset + delta - k1;
                    if k2_offset >= 0 && k2_offset < v_len && v2[k2_offset as usize] != -1 {
                        let x2 = n - v2[k2_offset as usize];
                        if x1 >= x2 {
                            return self.bisect_split(a, b, x1 as usize, y1 as usize);
                        }
                    }
                }
                k1 += 2;
            }

            let mut k2 = -d + k2_start;
            while k2 <= d - k2_end {
                let k2_offset = (v_offset + k2) as usize;
                let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                    v2[k2_offset + 1]
                } else {
                    v2[k2_offset - 1] + 1
                };
                let mut y2 = x2 - k2;
                while x2 >= 0
                    && y2 >= 0
                    && x2 < n
                    && y2 < m
                    && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize]
                {
                    x2 += 1;
                    y2 += 1;
                }
                v2[k2_offset] = x2;

                if x2 > n {
                    k2_end += 2;
                } else if y2 > m {
                    k2_start += 2;
                } else if !front {
                    let k1_offset = v_offset + delta - k2;
                    if k1_offset >= 0 && k1_offset < v_len && v1[k1_offset as usize] != -1 {
                        let x1 = v1[k1_offset as usize];
                        let y1 = v_offset + x1 - k1_offset;
                        // Mirror x2 onto the top-left coordinate system.
                        let x2 = n - x2;
                        if x1 >= x2 {
                            return self.bisect_split(a, b, x1 as usize, y1 as usize);
                        }
                    }
                }
                k2 += 2;
            }
        }

        // No overlap found within the budget (or no commonality at all).
        vec![
            Chunk::from_slice(EditKind::Delete, a),
            Chunk::from_slice(EditKind::Insert, b),
        ]
    }

    fn bisect_split<T: PartialEq + Clone>(
        &self,
        a: &[T],
        b: &[T],
        x: usize,
        y: usize,
    ) -> Vec<Chunk<T>> {
        let mut chunks = self.diff_slices(&a[..x], &b[..y]);
        chunks.extend(self.diff_slices(&a[x..], &b[y..]));
        chunks
    }

    /// Diff by whole lines, then refine every replaced block character by character.
    fn line_mode(&self, a: &[char], b: &[char]) -> Vec<Chunk<char>> {
        let mut interner = LineInterner::default();
        let line_ids_a = interner.intern(a);
        let line_ids_b = interner.intern(b);

        let mut chunks: Vec<Chunk<char>> = self
            .diff_slices(&line_ids_a, &line_ids_b)
            .into_iter()
            .map(|chunk| Chunk::new(chunk.kind, interner.expand(&chunk.items)))
            .collect();
        semantic_chunks(&mut chunks);

        let mut refined = Vec::with_capacity(chunks.len());
        let mut pending = Vec::new();
        for chunk in chunks {
            if chunk.kind == EditKind::Equal {
                self.flush_replacement(&mut refined, &mut pending);
                refined.push(chunk);
            } else {
                pending.push(chunk);
            }
        }
        self.flush_replacement(&mut refined, &mut pending);
        refined
    }

    fn flush_replacement(&self, out: &mut Vec<Chunk<char>>, pending: &mut Vec<Chunk<char>>) {
        let has_delete = pending.iter().any(|c| c.kind == EditKind::Delete);
        let has_insert = pending.iter().any(|c| c.kind == EditKind::Insert);
        if has_delete && has_insert {
            let deleted = collect_kind(pending, EditKind::Delete);
            let inserted = collect_kind(pending, EditKind::Insert);
            out.extend(self.diff_slices(&deleted, &inserted));
            pending.clear();
        } else {
            out.append(pending);
        }
    }
}

fn collect_kind(chunks: &[Chunk<char>], kind: EditKind) -> Vec<char> {
    chunks
        .iter()
        .filter(|c| c.kind == kind)
        .flat_map(|c| c.items.iter().copied())
        .collect()
}

fn is_contained<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() > b.len() {
        find_subslice(a, b).is_some()
    } else {
        find_subslice(b, a).is_some()
    }
}

/// Maps each distinct line to a dense id, in order of first appearance.
#[derive(Default)]
struct LineInterner<'a> {
    lines: Vec<&'a [char]>,
    ids: HashMap<&'a [char], usize>,
}

impl<'a> LineInterner<'a> {
    fn intern(&mut self, text: &'a [char]) -> Vec<usize> {
        let Self { lines, ids } = self;
        split_lines_keep_ends(text)
            .into_iter()
            .map(|line| {
                *ids.entry(line).or_insert_with(|| {
                    lines.push(line);
                    lines.len() - 1
                })
            })
            .collect()
    }

    fn expand(&self, ids: &[usize]) -> Vec<char> {
        ids.iter()
            .flat_map(|&id| self.lines[id].iter().copied())
            .collect()
    }
}
