//! Slice helpers shared by the diff and cleanup passes.
//!
//! Everything here works on token slices (`&[char]` for text, `&[usize]` for line ids) so the
//! same primitives serve both the character diff and the line-mode pre-pass.

pub(crate) fn to_chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

/// Number of leading tokens shared by `a` and `b`.
pub(crate) fn common_prefix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Number of trailing tokens shared by `a` and `b`.
pub(crate) fn common_suffix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Length of the longest suffix of `a` that is also a prefix of `b`.
pub(crate) fn common_overlap<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Only the last `min` tokens of `a` and the first `min` tokens of `b` can overlap.
    let len = a.len().min(b.len());
    let a = &a[a.len() - len..];
    let b = &b[..len];
    if a == b {
        return len;
    }

    let mut best = 0;
    let mut length = 1;
    loop {
        let pattern = &a[len - length..];
        let Some(found) = find_subslice(b, pattern) else {
            return best;
        };
        length += found;
        if found == 0 || a[len - length..] == b[..length] {
            best = length;
            length += 1;
        }
        if length > len {
            return best;
        }
    }
}

/// Index of the first occurrence of `needle` in `haystack`.
pub(crate) fn find_subslice<T: PartialEq>(haystack: &[T], needle: &[T]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Split text into lines, keeping each line's terminating `'\n'`.
///
/// Unlike editor line semantics, a trailing newline does not produce an empty final line:
/// the pieces concatenate back to exactly the input.
pub(crate) fn split_lines_keep_ends(text: &[char]) -> Vec<&[char]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, ch) in text.iter().enumerate() {
        if *ch == '\n' {
            lines.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Vec<char> {
        to_chars(s)
    }

    #[test]
    fn test_common_prefix_and_suffix() {
        assert_eq!(common_prefix(&c("abc"), &c("xyz")), 0);
        assert_eq!(common_prefix(&c("1234abcdef"), &c("1234xyz")), 4);
        assert_eq!(common_prefix(&c("1234"), &c("1234xyz")), 4);

        assert_eq!(common_suffix(&c("abc"), &c("xyz")), 0);
        assert_eq!(common_suffix(&c("abcdef1234"), &c("xyz1234")), 4);
        assert_eq!(common_suffix(&c("1234"), &c("xyz1234")), 4);
    }

    #[test]
    fn test_common_overlap() {
        assert_eq!(common_overlap(&c(""), &c("abcd")), 0);
        assert_eq!(common_overlap(&c("abc"), &c("abcd")), 3);
        assert_eq!(common_overlap(&c("123456"), &c("abcd")), 0);
        assert_eq!(common_overlap(&c("123456xxx"), &c("xxxabcd")), 3);
        // Ligature-like distinct chars must not be folded together.
        assert_eq!(common_overlap(&c("fi"), &c("\u{fb01}i")), 0);
    }

    #[test]
    fn test_find_subslice() {
        assert_eq!(find_subslice(&c("hello world"), &c("o w")), Some(4));
        assert_eq!(find_subslice(&c("hello"), &c("xyz")), None);
        assert_eq!(find_subslice(&c("ab"), &c("abc")), None);
        assert_eq!(find_subslice(&c("ab"), &c("")), Some(0));
    }

    #[test]
    fn test_split_lines_keep_ends() {
        let text = c("a\nbb\n\nc");
        let lines: Vec<String> = split_lines_keep_ends(&text)
            .into_iter()
            .map(|l| l.iter().collect())
            .collect();
        assert_eq!(lines, vec!["a\n", "bb\n", "\n", "c"]);

        let text = c("x\n");
        assert_eq!(split_lines_keep_ends(&text).len(), 1);
        assert!(split_lines_keep_ends(&[]).is_empty());
    }
}
