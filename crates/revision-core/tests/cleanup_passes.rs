//! Cleanup pass behaviour on hand-built edit scripts.

use revision_core::{
    EditOp, cleanup_merge, cleanup_semantic, cleanup_semantic_lossless, source_text, target_text,
};

fn d(text: &str) -> EditOp {
    EditOp::delete(text)
}

fn i(text: &str) -> EditOp {
    EditOp::insert(text)
}

fn e(text: &str) -> EditOp {
    EditOp::equal(text)
}

/// Run `pass` and check that it preserved both reconstruction invariants.
fn run(pass: fn(&mut Vec<EditOp>), input: Vec<EditOp>) -> Vec<EditOp> {
    let previous = source_text(&input);
    let next = target_text(&input);
    let mut ops = input;
    pass(&mut ops);
    assert_eq!(source_text(&ops), previous);
    assert_eq!(target_text(&ops), next);
    ops
}

#[test]
fn test_merge_empty_and_untouched() {
    assert!(run(cleanup_merge, vec![]).is_empty());
    assert_eq!(
        run(cleanup_merge, vec![e("a"), d("b"), i("c")]),
        vec![e("a"), d("b"), i("c")]
    );
}

#[test]
fn test_merge_coalesces_like_operations() {
    assert_eq!(run(cleanup_merge, vec![e("a"), e("b"), e("c")]), vec![e("abc")]);
    assert_eq!(run(cleanup_merge, vec![d("a"), d("b"), d("c")]), vec![d("abc")]);
    assert_eq!(
        run(cleanup_merge, vec![d("a"), i("b"), d("c"), i("d"), e("e"), e("f")]),
        vec![d("ac"), i("bd"), e("ef")]
    );
}

#[test]
fn test_merge_factors_common_affixes() {
    assert_eq!(
        run(cleanup_merge, vec![d("a"), i("abc"), d("dc")]),
        vec![e("a"), d("d"), i("b"), e("c")]
    );
    assert_eq!(
        run(cleanup_merge, vec![e("x"), d("a"), i("abc"), d("dc"), e("y")]),
        vec![e("xa"), d("d"), i("b"), e("cy")]
    );
}

#[test]
fn test_merge_slides_single_edits() {
    assert_eq!(run(cleanup_merge, vec![e("a"), i("ba"), e("c")]), vec![i("ab"), e("ac")]);
    assert_eq!(run(cleanup_merge, vec![e("c"), i("ab"), e("a")]), vec![e("ca"), i("ba")]);
    assert_eq!(
        run(cleanup_merge, vec![e("a"), d("b"), e("c"), d("ac"), e("x")]),
        vec![d("abc"), e("acx")]
    );
    assert_eq!(
        run(cleanup_merge, vec![e("x"), d("ca"), e("c"), d("b"), e("a")]),
        vec![e("xca"), d("cba")]
    );
}

#[test]
fn test_semantic_keeps_informative_equalities() {
    let input = vec![d("ab"), i("cd"), e("12"), d("e")];
    assert_eq!(run(cleanup_semantic, input.clone()), input);

    let input = vec![d("abc"), i("ABC"), e("1234"), d("wxyz")];
    assert_eq!(run(cleanup_semantic, input.clone()), input);
}

#[test]
fn test_semantic_eliminates_trivial_equalities() {
    assert_eq!(
        run(cleanup_semantic, vec![d("a"), e("b"), d("c")]),
        vec![d("abc"), i("b")]
    );
    assert_eq!(
        run(cleanup_semantic, vec![d("ab"), e("cd"), d("e"), e("f"), i("g")]),
        vec![d("abcdef"), i("cdfg")]
    );
    assert_eq!(
        run(
            cleanup_semantic,
            vec![i("1"), e("A"), d("B"), i("2"), e("_"), i("1"), e("A"), d("B"), i("2")]
        ),
        vec![d("AB_AB"), i("1A2_1A2")]
    );
}

#[test]
fn test_semantic_aligns_to_words() {
    assert_eq!(
        run(cleanup_semantic, vec![e("The c"), d("ow and the c"), e("at.")]),
        vec![e("The "), d("cow and the "), e("cat.")]
    );
}

#[test]
fn test_semantic_extracts_overlaps() {
    // Too short to be worth splitting.
    let input = vec![d("abcxx"), i("xxdef")];
    assert_eq!(run(cleanup_semantic, input.clone()), input);

    assert_eq!(
        run(cleanup_semantic, vec![d("abcxxx"), i("xxxdef")]),
        vec![d("abc"), e("xxx"), i("def")]
    );
    assert_eq!(
        run(cleanup_semantic, vec![d("xxxabc"), i("defxxx")]),
        vec![i("def"), e("xxx"), d("abc")]
    );
    assert_eq!(
        run(
            cleanup_semantic,
            vec![d("abcd1212"), i("1212efghi"), e("----"), d("A3"), i("3BC")]
        ),
        vec![
            d("abcd"),
            e("1212"),
            i("efghi"),
            e("----"),
            d("A"),
            e("3"),
            i("BC")
        ]
    );
}

#[test]
fn test_lossless_prefers_blank_lines_and_line_breaks() {
    assert_eq!(
        run(
            cleanup_semantic_lossless,
            vec![e("AAA\r\n\r\nBBB"), i("\r\nDDD\r\n\r\nBBB"), e("\r\nEEE")]
        ),
        vec![e("AAA\r\n\r\n"), i("BBB\r\nDDD\r\n\r\n"), e("BBB\r\nEEE")]
    );
    assert_eq!(
        run(
            cleanup_semantic_lossless,
            vec![e("AAA\r\nBBB"), i(" DDD\r\nBBB"), e(" EEE")]
        ),
        vec![e("AAA\r\n"), i("BBB DDD\r\n"), e("BBB EEE")]
    );
}

#[test]
fn test_lossless_prefers_word_and_sentence_boundaries() {
    assert_eq!(
        run(cleanup_semantic_lossless, vec![e("The c"), i("ow and the c"), e("at.")]),
        vec![e("The "), i("cow and the "), e("cat.")]
    );
    assert_eq!(
        run(cleanup_semantic_lossless, vec![e("The-c"), i("ow-and-the-c"), e("at.")]),
        vec![e("The-"), i("cow-and-the-"), e("cat.")]
    );
    assert_eq!(
        run(
            cleanup_semantic_lossless,
            vec![e("The xxx. The "), i("zzz. The "), e("yyy.")]
        ),
        vec![e("The xxx."), i(" The zzz."), e(" The yyy.")]
    );
}

#[test]
fn test_lossless_can_swallow_an_equality() {
    assert_eq!(
        run(cleanup_semantic_lossless, vec![e("a"), d("a"), e("ax")]),
        vec![d("a"), e("aax")]
    );
    assert_eq!(
        run(cleanup_semantic_lossless, vec![e("xa"), d("a"), e("a")]),
        vec![e("xaa"), d("a")]
    );
}
