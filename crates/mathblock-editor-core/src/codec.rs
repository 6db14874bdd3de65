//! Serialized content format: plain text interleaved with `$$`-delimited math.
//!
//! A serialized value is split into segments. A `$$` with a matching later
//! `$$` brackets a math segment; anything else, including an unmatched `$$`
//! and all text after it, is literal text. The codec never fails on any input.

use std::ops::Range;

use crate::types::{BlockIdGen, BlockKind, BlockMode, ContentBlock};

/// Marker that opens and closes a math segment.
pub const MATH_DELIMITER: &str = "$$";

const DELIM_LEN: usize = MATH_DELIMITER.len();

/// One segment of a serialized value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: BlockKind,
    /// Segment payload. Delimiters are stripped from math segments.
    pub content: &'a str,
    /// Byte range in the input, including delimiters for math segments.
    pub span: Range<usize>,
}

impl Segment<'_> {
    /// Whether `parse` drops this segment.
    pub fn is_blank(&self) -> bool {
        match self.kind {
            BlockKind::Text => self.content.is_empty(),
            BlockKind::Math => self.content.trim().is_empty(),
        }
    }

    /// Byte range of `content` in the input.
    pub fn content_span(&self) -> Range<usize> {
        match self.kind {
            BlockKind::Text => self.span.clone(),
            BlockKind::Math => self.span.start + DELIM_LEN..self.span.end - DELIM_LEN,
        }
    }
}

/// Iterator over the segments of a serialized value.
///
/// Spans are exact and contiguous; blank segments are yielded too.
pub struct Segments<'a> {
    input: &'a str,
    pos: usize,
}

/// Split `input` into segments.
pub fn segments(input: &str) -> Segments<'_> {
    Segments { input, pos: 0 }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        if start >= self.input.len() {
            return None;
        }
        let rest = &self.input[start..];

        if let Some(after_open) = rest.strip_prefix(MATH_DELIMITER) {
            if let Some(close) = after_open.find(MATH_DELIMITER) {
                let end = start + DELIM_LEN + close + DELIM_LEN;
                self.pos = end;
                return Some(Segment {
                    kind: BlockKind::Math,
                    content: &after_open[..close],
                    span: start..end,
                });
            }
            // Unmatched opener: the remainder is literal text.
            return Some(self.text_to_end(start));
        }

        match rest.find(MATH_DELIMITER) {
            Some(open) if has_closing(&rest[open + DELIM_LEN..]) => {
                let end = start + open;
                self.pos = end;
                Some(Segment {
                    kind: BlockKind::Text,
                    content: &rest[..open],
                    span: start..end,
                })
            }
            _ => Some(self.text_to_end(start)),
        }
    }
}

impl<'a> Segments<'a> {
    fn text_to_end(&mut self, start: usize) -> Segment<'a> {
        let end = self.input.len();
        self.pos = end;
        Segment {
            kind: BlockKind::Text,
            content: &self.input[start..end],
            span: start..end,
        }
    }
}

fn has_closing(after_open: &str) -> bool {
    after_open.contains(MATH_DELIMITER)
}

/// Parse a serialized value into blocks, allocating ids from `ids`.
///
/// Blank segments are dropped. Parsed blocks start in `Viewing` mode. When
/// nothing survives, the result is a single empty text block in `Editing`
/// mode, so a document built from it is never empty.
pub fn parse_with_ids(input: &str, ids: &mut BlockIdGen) -> Vec<ContentBlock> {
    let mut blocks: Vec<ContentBlock> = segments(input)
        .filter(|seg| !seg.is_blank())
        .map(|seg| ContentBlock::new(ids.next_id(), seg.kind, seg.content, BlockMode::Viewing))
        .collect();

    if blocks.is_empty() {
        blocks.push(ContentBlock::empty(ids.next_id(), BlockKind::Text));
    }
    blocks
}

/// Parse a serialized value with a fresh id allocator.
pub fn parse(input: &str) -> Vec<ContentBlock> {
    parse_with_ids(input, &mut BlockIdGen::new())
}

/// Serialize blocks in order: text as-is, math wrapped in `$$`.
pub fn serialize<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = &'a ContentBlock>,
{
    let mut out = String::new();
    for block in blocks {
        match block.kind {
            BlockKind::Text => out.push_str(&block.source),
            BlockKind::Math => {
                out.push_str(MATH_DELIMITER);
                out.push_str(&block.source);
                out.push_str(MATH_DELIMITER);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};

    use super::*;
    use crate::types::BlockId;

    fn describe(blocks: &[ContentBlock]) -> String {
        blocks
            .iter()
            .map(|b| {
                let kind = match b.kind {
                    BlockKind::Text => "text",
                    BlockKind::Math => "math",
                };
                let mode = match b.mode {
                    BlockMode::Viewing => "viewing",
                    BlockMode::Editing => "editing",
                };
                format!("{kind} {:?} {mode}", b.source)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn block(kind: BlockKind, source: &str) -> ContentBlock {
        ContentBlock::new(BlockId(0), kind, source, BlockMode::Viewing)
    }

    fn kinds_and_sources(blocks: &[ContentBlock]) -> Vec<(BlockKind, String)> {
        blocks.iter().map(|b| (b.kind, b.source.clone())).collect()
    }

    #[test]
    fn test_parse_mixed_content() {
        let blocks = parse("Solve $$x^2$$ now");
        insta::assert_snapshot!(describe(&blocks), @r#"
        text "Solve " viewing
        math "x^2" viewing
        text " now" viewing
        "#);
        assert_eq!(serialize(&blocks), "Solve $$x^2$$ now");
    }

    #[test]
    fn test_parse_empty_input() {
        let blocks = parse("");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert_eq!(blocks[0].source, "");
        assert!(blocks[0].is_editing());
    }

    #[test]
    fn test_parse_empty_math_segment() {
        let blocks = parse("$$$$");
        assert_eq!(kinds_and_sources(&blocks), vec![(BlockKind::Text, String::new())]);
        assert!(blocks[0].is_editing());
    }

    #[test]
    fn test_whitespace_only_math_is_dropped() {
        let blocks = parse("a$$   $$b");
        insta::assert_snapshot!(describe(&blocks), @r#"
        text "a" viewing
        text "b" viewing
        "#);
    }

    #[test]
    fn test_math_source_is_not_trimmed() {
        let blocks = parse("$$ x + 1 $$");
        assert_eq!(kinds_and_sources(&blocks), vec![(BlockKind::Math, " x + 1 ".into())]);
        assert_eq!(serialize(&blocks), "$$ x + 1 $$");
    }

    #[test]
    fn test_unmatched_delimiter_is_literal() {
        let blocks = parse("cost is $$5 total");
        assert_eq!(
            kinds_and_sources(&blocks),
            vec![(BlockKind::Text, "cost is $$5 total".into())]
        );

        let blocks = parse("$$a$$ then $$ dangling");
        insta::assert_snapshot!(describe(&blocks), @r#"
        math "a" viewing
        text " then $$ dangling" viewing
        "#);
    }

    #[test]
    fn test_odd_delimiters_never_panic() {
        for input in ["$", "$$", "$$$", "$$$$$", "a$$$b", "é$$ü$$ö", "$$\n$$"] {
            let blocks = parse(input);
            assert!(!blocks.is_empty(), "no blocks for {input:?}");
        }
    }

    #[test]
    fn test_multiline_math() {
        let blocks = parse("$$\\begin{matrix}\na\n\\end{matrix}$$");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Math);
        assert!(blocks[0].source.contains('\n'));
    }

    #[test]
    fn test_adjacent_math_segments() {
        let blocks = parse("$$a$$$$b$$");
        assert_eq!(
            kinds_and_sources(&blocks),
            vec![(BlockKind::Math, "a".into()), (BlockKind::Math, "b".into())]
        );
    }

    #[test]
    fn test_segment_spans_cover_input() {
        let input = "pre $$\\frac{1}{2}$$ mid $$y$$ post $$ open";
        let segs: Vec<_> = segments(input).collect();
        let mut cursor = 0;
        for seg in &segs {
            assert_eq!(seg.span.start, cursor);
            cursor = seg.span.end;
            assert_eq!(&input[seg.content_span()], seg.content);
        }
        assert_eq!(cursor, input.len());
        assert_eq!(segs.last().map(|s| s.content), Some(" post $$ open"));
    }

    #[test]
    fn test_round_trip() {
        let original = vec![
            block(BlockKind::Text, "Find "),
            block(BlockKind::Math, "\\int_0^1 x\\,dx"),
            block(BlockKind::Text, ", then\n  simplify "),
            block(BlockKind::Math, "a^2+b^2"),
        ];
        let reparsed = parse(&serialize(&original));
        assert_eq!(kinds_and_sources(&reparsed), kinds_and_sources(&original));
    }

    #[test]
    fn test_serialize_is_idempotent_with_empty_blocks() {
        let with_empties = vec![
            block(BlockKind::Text, ""),
            block(BlockKind::Math, "x"),
            block(BlockKind::Math, ""),
            block(BlockKind::Text, "tail"),
        ];
        let once = serialize(&with_empties);
        let twice = serialize(&parse(&once));
        assert_eq!(once, "$$x$$$$$$tail");
        assert_eq!(twice, "$$x$$tail");
        assert_eq!(serialize(&parse(&twice)), twice);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = BlockIdGen::new();
        let first = parse_with_ids("a $$b$$ c", &mut ids);
        let second = parse_with_ids("d", &mut ids);
        let mut all: Vec<_> = first.iter().chain(second.iter()).map(|b| b.id).collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 4);
    }

    /// Source text over a small alphabet, so `$$` pairs show up often.
    #[derive(Clone, Debug)]
    struct Source(String);

    const ALPHABET: &[char] = &['$', '$', '$', 'a', 'x', '^', ' ', '\n', '\u{e9}'];
    const PLAIN: &[char] = &['a', 'x', '^', '{', '}', ' ', '\n', '\u{e9}'];

    fn string_from(g: &mut Gen, alphabet: &[char], min_len: usize) -> String {
        let len = min_len + usize::arbitrary(g) % g.size().max(1);
        (0..len).map(|_| *g.choose(alphabet).unwrap()).collect()
    }

    impl Arbitrary for Source {
        fn arbitrary(g: &mut Gen) -> Self {
            Source(string_from(g, ALPHABET, 0))
        }
    }

    #[derive(Clone, Debug)]
    struct AnyBlock(BlockKind, Source);

    impl Arbitrary for AnyBlock {
        fn arbitrary(g: &mut Gen) -> Self {
            let kind = if bool::arbitrary(g) {
                BlockKind::Math
            } else {
                BlockKind::Text
            };
            AnyBlock(kind, Source::arbitrary(g))
        }
    }

    /// Non-empty blocks of alternating kind with no `$` anywhere.
    #[derive(Clone, Debug)]
    struct Alternating(Vec<(BlockKind, String)>);

    impl Arbitrary for Alternating {
        fn arbitrary(g: &mut Gen) -> Self {
            let count = usize::arbitrary(g) % 8;
            let mut math = bool::arbitrary(g);
            let blocks = (0..count)
                .map(|_| {
                    math = !math;
                    let mut source = string_from(g, PLAIN, 1);
                    if math && source.trim().is_empty() {
                        source.push('x');
                    }
                    let kind = if math { BlockKind::Math } else { BlockKind::Text };
                    (kind, source)
                })
                .collect();
            Alternating(blocks)
        }
    }

    quickcheck::quickcheck! {
        fn prop_parse_accepts_any_input(input: String) -> bool {
            !parse(&input).is_empty()
        }

        fn prop_spans_tile_any_input(input: Source) -> bool {
            let mut cursor = 0;
            for seg in segments(&input.0) {
                if seg.span.start != cursor || input.0[seg.content_span()] != *seg.content {
                    return false;
                }
                cursor = seg.span.end;
            }
            cursor == input.0.len()
        }

        fn prop_serialize_reaches_fixed_point(blocks: Vec<AnyBlock>) -> bool {
            let blocks: Vec<ContentBlock> = blocks
                .iter()
                .map(|AnyBlock(kind, source)| block(*kind, &source.0))
                .collect();
            let once = serialize(&parse(&serialize(&blocks)));
            serialize(&parse(&once)) == once
        }

        fn prop_alternating_blocks_round_trip(blocks: Alternating) -> bool {
            let original: Vec<ContentBlock> = blocks
                .0
                .iter()
                .map(|(kind, source)| block(*kind, source))
                .collect();
            let reparsed = parse(&serialize(&original));
            if original.is_empty() {
                return describe(&reparsed) == "text \"\" editing";
            }
            kinds_and_sources(&reparsed) == kinds_and_sources(&original)
        }
    }
}
