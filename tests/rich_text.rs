// tests/rich_text.rs
use kama_sona_scrape::rich_text::{TextSegment, plain_text, to_segments};

fn plain(s: &str) -> TextSegment {
    TextSegment::Plain(s.into())
}

fn em(s: &str) -> TextSegment {
    TextSegment::Emphasized(s.into())
}

#[test]
fn splits_a_single_emphasized_word() {
    assert_eq!(
        to_segments("kili <em>moku</em> pona"),
        vec![plain("kili "), em("moku"), plain(" pona")]
    );
}

#[test]
fn no_markers_is_one_plain_segment() {
    assert_eq!(to_segments("telo"), vec![plain("telo")]);
    assert_eq!(to_segments(""), vec![plain("")]);
}

#[test]
fn handles_several_pairs_and_edges() {
    assert_eq!(
        to_segments("<em>jan</em> li <em>moku</em>"),
        vec![em("jan"), plain(" li "), em("moku")]
    );
    assert_eq!(to_segments("<em>ale</em>"), vec![em("ale")]);
}

#[test]
fn empty_pair_leaves_no_segment() {
    assert_eq!(to_segments("a<em></em>b"), vec![plain("ab")]);
}

#[test]
fn nested_pairs_flatten() {
    assert_eq!(
        to_segments("a <em>b <em>c</em> d</em> e"),
        vec![plain("a "), em("b c d"), plain(" e")]
    );
}

#[test]
fn unmatched_tags_stay_literal() {
    assert_eq!(to_segments("open <em>only"), vec![plain("open <em>only")]);
    assert_eq!(to_segments("close</em> only"), vec![plain("close</em> only")]);
    assert_eq!(
        to_segments("<em>a<em>b</em>"),
        vec![plain("<em>a"), em("b")]
    );
}

#[test]
fn other_markup_is_text() {
    assert_eq!(
        to_segments("<b>x</b> <em>y</em>"),
        vec![plain("<b>x</b> "), em("y")]
    );
}

#[test]
fn segments_alternate_and_concatenate_to_the_stripped_input() {
    let inputs = [
        "kili <em>moku</em> pona",
        "<em>a</em><em>b</em>c",
        "x <EM>y</EM> z <em>w",
        "",
        "<em></em>",
    ];
    for input in inputs {
        let segs = to_segments(input);
        for pair in segs.windows(2) {
            assert_ne!(pair[0].is_emphasized(), pair[1].is_emphasized(), "{input:?}");
            assert!(!pair[0].content().is_empty());
        }
        let joined: String = segs.iter().map(TextSegment::content).collect();
        assert_eq!(joined, plain_text(input));
    }
    assert_eq!(plain_text("x <EM>y</EM> z <em>w"), "x y z <em>w");
    assert_eq!(to_segments("<em></em>"), vec![plain("")]);
}
