use super::*;
use ntest::test_case;
use pretty_assertions::assert_eq;

#[test_case("$x$", "<i>x</i>")]
#[test_case("$a^2 + b^2$ ok", "<i>a^2 + b^2</i> ok")]
#[test_case("\\(a+b\\)", "<i>a+b</i>")]
#[test_case("$`a+b`$", "<i>a+b</i>")]
#[test_case("$x$$y$", "<i>x</i><i>y</i>")]
#[test_case("$  padded  $", "<i>padded</i>")]
#[test_case("$1+\\$2$", "<i>1+\\$2</i>")]
#[test_case("$a<b$", "<i>a&lt;b</i>")]
#[test_case("π ≈ $\\pi$", "π ≈ <i>\\pi</i>")]
fn inline_math(input: &str, expected: &str) {
    fenced(input, expected);
}

#[test_case("$$x$$", "<b>x</b>")]
#[test_case("See $$E=mc^2$$ and more text.", "See <b>E=mc^2</b> and more text.")]
#[test_case("$$\na\n$$", "<b>a</b>")]
#[test_case("\\[a+b\\]", "<b>a+b</b>")]
#[test_case("\\begin{equation}x=1\\end{equation}", "<b>x=1</b>")]
#[test_case("\\begin{align}a &= b\\end{align}", "<b>a &amp;= b</b>")]
#[test_case("\\begin{CD}A @>>> B\\end{CD}", "<b>A @&gt;&gt;&gt; B</b>")]
#[test_case("$$a$b$$", "<b>a$b</b>")]
#[test_case("$$$x$$", "<b>$x</b>")]
fn block_math(input: &str, expected: &str) {
    fenced(input, expected);
}

#[test_case("$$$$")]
#[test_case("$$ $$")]
#[test_case("$ $")]
#[test_case("$\t$ and \\( \\)")]
#[test_case("price $5")]
#[test_case("$$x")]
#[test_case("\\begin{align} x")]
#[test_case("$a\nb$")]
#[test_case("no math at all")]
fn left_alone(input: &str) {
    fenced(input, input);
}

#[test_case("```$5 + 5$```")]
#[test_case("```\n$$x$$\n```")]
#[test_case("<pre>$$a$$</pre>")]
#[test_case("<code>$x$</code>")]
#[test_case("<code class=\"language-tex\">\\(x\\)</code>")]
#[test_case("$$x$$```")]
fn code_is_immune(input: &str) {
    fenced(input, input);
}

#[test]
fn code_regions_split_prose() {
    fenced("<code>$x$</code> and $y$", "<code>$x$</code> and <i>y</i>");
    fenced("```\n$a$\n```\n$b$", "```\n$a$\n```\n<i>b</i>");
    // A pair may not straddle a code region.
    fenced("$a `````` b$", "$a `````` b$");
    fenced(
        "<code>$x$</code> $y$ <code>$z$</code>",
        "<code>$x$</code> <i>y</i> <code>$z$</code>",
    );
}

#[test_case("$$a ```x``` b$$ text $$c$$", "$$a ```x``` b$$ text <b>c</b>")]
#[test_case("$a <code>x</code> b$ and $c$", "$a <code>x</code> b$ and <i>c</i>")]
#[test_case("\\[a <pre>x</pre> b\\] \\[c\\]", "\\[a <pre>x</pre> b\\] <b>c</b>")]
fn closers_beyond_code_are_not_reused(input: &str, expected: &str) {
    fenced(input, expected);
}

#[test]
fn unterminated_code_fence_is_prose() {
    fenced("``` $x$", "``` <i>x</i>");
}

#[test]
fn block_wins_over_inline() {
    let spans = find_math_spans("$$x$$", DEFAULT_DELIMITERS).unwrap();
    assert_eq!(
        spans,
        vec![MathSpan {
            start_offset: 0,
            end_offset: 5,
            raw_content: "x",
            inline: false,
        }]
    );
}

#[test]
fn inline_cannot_cross_a_block_span() {
    fenced("$a $$b$$ c$", "$a <b>b</b> c$");
}

#[test]
fn currency_pairs_are_a_known_false_positive() {
    fenced("Cost: $5 and $10", "Cost: <i>5 and</i>10");
}

#[test]
fn spans_in_source_order() {
    let spans = find_math_spans("a $x$ b $$y$$ c \\(z\\)", DEFAULT_DELIMITERS).unwrap();
    let found: Vec<_> = spans
        .iter()
        .map(|s| (s.start_offset, s.end_offset, s.raw_content, s.inline))
        .collect();
    assert_eq!(
        found,
        vec![
            (2, 5, "x", true),
            (8, 13, "y", false),
            (16, 21, "z", true),
        ]
    );
}

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(
        fence("", &Options::default()),
        Err(Error::InvalidInput)
    ));
    assert!(matches!(
        find_math_spans("", DEFAULT_DELIMITERS),
        Err(Error::InvalidInput)
    ));
}

#[test_case("$x$ and $$y$$")]
#[test_case("Cost: $5 and $10, or $$ $$ free")]
#[test_case("```\n$a$\n``` $b$ \\[c\\] $`d`$")]
#[test_case("$a $$b$$ c$ $")]
#[test_case("<code>$x$</code> $<y$")]
fn fencing_is_idempotent(input: &str) {
    let options = Options::default();
    let once = fence(input, &options).unwrap();
    let twice = fence(&once, &options).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn markers_are_opaque_to_later_passes() {
    let input = markers("<b>x $y$ z</b> and <i>$</i>");
    fenced(&input, &input);
}

#[test]
fn custom_catalog() {
    static DOUBLE_AT: &[DelimiterSpec] = &[
        DelimiterSpec::block("@@", "@@"),
        DelimiterSpec::inline("@", "@"),
    ];

    let mut options = Options::default();
    options.fence.delimiters = DOUBLE_AT;
    assert_eq!(
        fence("$x$ @y@ @@z@@", &options).unwrap(),
        markers("$x$ <i>y</i> <b>z</b>")
    );
}

#[test]
fn catalog_order_is_block_first() {
    // Inline entry listed first still loses to the block entry.
    static INLINE_FIRST: &[DelimiterSpec] = &[
        DelimiterSpec::inline("$", "$"),
        DelimiterSpec::block("$$", "$$"),
    ];

    let mut options = Options::default();
    options.fence.delimiters = INLINE_FIRST;
    assert_eq!(fence("$$x$$", &options).unwrap(), markers("<b>x</b>"));
}

#[test]
fn unescaped_content() {
    let mut options = Options::default();
    options.fence.escape_content = false;
    assert_eq!(
        fence("$a &lt; b$", &options).unwrap(),
        markers("<i>a &lt; b</i>")
    );
}

#[test]
fn scanner_records_overlapping_candidates() {
    let scan = scanner::scan("$$$ `x` ```y```", DEFAULT_DELIMITERS);
    assert_eq!(scan.positions("$$"), &[0, 1]);
    assert_eq!(scan.positions("$"), &[0, 1, 2]);
    assert_eq!(scan.code, vec![8..15]);
    assert!(scan.positions("\\[").is_empty());
}

#[test]
fn scanner_skips_escapes() {
    let scan = scanner::scan("\\$ \\\\( \\(", DEFAULT_DELIMITERS);
    assert!(scan.positions("$").is_empty());
    assert_eq!(scan.positions("\\("), &[7]);
}
