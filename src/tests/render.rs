use super::*;
use crate::adapters::OutputFormat;
use ntest::test_case;
use pretty_assertions::assert_eq;

#[track_caller]
fn rendered(html: &str) -> RenderOutcome {
    render_fences(html, &Options::default(), &MockTypesetter::default()).unwrap()
}

#[test]
fn inline_fence_is_spliced_in() {
    let outcome = rendered(&markers("<p>Area <i>\\pi r^2</i>.</p>"));
    assert_eq!(
        outcome.html,
        format!("<p>Area {}.</p>", mock_html("\\pi r^2", false))
    );
    assert!(outcome.is_clean());
}

#[test]
fn block_fence_keeps_its_pre() {
    let outcome = rendered(&markers("<b>E=mc^2</b>"));
    assert_eq!(
        outcome.html,
        format!("<pre lang=\"math\">{}</pre>", mock_html("E=mc^2", true))
    );
}

#[test]
fn entities_are_decoded_before_typesetting() {
    let typesetter = MockTypesetter::default();
    let html = markers("<i>a &lt; b &amp;&amp; c&#x27;</i>");
    render_fences(&html, &Options::default(), &typesetter).unwrap();

    let calls = typesetter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "a < b && c'");
}

#[test]
fn typeset_options_follow_the_fence() {
    let typesetter = MockTypesetter::default();
    let mut options = Options::default();
    options.render.strict = true;

    render_fences(&markers("<i>x</i><b>y</b>"), &options, &typesetter).unwrap();

    assert_eq!(
        typesetter.calls(),
        vec![
            (
                "x".to_string(),
                TypesetOptions {
                    throw_on_error: true,
                    fleqn: false,
                    display_mode: false,
                    output: OutputFormat::Html,
                }
            ),
            (
                "y".to_string(),
                TypesetOptions {
                    throw_on_error: true,
                    fleqn: false,
                    display_mode: true,
                    output: OutputFormat::Html,
                }
            ),
        ]
    );
}

#[test]
fn lenient_by_default() {
    let typesetter = MockTypesetter::default();
    render_fences(&markers("<i>x</i>"), &Options::default(), &typesetter).unwrap();
    assert!(!typesetter.calls()[0].1.throw_on_error);
}

#[test]
fn failures_are_isolated() {
    let outcome = rendered(&markers("<i>a</i> <i>\\fail</i> <b>c</b>"));

    assert_eq!(
        outcome.html,
        format!(
            "{}  <pre lang=\"math\">{}</pre>",
            mock_html("a", false),
            mock_html("c", true)
        )
    );
    assert_eq!(
        outcome.diagnostics,
        vec![Diagnostic {
            summary: "ParseError in renderToString".to_string(),
            detail: "ParseError: KaTeX parse error: Undefined control sequence: \\fail"
                .to_string(),
        }]
    );
    assert!(!outcome.is_clean());
}

#[test]
fn diagnostics_in_document_order() {
    let outcome = rendered(&markers("<i>\\fail 1</i> ok <b>\\fail 2</b>"));
    assert_eq!(outcome.html, " ok ");
    assert_eq!(outcome.diagnostics.len(), 2);
}

#[test]
fn empty_fence_renders_to_nothing() {
    let typesetter = MockTypesetter::default();
    let outcome =
        render_fences(&markers("a<i> </i>b<b></b>c"), &Options::default(), &typesetter).unwrap();

    assert_eq!(outcome.html, "abc");
    assert!(outcome.is_clean());
    assert!(typesetter.calls().is_empty());
}

#[test]
fn no_fences_no_session() {
    let typesetter = MockTypesetter::default();
    let outcome = render_fences("<p>plain</p>", &Options::default(), &typesetter).unwrap();

    assert_eq!(outcome.html, "<p>plain</p>");
    assert_eq!(typesetter.begun.get(), 0);

    // An engine that can't start is never asked to.
    let outcome =
        render_fences("<p>plain</p>", &Options::default(), &MockTypesetter::unavailable())
            .unwrap();
    assert_eq!(outcome.html, "<p>plain</p>");
}

#[test]
fn one_session_per_document() {
    let typesetter = MockTypesetter::default();
    let html = markers("<i>a</i><i>\\fail</i><b>b</b><i>c</i>");

    render_fences(&html, &Options::default(), &typesetter).unwrap();
    assert_eq!(typesetter.begun.get(), 1);
    assert_eq!(typesetter.live.get(), 0);

    render_fences(&html, &Options::default(), &typesetter).unwrap();
    assert_eq!(typesetter.begun.get(), 2);
    assert_eq!(typesetter.live.get(), 0);
}

#[test]
fn unavailable_engine() {
    let result = render_fences(
        &markers("<i>x</i>"),
        &Options::default(),
        &MockTypesetter::unavailable(),
    );
    assert!(matches!(result, Err(Error::EngineUnavailable(_))));
}

#[test]
fn empty_document_is_rejected() {
    let typesetter = MockTypesetter::unavailable();
    assert!(matches!(
        render_fences("", &Options::default(), &typesetter),
        Err(Error::InvalidInput)
    ));
}

#[test]
fn converter_reformatted_markers() {
    let outcome = rendered(concat!(
        "<pre lang=\"math\" inline>\n  <code class=\"language-math\">x</code>\n</pre>\n",
        "<pre lang=\"math\"><code>\ny\n</code></pre>",
    ));
    assert_eq!(
        outcome.html,
        format!(
            "{}\n<pre lang=\"math\">{}</pre>",
            mock_html("x", false),
            mock_html("y", true)
        )
    );
}

#[test_case("<pre lang=\"math\"><code>x</pre>")]
#[test_case("<pre lang=\"math\" class=\"y\"><code>x</code></pre>")]
#[test_case("<pre lang=\"math\"><span>x</span></pre>")]
#[test_case("<pre lang=\"math\"><codex>x</code></pre>")]
#[test_case("<pre lang=\"math\"><code>x</code><p></pre>")]
fn malformed_markers_are_left_alone(html: &str) {
    let typesetter = MockTypesetter::default();
    let outcome = render_fences(html, &Options::default(), &typesetter).unwrap();
    assert_eq!(outcome.html, html);
    assert_eq!(typesetter.begun.get(), 0);
}

#[test]
fn marker_search_resumes_after_a_bad_one() {
    let html = format!("<pre lang=\"math\"><p>{}", markers("<i>z</i>"));
    let outcome = rendered(&html);
    assert_eq!(
        outcome.html,
        format!("<pre lang=\"math\"><p>{}", mock_html("z", false))
    );
}

#[test]
fn diagnostic_without_frames() {
    let diagnostic = Diagnostic::from(&EngineError::default());
    assert_eq!(diagnostic.summary, "Error in <anonymous>");
    assert_eq!(diagnostic.detail, "");
    assert_eq!(diagnostic.to_string(), "Error in <anonymous>");
}

#[test_case(
    "TypeError: x is undefined",
    "at Object.render (k.js:3:4)",
    "TypeError in Object.render"
)]
#[test_case("something broke", "", "Error in <anonymous>")]
#[test_case("Bad thing: here", "at f (x.js:1)", "Error in f")]
#[test_case("katex.ParseError: oops", "render", "katex.ParseError in render")]
#[test_case(": no class", "at  (x.js:1)", "Error in <anonymous>")]
fn diagnostic_summary(message: &str, context: &str, summary: &str) {
    let diagnostic = Diagnostic::from(&EngineError::new(message, context));
    assert_eq!(diagnostic.summary, summary);
}

#[test]
fn diagnostic_uses_outermost_frame_for_function() {
    let err = EngineError::new("RangeError: too deep", "at expand (katex.js:1:1)")
        .with_frame("", "at parse (katex.js:1:2)")
        .with_frame("", "at build (katex.js:1:3)");
    let diagnostic = Diagnostic::from(&err);
    assert_eq!(diagnostic.summary, "RangeError in build");
    assert_eq!(diagnostic.detail, "RangeError: too deep");
}

#[test]
fn diagnostic_detail_drops_stack_lines() {
    let err = EngineError::new(
        "ParseError: bad\nsecond line\n    at a (x.js:1)\n  at b (x.js:2)",
        "at a (x.js:1)",
    );
    let diagnostic = Diagnostic::from(&err);
    assert_eq!(diagnostic.detail, "ParseError: bad\nsecond line");
    assert_eq!(
        diagnostic.to_string(),
        "ParseError in a: ParseError: bad\nsecond line"
    );
}
