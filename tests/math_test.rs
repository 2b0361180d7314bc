use codebook::annotate::math::{
    equation_segment, has_equation, math_segments, normalize_math, render_delimited, text_to_latex,
};
use codebook::types::{segments_literal, Segment};

fn math_sources(segments: &[Segment]) -> Vec<(&str, &str)> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Math { source, latex, .. } => Some((source.as_str(), latex.as_str())),
            _ => None,
        })
        .collect()
}

#[test]
fn only_the_formula_and_temperature_are_rewritten() {
    let text = "The R-value is R = 1/U where the wall is 5°C";
    let segments = math_segments(text);
    assert_eq!(
        math_sources(&segments),
        vec![("R = 1/U", r"R = \frac{1}{U}"), ("5°C", r"5°\text{C}")]
    );
    assert_eq!(segments_literal(&segments), text);
    assert_eq!(
        normalize_math(text),
        r"The R-value is R = \frac{1}{U} where the wall is 5°\text{C}"
    );
}

#[test]
fn plain_prose_is_untouched() {
    let text = "The wall shall be 200 mm thick.";
    assert!(!has_equation(text));
    assert_eq!(normalize_math(text), text);
    assert_eq!(math_segments(text), vec![Segment::text(text)]);
}

#[test]
fn detection_rules() {
    assert!(has_equation("a slope of $1:12$"));
    assert!(has_equation("not less than 0.5 m²"));
    assert!(has_equation("at -18 °F outdoors"));
    assert!(has_equation("a load of 2 × 10^3 N"));
    assert!(has_equation("R = 1/U"));
    assert!(has_equation("k = 2/h"));
    assert!(!has_equation("Section 9.10 applies to 2 storeys"));
}

#[test]
fn latex_substitutions() {
    assert_eq!(text_to_latex("x >= 5"), r"x \geq 5");
    assert_eq!(text_to_latex("y ≤ 3"), r"y \leq 3");
    assert_eq!(text_to_latex("10 m²"), r"10\text{ m}^2");
    assert_eq!(text_to_latex("3 × 10^6"), r"3 \times 10^{6}");
    assert_eq!(text_to_latex("sqrt(2)"), r"\sqrt{2}");
    assert_eq!(text_to_latex("1/2"), r"\frac{1}{2}");
    assert_eq!(text_to_latex("±5"), r"\pm5");
    assert_eq!(text_to_latex("RSI = 1/U"), r"RSI = \frac{1}{U}");
    assert_eq!(text_to_latex("T_out"), "T_{out}");
    assert_eq!(text_to_latex("Σ x"), r"\sum x");
}

#[test]
fn inline_spans_render_to_markup() {
    let segments = math_segments("a ratio of $x^2$ applies");
    match &segments[1] {
        Segment::Math {
            source,
            latex,
            display,
            html,
        } => {
            assert_eq!(source, "$x^2$");
            assert_eq!(latex, "x^2");
            assert!(!display);
            assert!(!html.is_empty());
        }
        other => panic!("expected math, got {other:?}"),
    }
}

#[test]
fn delimited_rendering_marks_math_and_escapes_the_rest() {
    let rendered = render_delimited("<script>alert(1)</script> $$A = x^2$$ and $y$");
    assert!(rendered.had_math);
    assert!(!rendered.html.contains("<script"));

    let plain = render_delimited("no math here");
    assert!(!plain.had_math);
    assert!(!plain.html.is_empty());
}

#[test]
fn equation_lines_render_as_display_math() {
    match equation_segment("R = 1/U") {
        Segment::Math {
            source,
            latex,
            display,
            ..
        } => {
            assert_eq!(source, "R = 1/U");
            assert_eq!(latex, r"R = \frac{1}{U}");
            assert!(display);
        }
        other => panic!("expected math, got {other:?}"),
    }
}
