use latex2mathml::{latex_to_mathml, DisplayStyle};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::annotate::{merge_plain, split_by_spans};
use crate::sanitize::{escape_text, sanitize_math};
use crate::types::Segment;

static EXPLICIT_MATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[^$]+\$").unwrap());
static MATH_SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[²³√∑∫∏≤≥±]").unwrap());
static TEMPERATURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*°\s*[CF]\b").unwrap());
static SCIENTIFIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*[×x]\s*10\^\d+").unwrap());
static WHOLE_RATIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])\s*=\s*(\d+)\s*/\s*([A-Za-z])$").unwrap());

static DELIMITED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$([^$]+)\$\$|\$([^$]+)\$").unwrap());

type Rewrite = fn(&Captures) -> String;

struct RewriteRule {
    pattern: Regex,
    rewrite: Rewrite,
}

fn rule(pattern: &str, rewrite: Rewrite) -> RewriteRule {
    RewriteRule {
        pattern: Regex::new(pattern).unwrap(),
        rewrite,
    }
}

fn greek(name: &'static str) -> RewriteRule {
    let rewrite: Rewrite = match name {
        "alpha" => |_| r"\alpha".to_string(),
        "beta" => |_| r"\beta".to_string(),
        "gamma" => |_| r"\gamma".to_string(),
        "delta" => |_| r"\delta".to_string(),
        "phi" => |_| r"\phi".to_string(),
        "lambda" => |_| r"\lambda".to_string(),
        "mu" => |_| r"\mu".to_string(),
        "rho" => |_| r"\rho".to_string(),
        "sigma" => |_| r"\sigma".to_string(),
        _ => |_| r"\theta".to_string(),
    };
    rule(&format!(r"(?i)\b{name}\b"), rewrite)
}

/// Ordered substitutions; earlier rules see the raw text, later ones see earlier output.
static REWRITE_RULES: LazyLock<Vec<RewriteRule>> = LazyLock::new(|| {
    let mut rules = vec![
        rule(r"(?i)\bR\s*=\s*1\s*/\s*U\b", |_| r"R = \frac{1}{U}".to_string()),
        rule(r"(?i)\bRSI\s*=\s*1\s*/\s*U\b", |_| r"RSI = \frac{1}{U}".to_string()),
        rule(r"(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)", |c| {
            format!(r"\frac{{{}}}{{{}}}", &c[1], &c[2])
        }),
        rule(r"(?i)sqrt\s*\(\s*([^)]+?)\s*\)", |c| format!(r"\sqrt{{{}}}", &c[1])),
        rule(r"√\s*(\d+(?:\.\d+)?)", |c| format!(r"\sqrt{{{}}}", &c[1])),
        rule(r"(\d+(?:\.\d+)?)\s*(mm|cm|ft|in|m)²", |c| {
            format!(r"{}\text{{ {}}}^2", &c[1], &c[2])
        }),
        rule(r"(\d+(?:\.\d+)?)\s*(mm|cm|ft|in|m)³", |c| {
            format!(r"{}\text{{ {}}}^3", &c[1], &c[2])
        }),
        rule(r"(mm|cm|ft|in|m)²", |c| format!(r"\text{{{}}}^2", &c[1])),
        rule(r"(mm|cm|ft|in|m)³", |c| format!(r"\text{{{}}}^3", &c[1])),
        rule(r"(\d+(?:\.\d+)?)\s*°\s*C\b", |c| format!(r"{}°\text{{C}}", &c[1])),
        rule(r"(\d+(?:\.\d+)?)\s*°\s*F\b", |c| format!(r"{}°\text{{F}}", &c[1])),
        rule(r"(?i)(\d+(?:\.\d+)?)\s*[×x]\s*10\^(\d+)", |c| {
            format!(r"{} \times 10^{{{}}}", &c[1], &c[2])
        }),
        rule(r">=|≥", |_| r"\geq".to_string()),
        rule(r"<=|≤", |_| r"\leq".to_string()),
        rule(r"\+/-|±", |_| r"\pm".to_string()),
    ];
    for name in [
        "alpha", "beta", "gamma", "delta", "phi", "lambda", "mu", "rho", "sigma", "theta",
    ] {
        rules.push(greek(name));
    }
    rules.extend([
        rule(r"([A-Za-z])_([A-Za-z0-9]+)", |c| format!("{}_{{{}}}", &c[1], &c[2])),
        rule(r"([A-Za-z])₁", |c| format!("{}_1", &c[1])),
        rule(r"([A-Za-z])₂", |c| format!("{}_2", &c[1])),
        rule(r"([A-Za-z])₃", |c| format!("{}_3", &c[1])),
        rule(r"Σ\s*([A-Za-z0-9]+)", |c| format!(r"\sum {}", &c[1])),
    ]);
    rules
});

/// Whether `text` contains anything worth rendering as math.
pub fn has_equation(text: &str) -> bool {
    if EXPLICIT_MATH_RE.is_match(text)
        || MATH_SYMBOL_RE.is_match(text)
        || TEMPERATURE_RE.is_match(text)
        || SCIENTIFIC_RE.is_match(text)
    {
        return true;
    }
    WHOLE_RATIO_RE.is_match(text.trim())
}

/// Apply the substitution rules to the whole string.
pub fn text_to_latex(text: &str) -> String {
    let mut latex = text.to_string();
    for rule in REWRITE_RULES.iter() {
        latex = rule
            .pattern
            .replace_all(&latex, |caps: &Captures| (rule.rewrite)(caps))
            .into_owned();
    }
    latex
}

/// Byte spans of the original text matched by any rule, earliest first, never overlapping.
fn math_spans(text: &str) -> Vec<(usize, usize)> {
    let trimmed = text.trim();
    if WHOLE_RATIO_RE.is_match(trimmed) {
        let start = text.len() - text.trim_start().len();
        return vec![(start, start + trimmed.len())];
    }

    let mut candidates: Vec<(usize, usize)> = REWRITE_RULES
        .iter()
        .flat_map(|rule| rule.pattern.find_iter(text))
        .filter(|found| !found.is_empty())
        .map(|found| (found.start(), found.end()))
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)));

    let mut accepted = Vec::with_capacity(candidates.len());
    let mut last_end = 0;
    for (start, end) in candidates {
        if start >= last_end {
            accepted.push((start, end));
            last_end = end;
        }
    }
    accepted
}

fn span_latex(span: &str) -> String {
    match WHOLE_RATIO_RE.captures(span.trim()) {
        Some(caps) => format!(r"{} = \frac{{{}}}{{{}}}", &caps[1], &caps[2], &caps[3]),
        None => text_to_latex(span),
    }
}

/// Text with only the recognised math spans rewritten to LaTeX; prose is kept as is.
pub fn normalize_math(text: &str) -> String {
    if !has_equation(text) {
        return text.to_string();
    }
    let spans = math_spans(text);
    let mut output = String::with_capacity(text.len() + 16);
    let mut cursor = 0;
    for (start, end) in spans {
        output.push_str(&text[cursor..start]);
        output.push_str(&span_latex(&text[start..end]));
        cursor = end;
    }
    output.push_str(&text[cursor..]);
    output
}

/// Split a plain run into text and math segments. Delimited `$…$` spans are
/// taken first; the rest is scanned only when it passes `has_equation`.
pub fn math_segments(text: &str) -> Vec<Segment> {
    let mut output = Vec::new();
    let mut cursor = 0;
    for caps in DELIMITED_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        output.extend(inline_math_segments(&text[cursor..whole.start()]));
        let (latex, display) = match caps.get(1) {
            Some(block) => (block.as_str(), true),
            None => (caps.get(2).map_or("", |inline| inline.as_str()), false),
        };
        output.push(math_segment(whole.as_str(), latex.trim(), display));
        cursor = whole.end();
    }
    output.extend(inline_math_segments(&text[cursor..]));
    merge_plain(output)
}

fn inline_math_segments(text: &str) -> Vec<Segment> {
    if text.is_empty() || !has_equation(text) {
        return vec![Segment::text(text)];
    }
    let spans = math_spans(text);
    split_by_spans(text, &spans, |_, span| {
        math_segment(span, &span_latex(span), false)
    })
}

fn math_segment(source: &str, latex: &str, display: bool) -> Segment {
    let html = render_latex(latex, display).unwrap_or_else(|e| {
        tracing::debug!("[Math] Falling back to literal for {:?}: {}", source, e);
        escape_text(source)
    });
    Segment::Math {
        source: source.to_string(),
        latex: latex.to_string(),
        display,
        html,
    }
}

/// Math segment for a stand-alone formula line.
pub fn equation_segment(line: &str) -> Segment {
    math_segment(line, &text_to_latex(line), true)
}

fn render_latex(latex: &str, display: bool) -> Result<String, String> {
    let style = if display {
        DisplayStyle::Block
    } else {
        DisplayStyle::Inline
    };
    latex_to_mathml(latex, style)
        .map(|markup| sanitize_math(&markup))
        .map_err(|e| format!("Failed to render LaTeX: {e}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedRender {
    pub html: String,
    pub had_math: bool,
}

/// Render `$$…$$` (display) and `$…$` (inline) spans; everything else is escaped.
pub fn render_delimited(text: &str) -> DelimitedRender {
    let mut html = String::with_capacity(text.len());
    let mut had_math = false;
    let mut cursor = 0;
    for caps in DELIMITED_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        had_math = true;
        html.push_str(&escape_text(&text[cursor..whole.start()]));
        let (latex, display) = match caps.get(1) {
            Some(block) => (block.as_str(), true),
            None => (caps.get(2).map_or("", |inline| inline.as_str()), false),
        };
        match render_latex(latex.trim(), display) {
            Ok(markup) => html.push_str(&markup),
            Err(e) => {
                tracing::debug!("[Math] Keeping literal {:?}: {}", whole.as_str(), e);
                html.push_str(&escape_text(whole.as_str()));
            }
        }
        cursor = whole.end();
    }
    html.push_str(&escape_text(&text[cursor..]));
    DelimitedRender { html, had_math }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_prefer_the_longer_match_at_the_same_start() {
        let text = "area of 10 m² minimum";
        let spans = math_spans(text);
        assert_eq!(spans.len(), 1);
        let (start, end) = spans[0];
        assert_eq!(&text[start..end], "10 m²");
    }

    #[test]
    fn whole_fragment_ratio_is_one_span() {
        assert_eq!(span_latex("k = 2/h"), r"k = \frac{2}{h}");
        assert!(has_equation(" k = 2/h "));
    }
}
