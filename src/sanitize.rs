//! HTML sanitizing for markup that reaches the client verbatim.

const TABLE_ATTRIBUTES: &[&str] = &["class", "style", "colspan", "rowspan", "align", "scope"];

const MATHML_TAGS: &[&str] = &[
    "math",
    "semantics",
    "annotation",
    "mrow",
    "mi",
    "mn",
    "mo",
    "ms",
    "mtext",
    "mspace",
    "mstyle",
    "mpadded",
    "mphantom",
    "menclose",
    "msup",
    "msub",
    "msubsup",
    "mfrac",
    "msqrt",
    "mroot",
    "mover",
    "munder",
    "munderover",
    "mtable",
    "mtr",
    "mtd",
];

const MATHML_ATTRIBUTES: &[&str] = &[
    "xmlns",
    "display",
    "mathvariant",
    "stretchy",
    "fence",
    "separator",
    "lspace",
    "rspace",
    "accent",
    "accentunder",
    "linethickness",
    "columnalign",
    "encoding",
];

/// Clean table markup from the source text or the table registry.
pub fn sanitize_table_html(html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder.add_generic_attributes(TABLE_ATTRIBUTES);
    builder.clean(html).to_string()
}

/// Clean MathML produced by the LaTeX renderer.
pub fn sanitize_math(markup: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .add_tags(MATHML_TAGS)
        .add_generic_attributes(MATHML_ATTRIBUTES);
    builder.clean(markup).to_string()
}

/// Escape plain text for inclusion in HTML.
pub fn escape_text(text: &str) -> String {
    ammonia::clean_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_markup_loses_scripts_but_keeps_cells() {
        let cleaned = sanitize_table_html(
            "<table><tr><td colspan=\"2\">a</td></tr></table><script>alert(1)</script>",
        );
        assert!(cleaned.contains("<td colspan=\"2\">a</td>"));
        assert!(!cleaned.contains("script"));
    }
}
