/// Placeholder diagrams written when a tree cannot be decorated: a fixed
/// canvas, a light background rectangle and one explanatory label.
pub const PLACEHOLDER_WIDTH: u32 = 600;
pub const PLACEHOLDER_HEIGHT: u32 = 200;

pub fn placeholder_svg(label: &str) -> String {
    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\n",
            "  <rect width=\"{w}\" height=\"{h}\" fill=\"#f0f0f0\"/>\n",
            "  <text x=\"20\" y=\"{y}\" font-family=\"sans-serif\" font-size=\"16\">{label}</text>\n",
            "</svg>\n"
        ),
        w = PLACEHOLDER_WIDTH,
        h = PLACEHOLDER_HEIGHT,
        y = PLACEHOLDER_HEIGHT / 2,
        label = escape_text(label),
    )
}

pub fn matrix_missing_label(sample: &str) -> String {
    format!("Matrix missing for {}", sample)
}

pub fn no_tree_label(sample: &str) -> String {
    format!("No tree generated for {}", sample)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_carries_sample_and_reason() {
        let svg = placeholder_svg(&matrix_missing_label("sample1"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Matrix missing for sample1"));
        assert!(svg.contains("width=\"600\" height=\"200\""));
        assert!(svg.contains("<rect"));

        let svg = placeholder_svg(&no_tree_label("sample2"));
        assert!(svg.contains("No tree generated for sample2"));
    }

    #[test]
    fn test_label_is_escaped() {
        let svg = placeholder_svg("a<b&c");
        assert!(svg.contains("a&lt;b&amp;c"));
    }
}
