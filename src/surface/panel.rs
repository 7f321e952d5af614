/// Detail-panel / notice surface of the external collaborator. The engine is
/// responsible only for handing it escaped, safe fragments; layout is not its
/// problem.
pub trait DetailPanel {
    fn show(&mut self, title: &str, html_body: &str);
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Panel double that keeps every `(title, body)` it was shown.
#[derive(Debug, Default)]
pub struct RecordingPanel {
    pub shown: Vec<(String, String)>,
}

impl DetailPanel for RecordingPanel {
    fn show(&mut self, title: &str, html_body: &str) {
        self.shown.push((title.to_string(), html_body.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<b>"War & Peace"</b> 'n"#),
            "&lt;b&gt;&quot;War &amp; Peace&quot;&lt;/b&gt; &#39;n"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_html("Adriatic coast"), "Adriatic coast");
    }
}
