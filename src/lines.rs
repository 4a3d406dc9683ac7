/// One line of the raw document together with its 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Iterator over the lines of a document, split on `'\n'` only.
///
/// Unlike [`str::lines`], an empty document yields one empty line and a
/// trailing newline yields a final empty line. Clone it to walk the lines again.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Split<'a, char>>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, text)| Line { index, text })
    }
}

/// Split a document into lines.
pub fn segment(document: &str) -> Lines<'_> {
    Lines {
        inner: document.split('\n').enumerate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(document: &str) -> Vec<&str> {
        segment(document).map(|line| line.text).collect()
    }

    #[test]
    fn empty_document_is_one_empty_line() {
        assert_eq!(texts(""), vec![""]);
    }

    #[test]
    fn trailing_newline_yields_empty_line() {
        assert_eq!(texts("a\nb\n"), vec!["a", "b", ""]);
    }

    #[test]
    fn carriage_returns_are_kept() {
        assert_eq!(texts("a\r\nb"), vec!["a\r", "b"]);
    }

    #[test]
    fn indices_follow_source_order() {
        let indices: Vec<usize> = segment("x\n\ny").map(|line| line.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn restartable() {
        let lines = segment("one\ntwo");
        let first: Vec<_> = lines.clone().collect();
        let second: Vec<_> = lines.collect();
        assert_eq!(first, second);
    }
}
