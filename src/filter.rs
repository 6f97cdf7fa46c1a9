//! Input filtering for the tracking strategy

/// Rejects any inserted text that contains the reserved delimiter character
///
/// With the tracking strategy, the buffer must never literally contain the delimiter. Rather than
/// strip the offending character out of an insertion, the whole insertion is dropped -- the same
/// way a platform input filter returning an empty replacement would behave.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DelimiterFilter {
    delimiter: char,
}

impl DelimiterFilter {
    pub fn new(delimiter: char) -> Self {
        DelimiterFilter { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Returns the text that should actually be inserted, or `None` if it was rejected
    pub fn filter<'a>(&self, text: &'a str) -> Option<&'a str> {
        if text.contains(self.delimiter) {
            log::trace!("filtered insertion {:?} containing delimiter", text);
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_any_delimiter() {
        let filter = DelimiterFilter::new(',');

        static CASES: &[(&str, Option<&str>)] = &[
            ("abc", Some("abc")),
            ("", Some("")),
            (",", None),
            ("a,b", None),
            ("trailing,", None),
        ];

        for (input, expected) in CASES {
            assert_eq!(filter.filter(input), *expected, "input {:?}", input);
        }
    }

    #[test]
    fn custom_delimiter() {
        let filter = DelimiterFilter::new(';');
        assert_eq!(filter.filter("a,b"), Some("a,b"));
        assert_eq!(filter.filter("a;b"), None);
    }
}
