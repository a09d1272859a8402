//! Greedy label wrapping
//!
//! Both diagrams wrap labels the same way: words are packed onto a line until
//! the next word would push the line past the width budget. Width is whatever
//! the injected [`TextMeasure`] says it is, so line breaks are reproducible
//! without font metrics.

/// Measures rendered text width
pub trait TextMeasure {
    /// Width of `text` in the same units as the wrap budget
    fn width(&self, text: &str) -> f64;
}

/// One unit per character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharCount;

impl TextMeasure for CharCount {
    #[allow(clippy::cast_precision_loss)]
    fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64
    }
}

/// Fixed advance per character, for monospace-like pixel estimates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance(pub f64);

impl TextMeasure for FixedAdvance {
    #[allow(clippy::cast_precision_loss)]
    fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.0
    }
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f64,
{
    fn width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Break `label` into lines no wider than `max_width`
///
/// Words are the pieces between single spaces, so runs of spaces survive as
/// empty words. A line that would overflow is only broken once it holds
/// something, which keeps a single over-wide word whole on its own line.
/// Joining the result with single spaces gives back `label` exactly.
pub fn wrap_label<M: TextMeasure + ?Sized>(label: &str, max_width: f64, measure: &M) -> Vec<String> {
    if label.is_empty() {
        return Vec::new();
    }

    let mut words = label.split(' ');
    let mut lines = Vec::new();
    let mut line = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{line} {word}");
        if !line.is_empty() && measure.width(&candidate) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }

    lines.push(line);
    lines
}

/// Cut `text` to `budget` characters and append `...` when it was longer
#[must_use]
pub fn truncate_with_ellipsis(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_at_budget() {
        let lines = wrap_label("Letter from Alcuin to King Æthelred", 16.0, &CharCount);
        assert_eq!(lines, vec!["Letter from", "Alcuin to King", "Æthelred"]);
    }

    #[test]
    fn exact_fit_stays_on_line() {
        let lines = wrap_label("abc def", 7.0, &CharCount);
        assert_eq!(lines, vec!["abc def"]);
    }

    #[test]
    fn long_word_gets_own_line() {
        let lines = wrap_label("a Historia-Ecclesiastica b", 5.0, &CharCount);
        assert_eq!(lines, vec!["a", "Historia-Ecclesiastica", "b"]);
    }

    #[test]
    fn empty_label_has_no_lines() {
        assert!(wrap_label("", 10.0, &CharCount).is_empty());
    }

    #[test]
    fn repeated_spaces_are_kept() {
        let label = "Letter  of Alcuin";
        let lines = wrap_label(label, 10.0, &CharCount);
        assert_eq!(lines, vec!["Letter  of", "Alcuin"]);
        assert_eq!(lines.join(" "), label);
    }

    #[test]
    fn edge_spaces_are_kept() {
        for label in ["   ", " Historia", "Historia ", "  a  b  "] {
            assert_eq!(wrap_label(label, 4.0, &CharCount).join(" "), label);
        }
    }

    #[test]
    fn closure_measure() {
        let wide = |text: &str| text.len() as f64 * 6.0;
        let lines = wrap_label("one two three", 50.0, &wide);
        assert_eq!(lines, vec!["one two", "three"]);
    }

    #[test]
    fn fixed_advance_scales() {
        assert_eq!(FixedAdvance(6.5).width("abcd"), 26.0);
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_with_ellipsis("short", 30), "short");
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
        assert_eq!(truncate_with_ellipsis("Æthelred", 3), "Æth...");
        assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
    }
}
