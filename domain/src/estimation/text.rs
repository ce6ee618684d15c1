//! Text token heuristics.
//!
//! A cheap, deterministic approximation of how many tokens a text blob will
//! cost. Structured (JSON-like) text tokenizes denser than prose, so the two
//! are estimated with different rates and the larger of the char-based and
//! word-based readings wins.

const STRUCTURED_CHARS_PER_TOKEN: f64 = 3.2;
const FREE_TEXT_CHARS_PER_TOKEN: f64 = 3.8;
const STRUCTURED_WORDS_PER_TOKEN: f64 = 0.9;
const FREE_TEXT_WORDS_PER_TOKEN: f64 = 0.75;

/// Tokens charged per structural punctuation character in structured text.
const STRUCTURAL_SURCHARGE: f64 = 0.8;
/// Share of structural characters above which text counts as structured.
const STRUCTURAL_RATIO_THRESHOLD: f64 = 0.15;
const UNCERTAINTY_BUFFER: f64 = 1.05;

fn is_structural(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | ':' | ',' | '"')
}

/// Counts gathered in a single pass over a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextProfile {
    pub chars: usize,
    pub words: usize,
    pub structural: usize,
    pub numeric_runs: usize,
    pub structured: bool,
}

impl TextProfile {
    pub fn analyze(text: &str) -> Self {
        let mut chars = 0;
        let mut structural = 0;
        let mut numeric_runs = 0;
        let mut in_number = false;

        for c in text.chars() {
            chars += 1;
            if is_structural(c) {
                structural += 1;
            }
            if c.is_ascii_digit() {
                if !in_number {
                    numeric_runs += 1;
                    in_number = true;
                }
            } else {
                in_number = false;
            }
        }

        // Opening bracket alone marks structure: a truncated or partially
        // streamed document still tokenizes like JSON.
        let opens_structure = matches!(text.trim_start().chars().next(), Some('{' | '['));
        let dense = chars > 0 && structural as f64 / chars as f64 > STRUCTURAL_RATIO_THRESHOLD;

        Self {
            chars,
            words: text.split_whitespace().count(),
            structural,
            numeric_runs,
            structured: opens_structure || dense,
        }
    }

    /// Token estimate for the profiled text.
    pub fn estimate(&self) -> u64 {
        if self.chars == 0 {
            return 0;
        }

        let (chars_per_token, words_per_token) = if self.structured {
            (STRUCTURED_CHARS_PER_TOKEN, STRUCTURED_WORDS_PER_TOKEN)
        } else {
            (FREE_TEXT_CHARS_PER_TOKEN, FREE_TEXT_WORDS_PER_TOKEN)
        };

        let by_chars = self.chars as f64 / chars_per_token;
        let by_words = self.words as f64 / words_per_token;
        let mut tokens = by_chars.max(by_words);

        if self.structured {
            tokens += self.structural as f64 * STRUCTURAL_SURCHARGE;
        }
        tokens += self.numeric_runs as f64;

        (tokens * UNCERTAINTY_BUFFER).ceil() as u64
    }
}

/// Estimate the token cost of a text blob.
pub fn estimate_text_tokens(text: &str) -> u64 {
    TextProfile::analyze(text).estimate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_costs_nothing() {
        assert_eq!(estimate_text_tokens(""), 0);
    }

    #[test]
    fn test_profile_counts() {
        let profile = TextProfile::analyze("order 66 shipped in 2024, item 7");
        assert_eq!(profile.words, 7);
        assert_eq!(profile.numeric_runs, 3);
        assert_eq!(profile.structural, 1);
        assert!(!profile.structured);
    }

    #[test]
    fn test_structure_detection() {
        assert!(TextProfile::analyze(r#"{"a": 1}"#).structured);
        assert!(TextProfile::analyze("  [1, 2, 3]").structured);
        assert!(TextProfile::analyze(r#"a:"b",c:"d""#).structured);
        assert!(!TextProfile::analyze("plain words, nothing more").structured);
    }

    #[test]
    fn test_free_text_uses_larger_reading() {
        // 9 chars / 3.8 = 2.37, 2 words / 0.75 = 2.67 -> word reading wins
        let profile = TextProfile::analyze("hey there");
        assert!(!profile.structured);
        assert_eq!(profile.estimate(), (2.0_f64 / 0.75 * 1.05).ceil() as u64);
    }

    #[test]
    fn test_structured_surcharge() {
        // {"a":1} = 7 chars, 5 structural, 1 numeric run, 1 word
        // max(7/3.2, 1/0.9) = 2.1875; + 5*0.8 = 4; + 1 -> 7.1875 * 1.05 = 7.55 -> 8
        assert_eq!(estimate_text_tokens(r#"{"a":1}"#), 8);
    }

    #[test]
    fn test_structured_text_costs_more_than_prose_of_same_length() {
        let json = r#"{"name":"widget","size":"large","tags":["a","b"]}"#;
        let prose = "n".repeat(json.chars().count());
        assert!(estimate_text_tokens(json) > estimate_text_tokens(&prose));
    }

    #[test]
    fn test_deterministic() {
        let text = "The quick brown fox jumps over 13 lazy dogs.";
        assert_eq!(estimate_text_tokens(text), estimate_text_tokens(text));
    }

    #[test]
    fn test_monotonic_under_appended_punctuation() {
        let bases = [
            r#"{"name": "widget", "tags": ["a", "b"]"#,
            "plain prose with a few words in it",
            "a b c d e f g h",
            "",
        ];
        for base in bases {
            let mut padded = base.to_string();
            let mut previous = estimate_text_tokens(&padded);
            for c in "}],:\"{[,,]]}}".chars() {
                padded.push(c);
                let next = estimate_text_tokens(&padded);
                assert!(
                    next >= previous,
                    "estimate dropped from {} to {} for {:?}",
                    previous,
                    next,
                    padded
                );
                previous = next;
            }
        }
    }
}
