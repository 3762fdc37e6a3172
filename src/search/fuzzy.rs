//! Approximate substring matching.
//!
//! Computes the smallest number of edits (insertions, deletions,
//! substitutions and adjacent transpositions) needed to turn the pattern
//! into some substring of the text.

/// Minimum edits to match `pattern` anywhere inside `text`.
///
/// Gives up early once every alignment needs more than `max_edits`, in which
/// case the returned value is only guaranteed to exceed `max_edits`.
pub fn substring_distance(pattern: &[char], text: &[char], max_edits: usize) -> usize {
    let m = pattern.len();
    let n = text.len();

    if m == 0 {
        return 0;
    }
    if n == 0 {
        return m;
    }

    // Row i holds the cost of matching pattern[..i] ending at each text
    // position. Row 0 is all zeros so a match may start anywhere.
    let mut before_prev: Vec<usize> = vec![0; n + 1];
    let mut prev: Vec<usize> = vec![0; n + 1];
    let mut cur: Vec<usize> = vec![0; n + 1];

    for i in 1..=m {
        cur[0] = i;
        let mut row_min = cur[0];

        for j in 1..=n {
            let cost = usize::from(pattern[i - 1] != text[j - 1]);
            let mut best = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);

            if i > 1 && j > 1 && pattern[i - 1] == text[j - 2] && pattern[i - 2] == text[j - 1] {
                best = best.min(before_prev[j - 2] + 1);
            }

            cur[j] = best;
            row_min = row_min.min(best);
        }

        let prev_min = prev.iter().copied().min().unwrap_or(0);
        if i < m && row_min > max_edits && prev_min >= max_edits {
            return max_edits + 1;
        }

        std::mem::swap(&mut before_prev, &mut prev);
        std::mem::swap(&mut prev, &mut cur);
    }

    prev.iter().skip(1).copied().min().unwrap_or(m)
}

/// Normalized match score of a query token against a text: `edits / len`.
///
/// Returns `None` when the score exceeds `threshold`.
pub fn token_score(token: &[char], text: &[char], threshold: f64) -> Option<f64> {
    if token.is_empty() {
        return None;
    }

    let len = token.len();
    let max_edits = (threshold * len as f64).floor() as usize;
    let edits = substring_distance(token, text, max_edits);

    if edits > max_edits {
        return None;
    }
    Some(edits as f64 / len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn dist(p: &str, t: &str) -> usize {
        substring_distance(&chars(p), &chars(t), usize::MAX / 2)
    }

    #[test]
    fn test_exact_substring() {
        assert_eq!(dist("rust", "learning rust today"), 0);
        assert_eq!(dist("rust", "rust"), 0);
    }

    #[test]
    fn test_single_edits() {
        // substitution
        assert_eq!(dist("rust", "a rost b"), 1);
        // deletion from pattern
        assert_eq!(dist("ruust", "rust"), 1);
        // insertion into pattern
        assert_eq!(dist("rst", "xx rust"), 1);
        // adjacent transposition
        assert_eq!(dist("rsut", "rust"), 1);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(dist("", "anything"), 0);
        assert_eq!(dist("abc", ""), 3);
    }

    #[test]
    fn test_early_exit_exceeds_limit() {
        let d = substring_distance(&chars("zzzzzz"), &chars("abcdefgh"), 1);
        assert!(d > 1);
    }

    #[test]
    fn test_token_score_threshold() {
        let text = chars("building scalable web applications");

        assert_eq!(token_score(&chars("scalable"), &text, 0.4), Some(0.0));
        // one typo in an 8-char token: 0.125
        assert_eq!(token_score(&chars("scalabel"), &text, 0.4), Some(0.125));
        assert_eq!(token_score(&chars("qqqqq"), &text, 0.4), None);
        // two-char tokens tolerate no edits at 0.4
        assert_eq!(token_score(&chars("wx"), &text, 0.4), None);
        assert_eq!(token_score(&chars("we"), &text, 0.4), Some(0.0));
    }
}
