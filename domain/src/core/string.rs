//! String utilities for the domain layer.

/// Keep the first `max_chars` characters of `s`, without any marker.
pub fn clip_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_chars() {
        assert_eq!(clip_chars("abcdef", 3), "abc");
        assert_eq!(clip_chars("abc", 10), "abc");
        // multi-byte characters are never split
        assert_eq!(clip_chars("ééé", 2), "éé");
    }
}
