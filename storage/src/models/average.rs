//! The one rounding rule for words per message.

/// `ceil(word_count / message_count)`, or 0 when there are no messages.
///
/// Every read path derives `average_words` through this function, so a stat fetched for one
/// group and a stat summed across groups round the same way.
pub fn average_words(word_count: i64, message_count: i64) -> i64 {
    if message_count <= 0 {
        return 0;
    }
    let words = word_count.max(0);
    (words + message_count - 1) / message_count
}

#[cfg(test)]
mod tests {
    use super::average_words;

    #[test]
    fn test_rounds_up() {
        assert_eq!(average_words(7, 3), 3);
        assert_eq!(average_words(10, 2), 5);
        assert_eq!(average_words(11, 2), 6);
        assert_eq!(average_words(1, 1000), 1);
    }

    #[test]
    fn test_zero_messages_is_zero() {
        assert_eq!(average_words(0, 0), 0);
        assert_eq!(average_words(15, 0), 0);
    }

    #[test]
    fn test_zero_words() {
        assert_eq!(average_words(0, 4), 0);
    }
}
