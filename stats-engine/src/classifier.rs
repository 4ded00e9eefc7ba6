//! Event classification: what a message contributes to the counters, if anything.

use stats_core::{Attachment, Message};
use storage::StatDelta;

/// Summary of a countable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedEvent {
    pub is_text: bool,
    pub is_sticker: bool,
    pub is_media: bool,
    pub word_count: i64,
    /// Stored as the profile's `last_activity`.
    pub activity: &'static str,
}

impl ClassifiedEvent {
    pub fn delta(&self) -> StatDelta {
        StatDelta::message(self.word_count, self.is_sticker, self.is_media)
    }
}

/// Whitespace-delimited tokens; runs of whitespace are one delimiter, blank text is zero words.
pub fn count_words(text: &str) -> i64 {
    text.split_whitespace().count() as i64
}

fn is_media(attachment: Attachment) -> bool {
    matches!(
        attachment,
        Attachment::Photo
            | Attachment::Video
            | Attachment::Document
            | Attachment::Audio
            | Attachment::Voice
            | Attachment::VideoNote
    )
}

/// Classifies text (or caption) plus attachment. `None` means the event is not interesting.
///
/// Whitespace-only text is present text with zero words.
pub fn classify_content(content: &str, attachment: Option<Attachment>) -> Option<ClassifiedEvent> {
    let is_text = !content.is_empty();
    let is_sticker = attachment == Some(Attachment::Sticker);
    let is_media = attachment.map(is_media).unwrap_or(false);

    if !(is_text || is_sticker || is_media) {
        return None;
    }

    let activity = match attachment {
        Some(a) if is_sticker || is_media => a.as_str(),
        _ => "text",
    };

    Some(ClassifiedEvent {
        is_text,
        is_sticker,
        is_media,
        word_count: if is_text { count_words(content) } else { 0 },
        activity,
    })
}

pub fn classify(message: &Message) -> Option<ClassifiedEvent> {
    classify_content(&message.content, message.attachment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let event = classify_content("hello  brave\tnew\n world", None).unwrap();
        assert!(event.is_text);
        assert!(!event.is_sticker && !event.is_media);
        assert_eq!(event.word_count, 4);
        assert_eq!(event.activity, "text");
        assert_eq!(event.delta(), StatDelta::message(4, false, false));
    }

    #[test]
    fn test_whitespace_only_is_text_with_zero_words() {
        let event = classify_content("   ", None).unwrap();
        assert!(event.is_text);
        assert_eq!(event.word_count, 0);
    }

    #[test]
    fn test_empty_text_without_attachment_is_ignored() {
        assert!(classify_content("", None).is_none());
        assert!(classify_content("", Some(Attachment::Other)).is_none());
    }

    #[test]
    fn test_sticker() {
        let event = classify_content("", Some(Attachment::Sticker)).unwrap();
        assert!(event.is_sticker);
        assert!(!event.is_media && !event.is_text);
        assert_eq!(event.word_count, 0);
        assert_eq!(event.activity, "sticker");
    }

    #[test]
    fn test_media_with_caption_is_text_and_media() {
        let event = classify_content("look at this", Some(Attachment::Photo)).unwrap();
        assert!(event.is_text && event.is_media);
        assert_eq!(event.word_count, 3);
        assert_eq!(event.activity, "photo");
    }

    #[test]
    fn test_every_media_kind() {
        for attachment in [
            Attachment::Photo,
            Attachment::Video,
            Attachment::Document,
            Attachment::Audio,
            Attachment::Voice,
            Attachment::VideoNote,
        ] {
            let event = classify_content("", Some(attachment)).unwrap();
            assert!(event.is_media, "{:?} should be media", attachment);
            assert!(!event.is_sticker);
        }
    }

    #[test]
    fn test_other_attachment_with_text_counts_as_text() {
        let event = classify_content("pinned", Some(Attachment::Other)).unwrap();
        assert!(event.is_text && !event.is_media);
        assert_eq!(event.activity, "text");
    }
}
