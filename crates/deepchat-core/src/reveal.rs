//! Character-by-character reveal of assistant replies

use std::time::Duration;

use async_trait::async_trait;

/// Source of the fixed-interval wait between reveal frames.
#[async_trait(?Send)]
pub trait Ticker {
    async fn tick(&self, period: Duration);
}

/// Prefixes of `text` of length 0, 1, ..., L characters (L + 1 frames).
pub fn frames(text: &str) -> impl Iterator<Item = &str> {
    std::iter::once(0)
        .chain(text.char_indices().map(|(i, c)| i + c.len_utf8()))
        .map(move |end| &text[..end])
}

/// Render every frame of `text`, waiting one `period` before each.
/// Returns the number of frames rendered.
pub async fn play<T, F>(ticker: &T, period: Duration, text: &str, mut render: F) -> usize
where
    T: Ticker + ?Sized,
    F: FnMut(&str),
{
    let mut ticks = 0;
    for frame in frames(text) {
        ticker.tick(period).await;
        render(frame);
        ticks += 1;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingTicker {
        waits: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl Ticker for CountingTicker {
        async fn tick(&self, period: Duration) {
            assert_eq!(period, Duration::from_millis(14));
            self.waits.set(self.waits.get() + 1);
        }
    }

    #[test]
    fn test_frames_cover_every_prefix() {
        let all: Vec<&str> = frames("abc").collect();
        assert_eq!(all, vec!["", "a", "ab", "abc"]);
    }

    #[test]
    fn test_frames_of_empty_text() {
        assert_eq!(frames("").collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_frames_respect_char_boundaries() {
        let all: Vec<&str> = frames("né✓").collect();
        assert_eq!(all, vec!["", "n", "né", "né✓"]);
    }

    #[test]
    fn test_play_renders_length_plus_one_ticks() {
        let ticker = CountingTicker { waits: Cell::new(0) };
        let mut rendered = Vec::new();
        let text = "Hello, world";
        let ticks = tokio_test::block_on(play(
            &ticker,
            Duration::from_millis(14),
            text,
            |frame| rendered.push(frame.to_string()),
        ));
        assert_eq!(ticks, text.chars().count() + 1);
        assert_eq!(ticker.waits.get(), ticks);
        assert_eq!(rendered.last().map(String::as_str), Some(text));
    }
}
