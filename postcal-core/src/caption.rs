//! Caption generation seam.
//!
//! The session controller only knows the `CaptionGenerator` trait. The
//! bundled `ThemedCaptions` picks from a fixed sample table after an
//! artificial delay; a real generator can replace it without touching
//! the state machine.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ScheduleError, ScheduleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Motivational,
    Funny,
    Aesthetic,
    Lifestyle,
}

impl Theme {
    pub const ALL: [Theme; 4] = [
        Theme::Motivational,
        Theme::Funny,
        Theme::Aesthetic,
        Theme::Lifestyle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Motivational => "Motivational",
            Theme::Funny => "Funny",
            Theme::Aesthetic => "Aesthetic",
            Theme::Lifestyle => "Lifestyle",
        }
    }

    /// Sample captions for this theme.
    pub fn samples(self) -> &'static [&'static str] {
        match self {
            Theme::Motivational => &[
                "Dream big. Start small. Act now. 💥",
                "Keep going, you're closer than you think 🚀",
                "Believe in your magic ✨",
                "Small steps every day 💫",
            ],
            Theme::Funny => &[
                "Mentally on vacation 🧠✈️",
                "Running on caffeine and chaos ☕😅",
                "I came. I saw. I made it awkward. 😬",
                "Still waiting for my Oscar 🎭",
            ],
            Theme::Aesthetic => &[
                "Golden hour glow ✨",
                "Soft moments & warm tones 🌅",
                "Mood: minimalist serenity 🤍",
                "Sun-drenched daydreams 🌞",
            ],
            Theme::Lifestyle => &[
                "Weekend reset 🧖‍♀️",
                "Farmers market finds 🥬🌸",
                "Books, tea, and cozy corners 📚🍵",
                "My kind of self-care day 💆‍♀️",
            ],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.to_string() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown theme '{}'. Expected one of: motivational, funny, aesthetic, lifestyle",
                    s
                )
            })
    }
}

/// Produces a caption for a theme. May take arbitrarily long.
#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    async fn generate(&self, theme: Theme) -> ScheduleResult<String>;
}

/// Random pick from `Theme::samples` after a fixed delay.
#[derive(Debug, Clone)]
pub struct ThemedCaptions {
    delay: Duration,
}

impl ThemedCaptions {
    pub fn new(delay: Duration) -> Self {
        ThemedCaptions { delay }
    }
}

impl Default for ThemedCaptions {
    fn default() -> Self {
        ThemedCaptions::new(Duration::from_millis(700))
    }
}

#[async_trait]
impl CaptionGenerator for ThemedCaptions {
    async fn generate(&self, theme: Theme) -> ScheduleResult<String> {
        // Pick before sleeping: the thread rng is not Send
        let caption = theme
            .samples()
            .choose(&mut rand::rng())
            .map(|s| s.to_string())
            .ok_or_else(|| ScheduleError::Generation(format!("No captions for theme {theme}")))?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(caption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_has_samples() {
        for theme in Theme::ALL {
            assert_eq!(theme.samples().len(), 4, "{theme}");
        }
    }

    #[test]
    fn theme_round_trips_through_text() {
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
        }
        assert_eq!("FUNNY".parse::<Theme>(), Ok(Theme::Funny));
        assert!("sad".parse::<Theme>().is_err());
    }

    #[tokio::test]
    async fn themed_captions_pick_from_theme() {
        let generator = ThemedCaptions::new(Duration::ZERO);
        for theme in Theme::ALL {
            let caption = generator.generate(theme).await.unwrap();
            assert!(theme.samples().contains(&caption.as_str()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn themed_captions_wait_for_delay() {
        let generator = ThemedCaptions::new(Duration::from_millis(700));
        let started = tokio::time::Instant::now();
        generator.generate(Theme::Aesthetic).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(700));
    }
}
