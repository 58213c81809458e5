//! Deterministic "vibe note" sentences built from mood and weather.

use serde::{Deserialize, Serialize};

pub const RAIN_PHRASE: &str = "the rhythm of the rain sets a calm tempo";
pub const CLOUD_PHRASE: &str = "soft clouds invite reflection and slow moments";
pub const CLEAR_PHRASE: &str = "clear skies spark light and optimism";
pub const SNOW_PHRASE: &str = "snow hushes the world into a gentle hush";
pub const STORM_PHRASE: &str = "storms rumble, but you carry quiet courage";
pub const OPEN_PHRASE: &str = "the air feels open to possibility";

pub const HAPPY_PHRASE: &str = "your energy feels bright and contagious";
pub const SAD_PHRASE: &str = "be gentle with yourself—small steps are still progress";
pub const ANGRY_PHRASE: &str = "take a breath; let movement help shift the heat";
pub const STEADY_PHRASE: &str = "you’re steady and present—keep following the simple good";

pub const HAPPY_WORDS: &[&str] = &[
    "happy", "great", "good", "joy", "excited", "😊", "😀", "😄", "😎", ":)",
];
pub const SAD_WORDS: &[&str] = &[
    "sad", "down", "tired", "low", "anxious", "😢", "😭", ":(", "😞",
];
pub const ANGRY_WORDS: &[&str] = &["angry", "frustrated", "mad", "😡"];

/// Mood buckets in match priority order.
const MOODS: &[(&[&str], &str)] = &[
    (HAPPY_WORDS, HAPPY_PHRASE),
    (SAD_WORDS, SAD_PHRASE),
    (ANGRY_WORDS, ANGRY_PHRASE),
];

#[derive(Debug, Clone, Deserialize)]
pub struct VibeRequest {
    pub mood: String,
    #[serde(default)]
    pub weather_main: Option<String>,
    #[serde(default)]
    pub weather_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeResult {
    pub note: String,
}

impl From<&VibeRequest> for VibeResult {
    fn from(req: &VibeRequest) -> Self {
        Self {
            note: generate(
                &req.mood,
                req.weather_main.as_deref(),
                req.weather_desc.as_deref(),
            ),
        }
    }
}

/// Composes `"Today, {weather}; {mood}."`.
pub fn generate(mood: &str, weather_main: Option<&str>, weather_desc: Option<&str>) -> String {
    format!(
        "Today, {}; {}.",
        weather_phrase(weather_main, weather_desc),
        mood_phrase(mood)
    )
}

/// First matching weather condition wins; only "overcast" is read from the
/// description.
pub fn weather_phrase(weather_main: Option<&str>, weather_desc: Option<&str>) -> &'static str {
    let main = weather_main.unwrap_or_default().to_lowercase();
    let desc = weather_desc.unwrap_or_default().to_lowercase();
    if main.contains("rain") || main.contains("drizzle") {
        RAIN_PHRASE
    } else if main.contains("cloud") || desc.contains("overcast") {
        CLOUD_PHRASE
    } else if main.contains("clear") {
        CLEAR_PHRASE
    } else if main.contains("snow") {
        SNOW_PHRASE
    } else if main.contains("storm") || main.contains("thunder") {
        STORM_PHRASE
    } else {
        OPEN_PHRASE
    }
}

pub fn mood_phrase(mood: &str) -> &'static str {
    let mood = mood.trim().to_lowercase();
    MOODS
        .iter()
        .find(|(words, _)| words.iter().any(|w| mood.contains(w)))
        .map(|(_, phrase)| *phrase)
        .unwrap_or(STEADY_PHRASE)
}
