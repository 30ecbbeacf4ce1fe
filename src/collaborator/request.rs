use serde::{Deserialize, Serialize};

use crate::slides::{Slide, SlideError};

/// Which model class a request wants. Adapters map this to concrete models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    #[default]
    Fast,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlidePurpose {
    Questions,
    Regenerate,
    IntroSummary,
    OutroSummary,
    VerifyAnswers,
    ExampleAnswer,
}

/// One vision call: a slide plus what to do with it.
#[derive(Debug, Clone)]
pub struct SlideRequest<'a> {
    pub slide: &'a Slide,
    pub purpose: SlidePurpose,
    pub system: &'static str,
    pub instruction: String,
    pub tier: ModelTier,
    pub max_tokens: u32,
}

impl<'a> SlideRequest<'a> {
    pub fn new(slide: &'a Slide, purpose: SlidePurpose, instruction: String) -> Self {
        Self {
            slide,
            purpose,
            system: super::prompts::system_prompt(purpose),
            instruction,
            tier: ModelTier::Fast,
            max_tokens: super::prompts::max_tokens(purpose),
        }
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    /// Base64 PNG of the slide, for adapters that inline images.
    pub fn image_base64(&self) -> Result<String, SlideError> {
        self.slide.to_base64_png()
    }
}
