//! Advice request bridge.
//!
//! Turns the current reading plus a farmer's free-text question into a
//! prompt for a hosted text-generation model and hands back the trimmed
//! answer.  The bridge is generic over [`TextGenerator`], so the service
//! and tests never need the network.

pub mod gemini;

use log::{info, warn};

use crate::app::ports::TextGenerator;
use crate::error::ServiceError;
use crate::reading::Reading;

/// Shown instead of an answer when the request fails for any reason.
pub const FALLBACK_ADVICE: &str = "Sorry, I could not get advice right now.";

/// Sampling temperature used for every request.
pub const ADVICE_TEMPERATURE: f32 = 0.5;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert agricultural AI assistant. \
Given real-time soil data, your task is to provide a concise, actionable answer to a \
farmer's question. Be direct and helpful.

Example:
- Soil Data: pH 7.1, Moisture 35%, Temp 28°C
- Question: \"Is this good for tomatoes?\"
- Answer: \"No, the moisture is a bit low for tomatoes. Try to increase it to around 60-70%.\"
";

/// User prompt for `reading` and `question`.  The question is embedded
/// verbatim.
pub fn build_prompt(reading: &Reading, question: &str) -> String {
    format!(
        "Current Soil Data:\n- pH: {:.1}\n- Moisture: {:.0}%\n- Temperature: {:.0}°C\n\n\
         Farmer's Question: \"{}\"",
        reading.ph, reading.moisture, reading.temperature, question
    )
}

pub struct AdviceBridge<G: TextGenerator> {
    generator: G,
    temperature: f32,
}

impl<G: TextGenerator> AdviceBridge<G> {
    pub fn new(generator: G) -> Self {
        Self::with_temperature(generator, ADVICE_TEMPERATURE)
    }

    pub fn with_temperature(generator: G, temperature: f32) -> Self {
        Self {
            generator,
            temperature,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// One request, no retry.  The answer is trimmed; a blank answer is
    /// [`ServiceError::EmptyResponse`].
    pub fn request_advice(&self, reading: &Reading, question: &str) -> Result<String, ServiceError> {
        let prompt = build_prompt(reading, question);
        info!("Advice requested ({} chars)", question.len());
        let raw = self
            .generator
            .generate(&prompt, SYSTEM_INSTRUCTION, self.temperature)?;
        let answer = raw.trim();
        if answer.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(answer.to_string())
    }

    /// [`request_advice`](Self::request_advice), with every failure
    /// replaced by [`FALLBACK_ADVICE`].
    pub fn advice_or_fallback(&self, reading: &Reading, question: &str) -> String {
        self.request_advice(reading, question).unwrap_or_else(|e| {
            warn!("Advice request failed: {}", e);
            FALLBACK_ADVICE.to_string()
        })
    }
}
