//! Speech adapter.
//!
//! Implements [`SpeechPort`] by handing the text to an external
//! text-to-speech program (`espeak-ng` by default) on a detached thread.
//! Every utterance is logged; if the program is missing or fails, the
//! failure is logged at debug level and otherwise ignored.

use std::process::{Command, Stdio};
use std::thread;

use log::{debug, info};

use crate::app::ports::SpeechPort;

pub struct SpeechAdapter {
    program: Option<String>,
    spoken: u64,
}

impl SpeechAdapter {
    /// `program = None` logs utterances without voicing them.
    pub fn new(program: Option<String>) -> Self {
        match &program {
            Some(p) => info!("SpeechAdapter: voicing alerts with {}", p),
            None => info!("SpeechAdapter: log only"),
        }
        Self { program, spoken: 0 }
    }

    pub fn spoken(&self) -> u64 {
        self.spoken
    }
}

/// eSpeak voice name for a BCP-47 tag (`te-IN` → `te`).
pub fn voice_for(language_tag: &str) -> &str {
    language_tag.split('-').next().unwrap_or(language_tag)
}

impl SpeechPort for SpeechAdapter {
    fn speak(&mut self, text: &str, language_tag: &str) {
        self.spoken += 1;
        info!("SPEAK [{}] {}", language_tag, text);

        let Some(program) = self.program.clone() else {
            return;
        };
        let voice = voice_for(language_tag).to_string();
        let text = text.to_string();
        thread::spawn(move || {
            let status = Command::new(&program)
                .arg("-v")
                .arg(&voice)
                .arg(&text)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            match status {
                Ok(s) if s.success() => {}
                Ok(s) => debug!("{} exited with {}", program, s),
                Err(e) => debug!("{} unavailable: {}", program, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_strips_region() {
        assert_eq!(voice_for("te-IN"), "te");
        assert_eq!(voice_for("en"), "en");
    }

    #[test]
    fn log_only_mode_counts_utterances() {
        let mut s = SpeechAdapter::new(None);
        s.speak("hello", "en-US");
        s.speak("again", "en-US");
        assert_eq!(s.spoken(), 2);
    }
}
