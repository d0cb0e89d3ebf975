//! Advice round trip: ask, hand the request off, resolve it.

use std::cell::RefCell;

use soil_dashboard::advice::{AdviceBridge, FALLBACK_ADVICE};
use soil_dashboard::app::commands::AppCommand;
use soil_dashboard::app::events::AppEvent;
use soil_dashboard::app::ports::TextGenerator;
use soil_dashboard::app::runtime::{Outbound, Runtime};
use soil_dashboard::app::service::DashboardService;
use soil_dashboard::config::DashboardConfig;
use soil_dashboard::error::ServiceError;
use soil_dashboard::reading::{Reading, Theme};

use crate::mock_ports::{MemStorage, MockDevice, MockSpeech, RecordingSink, ScriptedSensor};

type TestRuntime = Runtime<MockDevice, MockSpeech, MemStorage, RecordingSink>;

const T0: i64 = 1_000_000;

struct StubGenerator {
    reply: Result<String, ServiceError>,
    prompts: RefCell<Vec<String>>,
}

impl StubGenerator {
    fn replying(reply: Result<String, ServiceError>) -> Self {
        Self {
            reply,
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl TextGenerator for StubGenerator {
    fn generate(
        &self,
        prompt: &str,
        _system_instruction: &str,
        _temperature: f32,
    ) -> Result<String, ServiceError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply.clone()
    }
}

fn sampled_runtime(advice_available: bool) -> TestRuntime {
    let mut service = DashboardService::new(DashboardConfig::default(), Theme::Light);
    service.set_advice_available(advice_available);
    let mut rt = Runtime::new(
        service,
        MockDevice::unavailable(),
        MockSpeech::default(),
        MemStorage::default(),
        RecordingSink::default(),
    );
    rt.start(T0);
    let mut sensor = ScriptedSensor::constant(Reading::new(6.5, 45.0, 22.0, 80.0));
    rt.poll_sampling(&mut sensor, T0 + 2_000);
    rt
}

/// Run every outbound advice request through `bridge` and feed the
/// answers back, the way the shell's worker threads do.
fn resolve_with(
    rt: &mut TestRuntime,
    bridge: &AdviceBridge<StubGenerator>,
    out: Vec<Outbound>,
) -> usize {
    let mut resolved = 0;
    for item in out {
        if let Outbound::RequestAdvice { reading, question } = item {
            let result = bridge.request_advice(&reading, &question);
            rt.dispatch(AppCommand::AdviceResolved(result), T0 + 3_000);
            resolved += 1;
        }
    }
    resolved
}

#[test]
fn answer_reaches_the_advice_panel() {
    let mut rt = sampled_runtime(true);
    let bridge = AdviceBridge::new(StubGenerator::replying(Ok(
        "  Water lightly in the morning.\n".into(),
    )));

    let out = rt.dispatch(AppCommand::AskAdvice("Should I water?".into()), T0 + 2_500);
    assert!(rt.service().advice_pending());
    assert_eq!(resolve_with(&mut rt, &bridge, out), 1);

    assert!(!rt.service().advice_pending());
    assert_eq!(
        rt.service().last_advice(),
        Some("Water lightly in the morning.")
    );

    let prompts = bridge.generator().prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Moisture: 45%"));
    assert!(prompts[0].contains("Should I water?"));
    assert!(
        rt.sink()
            .events
            .contains(&AppEvent::AdviceAnswered { fallback: false })
    );
}

#[test]
fn failed_request_shows_fallback() {
    let mut rt = sampled_runtime(true);
    let bridge = AdviceBridge::new(StubGenerator::replying(Err(ServiceError::Status(503))));

    let out = rt.dispatch(AppCommand::AskAdvice("pH?".into()), T0 + 2_500);
    resolve_with(&mut rt, &bridge, out);

    assert_eq!(rt.service().last_advice(), Some(FALLBACK_ADVICE));
    assert!(
        rt.sink()
            .events
            .contains(&AppEvent::AdviceAnswered { fallback: true })
    );
}

#[test]
fn blank_answer_counts_as_failure() {
    let bridge = AdviceBridge::new(StubGenerator::replying(Ok("   ".into())));
    let reading = Reading::new(6.5, 45.0, 22.0, 80.0);
    assert_eq!(
        bridge.request_advice(&reading, "Anything?"),
        Err(ServiceError::EmptyResponse)
    );
    assert_eq!(bridge.advice_or_fallback(&reading, "Anything?"), FALLBACK_ADVICE);
}

#[test]
fn second_question_waits_for_the_first() {
    let mut rt = sampled_runtime(true);
    let first = rt.dispatch(AppCommand::AskAdvice("One?".into()), T0 + 2_500);
    let second = rt.dispatch(AppCommand::AskAdvice("Two?".into()), T0 + 2_600);

    assert!(matches!(first.as_slice(), [Outbound::RequestAdvice { .. }]));
    assert!(matches!(second.as_slice(), [Outbound::Notice(_)]));
    assert_eq!(
        rt.sink()
            .count(|e| matches!(e, AppEvent::AdviceRequested)),
        1
    );
}

#[test]
fn no_credential_means_no_request() {
    let mut rt = sampled_runtime(false);
    let out = rt.dispatch(AppCommand::AskAdvice("Water?".into()), T0 + 2_500);
    assert!(matches!(out.as_slice(), [Outbound::Notice(_)]));
    assert!(!rt.service().advice_pending());
}

#[test]
fn question_before_first_sample_is_ignored() {
    let mut service = DashboardService::new(DashboardConfig::default(), Theme::Light);
    service.set_advice_available(true);
    let mut rt = Runtime::new(
        service,
        MockDevice::unavailable(),
        MockSpeech::default(),
        MemStorage::default(),
        RecordingSink::default(),
    );
    rt.start(T0);
    assert!(
        rt.dispatch(AppCommand::AskAdvice("Water?".into()), T0)
            .is_empty()
    );
    assert!(!rt.service().advice_pending());
}
