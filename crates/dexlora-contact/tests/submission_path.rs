//! Submission path tests: draft → validation → relay → outcome, against a
//! scripted transport that records every request.

use std::cell::RefCell;
use std::collections::VecDeque;

use dexlora_contact::{
    ConfigError, ContactError, ContactForm, Field, FixedClock, RelayConfig, RelayPayload,
    RelayResponse, RelayStrategy, RelayTransport, SubmitOutcome, TransportError,
    TransportErrorKind,
};
use pretty_assertions::assert_eq;
use time::macros::datetime;

#[derive(Debug, Default)]
struct MockTransport {
    requests: RefCell<Vec<(String, RelayPayload)>>,
    replies: RefCell<VecDeque<Result<RelayResponse, TransportError>>>,
}

impl MockTransport {
    fn replying(replies: impl IntoIterator<Item = Result<RelayResponse, TransportError>>) -> Self {
        Self {
            requests: RefCell::default(),
            replies: RefCell::new(replies.into_iter().collect()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl RelayTransport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        payload: &RelayPayload,
    ) -> Result<RelayResponse, TransportError> {
        self.requests
            .borrow_mut()
            .push((url.to_owned(), payload.clone()));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(RelayResponse::new(200, r#"{"ok":true}"#)))
    }
}

fn formspree() -> RelayConfig {
    RelayConfig::new(RelayStrategy::Formspree {
        form_id: "xyzabc".into(),
    })
}

fn form_with(
    config: RelayConfig,
    transport: MockTransport,
) -> ContactForm<MockTransport, FixedClock> {
    ContactForm::with_clock(config, transport, FixedClock(datetime!(2026-10-19 14:05 UTC)))
}

fn fill_jane(form: &mut ContactForm<MockTransport, FixedClock>) {
    form.set_field(Field::Name, "Jane");
    form.set_field(Field::Email, "jane@x.com");
    form.set_field(Field::Subject, "");
    form.set_field(Field::Message, "Hello there, interested in a quote");
}

#[test]
fn jane_end_to_end() {
    let mut form = form_with(formspree(), MockTransport::default());
    fill_jane(&mut form);

    let outcome = pollster::block_on(form.submit());

    assert_eq!(outcome, SubmitOutcome::Sent);
    let requests = form.transport().requests.borrow();
    assert_eq!(requests.len(), 1);
    let (url, payload) = &requests[0];
    assert_eq!(url, "https://formspree.io/f/xyzabc");
    assert_eq!(payload.name, "Jane");
    assert_eq!(payload.subject, "General Inquiry");
    assert_eq!(payload.submitted_at, "October 19, 2026 at 14:05 UTC");
    drop(requests);

    assert!(form.draft().is_empty());
    assert!(form.errors().is_empty());
    let notices = form.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Message Sent!");
}

#[test]
fn invalid_draft_never_reaches_the_network() {
    let mut form = form_with(formspree(), MockTransport::default());
    form.set_field(Field::Name, "J");
    form.set_field(Field::Email, "not-an-email");
    form.set_field(Field::Message, "short");

    let outcome = pollster::block_on(form.submit());

    let SubmitOutcome::Failed(ContactError::Validation(errors)) = outcome else {
        panic!("expected validation failure, got {outcome:?}");
    };
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec![Field::Name, Field::Email, Field::Message]
    );
    assert_eq!(form.transport().request_count(), 0);
    assert_eq!(form.draft().name, "J");
    assert_eq!(
        form.errors().get(Field::Email).map(|e| e.message.as_str()),
        Some("Please enter a valid email address")
    );
    let notices = form.take_notices();
    assert_eq!(notices[0].title, "Validation Error");
}

#[test]
fn network_failure_keeps_the_draft() {
    let transport = MockTransport::replying([Err(TransportError::new(
        TransportErrorKind::Connect,
        "connection refused",
    ))]);
    let mut form = form_with(formspree(), transport);
    fill_jane(&mut form);
    let before = form.draft().clone();

    let outcome = pollster::block_on(form.submit());

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(ContactError::Transport(_))
    ));
    assert_eq!(form.transport().request_count(), 1);
    assert_eq!(form.draft(), &before);
    assert!(!form.is_submitting());
    let notices = form.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Failed to Send Message");
}

#[test]
fn relay_rejection_is_a_failure() {
    let transport = MockTransport::replying([Ok(RelayResponse::new(
        200,
        r#"{"success":false,"message":"Invalid access key"}"#,
    ))]);
    let config = RelayConfig::new(RelayStrategy::Web3Forms {
        access_key: "bad".into(),
    });
    let mut form = form_with(config, transport);
    fill_jane(&mut form);

    let outcome = pollster::block_on(form.submit());

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(ContactError::Rejected {
            status: 200,
            message: "Invalid access key".into(),
        })
    );
    assert!(!form.draft().is_empty());
    let url = form.transport().requests.borrow()[0].0.clone();
    assert_eq!(url, "https://api.web3forms.com/submit");
}

#[test]
fn unconfigured_relay_fails_before_sending() {
    let mut form = form_with(RelayConfig::from_lookup(|_| None), MockTransport::default());
    fill_jane(&mut form);

    let outcome = pollster::block_on(form.submit());

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(ContactError::Configuration(ConfigError::MissingCredential))
    );
    assert_eq!(form.transport().request_count(), 0);
    assert!(!form.draft().is_empty());
}

#[test]
fn second_submit_while_pending_is_busy() {
    let mut form = form_with(formspree(), MockTransport::default());
    fill_jane(&mut form);

    let pending = form.begin_submit().expect("valid draft");
    assert_eq!(pollster::block_on(form.submit()), SubmitOutcome::Busy);

    let result = pollster::block_on(pending.send(form.transport()));
    assert_eq!(form.finish_submit(result), SubmitOutcome::Sent);
    assert_eq!(form.transport().request_count(), 1);
}

#[test]
fn retry_after_failure_sends_again() {
    let transport = MockTransport::replying([
        Ok(RelayResponse::new(503, "Service Unavailable")),
        Ok(RelayResponse::new(200, r#"{"ok":true}"#)),
    ]);
    let mut form = form_with(formspree(), transport);
    fill_jane(&mut form);

    assert!(!pollster::block_on(form.submit()).is_sent());
    assert!(pollster::block_on(form.submit()).is_sent());
    assert_eq!(form.transport().request_count(), 2);
}
