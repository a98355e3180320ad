//! Property-based tests for draft validation.
//!
//! 1. A draft passes iff trimmed name ≥ 2 chars, email matches the address
//!    shape, and trimmed message ≥ 10 chars.
//! 2. Subject never affects validity.
//! 3. Failed validation never sends; a valid draft sends exactly once.

use std::cell::Cell;

use dexlora_contact::validators::Email;
use dexlora_contact::{
    ContactDraft, ContactForm, Field, FixedClock, RelayConfig, RelayPayload, RelayResponse,
    RelayStrategy, RelayTransport, SubmitOutcome, TransportError, validate,
};
use proptest::prelude::*;
use time::OffsetDateTime;

#[derive(Debug, Default)]
struct Counting(Cell<usize>);

impl RelayTransport for Counting {
    async fn post_json(&self, _: &str, _: &RelayPayload) -> Result<RelayResponse, TransportError> {
        self.0.set(self.0.get() + 1);
        Ok(RelayResponse::new(200, "{}"))
    }
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ ]{0,3}",
        "[a-zA-Z ]{0,14}",
        "[a-z]{1,6}@[a-z]{1,6}\\.[a-z]{2,3}",
        "[a-z@. ]{0,12}",
    ]
}

fn expected_valid(draft: &ContactDraft) -> bool {
    draft.name.trim().chars().count() >= 2
        && Email::matches(&draft.email)
        && draft.message.trim().chars().count() >= 10
}

proptest! {
    #[test]
    fn validity_matches_field_rules(
        name in text(),
        email in text(),
        subject in text(),
        message in text(),
    ) {
        let draft = ContactDraft::new(name, email, subject, message);
        prop_assert_eq!(validate(&draft).is_ok(), expected_valid(&draft));
    }

    #[test]
    fn subject_does_not_affect_validity(
        name in text(),
        email in text(),
        message in text(),
        a in text(),
        b in text(),
    ) {
        let left = ContactDraft::new(name.clone(), email.clone(), a, message.clone());
        let right = ContactDraft::new(name, email, b, message);
        prop_assert_eq!(validate(&left).is_ok(), validate(&right).is_ok());
    }

    #[test]
    fn sends_only_valid_drafts(
        name in text(),
        email in text(),
        message in text(),
    ) {
        let config = RelayConfig::new(RelayStrategy::Formspree { form_id: "f".into() });
        let mut form = ContactForm::with_clock(
            config,
            Counting::default(),
            FixedClock(OffsetDateTime::UNIX_EPOCH),
        );
        form.set_field(Field::Name, name);
        form.set_field(Field::Email, email);
        form.set_field(Field::Message, message);
        let valid = validate(form.draft()).is_ok();

        let outcome = pollster::block_on(form.submit());

        prop_assert_eq!(outcome == SubmitOutcome::Sent, valid);
        prop_assert_eq!(form.transport().0.get(), usize::from(valid));
        if valid {
            prop_assert!(form.draft().is_empty());
        }
    }
}
