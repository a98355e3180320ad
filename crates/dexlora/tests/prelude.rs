//! The prelude is enough to host the site headlessly.

use dexlora::prelude::*;
use dexlora::{ContactError, Rect, RelayStrategy};
use dexlora::contact::{RelayPayload, RelayResponse, TransportError};

struct Accepting;

impl dexlora::RelayTransport for Accepting {
    async fn post_json(
        &self,
        _: &str,
        _: &RelayPayload,
    ) -> std::result::Result<RelayResponse, TransportError> {
        Ok(RelayResponse::new(200, "{}"))
    }
}

fn fill(form: &mut ContactForm<Accepting>) {
    form.set_field(Field::Name, "Jane");
    form.set_field(Field::Email, "jane@x.com");
    form.set_field(Field::Message, "Hello there, interested in a quote");
}

#[test]
fn contact_page_through_the_prelude() {
    let relay = RelayConfig::new(RelayStrategy::Formspree {
        form_id: "xyzabc".into(),
    });
    let mut site = Site::new(relay, Accepting);
    let mut viewport = SoftwareViewport::new(Rect::from_size(1280, 720));
    let mut env = HeadlessEnvironment::new();

    site.open(Route::Contact, &mut viewport, &mut env);
    site.sync_layout(&mut viewport);
    site.pump_entries(&mut viewport, &mut env);
    assert_eq!(site.live_effects(), 2);

    fill(site.form_mut());
    let sent = pollster::block_on(site.submit_contact()).into_result();
    assert!(matches!(sent, Ok(true)));

    site.close(&mut viewport, &mut env);
    assert!(env.is_idle());
}

#[test]
fn unconfigured_relay_surfaces_as_error() {
    let mut site = Site::new(RelayConfig::default(), Accepting);
    fill(site.form_mut());
    let outcome = pollster::block_on(site.submit_contact()).into_result();
    let Err(Error::Contact(ContactError::Configuration(_))) = outcome else {
        panic!("expected a configuration error, got {outcome:?}");
    };
}

#[test]
fn export_includes_company_and_routes() {
    let json = dexlora::export_site_json().expect("serializable");
    assert!(json.contains("\"DexLora Innovations\""));
    assert!(json.contains("\"/contact\""));
}
