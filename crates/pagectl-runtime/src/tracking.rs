#![forbid(unsafe_code)]

//! Conversion and engagement reporting.
//!
//! Thin helpers that shape the analytics payloads; every call goes through
//! the injected collaborators and is a no-op when they are absent.

use pagectl_core::capability::props;
use pagectl_core::{Analytics, ConversionPixel};
use serde_json::json;

/// A quote request was acknowledged.
pub fn report_lead(analytics: &dyn Analytics) {
    analytics.event(
        "form_submit",
        &props([
            ("event_category", json!("Lead")),
            ("event_label", json!("Quote Request")),
        ]),
    );
}

/// A `tel:` link was activated.
pub fn report_phone_call(analytics: &dyn Analytics, pixel: &dyn ConversionPixel) {
    analytics.event(
        "click",
        &props([
            ("event_category", json!("Contact")),
            ("event_label", json!("Phone Call")),
            ("value", json!(1)),
        ]),
    );
    pixel.track("Contact");
}

/// The page is about to be printed.
pub fn report_print(analytics: &dyn Analytics, title: &str) {
    analytics.event(
        "print",
        &props([
            ("event_category", json!("Engagement")),
            ("event_label", json!(title)),
        ]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagectl_core::EventProps;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Log(RefCell<Vec<(String, EventProps)>>);

    impl Analytics for Log {
        fn event(&self, event: &str, props: &EventProps) {
            self.0.borrow_mut().push((event.to_owned(), props.clone()));
        }
    }

    impl ConversionPixel for Log {
        fn track(&self, event: &str) {
            self.0.borrow_mut().push((format!("pixel:{event}"), EventProps::new()));
        }
    }

    #[test]
    fn phone_call_hits_both_collaborators() {
        let log = Log::default();
        report_phone_call(&log, &log);
        let events = log.0.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "click");
        assert_eq!(events[0].1["value"], json!(1));
        assert_eq!(events[1].0, "pixel:Contact");
    }

    #[test]
    fn print_carries_title() {
        let log = Log::default();
        report_print(&log, "Gallery | Hudson Pressure Pros");
        assert_eq!(
            log.0.borrow()[0].1["event_label"],
            json!("Gallery | Hudson Pressure Pros")
        );
    }
}
