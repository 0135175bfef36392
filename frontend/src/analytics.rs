use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub category: String,
    pub action: String,
    pub label: String,
    pub recorded_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(category: &str, action: &str, label: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            action: action.to_string(),
            label: label.into(),
            recorded_at: Utc::now(),
        }
    }

    pub fn cta_click(button_text: &str) -> Self {
        Self::new("CTA", "click", button_text.trim())
    }

    pub fn field_focus(field_name: &str) -> Self {
        Self::new("Form", "field_focus", field_name)
    }

    pub fn page_load(load_time_ms: f64) -> Self {
        Self::new("Performance", "page_load", format!("{}ms", load_time_ms))
    }

    /// Ingestion payload, including when the event was recorded.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.category, self.action, self.label)
    }
}

/// Where tracked events go. Recording is fire-and-forget.
pub trait EventSink {
    fn record(&self, event: &AnalyticsEvent);
}

pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn record(&self, event: &AnalyticsEvent) {
        log::info!("Analytics: {}", event);
        match event.to_json() {
            Ok(json) => log::debug!("Analytics event: {}", json),
            Err(e) => log::debug!("Analytics event not encodable: {}", e),
        }
    }
}

/// Cloneable handle passed to components as a prop.
#[derive(Clone)]
pub struct Tracker(Rc<dyn EventSink>);

impl Tracker {
    pub fn new(sink: impl EventSink + 'static) -> Self {
        Self(Rc::new(sink))
    }

    pub fn track(&self, event: AnalyticsEvent) {
        self.0.record(&event);
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(ConsoleSink)
    }
}

impl PartialEq for Tracker {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Milliseconds between navigation start and the end of DOMContentLoaded.
/// `None` when the browser has not filled in either mark yet.
pub fn load_time_ms(navigation_start: f64, dom_content_loaded_end: f64) -> Option<f64> {
    if navigation_start <= 0.0 || dom_content_loaded_end <= 0.0 {
        return None;
    }
    Some((dom_content_loaded_end - navigation_start).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl EventSink for Rc<Recorder> {
        fn record(&self, event: &AnalyticsEvent) {
            self.0.borrow_mut().push(event.to_string());
        }
    }

    #[test]
    fn cta_label_is_trimmed_button_text() {
        let event = AnalyticsEvent::cta_click("\n   무료 상담 신청   \n");
        assert_eq!(event.to_string(), "CTA - click - 무료 상담 신청");
    }

    #[test]
    fn field_focus_uses_field_name() {
        let event = AnalyticsEvent::field_focus("email");
        assert_eq!(event.category, "Form");
        assert_eq!(event.action, "field_focus");
        assert_eq!(event.label, "email");
    }

    #[test]
    fn page_load_label_is_in_milliseconds() {
        assert_eq!(AnalyticsEvent::page_load(842.0).label, "842ms");
    }

    #[test]
    fn json_payload_carries_timestamp() {
        let event = AnalyticsEvent::field_focus("phone");
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(json["category"], "Form");
        assert_eq!(json["label"], "phone");
        let recorded_at: DateTime<Utc> =
            serde_json::from_value(json["recorded_at"].clone()).unwrap();
        assert_eq!(recorded_at, event.recorded_at);
    }

    #[test]
    fn load_time_needs_both_marks() {
        assert_eq!(load_time_ms(1_000.0, 1_842.0), Some(842.0));
        assert_eq!(load_time_ms(1_000.0, 0.0), None);
        assert_eq!(load_time_ms(0.0, 1_842.0), None);
    }

    #[test]
    fn tracker_forwards_to_sink() {
        let recorder = Rc::new(Recorder::default());
        let tracker = Tracker::new(recorder.clone());

        tracker.track(AnalyticsEvent::cta_click("Start"));
        tracker.track(AnalyticsEvent::field_focus("name"));

        assert_eq!(
            *recorder.0.borrow(),
            vec!["CTA - click - Start".to_string(), "Form - field_focus - name".to_string()]
        );
    }

    #[test]
    fn tracker_equality_is_identity() {
        let a = Tracker::default();
        let b = a.clone();
        assert!(a == b);
        assert!(a != Tracker::default());
    }
}
