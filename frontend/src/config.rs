use log::Level;
use serde::Deserialize;
use web_sys::Document;

/// Id of the optional `<script type="application/json">` block a page can use
/// to override any part of [`SiteConfig`].
pub const CONFIG_SCRIPT_ID: &str = "formi-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StaggerRule {
    pub selector: String,
    pub base_delay_secs: f64,
}

impl StaggerRule {
    fn new(selector: &str, base_delay_secs: f64) -> Self {
        Self {
            selector: selector.to_string(),
            base_delay_secs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub effects_host_id: String,

    // contact form already in the page
    pub form_id: String,
    pub submit_button_selector: String,
    pub error_selector: String,
    pub error_class: String,

    // scroll & animation
    pub scroll_top_threshold_px: f64,
    pub parallax_speed: f64,
    pub reveal_selector: String,
    pub reveal_threshold: f64,
    pub reveal_bottom_margin_px: f64,
    pub lazy_image_selector: String,
    pub anchor_selector: String,
    pub header_selector: String,
    pub hero_id: String,
    pub stagger: Vec<StaggerRule>,

    // submission
    pub submit_delay_ms: u32,
    pub success_hide_ms: u32,

    // analytics
    pub cta_selector: String,

    // copy
    pub submitting_label: String,
    pub success_message: String,
    pub failure_alert: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            effects_host_id: "formi-effects".to_string(),
            form_id: "contactForm".to_string(),
            submit_button_selector: "button[type=\"submit\"]".to_string(),
            error_selector: ".error-message".to_string(),
            error_class: "border-red-500".to_string(),
            scroll_top_threshold_px: 300.0,
            parallax_speed: 0.5,
            reveal_selector: ".slide-up".to_string(),
            reveal_threshold: 0.1,
            reveal_bottom_margin_px: 50.0,
            lazy_image_selector: "img[data-src]".to_string(),
            anchor_selector: "a[href^=\"#\"]".to_string(),
            header_selector: "header".to_string(),
            hero_id: "hero".to_string(),
            stagger: vec![
                StaggerRule::new(".card", 0.15),
                StaggerRule::new(".feature-card", 0.1),
                StaggerRule::new(".process-step", 0.1),
            ],
            submit_delay_ms: 1_500,
            success_hide_ms: 5_000,
            cta_selector: ".btn-primary, .btn-secondary".to_string(),
            submitting_label: "전송 중...".to_string(),
            success_message: "상담 신청이 완료되었습니다! 빠른 시일 내에 연락드리겠습니다.".to_string(),
            failure_alert: "상담 신청 중 오류가 발생했습니다. 다시 시도해주세요.".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// IntersectionObserver root margin shrinking the viewport from the bottom.
    pub fn reveal_root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.reveal_bottom_margin_px)
    }

    /// Reads the page's embedded override block, falling back to defaults.
    pub fn load(document: &Document) -> Self {
        let raw = match document
            .get_element_by_id(CONFIG_SCRIPT_ID)
            .and_then(|el| el.text_content())
        {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Self::default(),
        };

        match Self::from_json(&raw) {
            Ok(config) => {
                log::debug!("Loaded site config overrides from #{}", CONFIG_SCRIPT_ID);
                config
            }
            Err(e) => {
                log::warn!("Ignoring invalid #{} block: {}", CONFIG_SCRIPT_ID, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_behavior() {
        let config = SiteConfig::default();
        assert_eq!(config.scroll_top_threshold_px, 300.0);
        assert_eq!(config.submit_delay_ms, 1_500);
        assert_eq!(config.success_hide_ms, 5_000);
        assert_eq!(config.reveal_root_margin(), "0px 0px -50px 0px");
        assert_eq!(config.stagger.len(), 3);
        assert_eq!(config.stagger[0], StaggerRule::new(".card", 0.15));
        assert_eq!(config.form_id, "contactForm");
        assert_eq!(config.submit_button_selector, r#"button[type="submit"]"#);
        assert_eq!(config.error_selector, ".error-message");
        assert_eq!(config.error_class, "border-red-500");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SiteConfig::from_json(
            r#"{"scroll_top_threshold_px": 500, "submitting_label": "Sending..."}"#,
        )
        .unwrap();

        assert_eq!(config.scroll_top_threshold_px, 500.0);
        assert_eq!(config.submitting_label, "Sending...");
        assert_eq!(config.form_id, "contactForm");
        assert_eq!(config.submit_delay_ms, 1_500);
        assert_eq!(config.hero_id, "hero");
    }

    #[test]
    fn stagger_rules_can_be_replaced() {
        let config = SiteConfig::from_json(
            r#"{"stagger": [{"selector": ".tile", "base_delay_secs": 0.2}]}"#,
        )
        .unwrap();
        assert_eq!(config.stagger, vec![StaggerRule::new(".tile", 0.2)]);
    }

    #[test]
    fn malformed_override_is_an_error() {
        assert!(SiteConfig::from_json("{not json").is_err());
        assert!(SiteConfig::from_json(r#"{"submit_delay_ms": "soon"}"#).is_err());
    }
}
