use gloo_timers::future::TimeoutFuture;
use thiserror::Error;

use super::state::FormSnapshot;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to encode form snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Stand-in for the consultation request endpoint: waits `delay_ms` and then
/// logs the snapshot instead of sending it anywhere.
pub async fn submit(snapshot: FormSnapshot, delay_ms: u32) -> Result<(), SubmitError> {
    TimeoutFuture::new(delay_ms).await;

    let payload = serde_json::to_string(&snapshot)?;
    log::info!("Form submitted: {}", payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_describe_the_failure() {
        let encode: SubmitError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(encode.to_string().starts_with("failed to encode form snapshot"));
    }

    #[test]
    fn snapshot_serializes_all_five_fields() {
        let snapshot = FormSnapshot {
            name: "홍길동".to_string(),
            phone: "010-1234-5678".to_string(),
            email: "a@b.co".to_string(),
            company: String::new(),
            message: "문의".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phone"], "010-1234-5678");
        assert_eq!(json["company"], "");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
