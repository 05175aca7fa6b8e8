//! Saved webhook configuration.

use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::postback::DeliveryTarget;

/// Delivery settings stored with a webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Destination and credentials.
    #[serde(flatten)]
    pub target: DeliveryTarget,
    /// Free-form label.
    #[serde(default)]
    pub label: String,
}

impl WebhookConfig {
    /// Apply the same format rules as inline postbacks.
    ///
    /// # Errors
    ///
    /// Returns the first rule the target violates.
    pub fn validate(&self) -> ModelResult<()> {
        self.target.validate()
    }
}

/// Body of webhook create (`POST`) and update (`PATCH`) calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookRequest {
    /// Webhook identifier; present only on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whether deliveries are paused.
    pub disabled: bool,
    /// Delivery settings.
    pub config: WebhookConfig,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ModelError;
    use crate::postback::PostbackFormat;

    #[test]
    fn create_request_omits_id() {
        let request = WebhookRequest {
            id: None,
            disabled: false,
            config: WebhookConfig {
                target: DeliveryTarget {
                    url: "https://hook.example/in".into(),
                    ..DeliveryTarget::default()
                },
                label: "soc".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({
                "disabled": false,
                "config": {
                    "url": "https://hook.example/in",
                    "token": "",
                    "fingerprint": "",
                    "label": "soc",
                    "format": "",
                    "bucket": "",
                    "region": "",
                    "accesskey": "",
                    "secretkey": ""
                }
            })
        );
    }

    #[test]
    fn validation_follows_delivery_rules() {
        let config = WebhookConfig {
            target: DeliveryTarget {
                url: "https://splunk.example".into(),
                format: PostbackFormat::Splunk,
                ..DeliveryTarget::default()
            },
            label: String::new(),
        };
        assert_eq!(config.validate(), Err(ModelError::MissingSplunkToken));
    }
}
