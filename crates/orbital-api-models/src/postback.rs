//! Result delivery targets and the postback grammar.
//!
//! Grammar: `URL [token [fingerprint [format [bucket region accesskey secretkey]]]]`.
//! Fields are positional and whitespace-delimited; a literal `''` or `""`
//! stands for an empty field so later fields can still be supplied.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Payload format understood by the delivery endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostbackFormat {
    /// Plain JSON results.
    #[default]
    #[serde(rename = "")]
    Default,
    /// Cisco Threat Intelligence Model.
    #[serde(rename = "ctim")]
    Ctim,
    /// Splunk HTTP event collector.
    #[serde(rename = "splunk")]
    Splunk,
    /// Amazon S3 bucket.
    #[serde(rename = "s3")]
    S3,
}

impl PostbackFormat {
    /// Parse a format name; an empty string or `default` selects [`Self::Default`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownFormat`] for any other name.
    pub fn parse(raw: &str) -> ModelResult<Self> {
        match raw.trim() {
            "" | "default" => Ok(Self::Default),
            "ctim" => Ok(Self::Ctim),
            "splunk" => Ok(Self::Splunk),
            "s3" => Ok(Self::S3),
            other => Err(ModelError::UnknownFormat {
                value: other.to_string(),
            }),
        }
    }
}

/// Inline description of where and how results are delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTarget {
    /// Destination URL.
    pub url: String,
    /// Bearer token presented to the destination (or Splunk token).
    pub token: String,
    /// Fingerprint used to pin the destination certificate.
    pub fingerprint: String,
    /// Payload format.
    pub format: PostbackFormat,
    /// S3 bucket name.
    pub bucket: String,
    /// S3 region.
    pub region: String,
    /// S3 access key.
    pub accesskey: String,
    /// S3 secret key.
    pub secretkey: String,
}

impl DeliveryTarget {
    /// Check the field combination required by the selected format.
    ///
    /// # Errors
    ///
    /// Returns the first rule the target violates.
    pub fn validate(&self) -> ModelResult<()> {
        if self.format != PostbackFormat::Ctim && self.url.is_empty() {
            return Err(ModelError::MissingUrl);
        }
        if self.format == PostbackFormat::Splunk && self.token.is_empty() {
            return Err(ModelError::MissingSplunkToken);
        }
        if self.format == PostbackFormat::S3
            && [&self.bucket, &self.region, &self.accesskey, &self.secretkey]
                .iter()
                .any(|field| field.is_empty())
        {
            return Err(ModelError::IncompleteS3Target);
        }
        Ok(())
    }
}

impl FromStr for DeliveryTarget {
    type Err = ModelError;

    fn from_str(data: &str) -> ModelResult<Self> {
        let fields: Vec<String> = data
            .split_whitespace()
            .map(|field| match field {
                "''" | "\"\"" => String::new(),
                other => other.to_string(),
            })
            .collect();

        match fields.len() {
            1..=4 | 8 => {}
            count => return Err(ModelError::PostbackFieldCount { count }),
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        let url = next();
        let token = next();
        let fingerprint = next();
        let format = PostbackFormat::parse(&next())?;
        let target = Self {
            url,
            token,
            fingerprint,
            format,
            bucket: next(),
            region: next(),
            accesskey: next(),
            secretkey: next(),
        };
        target.validate()?;
        Ok(target)
    }
}

/// Delivery target attached to a scheduled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Postback {
    /// Reference to a webhook saved on the service.
    Webhook {
        /// Identifier of the saved webhook.
        webhookid: String,
    },
    /// Fully described inline target.
    Inline(DeliveryTarget),
}

impl Postback {
    /// Reference an existing webhook; no other fields are consulted.
    #[must_use]
    pub fn webhook(id: impl Into<String>) -> Self {
        Self::Webhook {
            webhookid: id.into(),
        }
    }
}

impl FromStr for Postback {
    type Err = ModelError;

    fn from_str(data: &str) -> ModelResult<Self> {
        data.parse().map(Self::Inline)
    }
}
