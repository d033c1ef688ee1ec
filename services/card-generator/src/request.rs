//! Generation requests and their JSON job form.

use serde::Deserialize;
use std::collections::BTreeMap;

use card_common::{FieldName, FieldValues};
use renderer::encode::OutputFormat;

/// A template key plus the literal text for each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub template: String,
    pub values: FieldValues,
}

impl GenerationRequest {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            values: FieldValues::new(),
        }
    }

    /// Set the text for `field`, replacing any previous value.
    pub fn with(mut self, field: FieldName, text: impl Into<String>) -> Self {
        self.values.insert(field, text.into());
        self
    }

    /// Build from loosely named fields (`"name"`, `"ACCOUNT"`, ...).
    pub fn from_named<I, K, V>(template: impl Into<String>, fields: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        fields
            .into_iter()
            .try_fold(Self::new(template), |request, (name, text)| {
                let field: FieldName = name.as_ref().parse()?;
                Ok(request.with(field, text))
            })
    }
}

/// One entry of a batch job file.
///
/// ```json
/// { "template": "v1", "fields": { "name": "Alice", "account": "12345", "expiration": "12/30" } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    pub template: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Overrides the batch-wide output format.
    #[serde(default)]
    pub format: Option<String>,
}

impl JobSpec {
    pub fn into_request(self) -> Result<(GenerationRequest, Option<OutputFormat>), String> {
        let format = self
            .format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()?;
        let request = GenerationRequest::from_named(self.template, self.fields)?;
        Ok((request, format))
    }
}

/// Parse a batch job file: a JSON array of [`JobSpec`].
pub fn parse_jobs(json: &str) -> Result<Vec<JobSpec>, serde_json::Error> {
    serde_json::from_str(json)
}
