//! Minijinja template rendering for alert messages.
//!
//! Renders alert subject and body templates using minijinja, with access
//! to the alert header and a summary of its records.
//!
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use bucketwatch_core::config::AlertTemplateConfig;
use bucketwatch_core::AnomalyRecord;
use bucketwatch_rules::Alert;

use crate::error::NotifyError;

pub const DEFAULT_SUBJECT: &str =
    "[{{ alert.alert_type }}] {{ alert.job_id }} anomaly score {{ alert.anomaly_score | round(1) }}";

pub const DEFAULT_BODY: &str = "\
Job {{ alert.job_id }} at {{ alert.timestamp }}{% if alert.is_interim %} (interim){% endif %}: \
score {{ alert.anomaly_score | round(1) }}, max probability {{ alert.max_normalized_probability | round(1) }}, \
{{ alert.record_count }} record(s)\
{% for r in alert.records %}; {{ r.label }} actual={{ r.actual | round(2) }} typical={{ r.typical | round(2) }}{% endfor %}";

/// Context data available to alert templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TemplateContext {
    pub alert: AlertContext,
    /// Current timestamp in RFC 3339 format.
    pub now: String,
}

/// Alert header exposed to templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AlertContext {
    pub id: String,
    pub job_id: String,
    pub alert_type: String,
    pub timestamp: String,
    pub anomaly_score: f64,
    pub max_normalized_probability: f64,
    pub is_interim: bool,
    pub has_bucket: bool,
    pub record_count: usize,
    pub records: Vec<RecordContext>,
}

/// One record, flattened for templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RecordContext {
    /// `function(field) by/over/partition` description.
    pub label: String,
    pub normalized_probability: f64,
    pub actual: f64,
    pub typical: f64,
}

impl TemplateContext {
    pub fn from_alert(alert: &Alert) -> Self {
        let records: Vec<RecordContext> = alert.records().iter().map(RecordContext::from).collect();
        Self {
            alert: AlertContext {
                id: alert.id.to_string(),
                job_id: alert.job_id.clone(),
                alert_type: alert.alert_type.to_string(),
                timestamp: alert.timestamp.to_rfc3339(),
                anomaly_score: alert.anomaly_score,
                max_normalized_probability: alert.max_normalized_probability,
                is_interim: alert.is_interim,
                has_bucket: alert.bucket().is_some(),
                record_count: records.len(),
                records,
            },
            now: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl From<&AnomalyRecord> for RecordContext {
    fn from(record: &AnomalyRecord) -> Self {
        let mut label = match (&record.function, &record.field_name) {
            (Some(function), Some(field)) => format!("{function}({field})"),
            (Some(function), None) => function.clone(),
            (None, Some(field)) => field.clone(),
            (None, None) => format!("detector {}", record.detector_index),
        };
        for value in [
            &record.by_field_value,
            &record.over_field_value,
            &record.partition_field_value,
        ]
        .into_iter()
        .flatten()
        {
            label.push(' ');
            label.push_str(value);
        }

        Self {
            label,
            normalized_probability: record.normalized_probability,
            actual: record.actual_value().unwrap_or(f64::NAN),
            typical: record.typical_value().unwrap_or(f64::NAN),
        }
    }
}

/// Renders alert templates using minijinja.
///
/// A fresh [`minijinja::Environment`] is created per render call since
/// templates are dynamic strings, not pre-registered files.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a configured minijinja environment with the custom filters.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.add_filter("round", round_filter);
        env.add_filter("lower", lower_filter);
        env.add_filter("upper", upper_filter);
        env
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, ctx: &TemplateContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Validate that a template string parses without errors.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A rendered alert message.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RenderedAlert {
    pub subject: String,
    pub body: String,
}

/// Subject and body templates, validated on construction.
#[derive(Debug, Clone)]
pub struct AlertTemplates {
    subject: String,
    body: String,
}

impl AlertTemplates {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Result<Self, NotifyError> {
        let templates = Self {
            subject: subject.into(),
            body: body.into(),
        };
        let renderer = TemplateRenderer::new();
        renderer.validate(&templates.subject)?;
        renderer.validate(&templates.body)?;
        Ok(templates)
    }

    /// Templates from configuration, falling back to the defaults.
    pub fn from_config(config: &AlertTemplateConfig) -> Result<Self, NotifyError> {
        Self::new(
            config.subject_template.as_deref().unwrap_or(DEFAULT_SUBJECT),
            config.body_template.as_deref().unwrap_or(DEFAULT_BODY),
        )
    }

    pub fn render(&self, alert: &Alert) -> Result<RenderedAlert, NotifyError> {
        let renderer = TemplateRenderer::new();
        let ctx = TemplateContext::from_alert(alert);
        Ok(RenderedAlert {
            subject: renderer.render(&self.subject, &ctx)?,
            body: renderer.render(&self.body, &ctx)?,
        })
    }
}

impl Default for AlertTemplates {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

/// Custom filter: round a float to N decimal places.
fn round_filter(value: f64, decimals: Option<u32>) -> String {
    let n = decimals.unwrap_or(0);
    format!("{:.prec$}", value, prec = n as usize)
}

fn lower_filter(value: String) -> String {
    value.to_lowercase()
}

fn upper_filter(value: String) -> String {
    value.to_uppercase()
}
