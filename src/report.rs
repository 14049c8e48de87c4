//! Run report – a serializable summary of what one pipeline run did.

use serde::{Deserialize, Serialize};

/// Statistics for one processed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupReport {
    /// Size of the input markup in bytes.
    pub input_bytes: usize,
    /// Size of the final markup in bytes.
    pub output_bytes: usize,
    /// Elements whose `style` attribute held at least one declaration.
    pub styled_elements: usize,
    /// Single-declaration classes shared by two or more elements.
    pub shared_classes: usize,
    /// Per-element declaration-set classes.
    pub generated_classes: usize,
    /// Rules in the generated stylesheet.
    pub rules: usize,
    /// Size of the minified generated stylesheet in bytes.
    #[serde(default)]
    pub stylesheet_bytes: usize,
}

impl DedupReport {
    /// Fraction of the input removed, in `[0, 1]`; negative if the output
    /// grew.
    pub fn savings_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        1.0 - self.output_bytes as f64 / self.input_bytes as f64
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn savings_ratio() {
        let report = DedupReport {
            input_bytes: 200,
            output_bytes: 50,
            ..DedupReport::default()
        };
        assert!((report.savings_ratio() - 0.75).abs() < f64::EPSILON);
        assert_eq!(DedupReport::default().savings_ratio(), 0.0);
    }

    #[test]
    fn json_roundtrip() {
        let report = DedupReport {
            input_bytes: 10,
            output_bytes: 8,
            styled_elements: 3,
            shared_classes: 1,
            generated_classes: 2,
            rules: 3,
            stylesheet_bytes: 40,
        };
        let json = report.to_json();
        assert!(json.contains("\"generated_classes\": 2"));
        assert_eq!(DedupReport::from_json(&json).unwrap(), report);
    }

    #[test]
    fn missing_stylesheet_bytes_defaults_to_zero() {
        let json = r#"{"input_bytes":1,"output_bytes":1,"styled_elements":0,
            "shared_classes":0,"generated_classes":0,"rules":0}"#;
        assert_eq!(DedupReport::from_json(json).unwrap().stylesheet_bytes, 0);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            DedupReport::from_json("{"),
            Err(crate::Error::Json(_))
        ));
    }
}
