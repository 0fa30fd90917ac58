//! The output report.
//!
//! Field names are serialized exactly as callers of the report expect them,
//! including their mixed capitalization.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::request::{JobToBeDone, Persona};

/// A top-ranked section: a unique (document, page) with its chosen title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Document file name
    #[serde(rename = "Document")]
    pub document: String,
    /// Selected or synthesized section title
    #[serde(rename = "Section title")]
    pub title: String,
    /// 1-based importance rank
    #[serde(rename = "Importance_rank")]
    pub rank: u32,
    /// Page number (1-indexed)
    #[serde(rename = "Page number")]
    pub page: u32,
}

/// A top-ranked paragraph, reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSection {
    /// Document file name
    #[serde(rename = "Document")]
    pub document: String,
    /// Full paragraph text
    #[serde(rename = "Refined Text")]
    pub text: String,
    /// Page number (1-indexed)
    #[serde(rename = "Page Number")]
    pub page: u32,
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Every discovered PDF file name, in processing order
    #[serde(rename = "Input documents")]
    pub input_documents: Vec<String>,
    /// Persona as given in the input record
    #[serde(rename = "Persona")]
    pub persona: Persona,
    /// Job to be done as given in the input record
    #[serde(rename = "Job to be done")]
    pub job_to_be_done: JobToBeDone,
    /// UTC processing time, ISO-8601 with a trailing `Z`
    #[serde(rename = "Processing timestamp")]
    pub processing_timestamp: String,
}

/// The full output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    #[serde(rename = "Metadata")]
    pub metadata: ReportMetadata,
    /// Up to five unique sections
    #[serde(rename = "Extracted Section")]
    pub extracted_sections: Vec<Section>,
    /// Up to five raw paragraphs
    #[serde(rename = "Sub-section Analysis")]
    pub sub_sections: Vec<SubSection>,
}

impl Report {
    /// Create a report with no sections.
    pub fn empty(
        input_documents: Vec<String>,
        persona: Persona,
        job_to_be_done: JobToBeDone,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                input_documents,
                persona,
                job_to_be_done,
                processing_timestamp: format_timestamp(timestamp),
            },
            extracted_sections: Vec::new(),
            sub_sections: Vec::new(),
        }
    }

    /// Attach selection results.
    pub fn with_selection(mut self, sections: Vec<Section>, sub_sections: Vec<SubSection>) -> Self {
        self.extracted_sections = sections;
        self.sub_sections = sub_sections;
        self
    }
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 7, 10, 15, 31, 22).unwrap();
        assert_eq!(format_timestamp(ts), "2025-07-10T15:31:22.000000Z");
    }

    #[test]
    fn test_report_field_names() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let report = Report::empty(
            vec!["a.pdf".to_string()],
            Persona::new("Analyst", "finance"),
            JobToBeDone::new("Summarize revenue"),
            ts,
        )
        .with_selection(
            vec![Section {
                document: "a.pdf".to_string(),
                title: "Revenue Trends".to_string(),
                rank: 1,
                page: 3,
            }],
            vec![SubSection {
                document: "a.pdf".to_string(),
                text: "Revenue grew.".to_string(),
                page: 3,
            }],
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["Metadata"]["Input documents"][0], "a.pdf");
        assert_eq!(value["Metadata"]["Persona"]["role"], "Analyst");
        assert_eq!(value["Metadata"]["Job to be done"]["task"], "Summarize revenue");
        assert_eq!(
            value["Metadata"]["Processing timestamp"],
            "2025-01-01T00:00:00.000000Z"
        );
        assert_eq!(value["Extracted Section"][0]["Section title"], "Revenue Trends");
        assert_eq!(value["Extracted Section"][0]["Importance_rank"], 1);
        assert_eq!(value["Extracted Section"][0]["Page number"], 3);
        assert_eq!(value["Sub-section Analysis"][0]["Refined Text"], "Revenue grew.");
        assert_eq!(value["Sub-section Analysis"][0]["Page Number"], 3);
    }
}
