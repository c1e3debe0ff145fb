//! Assess command implementation
//!
//! Scores one assessment request read from a JSON file or given inline.

use super::{fraud_detector, in_memory_engine};
use crate::config::ServiceConfig;
use crate::{CliError, Result};
use scoring_core::types::{AssessmentRequest, AssessmentResponse};
use std::path::Path;
use tracing::info;

/// Output formats accepted by `assess`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            ))),
        }
    }
}

/// Run the assess command
pub async fn run(config: &ServiceConfig, request: &str, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let request = load_request(request)?;

    info!(
        customer_id = %request.customer_id,
        transactions = request.transactions.len(),
        "Starting assessment"
    );

    let engine = in_memory_engine(config, fraud_detector(&config.fraud)?)?;
    let response = engine.assess(request).await?;

    println!("{}", render(&response, format)?);
    Ok(())
}

/// Reads a request from inline JSON or from a file path.
pub fn load_request(source: &str) -> Result<AssessmentRequest> {
    let trimmed = source.trim_start();
    let content = if trimmed.starts_with('{') {
        source.to_string()
    } else {
        let path = Path::new(source);
        if !path.exists() {
            return Err(CliError::FileNotFound(source.to_string()));
        }
        std::fs::read_to_string(path)
            .map_err(|e| CliError::InvalidRequest(format!("{}: {}", source, e)))?
    };

    serde_json::from_str(&content).map_err(|e| CliError::InvalidRequest(e.to_string()))
}

/// Renders a response in the requested format.
pub fn render(response: &AssessmentResponse, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(response).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Table => Ok(render_table(response)),
    }
}

fn render_table(response: &AssessmentResponse) -> String {
    let optional = |value: Option<f64>| match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    };

    let mut rows = vec![
        ("Assessment", response.assessment_id.to_string()),
        ("Customer", response.customer_id.to_string()),
        ("Score", format!("{:.2}", response.score)),
        ("Category", response.category.to_string()),
        ("Confidence", format!("{}%", response.confidence)),
        ("Fraud", format!("{:.4}", response.breakdown.fraud)),
        ("Behavioral", format!("{:.4}", response.breakdown.behavioral)),
        ("Market", optional(response.breakdown.market)),
        ("External", optional(response.breakdown.external)),
    ];
    if let Some(level) = &response.fraud_risk_level {
        rows.push(("Fraud level", level.clone()));
    }

    let width = rows
        .iter()
        .map(|(_, value)| value.len())
        .max()
        .unwrap_or(0)
        .max(10);

    let mut out = String::new();
    let rule = |left: &str, mid: &str, right: &str| {
        format!("{}{}{}{}{}\n", left, "─".repeat(14), mid, "─".repeat(width + 2), right)
    };
    out.push_str(&rule("┌", "┬", "┐"));
    for (label, value) in &rows {
        out.push_str(&format!("│ {:<12} │ {:<width$} │\n", label, value, width = width));
    }
    out.push_str(&rule("└", "┴", "┘"));

    out.push_str("Recommendations:\n");
    for (i, recommendation) in response.recommendations.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, recommendation));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> AssessmentResponse {
        serde_json::from_value(serde_json::json!({
            "assessmentId": "7d1c9a52-3e0b-4f7e-9a55-0f2f5d2a9c10",
            "customerId": "CUST-001",
            "score": 385.71,
            "category": "MEDIUM",
            "confidence": 60,
            "recommendations": [
                "Increase monitoring frequency",
                "Gather additional customer data"
            ],
            "breakdown": { "fraud": 0.3, "behavioral": 0.5 },
            "assessedAt": "2024-05-01T12:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_load_inline_request() {
        let request = load_request(
            r#"{"customerId": "CUST-9", "transactions": [{"amount": 12.5, "category": "retail"}]}"#,
        )
        .unwrap();
        assert_eq!(request.customer_id.as_str(), "CUST-9");
        assert_eq!(request.transactions.len(), 1);
        assert!(request.market_conditions.is_none());
    }

    #[test]
    fn test_load_request_from_file() {
        let path = std::env::temp_dir()
            .join(format!("riskscore-request-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"customerId": "CUST-F"}"#).unwrap();

        let request = load_request(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(request.customer_id.as_str(), "CUST-F");
        assert!(request.transactions.is_empty());
    }

    #[test]
    fn test_load_request_errors() {
        assert!(matches!(
            load_request("/nonexistent/request.json"),
            Err(CliError::FileNotFound(_))
        ));
        assert!(matches!(
            load_request(r#"{"transactions": []}"#),
            Err(CliError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_render_json_is_camel_case() {
        let rendered = render(&sample_response(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["customerId"], "CUST-001");
        assert_eq!(value["score"], 385.71);
        assert_eq!(value["category"], "MEDIUM");
        assert!(value["breakdown"].get("market").is_none());
    }

    #[test]
    fn test_render_table() {
        let rendered = render(&sample_response(), OutputFormat::Table).unwrap();
        assert!(rendered.contains("│ Score        │ 385.71"));
        assert!(rendered.contains("│ Market       │ -"));
        assert!(rendered.contains("  2. Gather additional customer data"));
    }

    #[tokio::test]
    async fn test_run_with_fixed_score() {
        let mut config = ServiceConfig::default();
        config.fraud.use_fixed_score(300.0);
        let result = run(&config, r#"{"customerId": "CUST-RUN"}"#, "json").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_surfaces_validation_error() {
        let mut config = ServiceConfig::default();
        config.fraud.use_fixed_score(0.0);
        let err = run(&config, r#"{"customerId": " "}"#, "table")
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Assessment(_)));
    }
}
