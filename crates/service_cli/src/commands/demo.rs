//! Demo command: canonical assessment scenarios.
//!
//! Runs a fixed set of assessments against an in-memory store and event bus
//! with fixed fraud scores, so the output is reproducible offline.
//!
//! # Expected Output
//!
//! ```text
//! Scenario                          Customer      Score    Category  Conf
//! New customer, no history          CUST-NEW      385.71   MEDIUM    60%
//! Large uniform history             CUST-STEADY     8.57   LOW       80%
//! ...
//! ```
//!
//! Key verification points:
//! - The returning customer gains confidence from recorded factors
//! - A blank customer id is rejected before any component runs
//! - A non-finite fraud score fails the assessment without persisting

use crate::Result;
use scoring_core::types::{
    AssessmentRequest, AssessmentResponse, ExternalFactors, MarketConditions, Transaction,
};
use scoring_engine::{
    EngineConfig, ErrorKind, FixedFraudDetector, InMemoryEventBus, InMemoryRiskStore,
    RiskAssessmentEngine,
};
use std::sync::Arc;
use std::time::Duration;

/// A demo scenario: a request and the native fraud score to answer it with.
struct Scenario {
    name: &'static str,
    request: AssessmentRequest,
    fraud: FixedFraudDetector,
}

/// How a scenario ended.
#[derive(Debug)]
pub enum Outcome {
    /// Assessment completed
    Assessed(AssessmentResponse),
    /// Assessment refused with the given kind
    Rejected { kind: ErrorKind, message: String },
}

/// Result of one scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: &'static str,
    pub customer: String,
    pub outcome: Outcome,
}

/// Totals observed after all scenarios ran.
#[derive(Debug, Default)]
pub struct DemoSummary {
    pub outcomes: Vec<ScenarioOutcome>,
    pub profiles: usize,
    pub scores: usize,
    pub factors: usize,
    pub events: usize,
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "New customer, no history",
            request: AssessmentRequest::new("CUST-NEW"),
            fraud: FixedFraudDetector::new(300.0),
        },
        Scenario {
            name: "Large uniform history",
            request: AssessmentRequest::new("CUST-STEADY").with_transactions(vec![
                Transaction::new(5_000.0)
                    .with_category("retail");
                120
            ]),
            fraud: FixedFraudDetector::new(0.0),
        },
        Scenario {
            name: "Full evidence, elevated fraud",
            request: AssessmentRequest::new("CUST-WIRE")
                .with_transactions(vec![
                    Transaction::new(250.0).with_category("groceries"),
                    Transaction::new(18_000.0).with_category("wire"),
                    Transaction::new(42_000.0).with_category("wire"),
                    Transaction::new(75.0).with_category("dining"),
                ])
                .with_market(MarketConditions::new(Some(35.0), Some(6.5)))
                .with_external(ExternalFactors::new(Some(540.0), Some(1))),
            fraud: FixedFraudDetector::new(720.0).with_risk_level("HIGH"),
        },
        Scenario {
            name: "Returning customer",
            request: AssessmentRequest::new("CUST-NEW"),
            fraud: FixedFraudDetector::new(300.0),
        },
        Scenario {
            name: "Blank customer id",
            request: AssessmentRequest::new("   "),
            fraud: FixedFraudDetector::new(0.0),
        },
        Scenario {
            name: "Fraud scorer returns NaN",
            request: AssessmentRequest::new("CUST-NAN"),
            fraud: FixedFraudDetector::new(f64::NAN),
        },
    ]
}

/// Runs every scenario and collects the outcomes.
///
/// Must be called from within a Tokio runtime.
pub async fn run_scenarios(config: &EngineConfig) -> Result<DemoSummary> {
    let store = InMemoryRiskStore::new();
    let bus = Arc::new(InMemoryEventBus::new());
    let mut summary = DemoSummary::default();

    let mut expected_events = 0;
    for scenario in scenarios() {
        let engine = RiskAssessmentEngine::new(
            config.clone(),
            Arc::new(store.clone()),
            Arc::new(scenario.fraud),
            bus.clone(),
        )?;

        let customer = scenario.request.customer_id.to_string();
        let outcome = match engine.assess(scenario.request).await {
            Ok(response) => {
                expected_events += 1;
                Outcome::Assessed(response)
            }
            Err(err) => Outcome::Rejected {
                kind: err.kind(),
                message: err.to_string(),
            },
        };
        summary.outcomes.push(ScenarioOutcome {
            name: scenario.name,
            customer,
            outcome,
        });
    }

    // Publication is detached from the assessments
    for _ in 0..100 {
        if bus.message_count() >= expected_events {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let stats = store.statistics()?;
    summary.profiles = stats.profiles;
    summary.scores = stats.scores;
    summary.factors = stats.factors;
    summary.events = bus.message_count();
    Ok(summary)
}

/// Runs the demo and prints the outcome table.
pub async fn run(config: &EngineConfig) -> Result<()> {
    println!("========================================");
    println!("Risk Scoring Demo");
    println!("========================================");
    println!();

    let summary = run_scenarios(config).await?;

    println!(
        "{:<32} {:<12} {:>8}  {:<9} {:>5}",
        "Scenario", "Customer", "Score", "Category", "Conf"
    );
    println!("{}", "-".repeat(72));
    for scenario in &summary.outcomes {
        match &scenario.outcome {
            Outcome::Assessed(response) => println!(
                "{:<32} {:<12} {:>8.2}  {:<9} {:>4}%",
                scenario.name,
                scenario.customer,
                response.score,
                response.category.as_str(),
                response.confidence
            ),
            Outcome::Rejected { kind, .. } => println!(
                "{:<32} {:<12} {:>8}  {:<9}",
                scenario.name,
                scenario.customer.trim(),
                "-",
                format!("[{}]", kind)
            ),
        }
    }
    println!("{}", "-".repeat(72));
    println!();

    for scenario in &summary.outcomes {
        match &scenario.outcome {
            Outcome::Assessed(response) => {
                println!("[{}]", scenario.name);
                for recommendation in &response.recommendations {
                    println!("  - {}", recommendation);
                }
            }
            Outcome::Rejected { message, .. } => {
                println!("[{}] {}", scenario.name, message);
            }
        }
    }
    println!();

    println!(
        "[Demo] Store: {} profiles, {} scores, {} factors; {} events published",
        summary.profiles, summary.scores, summary.factors, summary.events
    );
    println!("========================================");
    println!("Demo completed successfully!");
    println!("========================================");

    Ok(())
}
