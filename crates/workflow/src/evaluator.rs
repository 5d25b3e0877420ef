// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure grading of a terminal [`WorkflowState`]. Never fails: every
//! input, including a workflow with zero features, produces a
//! well-formed [`Evaluation`].

use jc_projection::{FeatureStatus, WorkflowState};

const THRESHOLD_COST_USD: f64 = 0.5;
const THRESHOLD_TIME_MS: f64 = 120_000.0;

const WEIGHT_COMPLETION: f64 = 0.30;
const WEIGHT_TEST_PASS: f64 = 0.20;
const WEIGHT_NO_FAILURES: f64 = 0.15;
const WEIGHT_ITERATION: f64 = 0.10;
const WEIGHT_COST: f64 = 0.10;
const WEIGHT_TIME: f64 = 0.10;
const WEIGHT_VERIFICATION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    fn from_score(score: f64) -> Self {
        if score >= 0.90 {
            Grade::A
        } else if score >= 0.80 {
            Grade::B
        } else if score >= 0.70 {
            Grade::C
        } else if score >= 0.60 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricComponents {
    pub completion_rate: f64,
    pub test_pass_rate: f64,
    pub iteration_efficiency: f64,
    pub cost_efficiency: f64,
    pub time_efficiency: f64,
    pub verification_rate: f64,
    pub no_failures: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub metrics: MetricComponents,
    pub quality_score: f64,
    pub grade: Grade,
    pub recommendations: Vec<String>,
    pub summary: String,
}

/// Linear ramp from 1 at `threshold` down to 0 at `4 * threshold`,
/// clamped on both ends. `0` input is treated as the best case (no
/// completed features means nothing to penalize for cost/time yet).
fn efficiency(per_unit: f64, threshold: f64) -> f64 {
    if per_unit <= threshold {
        1.0
    } else {
        let ceiling = 4.0 * threshold;
        (1.0 - (per_unit - threshold) / (ceiling - threshold)).clamp(0.0, 1.0)
    }
}

pub fn evaluate(state: &WorkflowState) -> Evaluation {
    let total = state.features.len();
    let completed = state.completed_count();
    let failed = state.failed_count();

    let completion_rate = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    };

    let with_passing_tests = state
        .features
        .iter()
        .filter(|f| f.status == FeatureStatus::Completed && f.tests_passing)
        .count();
    let test_pass_rate = if completed == 0 {
        0.0
    } else {
        with_passing_tests as f64 / completed as f64
    };

    let iteration_efficiency = if completed == 0 || state.iteration_count == 0 {
        0.0
    } else {
        (completed as f64 / state.iteration_count as f64).min(1.0)
    };

    let cost_efficiency = if completed == 0 {
        0.0
    } else {
        efficiency(state.total_cost_usd / completed as f64, THRESHOLD_COST_USD)
    };

    let time_efficiency = if completed == 0 {
        0.0
    } else {
        efficiency(state.total_duration_ms as f64 / completed as f64, THRESHOLD_TIME_MS)
    };

    let verification_rate = if state.verification_count == 0 || state.last_verification_passed {
        1.0
    } else {
        0.0
    };

    let no_failures = if failed == 0 { 1.0 } else { 0.0 };

    let metrics = MetricComponents {
        completion_rate,
        test_pass_rate,
        iteration_efficiency,
        cost_efficiency,
        time_efficiency,
        verification_rate,
        no_failures,
    };

    let raw_score = completion_rate * WEIGHT_COMPLETION
        + test_pass_rate * WEIGHT_TEST_PASS
        + no_failures * WEIGHT_NO_FAILURES
        + iteration_efficiency * WEIGHT_ITERATION
        + cost_efficiency * WEIGHT_COST
        + time_efficiency * WEIGHT_TIME
        + verification_rate * WEIGHT_VERIFICATION;
    let quality_score = (raw_score * 10_000.0).round() / 10_000.0;
    let grade = Grade::from_score(quality_score);

    let recommendations = generate_recommendations(&metrics, total, completed, failed);
    let summary = summarize(completed, total, failed, grade, quality_score);

    Evaluation {
        metrics,
        quality_score,
        grade,
        recommendations,
        summary,
    }
}

fn generate_recommendations(
    metrics: &MetricComponents,
    total: usize,
    completed: usize,
    failed: usize,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if metrics.completion_rate < 1.0 {
        let remaining = total.saturating_sub(completed);
        recommendations.push(format!("Resume workflow to complete {remaining} remaining feature(s)"));
    }
    if failed > 0 {
        recommendations.push(format!("Investigate {failed} failed feature(s) and retry"));
    }
    if metrics.test_pass_rate < 0.8 {
        recommendations.push("Improve test coverage by adding test files to features".to_string());
    }
    if metrics.iteration_efficiency < 0.5 {
        recommendations.push("Consider breaking down complex features into smaller tasks".to_string());
    }
    if metrics.cost_efficiency < 0.5 {
        recommendations
            .push("Review feature complexity - consider using smaller models for simple tasks".to_string());
    }
    if metrics.time_efficiency < 0.5 {
        recommendations.push("Optimize prompts and reduce context to improve execution time".to_string());
    }
    if metrics.verification_rate > 0.0 && metrics.verification_rate < 0.5 {
        recommendations.push("Review failing verifications - tests may need updates".to_string());
    }

    recommendations
}

fn summarize(completed: usize, total: usize, failed: usize, grade: Grade, score: f64) -> String {
    let status = if completed == total && total > 0 {
        "completed"
    } else {
        "partially completed"
    };
    let failure_clause = if failed > 0 {
        format!(" with {failed} failure(s)")
    } else {
        String::new()
    };
    format!(
        "Workflow {status}{failure_clause}. Grade: {grade} ({:.0}%). {completed}/{total} features implemented.",
        score * 100.0
    )
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
