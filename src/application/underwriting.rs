use super::decision_engine::DecisionEngine;
use super::ml::TrainedModel;
use super::report::LoanReport;
use crate::domain::applicant::{ApplicantContact, ApplicantRecord, LOAN_INTEREST};
use crate::domain::emi::{EmiCalculator, EmiOutcome};
use crate::domain::errors::AssessmentError;
use crate::domain::prediction::PredictionResult;
use std::sync::Arc;
use tracing::info;

/// Everything produced for one application.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub prediction: PredictionResult,
    pub emi: EmiOutcome,
    pub report: LoanReport,
}

/// Scores applications against one loaded model.
///
/// The model is shared read-only, so a single service can be cloned across
/// threads and serve requests concurrently.
#[derive(Debug, Clone)]
pub struct UnderwritingService {
    model: Arc<TrainedModel>,
}

impl UnderwritingService {
    pub fn new(model: Arc<TrainedModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn assess(
        &self,
        contact: &ApplicantContact,
        record: &ApplicantRecord,
    ) -> Result<Assessment, AssessmentError> {
        record.validate()?;

        let features = self.model.encoder().encode(record)?;
        let prediction = DecisionEngine::decide(self.model.as_ref(), &features)?;

        let rate = record.loan_interest.resolve(LOAN_INTEREST)?;
        let emi = EmiCalculator::calculate(record.loan_amount, rate, record.loan_term);

        let report = LoanReport::new(contact, record, &prediction, &emi);
        info!(
            "Assessment {}: {} (P(approve)={:.2}, P(reject)={:.2}), EMI {}",
            report.report_id,
            prediction.decision,
            prediction.approve_probability,
            prediction.reject_probability,
            emi
        );

        Ok(Assessment {
            prediction,
            emi,
            report,
        })
    }
}
