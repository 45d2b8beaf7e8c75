use crate::domain::applicant::{ApplicantContact, ApplicantRecord};
use crate::domain::emi::{EmiOutcome, round_money};
use crate::domain::prediction::{LoanDecision, PredictionResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Summary handed back to the applicant after a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,

    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,

    pub cibil_score: f64,
    /// `None` when the amount does not fit a `Decimal`
    pub loan_amount: Option<Decimal>,
    pub loan_term_months: f64,
    /// `None` when the EMI could not be calculated
    pub monthly_emi: Option<Decimal>,
    pub total_payable: Option<Decimal>,
    pub total_interest: Option<Decimal>,

    pub decision: LoanDecision,
    pub approve_probability: f64,
    pub reject_probability: f64,
}

impl LoanReport {
    pub fn new(
        contact: &ApplicantContact,
        record: &ApplicantRecord,
        prediction: &PredictionResult,
        emi: &EmiOutcome,
    ) -> Self {
        let breakdown = emi.breakdown();
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            full_name: contact.full_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone().filter(|p| !p.trim().is_empty()),
            cibil_score: record.cibil_score,
            loan_amount: round_money(record.loan_amount),
            loan_term_months: record.loan_term,
            monthly_emi: emi.monthly_rounded(),
            total_payable: breakdown.and_then(|b| round_money(b.total_payable)),
            total_interest: breakdown.and_then(|b| round_money(b.total_interest)),
            decision: prediction.decision,
            approve_probability: prediction.approve_probability,
            reject_probability: prediction.reject_probability,
        }
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LoanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loan Approval Prediction Report")?;
        writeln!(f, "===============================")?;
        writeln!(f, "Report ID:            {}", self.report_id)?;
        writeln!(
            f,
            "Generated:            {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f)?;
        writeln!(f, "Full Name:            {}", self.full_name)?;
        writeln!(f, "Email:                {}", self.email)?;
        if let Some(phone) = &self.phone {
            writeln!(f, "Phone:                {}", phone)?;
        }
        writeln!(f)?;
        writeln!(f, "CIBIL Score:          {}", self.cibil_score)?;
        match self.loan_amount {
            Some(amount) => writeln!(f, "Loan Amount (INR):    {}", amount)?,
            None => writeln!(f, "Loan Amount (INR):    out of range")?,
        }
        writeln!(f, "Loan Term (Months):   {}", self.loan_term_months)?;
        match self.monthly_emi {
            Some(emi) => writeln!(f, "Monthly EMI (INR):    {:.2}", emi)?,
            None => writeln!(f, "Monthly EMI (INR):    not calculated")?,
        }
        if let (Some(total), Some(interest)) = (self.total_payable, self.total_interest) {
            writeln!(f, "Total Payable (INR):  {:.2}", total)?;
            writeln!(f, "Total Interest (INR): {:.2}", interest)?;
        }
        writeln!(f)?;
        writeln!(f, "Prediction:           {}", self.decision)?;
        writeln!(f, "Approval Probability: {:.2}", self.approve_probability)?;
        writeln!(f, "Rejection Probability: {:.2}", self.reject_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::applicant::LocaleNumber;
    use crate::domain::emi::EmiCalculator;
    use rust_decimal_macros::dec;

    fn record() -> ApplicantRecord {
        ApplicantRecord {
            cibil_score: 750.0,
            income_annum: 5_000_000.0,
            loan_amount: 500_000.0,
            loan_term: 60.0,
            loan_interest: LocaleNumber::Value(10.0),
            loan_percent_income: LocaleNumber::Value(20.0),
            active_loans: 1.0,
            gender: "Men".to_string(),
            marital_status: "Married".to_string(),
            employee_status: "employed".to_string(),
            residence_type: "OWN".to_string(),
            loan_purpose: "Vehicle".to_string(),
        }
    }

    fn contact(phone: Option<&str>) -> ApplicantContact {
        ApplicantContact {
            full_name: "A. Sharma".to_string(),
            email: "a.sharma@example.com".to_string(),
            phone: phone.map(str::to_string),
        }
    }

    fn approved() -> PredictionResult {
        PredictionResult::new(LoanDecision::Approved, [0.82, 0.18]).unwrap()
    }

    #[test]
    fn test_report_carries_required_fields() {
        let emi = EmiCalculator::calculate(500_000.0, 10.0, 60.0);
        let report = LoanReport::new(&contact(Some("98200 00000")), &record(), &approved(), &emi);

        assert_eq!(report.loan_amount, Some(dec!(500000)));
        assert!(report.monthly_emi.is_some());
        assert!(report.total_interest.unwrap() > dec!(0));

        let text = report.render_text();
        for needle in [
            "A. Sharma",
            "a.sharma@example.com",
            "98200 00000",
            "CIBIL Score:          750",
            "Prediction:           Approved",
            "Approval Probability: 0.82",
            "Rejection Probability: 0.18",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in\n{text}");
        }
    }

    #[test]
    fn test_report_without_emi_or_phone() {
        let emi = EmiCalculator::calculate(0.0, 10.0, 60.0);
        let report = LoanReport::new(&contact(Some("  ")), &record(), &approved(), &emi);

        assert_eq!(report.monthly_emi, None);
        assert_eq!(report.phone, None);
        let text = report.render_text();
        assert!(text.contains("not calculated"));
        assert!(!text.contains("Phone:"));
        assert!(!text.contains("Total Payable"));
    }

    #[test]
    fn test_display_matches_render_text() {
        let emi = EmiCalculator::calculate(500_000.0, 10.0, 60.0);
        let report = LoanReport::new(&contact(None), &record(), &approved(), &emi);

        assert_eq!(format!("{report}"), report.render_text());
        assert!(report.render_text().ends_with("Rejection Probability: 0.18\n"));
    }

    #[test]
    fn test_amounts_beyond_decimal_range_are_not_zero() {
        let mut huge = record();
        huge.loan_amount = 1e31;
        let emi = EmiCalculator::calculate(huge.loan_amount, 10.0, 12.0);
        let report = LoanReport::new(&contact(None), &huge, &approved(), &emi);

        assert_eq!(report.loan_amount, None);
        assert_eq!(report.monthly_emi, None);
        let text = report.render_text();
        assert!(text.contains("Loan Amount (INR):    out of range"));
        assert!(text.contains("Monthly EMI (INR):    not calculated"));
        assert!(!text.contains("Loan Amount (INR):    0"));
    }

    #[test]
    fn test_report_json_shape() {
        let emi = EmiCalculator::calculate(500_000.0, 10.0, 60.0);
        let report = LoanReport::new(&contact(None), &record(), &approved(), &emi);

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["decision"], "Approved");
        assert!(json["report_id"].is_string());
        assert!(json["phone"].is_null());

        let back: LoanReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
