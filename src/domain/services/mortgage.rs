use serde::{Deserialize, Serialize};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct MortgageInput {
    pub property_price: f64,
    pub down_payment: f64,
    /// Annual rate in percent, e.g. 6.5
    pub interest_rate: f64,
    /// Term in years
    pub loan_term: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct MortgageBreakdown {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub number_of_payments: u32,
    pub down_payment_percent: f64,
    pub yearly_schedule: Vec<YearSummary>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MortgageInsights {
    pub summary: String,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub source: String,
}

/// Rows in `yearly_schedule`; longer terms list only their first years.
pub const MAX_SCHEDULE_YEARS: u32 = 100;

/// Standard amortization: M = P * r / (1 - (1+r)^-n), r monthly, n months.
/// Stays finite for very long terms, where it tends to P * r.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let n = months as f64;
    let r = annual_rate_percent / 12.0 / 100.0;
    if r == 0.0 {
        return principal / n;
    }
    principal * r / (1.0 - (1.0 + r).powf(-n))
}

pub fn validate(input: &MortgageInput) -> Result<(), AppError> {
    let values = [input.property_price, input.down_payment, input.interest_rate];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::Validation("All amounts must be finite numbers".into()));
    }
    if input.property_price <= 0.0 {
        return Err(AppError::Validation("Property price must be greater than zero".into()));
    }
    if input.down_payment < 0.0 || input.down_payment >= input.property_price {
        return Err(AppError::Validation("Down payment must be at least zero and less than the property price".into()));
    }
    if input.interest_rate < 0.0 {
        return Err(AppError::Validation("Interest rate cannot be negative".into()));
    }
    if input.loan_term == 0 {
        return Err(AppError::Validation("Loan term must be at least 1 year".into()));
    }
    term_months(input.loan_term)?;
    Ok(())
}

fn term_months(years: u32) -> Result<u32, AppError> {
    years.checked_mul(12)
        .ok_or_else(|| AppError::Validation("Loan term is too long".into()))
}

pub fn calculate(input: &MortgageInput) -> Result<MortgageBreakdown, AppError> {
    validate(input)?;

    let loan_amount = input.property_price - input.down_payment;
    let months = term_months(input.loan_term)?;
    let payment = monthly_payment(loan_amount, input.interest_rate, months);
    if !payment.is_finite() {
        return Err(AppError::Validation("These amounts cannot be amortized".into()));
    }
    let total_payment = payment * months as f64;

    Ok(MortgageBreakdown {
        loan_amount,
        monthly_payment: payment,
        total_payment,
        total_interest: total_payment - loan_amount,
        number_of_payments: months,
        down_payment_percent: input.down_payment / input.property_price * 100.0,
        yearly_schedule: yearly_schedule(loan_amount, input.interest_rate, months, payment),
    })
}

fn yearly_schedule(principal: f64, annual_rate_percent: f64, months: u32, payment: f64) -> Vec<YearSummary> {
    let r = annual_rate_percent / 12.0 / 100.0;
    let mut balance = principal;
    let listed = months.min(MAX_SCHEDULE_YEARS * 12);
    let mut schedule = Vec::with_capacity(listed.div_ceil(12) as usize);
    let mut year = YearSummary { year: 1, principal_paid: 0.0, interest_paid: 0.0, remaining_balance: principal };

    for month in 1..=listed {
        let interest = balance * r;
        let principal_part = (payment - interest).min(balance);
        balance -= principal_part;

        year.interest_paid += interest;
        year.principal_paid += principal_part;

        if month % 12 == 0 || month == listed {
            year.remaining_balance = if month == months && balance.abs() < 0.005 { 0.0 } else { balance };
            let next_year = year.year + 1;
            schedule.push(year);
            year = YearSummary { year: next_year, principal_paid: 0.0, interest_paid: 0.0, remaining_balance: balance };
        }
    }
    schedule
}

pub fn insights_prompt(input: &MortgageInput, breakdown: &MortgageBreakdown) -> String {
    format!(
        "Property price: {:.2}\nDown payment: {:.2} ({:.1}%)\nLoan amount: {:.2}\nAnnual interest rate: {:.3}%\nTerm: {} years\nMonthly payment: {:.2}\nTotal interest: {:.2}\n\n\
        Respond with ONLY a JSON object of the form {{\"summary\": string, \"tips\": [string, ...]}} with at most 4 tips.",
        input.property_price,
        input.down_payment,
        breakdown.down_payment_percent,
        breakdown.loan_amount,
        input.interest_rate,
        input.loan_term,
        breakdown.monthly_payment,
        breakdown.total_interest,
    )
}

/// Accepts the model output with or without a markdown fence around the JSON.
pub fn parse_insights(raw: &str) -> Option<MortgageInsights> {
    let trimmed = raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    let mut parsed: MortgageInsights = serde_json::from_str(&trimmed[start..=end]).ok()?;
    if parsed.summary.trim().is_empty() {
        return None;
    }
    parsed.tips.retain(|t| !t.trim().is_empty());
    parsed.source = "ai".to_string();
    Some(parsed)
}

pub fn fallback_insights(input: &MortgageInput, breakdown: &MortgageBreakdown) -> MortgageInsights {
    let interest_share = if breakdown.total_payment > 0.0 {
        breakdown.total_interest / breakdown.total_payment * 100.0
    } else {
        0.0
    };

    let summary = format!(
        "Borrowing {:.2} over {} years at {:.2}% means a monthly payment of about {:.2}. \
        Over the life of the loan you would pay {:.2} in interest, {:.1}% of everything you pay.",
        breakdown.loan_amount,
        input.loan_term,
        input.interest_rate,
        breakdown.monthly_payment,
        breakdown.total_interest,
        interest_share,
    );

    let mut tips = Vec::new();
    if breakdown.down_payment_percent < 20.0 {
        tips.push("A down payment below 20% may require mortgage insurance; saving a little more can lower your costs.".to_string());
    } else {
        tips.push("Your down payment is 20% or more, which usually avoids mortgage insurance.".to_string());
    }
    if input.loan_term > 15 {
        tips.push("A shorter term raises the monthly payment but can cut the total interest substantially.".to_string());
    }
    tips.push("Compare offers from several lenders; even a small rate difference adds up over the term.".to_string());
    tips.push("Budget for property taxes, insurance and maintenance on top of the loan payment.".to_string());

    MortgageInsights { summary, tips, source: "fallback".to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(price: f64, down: f64, rate: f64, years: u32) -> MortgageInput {
        MortgageInput { property_price: price, down_payment: down, interest_rate: rate, loan_term: years }
    }

    fn formula(p: f64, annual: f64, n: u32) -> f64 {
        let r = annual / 1200.0;
        let g = (1.0 + r).powi(n as i32);
        p * r * g / (g - 1.0)
    }

    #[test]
    fn test_matches_amortization_formula() {
        let cases = [
            (300_000.0, 60_000.0, 6.5, 30),
            (500_000.0, 100_000.0, 3.25, 15),
            (120_000.0, 1.0, 12.0, 5),
            (1_000_000.0, 999_999.0, 0.01, 1),
        ];
        for (price, down, rate, years) in cases {
            let b = calculate(&input(price, down, rate, years)).unwrap();
            let expected = formula(price - down, rate, years * 12);
            assert!((b.monthly_payment - expected).abs() < 1e-6 * expected.max(1.0),
                "price={} rate={} got {} expected {}", price, rate, b.monthly_payment, expected);
            assert_eq!(b.number_of_payments, years * 12);
            assert!((b.total_payment - expected * (years * 12) as f64).abs() < 1e-4 * b.total_payment);
        }
    }

    #[test]
    fn test_known_value() {
        // 240k over 30 years at 6.5% is the textbook 1516.96/month
        let b = calculate(&input(300_000.0, 60_000.0, 6.5, 30)).unwrap();
        assert!((b.monthly_payment - 1516.96).abs() < 0.01);
        assert!((b.down_payment_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_is_straight_division() {
        let b = calculate(&input(120_000.0, 0.0, 0.0, 10)).unwrap();
        assert!((b.monthly_payment - 1000.0).abs() < 1e-9);
        assert!(b.total_interest.abs() < 1e-6);
    }

    #[test]
    fn test_schedule_pays_off_loan() {
        let b = calculate(&input(250_000.0, 50_000.0, 5.0, 20)).unwrap();
        assert_eq!(b.yearly_schedule.len(), 20);
        let principal: f64 = b.yearly_schedule.iter().map(|y| y.principal_paid).sum();
        assert!((principal - 200_000.0).abs() < 0.01);
        assert_eq!(b.yearly_schedule.last().unwrap().remaining_balance, 0.0);
        let interest: f64 = b.yearly_schedule.iter().map(|y| y.interest_paid).sum();
        assert!((interest - b.total_interest).abs() < 0.05);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(calculate(&input(100_000.0, 100_000.0, 5.0, 30)).is_err());
        assert!(calculate(&input(100_000.0, 150_000.0, 5.0, 30)).is_err());
        assert!(calculate(&input(100_000.0, 10_000.0, 5.0, 0)).is_err());
        assert!(calculate(&input(0.0, 0.0, 5.0, 30)).is_err());
        assert!(calculate(&input(100_000.0, -1.0, 5.0, 30)).is_err());
        assert!(calculate(&input(100_000.0, 10_000.0, -0.5, 30)).is_err());
        assert!(calculate(&input(f64::NAN, 10_000.0, 5.0, 30)).is_err());
    }

    #[test]
    fn test_long_terms_are_accepted() {
        let b = calculate(&input(400_000.0, 40_000.0, 6.0, 60)).unwrap();
        assert_eq!(b.number_of_payments, 720);
        assert_eq!(b.yearly_schedule.len(), 60);
        assert_eq!(b.yearly_schedule.last().unwrap().remaining_balance, 0.0);
        assert!((b.monthly_payment - formula(360_000.0, 6.0, 720)).abs() < 1e-6);

        // Only the first years are listed; the payment converges to interest-only
        let b = calculate(&input(400_000.0, 40_000.0, 6.0, 100_000)).unwrap();
        assert_eq!(b.number_of_payments, 1_200_000);
        assert_eq!(b.yearly_schedule.len(), MAX_SCHEDULE_YEARS as usize);
        assert!(b.monthly_payment.is_finite());
        assert!((b.monthly_payment - 360_000.0 * 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_term_overflowing_month_count_is_rejected() {
        let err = calculate(&input(400_000.0, 40_000.0, 6.0, u32::MAX / 12 + 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(calculate(&input(400_000.0, 40_000.0, 6.0, u32::MAX / 12)).is_ok());
    }

    #[test]
    fn test_parse_insights_with_fence() {
        let raw = "```json\n{\"summary\": \"Looks affordable.\", \"tips\": [\"Shop around\", \"\"]}\n```";
        let parsed = parse_insights(raw).unwrap();
        assert_eq!(parsed.summary, "Looks affordable.");
        assert_eq!(parsed.tips, vec!["Shop around".to_string()]);
        assert_eq!(parsed.source, "ai");
    }

    #[test]
    fn test_parse_insights_rejects_garbage() {
        assert!(parse_insights("I think this mortgage is fine").is_none());
        assert!(parse_insights("{\"tips\": []}").is_none());
        assert!(parse_insights("{\"summary\": \"  \"}").is_none());
    }

    #[test]
    fn test_fallback_mentions_numbers() {
        let i = input(300_000.0, 30_000.0, 7.0, 30);
        let b = calculate(&i).unwrap();
        let f = fallback_insights(&i, &b);
        assert_eq!(f.source, "fallback");
        assert!(f.summary.contains("270000.00"));
        assert!(f.tips.iter().any(|t| t.contains("mortgage insurance")));
    }
}
