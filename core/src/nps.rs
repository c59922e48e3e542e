//! NPS tracking — aggregate survey responses into the headline score,
//! a trend heuristic, month buckets, and narrative insights.
//!
//! Month buckets cover the last six months PRESENT IN THE DATA, not a
//! trailing six-calendar-month window. That quirk is load-bearing for
//! the dashboard and preserved deliberately.

use crate::model::NpsResponse;
use crate::types::NpsCategory;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsReport {
    /// round(%promoters − %detractors), in [-100, 100].
    pub score: i64,
    pub responses: usize,
    pub promoter_pct: f64,
    pub passive_pct: f64,
    pub detractor_pct: f64,
    pub trend: NpsTrend,
    pub monthly: Vec<MonthlyNps>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NpsTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyNps {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub responses: usize,
    pub score: i64,
    pub avg_score: f64,
}

/// Trend needs at least this many responses; below it, half-splitting
/// is noise and the tracker reports stable.
const TREND_MIN_RESPONSES: usize = 4;
const TREND_GAP: f64 = 0.5;
const FOLLOW_UP_WINDOW_DAYS: i64 = 30;

/// Aggregate all responses as of `now`. `surveys_sent` feeds the
/// response-rate insight; pass 0 when unknown.
pub fn nps_report(responses: &[NpsResponse], surveys_sent: usize, now: DateTime<Utc>) -> NpsReport {
    if responses.is_empty() {
        return NpsReport {
            score: 0,
            responses: 0,
            promoter_pct: 0.0,
            passive_pct: 0.0,
            detractor_pct: 0.0,
            trend: NpsTrend::Stable,
            monthly: Vec::new(),
            insights: vec!["No survey responses recorded yet.".to_string()],
        };
    }

    let total = responses.len();
    let count = |cat: NpsCategory| responses.iter().filter(|r| r.category == cat).count();
    let promoters = count(NpsCategory::Promoter);
    let passives = count(NpsCategory::Passive);
    let detractors = count(NpsCategory::Detractor);

    let promoter_pct = promoters as f64 / total as f64 * 100.0;
    let passive_pct = passives as f64 / total as f64 * 100.0;
    let detractor_pct = detractors as f64 / total as f64 * 100.0;
    let score = (promoter_pct - detractor_pct).round() as i64;

    let trend = compute_trend(responses);
    let monthly = monthly_buckets(responses);
    let insights = build_insights(
        score,
        trend,
        passive_pct,
        responses,
        surveys_sent,
        total,
        now,
    );

    NpsReport {
        score: score.clamp(-100, 100),
        responses: total,
        promoter_pct,
        passive_pct,
        detractor_pct,
        trend,
        monthly,
        insights,
    }
}

/// Newest-first half split: compare the recent half's average score to
/// the older half's.
fn compute_trend(responses: &[NpsResponse]) -> NpsTrend {
    if responses.len() < TREND_MIN_RESPONSES {
        return NpsTrend::Stable;
    }

    let mut sorted: Vec<&NpsResponse> = responses.iter().collect();
    sorted.sort_by(|a, b| b.responded_at.cmp(&a.responded_at));

    let mid = sorted.len() / 2;
    let avg = |slice: &[&NpsResponse]| {
        slice.iter().map(|r| r.score as f64).sum::<f64>() / slice.len() as f64
    };
    let recent = avg(&sorted[..mid]);
    let older = avg(&sorted[mid..]);

    if recent - older > TREND_GAP {
        NpsTrend::Improving
    } else if older - recent > TREND_GAP {
        NpsTrend::Declining
    } else {
        NpsTrend::Stable
    }
}

fn monthly_buckets(responses: &[NpsResponse]) -> Vec<MonthlyNps> {
    let mut sorted: Vec<&NpsResponse> = responses.iter().collect();
    sorted.sort_by_key(|r| r.responded_at);

    let mut buckets: Vec<MonthlyNps> = Vec::new();
    for response in sorted {
        let date = response.responded_at.date_naive();
        let (year, month) = (date.year(), date.month());
        if buckets
            .last()
            .map(|b| b.year != year || b.month != month)
            .unwrap_or(true)
        {
            buckets.push(MonthlyNps {
                year,
                month,
                label: format!("{} {year}", month_abbrev(month)),
                responses: 0,
                score: 0,
                avg_score: 0.0,
            });
        }
        let bucket = buckets.last_mut().unwrap();
        bucket.responses += 1;
        // avg_score accumulates a sum here; finalized below.
        bucket.avg_score += response.score as f64;
    }

    // Only months with at least one response exist; keep the last 6.
    if buckets.len() > 6 {
        buckets.drain(..buckets.len() - 6);
    }

    for bucket in &mut buckets {
        let in_month = |r: &&NpsResponse| {
            let d = r.responded_at.date_naive();
            d.year() == bucket.year && d.month() == bucket.month
        };
        let month_responses: Vec<&NpsResponse> = responses.iter().filter(in_month).collect();
        let n = month_responses.len() as f64;
        let promoters = month_responses
            .iter()
            .filter(|r| r.category == NpsCategory::Promoter)
            .count() as f64;
        let detractors = month_responses
            .iter()
            .filter(|r| r.category == NpsCategory::Detractor)
            .count() as f64;
        bucket.score = ((promoters - detractors) / n * 100.0).round() as i64;
        bucket.avg_score /= bucket.responses as f64;
    }

    buckets
}

#[allow(clippy::too_many_arguments)]
fn build_insights(
    score: i64,
    trend: NpsTrend,
    passive_pct: f64,
    responses: &[NpsResponse],
    surveys_sent: usize,
    total: usize,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut insights = Vec::new();

    if score >= 70 {
        insights.push("World-class NPS — capture testimonials and referral asks now.".to_string());
    } else if score >= 50 {
        insights.push("Strong NPS — promoters outnumber detractors decisively.".to_string());
    } else if score < 0 {
        insights.push(
            "Negative NPS — detractors outnumber promoters; prioritize service recovery."
                .to_string(),
        );
    }

    match trend {
        NpsTrend::Improving => {
            insights.push("Scores are trending up over recent responses.".to_string())
        }
        NpsTrend::Declining => insights.push(
            "Scores are trending down over recent responses — review recent installs.".to_string(),
        ),
        NpsTrend::Stable => {}
    }

    let cutoff = now - Duration::days(FOLLOW_UP_WINDOW_DAYS);
    let backlog = responses
        .iter()
        .filter(|r| {
            r.category == NpsCategory::Detractor && !r.followed_up && r.responded_at >= cutoff
        })
        .count();
    if backlog > 0 {
        insights.push(format!(
            "{backlog} recent detractor(s) still awaiting follow-up."
        ));
    }

    if surveys_sent > 0 {
        let rate = total as f64 / surveys_sent as f64 * 100.0;
        if rate < 50.0 {
            insights.push(format!(
                "Response rate is {rate:.0}% — consider a reminder wave."
            ));
        }
    }

    if passive_pct >= 30.0 {
        insights.push(format!(
            "{passive_pct:.0}% of respondents are passive — small service wins could convert them."
        ));
    }

    if insights.is_empty() {
        insights.push("NPS is steady; keep the post-install survey cadence.".to_string());
    }
    insights
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

/// Build a response with the category derived from the score — the
/// only sanctioned way to construct one.
pub fn make_response(
    id: impl Into<String>,
    customer_id: impl Into<String>,
    project_id: Option<String>,
    score: u8,
    responded_at: DateTime<Utc>,
) -> NpsResponse {
    let score = score.min(10);
    NpsResponse {
        id: id.into(),
        customer_id: customer_id.into(),
        project_id,
        score,
        category: NpsCategory::from_score(score),
        responded_at,
        followed_up: false,
        comment: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn empty_input_yields_zeroed_report() {
        let report = nps_report(&[], 0, at(2026, 3, 1));
        assert_eq!(report.score, 0);
        assert_eq!(report.responses, 0);
        assert_eq!(report.trend, NpsTrend::Stable);
        assert!(report.monthly.is_empty());
    }

    #[test]
    fn trend_requires_enough_responses() {
        let responses = vec![
            make_response("n1", "c1", None, 10, at(2026, 3, 1)),
            make_response("n2", "c1", None, 0, at(2026, 1, 1)),
        ];
        assert_eq!(compute_trend(&responses), NpsTrend::Stable);
    }
}
