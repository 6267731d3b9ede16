use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use recovery::report::REDACTED;
use recovery::{
    build_report, estimate_remaining, security_report, summarize, AttackMethod, Eta, Job, JobStatus,
    ReportOptions, StrengthLevel,
};

fn epoch() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc)
}

fn job(file_type: &str, status: JobStatus, result: Option<&str>, attempts: u64, secs: i64) -> Job {
    let start = epoch();
    let mut job = Job::new(
        Uuid::new_v4(),
        format!("file{file_type}"),
        file_type,
        AttackMethod::Dictionary,
        start,
    );
    job.status = status;
    job.tried_attempts = attempts;
    job.start_time = Some(start);
    if status.is_terminal() {
        job.progress = 100.0;
        job.end_time = Some(start + TimeDelta::seconds(secs));
    } else {
        job.progress = 40.0;
    }
    job.result = result.map(str::to_string);
    job
}

#[test]
fn test_summarize_empty() {
    let s = summarize(&[]);

    assert_eq!(s.total_jobs, 0);
    assert_eq!(s.successful, 0);
    assert_eq!(s.failed, 0);
    assert_eq!(s.success_rate, 0);
    assert_eq!(s.average_time_to_success_secs, 0.0);
    assert_eq!(s.most_common_file_type, "none");
    assert_eq!(s.average_attempts, 0);
}

#[test]
fn test_most_common_file_type() {
    let jobs = [
        job(".zip", JobStatus::Failed, None, 0, 1),
        job(".zip", JobStatus::Failed, None, 0, 1),
        job(".pdf", JobStatus::Failed, None, 0, 1),
    ];
    assert_eq!(summarize(&jobs).most_common_file_type, ".zip");
}

#[test]
fn test_most_common_file_type_tie_goes_to_first_seen() {
    let jobs = [
        job(".pdf", JobStatus::Failed, None, 0, 1),
        job(".zip", JobStatus::Failed, None, 0, 1),
        job(".zip", JobStatus::Failed, None, 0, 1),
        job(".pdf", JobStatus::Failed, None, 0, 1),
    ];
    assert_eq!(summarize(&jobs).most_common_file_type, ".pdf");
}

#[test]
fn test_summarize_mixed_snapshot() {
    let jobs = [
        job(".zip", JobStatus::Completed, Some("hunter2"), 100, 10),
        job(".zip", JobStatus::Completed, Some("letmein"), 200, 20),
        job(".pdf", JobStatus::Failed, None, 300, 99),
        job(".pdf", JobStatus::Completed, None, 400, 5),
        job(".7z", JobStatus::Running, None, 501, 0),
    ];
    let s = summarize(&jobs);

    assert_eq!(s.total_jobs, 5);
    assert_eq!(s.successful, 2);
    assert_eq!(s.failed, 2);
    assert_eq!(s.success_rate, 40);
    assert_eq!(s.average_time_to_success_secs, 15.0);
    assert_eq!(s.average_attempts, 300);
    assert_eq!(s.most_common_file_type, ".zip");
}

#[test]
fn test_success_rate_rounds() {
    let jobs = [
        job(".zip", JobStatus::Completed, Some("a"), 1, 1),
        job(".zip", JobStatus::Completed, Some("b"), 2, 1),
        job(".zip", JobStatus::Failed, None, 2, 1),
    ];
    let s = summarize(&jobs);
    assert_eq!(s.success_rate, 67);
    assert_eq!(s.average_attempts, 2);
}

#[test]
fn test_summarize_is_deterministic() {
    let jobs = [
        job(".zip", JobStatus::Completed, Some("x"), 10, 3),
        job(".rar", JobStatus::Paused, None, 20, 0),
    ];
    assert_eq!(summarize(&jobs), summarize(&jobs));
}

#[test]
fn test_security_report_scores_recovered_passwords() {
    let jobs = [
        job(".zip", JobStatus::Completed, Some("Password123!"), 1, 1),
        job(".pdf", JobStatus::Completed, Some("Tr0ub4dor&3xK"), 1, 1),
        job(".pdf", JobStatus::Failed, None, 1, 1),
    ];
    let report = security_report(&jobs);

    assert_eq!(report.findings.len(), 2);
    assert_eq!(report.findings[0].job_id, jobs[0].id);
    assert_eq!(report.findings[0].analysis.strength.level, StrengthLevel::Good);
    assert_eq!(report.findings[1].analysis.strength.level, StrengthLevel::VeryStrong);
    assert_eq!(report.average_score, 82.5);
    assert_eq!(report.level_counts.len(), 6);
    assert_eq!(report.level_counts[&StrengthLevel::Good], 1);
    assert_eq!(report.level_counts[&StrengthLevel::VeryStrong], 1);
    assert_eq!(report.level_counts[&StrengthLevel::Weak], 0);
    assert_eq!(report.summary.successful, 2);
}

#[test]
fn test_report_redacts_by_default() {
    let jobs = [
        job(".zip", JobStatus::Completed, Some("secret"), 5, 4),
        job(".pdf", JobStatus::Failed, None, 5, 6),
    ];
    let report = build_report(&jobs, &ReportOptions::default(), epoch());

    assert_eq!(report.jobs[0].password.as_deref(), Some(REDACTED));
    assert_eq!(report.jobs[1].password, None);
    assert_eq!(report.jobs[0].id, jobs[0].id.to_string());
    assert_eq!(report.jobs[0].start_time, jobs[0].start_time);
    assert_eq!(report.jobs[0].duration_secs, Some(4));
    assert_eq!(report.processing_time_ms, 10_000);
    assert_eq!(report.summary.success_rate, 50);
    assert_eq!(report.summary.generated_at, epoch());
    assert!(report.analytics.is_some());
}

#[test]
fn test_report_options() {
    let jobs = [job(".zip", JobStatus::Completed, Some("secret"), 5, 4)];
    let options = ReportOptions {
        include_passwords: true,
        include_timestamps: false,
        include_analytics: false,
        anonymize: true,
    };
    let report = build_report(&jobs, &options, epoch());

    let row = &report.jobs[0];
    assert_eq!(row.id, "job_1");
    assert_eq!(row.file_name, "file_1.zip");
    assert_eq!(row.password.as_deref(), Some("secret"));
    assert_eq!(row.start_time, None);
    assert_eq!(row.end_time, None);
    assert!(report.analytics.is_none());
}

#[test]
fn test_report_serializes_wire_names() {
    let jobs = [job(".zip", JobStatus::Completed, Some("pw"), 5, 4)];
    let report = build_report(&jobs, &ReportOptions::default(), epoch());
    let json = serde_json::to_value(report).unwrap();

    assert_eq!(json["jobs"][0]["status"], "completed");
    assert_eq!(json["jobs"][0]["method"], "dictionary");
    assert_eq!(json["summary"]["total_jobs"], 1);
}

#[test]
fn test_eta_half_way_after_ten_seconds() {
    let now = epoch();
    let mut j = job(".zip", JobStatus::Running, None, 0, 0);
    j.start_time = Some(now - TimeDelta::seconds(10));
    j.progress = 50.0;

    let remaining = estimate_remaining(&j, now).remaining().unwrap();
    assert!((remaining.as_secs_f64() - 10.0).abs() < 0.01);
    assert_eq!(estimate_remaining(&j, now).to_string(), "10s remaining");
}

#[test]
fn test_eta_edges() {
    let now = epoch();
    let mut j = job(".zip", JobStatus::Running, None, 0, 0);
    j.progress = 0.0;
    assert_eq!(estimate_remaining(&j, now), Eta::Unknown);

    j.start_time = None;
    j.progress = 30.0;
    assert_eq!(estimate_remaining(&j, now), Eta::Unknown);

    // start in the future: the estimate goes negative
    j.start_time = Some(now + TimeDelta::seconds(5));
    assert_eq!(estimate_remaining(&j, now), Eta::NearCompletion);
}

#[test]
fn test_eta_too_large_for_duration_is_unknown() {
    let now = epoch();
    let mut j = job(".zip", JobStatus::Running, None, 0, 0);
    j.start_time = Some(now - TimeDelta::hours(1));
    j.progress = 1e-20;

    assert_eq!(estimate_remaining(&j, now), Eta::Unknown);
    assert_eq!(estimate_remaining(&j, now).to_string(), "Unknown");
}
