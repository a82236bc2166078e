use alert_cell::AlertFeed;
use analytics_cell::PatientDashboard;
use assistant_cell::{ChatMessage, SUGGESTED_QUESTIONS};
use patient_cell::{ConditionBadge, PatientDetail, PatientRegistry};
use shared_models::{Alert, AlertSeverity, AnalyticsResult, Patient, VitalRecord};
use vitals_cell::{RiskResultView, VitalField};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn badge(patient: &Patient) -> &'static str {
    match ConditionBadge::classify(patient.medical_history.as_deref()) {
        ConditionBadge::Critical => "CRITICAL",
        ConditionBadge::Monitoring => "MONITORING",
        ConditionBadge::Stable => "STABLE",
    }
}

pub fn patient(patient: &Patient) {
    println!("{} ({})", patient.name, patient.id);
    println!("  Age:       {}", patient.age);
    println!("  Gender:    {}", patient.gender);
    println!("  Contact:   {}", or_dash(patient.contact.as_deref()));
    println!("  History:   {}", or_dash(patient.medical_history.as_deref()));
    println!("  Condition: {}", badge(patient));
    if let Some(created) = patient.created_at {
        println!("  Added:     {}", created.format(TIME_FORMAT));
    }
}

pub fn registry(registry: &PatientRegistry) {
    let rows = registry.current_page();
    if rows.is_empty() {
        println!("No patients match the current search.");
    } else {
        println!(
            "{:<38} {:<24} {:>4} {:<7} {:<11}",
            "ID", "NAME", "AGE", "GENDER", "CONDITION"
        );
        for patient in rows {
            println!(
                "{:<38} {:<24} {:>4} {:<7} {:<11}",
                patient.id,
                patient.name,
                patient.age,
                patient.gender,
                badge(patient)
            );
        }
    }

    println!(
        "Page {} of {} ({} matching, {} total)",
        registry.page(),
        registry.total_pages().max(1),
        registry.filtered_count(),
        registry.total_count()
    );
}

fn measured(value: Option<f64>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.precision$}", v, width = width, precision = precision),
        None => format!("{:>width$}", "-", width = width),
    }
}

fn vital_row(record: &VitalRecord) -> String {
    let when = record
        .recorded_at
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    let risk = record
        .risk_level
        .map(|level| level.to_string())
        .unwrap_or_else(|| "-".to_string());
    let reading = &record.reading;

    format!(
        "{:<16} HR {}  BP {}/{:<3}  T {}  SpO2 {}%  {:<8} {}{}",
        when,
        measured(reading.heart_rate, 5, 0),
        measured(reading.blood_pressure_systolic, 3, 0),
        measured(reading.blood_pressure_diastolic, 0, 0),
        measured(reading.temperature, 4, 1),
        measured(reading.oxygen_saturation, 3, 0),
        risk,
        measured(record.risk_score, 5, 1),
        if record.alert_triggered { "  !" } else { "" }
    )
}

pub fn vitals_history(history: &[VitalRecord]) {
    if history.is_empty() {
        println!("No readings recorded yet.");
        return;
    }
    for record in history {
        println!("{}", vital_row(record));
    }
}

fn range_row(field: VitalField) -> String {
    format!("{:<18} {}", field.label(), field.normal_range())
}

pub fn reference_ranges() {
    for field in VitalField::ALL {
        println!("{}", range_row(field));
    }
}

pub fn risk_result(result: &RiskResultView) {
    match &result.patient_name {
        Some(name) => println!("{} for {}", result.headline(), name),
        None => println!("{}", result.headline()),
    }
    println!("Risk score: {:.1}", result.score());
    println!("{}", result.guidance());

    if !result.recommendations().is_empty() {
        println!("Recommendations:");
        for recommendation in result.recommendations() {
            println!("  - {}", recommendation);
        }
    }
    if result.alert_triggered() {
        println!("An alert was raised for the care team.");
    }
}

fn alert_row(alert: &Alert) {
    let severity = match alert.severity {
        AlertSeverity::Critical => "CRITICAL",
        AlertSeverity::Warning => "WARNING",
    };
    let status = if alert.acknowledged { "ack" } else { "open" };
    let who = alert
        .patient_name
        .as_deref()
        .unwrap_or(alert.patient_id.as_str());

    println!(
        "{:<8} {:<4} {:<36} {:<20} {}",
        severity, status, alert.id, who, alert.message
    );
}

pub fn alert_feed(feed: &AlertFeed) {
    if let Some(message) = feed.error() {
        eprintln!("{}", message);
    }

    println!(
        "{} open ({} critical, {} warning), showing {} [{}]",
        feed.unacknowledged_count(),
        feed.critical_count(),
        feed.warning_count(),
        feed.alerts().len(),
        feed.filter()
    );
    for alert in feed.alerts() {
        alert_row(alert);
    }
}

pub fn patient_detail(detail: &PatientDetail) {
    if let Some(p) = detail.patient() {
        patient(p);
    }

    println!();
    println!("Vitals ({} readings):", detail.history().len());
    vitals_history(detail.history());

    println!();
    println!(
        "Alerts ({} unacknowledged):",
        detail.unacknowledged_count()
    );
    for alert in detail.alerts() {
        alert_row(alert);
    }
}

pub fn chat_reply(reply: &ChatMessage) {
    if let Some(topic) = &reply.topic {
        println!("[{}]", topic);
    }
    println!("{}", reply.content);
    if let Some(disclaimer) = &reply.disclaimer {
        println!();
        println!("{}", disclaimer);
    }
}

pub fn suggestions() {
    println!("Try asking:");
    for question in SUGGESTED_QUESTIONS {
        println!("  - {}", question);
    }
}

pub fn analytics(result: &AnalyticsResult) {
    println!("Analytics for patient {}", result.patient_id);
    println!("  Readings: {}", result.total_readings);
    println!(
        "  Risk distribution: {} low, {} moderate, {} high",
        result.risk_distribution.low, result.risk_distribution.moderate, result.risk_distribution.high
    );
    println!("  Trend: {}", result.trend_direction);
    if let Some(level) = result.latest_risk_level {
        println!("  Latest risk: {}", level);
    }
    if result.deteriorating {
        println!("  Deteriorating: yes");
    }

    let averages = [
        ("Heart rate", result.averages.heart_rate),
        ("Systolic", result.averages.blood_pressure_systolic),
        ("Diastolic", result.averages.blood_pressure_diastolic),
        ("Temperature", result.averages.temperature),
        ("SpO2", result.averages.oxygen_saturation),
        ("Risk score", result.averages.risk_score),
    ];
    println!("  Averages:");
    for (label, value) in averages {
        match value {
            Some(v) => println!("    {:<12} {:.1}", label, v),
            None => println!("    {:<12} -", label),
        }
    }
}

pub fn dashboard(dashboard: &PatientDashboard) {
    if let Some(p) = dashboard.patient() {
        patient(p);
    }
    println!("  Current risk: {}", dashboard.current_risk());

    println!();
    println!("Recent vitals:");
    vitals_history(dashboard.recent_vitals());

    println!();
    println!("Open alerts: {}", dashboard.open_alerts().len());
    for alert in dashboard.open_alerts() {
        alert_row(alert);
    }

    println!();
    match (dashboard.analytics(), dashboard.analytics_error()) {
        (Some(result), _) => analytics(result),
        (None, Some(message)) => println!("{}", message),
        (None, None) => println!("No analytics available."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::{RecordedReading, RiskLevel};

    fn record(reading: RecordedReading) -> VitalRecord {
        VitalRecord {
            id: "v-1".to_string(),
            patient_id: "p-1".to_string(),
            reading,
            risk_score: Some(12.5),
            risk_level: Some(RiskLevel::Low),
            recommendations: Vec::new(),
            alert_triggered: false,
            recorded_at: None,
        }
    }

    #[test]
    fn vital_row_prints_full_reading() {
        let row = vital_row(&record(RecordedReading {
            heart_rate: Some(72.0),
            blood_pressure_systolic: Some(120.0),
            blood_pressure_diastolic: Some(80.0),
            temperature: Some(36.6),
            oxygen_saturation: Some(98.0),
        }));

        assert!(row.contains("HR    72"));
        assert!(row.contains("BP 120/80"));
        assert!(row.contains("T 36.6"));
        assert!(row.contains("SpO2  98%"));
        assert!(row.contains("12.5"));
    }

    #[test]
    fn vital_row_dashes_missing_readings() {
        let row = vital_row(&record(RecordedReading {
            heart_rate: None,
            blood_pressure_systolic: Some(118.0),
            blood_pressure_diastolic: None,
            temperature: None,
            oxygen_saturation: Some(99.0),
        }));

        assert!(row.contains("HR     -"));
        assert!(row.contains("BP 118/-"));
        assert!(row.contains("T    -"));
        assert!(row.contains("SpO2  99%"));
    }

    #[test]
    fn range_rows_cover_every_field() {
        let rows: Vec<String> = VitalField::ALL.into_iter().map(range_row).collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[0].starts_with("Heart Rate (bpm)"));
        assert!(rows[0].ends_with("Normal: 60-100 bpm"));
        assert!(rows[4].ends_with("Normal: 95-100%"));
    }
}
