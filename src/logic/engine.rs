//! Proctoring Engine
//!
//! Facade wiring the session registry, scoring policies, decision ladder,
//! report generator and live notifier together. Everything is injected at
//! construction - no module-level singletons - so multiple engines can run
//! side by side in tests or behind different exam pools.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

use chrono::Duration;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::ProctorResult;
use crate::logic::ident::{IdProvider, UuidProvider};
use crate::logic::ingest::{self, IngestOutcome, ViolationEvent};
use crate::logic::monitor::{LiveAlert, LiveNotifier, LiveUpdate, MonitoringFeed};
use crate::logic::report::{Report, ReportGenerator};
use crate::logic::scoring::{Severity, ScoringPolicy};
use crate::logic::session::{
    ProctoringSession, SessionMetadata, SessionRegistry, SessionStatus, Violation,
};

// ============================================================================
// SESSION START REQUEST
// ============================================================================

/// "Start exam" request from the exam-runner collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStart {
    pub session_id: String,
    pub exam_id: String,
    pub student_id: String,
    #[serde(default)]
    pub supervisor_id: Option<String>,
    #[serde(default)]
    pub metadata: SessionMetadata,
}

impl SessionStart {
    pub fn new(session_id: &str, exam_id: &str, student_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            exam_id: exam_id.to_string(),
            student_id: student_id.to_string(),
            supervisor_id: None,
            metadata: SessionMetadata::default(),
        }
    }

    pub fn with_supervisor(mut self, supervisor_id: &str) -> Self {
        self.supervisor_id = Some(supervisor_id.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: SessionMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct ProctoringEngine {
    registry: SessionRegistry,
    policy: Arc<ScoringPolicy>,
    exam_policies: RwLock<HashMap<String, Arc<ScoringPolicy>>>,
    reports: ReportGenerator,
    notifier: LiveNotifier,
    ids: Arc<dyn IdProvider>,
    retention: Duration,
}

impl Default for ProctoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProctoringEngine {
    pub fn new() -> Self {
        Self {
            registry: SessionRegistry::new(),
            policy: Arc::new(ScoringPolicy::default()),
            exam_policies: RwLock::new(HashMap::new()),
            reports: ReportGenerator::new(),
            notifier: LiveNotifier::new(),
            ids: Arc::new(UuidProvider),
            retention: Duration::hours(constants::get_retention_hours()),
        }
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn with_id_provider(mut self, ids: Arc<dyn IdProvider>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    pub fn start_session(&self, start: SessionStart) -> ProctorResult<ProctoringSession> {
        let session = ProctoringSession::new(
            start.session_id,
            start.exam_id,
            start.student_id,
            start.supervisor_id,
            start.metadata,
        );
        let snapshot = self.registry.create(session)?;
        self.notifier.publish_update(LiveUpdate::started(&snapshot));
        Ok(snapshot)
    }

    /// Freeze the session and produce its report.
    ///
    /// Idempotent on repeats: the completed notification goes out only on
    /// the call that actually performed the transition, never again.
    pub fn end_session(
        &self,
        session_id: &str,
        terminal: SessionStatus,
    ) -> ProctorResult<Arc<Report>> {
        let (frozen, transitioned) = self.registry.end(session_id, terminal)?;
        let report = self.reports.generate(&frozen)?;
        if transitioned {
            self.notifier.publish_update(LiveUpdate::completed(&frozen));
        }
        Ok(report)
    }

    /// Cached report for an already-terminated session
    pub fn report(&self, session_id: &str) -> ProctorResult<Arc<Report>> {
        if let Some(report) = self.reports.cached(session_id) {
            return Ok(report);
        }
        let snapshot = self.registry.get(session_id)?;
        self.reports.generate(&snapshot)
    }

    /// Snapshot of the session's current state
    pub fn session_status(&self, session_id: &str) -> ProctorResult<ProctoringSession> {
        self.registry.get(session_id)
    }

    /// ACTIVE <-> PAUSED transitions (terminal targets route through end)
    pub fn set_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> ProctorResult<ProctoringSession> {
        self.registry.update_status(session_id, status)
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Score one detector event and return the advisory verdict.
    ///
    /// Validation runs exactly once, here, before the session lookup, so a
    /// malformed payload surfaces as `ValidationError` rather than
    /// `NotFound`. The live fan-out is built from the post-append session
    /// snapshot, happens after the lock is released and is best-effort: a
    /// dead dashboard never fails ingestion.
    pub fn ingest(&self, event: &ViolationEvent) -> ProctorResult<IngestOutcome> {
        event.validate()?;
        let exam_id = self.registry.get(&event.session_id)?.exam_id;
        let policy = self.policy_for(&exam_id);
        let (outcome, session) =
            ingest::ingest(&self.registry, &policy, self.ids.as_ref(), event)?;

        self.notifier
            .publish_alert(LiveAlert::new(&session, outcome.violation.clone()));
        self.notifier.publish_update(LiveUpdate::violation(
            &session,
            outcome.session_score,
            outcome.action,
        ));
        Ok(outcome)
    }

    /// Reviewer acknowledgment of a logged violation
    pub fn acknowledge(
        &self,
        session_id: &str,
        violation_id: &str,
        note: Option<String>,
    ) -> ProctorResult<Violation> {
        ingest::acknowledge(&self.registry, session_id, violation_id, note)
    }

    // ------------------------------------------------------------------
    // Scoring policy
    // ------------------------------------------------------------------

    /// Install a test-specific override table for one exam
    pub fn set_exam_policy(&self, exam_id: &str, policy: ScoringPolicy) {
        self.exam_policies
            .write()
            .insert(exam_id.to_string(), Arc::new(policy));
    }

    fn policy_for(&self, exam_id: &str) -> Arc<ScoringPolicy> {
        self.exam_policies
            .read()
            .get(exam_id)
            .cloned()
            .unwrap_or_else(|| self.policy.clone())
    }

    // ------------------------------------------------------------------
    // Monitoring
    // ------------------------------------------------------------------

    pub fn subscribe_supervisor(&self, supervisor_id: &str) -> MonitoringFeed {
        self.notifier.subscribe_supervisor(supervisor_id)
    }

    pub fn subscribe_global(&self) -> MonitoringFeed {
        self.notifier.subscribe_global()
    }

    /// Relay a student progress ping to the dashboards
    pub fn publish_progress(&self, session_id: &str, percent: u32) -> ProctorResult<()> {
        let snapshot = self.registry.get(session_id)?;
        self.notifier
            .publish_update(LiveUpdate::progress(&snapshot, percent));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Maintenance & dashboards
    // ------------------------------------------------------------------

    /// Evict sessions terminal for longer than the retention window.
    /// Returns how many were swept.
    pub fn sweep(&self) -> usize {
        let evicted = self.registry.sweep(self.retention);
        self.reports.prune(&evicted);
        evicted.len()
    }

    pub fn sessions_by_exam(&self, exam_id: &str) -> Vec<ProctoringSession> {
        self.registry.sessions_by_exam(exam_id)
    }

    pub fn sessions_by_student(&self, student_id: &str) -> Vec<ProctoringSession> {
        self.registry.sessions_by_student(student_id)
    }

    /// Dashboard aggregate over session snapshots; never blocks writers
    pub fn analytics(&self) -> EngineAnalytics {
        let sessions = self.registry.all_sessions();
        let mut analytics = EngineAnalytics {
            total_sessions: sessions.len() as u32,
            ..Default::default()
        };

        let mut score_sum: u64 = 0;
        for session in &sessions {
            score_sum += u64::from(session.violation_score);
            match session.status {
                SessionStatus::Active => analytics.active_sessions += 1,
                SessionStatus::Completed => analytics.completed_sessions += 1,
                _ => {}
            }
            if session.violation_score >= constants::SCORE_PAUSE {
                analytics.flagged_sessions += 1;
            }
            for violation in &session.violations {
                analytics.total_violations += 1;
                *analytics
                    .violations_by_type
                    .entry(violation.kind.as_str().to_string())
                    .or_insert(0) += 1;
                match violation.severity {
                    Severity::Critical => analytics.severity_distribution.critical += 1,
                    Severity::High => analytics.severity_distribution.high += 1,
                    Severity::Medium => analytics.severity_distribution.medium += 1,
                    Severity::Low => analytics.severity_distribution.low += 1,
                }
            }
        }
        if !sessions.is_empty() {
            analytics.average_violation_score =
                (score_sum as f64 / sessions.len() as f64).round() as u32;
        }
        analytics
    }
}

/// Run the eviction sweep on its own schedule, off the request path
pub fn spawn_sweeper(
    engine: Arc<ProctoringEngine>,
    interval: StdDuration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        log::info!("session sweeper started (every {:?})", interval);
        loop {
            thread::sleep(interval);
            let swept = engine.sweep();
            if swept > 0 {
                log::debug!("sweeper pass evicted {} session(s)", swept);
            }
        }
    })
}

// ============================================================================
// ANALYTICS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityDistribution {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineAnalytics {
    pub total_sessions: u32,
    pub active_sessions: u32,
    pub completed_sessions: u32,
    pub flagged_sessions: u32,
    pub average_violation_score: u32,
    pub total_violations: u32,
    pub violations_by_type: BTreeMap<String, u32>,
    pub severity_distribution: SeverityDistribution,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProctorError;
    use crate::logic::decision::Action;
    use crate::logic::ident::SequencedIdProvider;
    use crate::logic::monitor::UpdateKind;
    use crate::logic::report::FinalDecision;
    use crate::logic::scoring::ViolationKind;

    fn engine() -> ProctoringEngine {
        ProctoringEngine::new().with_id_provider(Arc::new(SequencedIdProvider::new("v")))
    }

    fn event(session_id: &str, kind: &str) -> ViolationEvent {
        ViolationEvent::new(session_id, ViolationKind::parse(kind), 1_700_000_000_000)
    }

    #[test]
    fn test_three_tab_switches_reach_warning() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("s1", "e1", "stu1"))
            .unwrap();

        engine.ingest(&event("s1", "TAB_SWITCH")).unwrap();
        engine.ingest(&event("s1", "TAB_SWITCH")).unwrap();
        let third = engine.ingest(&event("s1", "TAB_SWITCH")).unwrap();

        assert_eq!(third.session_score, 30);
        assert_eq!(third.action, Action::Warning);
    }

    #[test]
    fn test_two_criticals_force_halt_auto() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("s2", "e1", "stu2"))
            .unwrap();

        let first = engine.ingest(&event("s2", "MULTIPLE_FACES")).unwrap();
        assert_eq!(first.action, Action::Warning);

        let second = engine.ingest(&event("s2", "MULTIPLE_FACES")).unwrap();
        // Score 60 alone would only be PAUSE; the critical override wins
        assert_eq!(second.session_score, 60);
        assert_eq!(second.action, Action::HaltAuto);
    }

    #[test]
    fn test_flagged_session_finalizes_rejected() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("s3", "e1", "stu3"))
            .unwrap();

        // Mixed violations totalling 85
        engine.ingest(&event("s3", "MULTIPLE_FACES")).unwrap(); // 30
        engine.ingest(&event("s3", "DEVICE_CHANGE")).unwrap(); // 25
        engine.ingest(&event("s3", "PHONE_DETECTED")).unwrap(); // 20
        let last = engine.ingest(&event("s3", "TAB_SWITCH")).unwrap(); // 10
        assert_eq!(last.session_score, 85);

        let report = engine.end_session("s3", SessionStatus::Flagged).unwrap();
        assert_eq!(report.final_decision, FinalDecision::RejectedFlagged);
        assert_eq!(report.violation_score, 85);

        // Ingest after terminal: rejected, nothing counted
        let err = engine.ingest(&event("s3", "COPY_ATTEMPT")).unwrap_err();
        assert!(matches!(err, ProctorError::SessionTerminated { .. }));
        assert_eq!(engine.session_status("s3").unwrap().violation_score, 85);
    }

    #[test]
    fn test_unknown_kind_scores_zero_and_succeeds() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("s4", "e1", "stu4"))
            .unwrap();
        let outcome = engine.ingest(&event("s4", "UNKNOWN_FUTURE_TYPE")).unwrap();
        assert_eq!(outcome.violation.points, 0);
        assert_eq!(outcome.violation.severity, Severity::Low);
        assert_eq!(outcome.session_score, 0);
        assert_eq!(outcome.action, Action::Continue);
    }

    #[test]
    fn test_sum_invariant_end_to_end() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("s5", "e1", "stu5"))
            .unwrap();
        for kind in [
            "TAB_SWITCH",
            "COPY_ATTEMPT",
            "FULLSCREEN_EXIT",
            "UNKNOWN_FUTURE_TYPE",
            "FACE_NOT_DETECTED",
        ] {
            engine.ingest(&event("s5", kind)).unwrap();
        }
        let session = engine.session_status("s5").unwrap();
        let sum: u32 = session.violations.iter().map(|v| v.points).sum();
        assert_eq!(session.violation_score, sum);
        assert_eq!(session.total_violations, 5);
    }

    #[test]
    fn test_report_is_idempotent_and_ordered() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("s6", "e1", "stu6"))
            .unwrap();
        engine.ingest(&event("s6", "TAB_SWITCH")).unwrap();
        engine.ingest(&event("s6", "PASTE_DETECTED")).unwrap();

        let first = engine.end_session("s6", SessionStatus::Completed).unwrap();
        let second = engine.report("s6").unwrap();
        let third = engine.end_session("s6", SessionStatus::Completed).unwrap();

        assert_eq!(
            serde_json::to_vec(&*first).unwrap(),
            serde_json::to_vec(&*second).unwrap()
        );
        assert_eq!(
            serde_json::to_vec(&*first).unwrap(),
            serde_json::to_vec(&*third).unwrap()
        );
        assert_eq!(first.violations.len() as u32, first.total_violations);
        assert_eq!(first.violations[0].id, "v-1");
        assert_eq!(first.violations[1].id, "v-2");
    }

    #[test]
    fn test_per_exam_policy_override() {
        let engine = engine();
        engine.set_exam_policy(
            "strict-exam",
            ScoringPolicy::with_overrides(HashMap::from([(ViolationKind::TabSwitch, 40)])),
        );
        engine
            .start_session(SessionStart::new("s7", "strict-exam", "stu7"))
            .unwrap();
        engine
            .start_session(SessionStart::new("s8", "normal-exam", "stu7"))
            .unwrap();

        let strict = engine.ingest(&event("s7", "TAB_SWITCH")).unwrap();
        let normal = engine.ingest(&event("s8", "TAB_SWITCH")).unwrap();
        assert_eq!(strict.violation.points, 40);
        assert_eq!(strict.violation.severity, Severity::Critical);
        assert_eq!(normal.violation.points, 10);
    }

    #[test]
    fn test_live_fan_out_on_ingest() {
        let engine = engine();
        let mut feed = engine.subscribe_supervisor("sup1");
        engine
            .start_session(SessionStart::new("s9", "e1", "stu9").with_supervisor("sup1"))
            .unwrap();
        engine.ingest(&event("s9", "PHONE_DETECTED")).unwrap();

        feed.pump();
        assert!(feed.is_connected());
        assert_eq!(feed.alerts().len(), 1);
        assert_eq!(feed.alerts()[0].severity, Severity::Critical);
        // Started + violation updates
        assert_eq!(feed.updates().len(), 2);
        assert_eq!(feed.updates()[0].violation_score, 20);
        assert_eq!(feed.updates()[0].action, Some(Action::Continue));
    }

    #[test]
    fn test_fan_out_reflects_post_ingest_state() {
        let engine = engine();
        let mut feed = engine.subscribe_global();
        engine
            .start_session(SessionStart::new("s12", "e1", "stu12"))
            .unwrap();
        engine.ingest(&event("s12", "PHONE_DETECTED")).unwrap(); // 20
        engine.ingest(&event("s12", "TAB_SWITCH")).unwrap(); // 10

        feed.pump();
        // Newest update carries the cumulative score including its own violation
        let newest = feed.updates().front().unwrap();
        assert_eq!(newest.kind, UpdateKind::ViolationLogged);
        assert_eq!(newest.violation_score, 30);
        assert_eq!(newest.action, Some(Action::Warning));
        assert_eq!(newest.status, SessionStatus::Active);
    }

    #[test]
    fn test_repeat_end_session_notifies_once() {
        let engine = engine();
        let mut feed = engine.subscribe_global();
        engine
            .start_session(SessionStart::new("s13", "e1", "stu13"))
            .unwrap();
        engine.end_session("s13", SessionStatus::Completed).unwrap();
        engine.end_session("s13", SessionStatus::Completed).unwrap();

        feed.pump();
        let completed = feed
            .updates()
            .iter()
            .filter(|u| u.kind == UpdateKind::SessionCompleted)
            .count();
        assert_eq!(completed, 1);
    }

    #[test]
    fn test_sweep_prunes_sessions_and_reports() {
        let engine = engine().with_retention(Duration::hours(1));
        engine
            .start_session(SessionStart::new("s10", "e1", "stu10"))
            .unwrap();
        engine.end_session("s10", SessionStatus::Completed).unwrap();

        // Nothing to sweep yet - retention has not elapsed
        assert_eq!(engine.sweep(), 0);

        // Backdate the end time past the retention window
        engine
            .registry
            .mutate("s10", |s| {
                s.end_time = Some(chrono::Utc::now() - Duration::hours(2));
                Ok(())
            })
            .unwrap();
        assert_eq!(engine.sweep(), 1);
        assert!(matches!(
            engine.session_status("s10"),
            Err(ProctorError::NotFound(_))
        ));
        assert!(matches!(
            engine.report("s10"),
            Err(ProctorError::NotFound(_))
        ));
    }

    #[test]
    fn test_analytics_snapshot() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("a1", "e1", "stu1"))
            .unwrap();
        engine
            .start_session(SessionStart::new("a2", "e1", "stu2"))
            .unwrap();
        engine.ingest(&event("a1", "MULTIPLE_FACES")).unwrap(); // 30 critical
        engine.ingest(&event("a1", "MULTIPLE_FACES")).unwrap(); // 30 critical
        engine.ingest(&event("a2", "TAB_SWITCH")).unwrap(); // 10 medium
        engine.end_session("a2", SessionStatus::Completed).unwrap();

        let analytics = engine.analytics();
        assert_eq!(analytics.total_sessions, 2);
        assert_eq!(analytics.active_sessions, 1);
        assert_eq!(analytics.completed_sessions, 1);
        assert_eq!(analytics.flagged_sessions, 1); // a1 at 60
        assert_eq!(analytics.total_violations, 3);
        assert_eq!(analytics.average_violation_score, 35); // (60 + 10) / 2
        assert_eq!(analytics.violations_by_type["MULTIPLE_FACES"], 2);
        assert_eq!(analytics.severity_distribution.critical, 2);
        assert_eq!(analytics.severity_distribution.medium, 1);
    }

    #[test]
    fn test_validation_error_before_any_lookup() {
        let engine = engine();
        let bad = ViolationEvent::new("", ViolationKind::TabSwitch, 1);
        assert!(matches!(
            engine.ingest(&bad),
            Err(ProctorError::ValidationError(_))
        ));
    }

    #[test]
    fn test_pause_and_resume() {
        let engine = engine();
        engine
            .start_session(SessionStart::new("p1", "e1", "stu1"))
            .unwrap();
        let paused = engine.set_status("p1", SessionStatus::Paused).unwrap();
        assert_eq!(paused.status, SessionStatus::Paused);

        // Paused sessions still accept violations
        let outcome = engine.ingest(&event("p1", "COPY_ATTEMPT")).unwrap();
        assert_eq!(outcome.session_score, 8);

        let resumed = engine.set_status("p1", SessionStatus::Active).unwrap();
        assert_eq!(resumed.status, SessionStatus::Active);
    }
}
