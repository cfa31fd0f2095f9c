//! Session Registry
//!
//! Owns every in-memory `ProctoringSession`, keyed by session id.
//! Explicitly constructed and injected - no global singleton - so engines
//! can be tested and scaled independently.
//!
//! Locking discipline: the outer map lock is held only long enough to
//! fetch a session's entry; all mutation happens under that session's own
//! mutex. Writers to different sessions never contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::{Mutex, RwLock};

use crate::error::{ProctorError, ProctorResult};

use super::types::{ProctoringSession, SessionStatus};

// ============================================================================
// REGISTRY
// ============================================================================

type SessionEntry = Arc<Mutex<ProctoringSession>>;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session. Fails with `AlreadyExists` on a duplicate id.
    pub fn create(&self, session: ProctoringSession) -> ProctorResult<ProctoringSession> {
        let mut map = self.sessions.write();
        if map.contains_key(&session.id) {
            return Err(ProctorError::AlreadyExists(format!(
                "session {}",
                session.id
            )));
        }
        let snapshot = session.clone();
        map.insert(session.id.clone(), Arc::new(Mutex::new(session)));
        log::info!("proctoring session created: {}", snapshot.id);
        Ok(snapshot)
    }

    fn entry(&self, session_id: &str) -> ProctorResult<SessionEntry> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| ProctorError::NotFound(format!("session {}", session_id)))
    }

    /// Snapshot copy of a session; readers never block writers for long
    pub fn get(&self, session_id: &str) -> ProctorResult<ProctoringSession> {
        Ok(self.entry(session_id)?.lock().clone())
    }

    /// Atomic read-modify-write under the session's exclusive lock
    pub fn mutate<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut ProctoringSession) -> ProctorResult<T>,
    ) -> ProctorResult<T> {
        let entry = self.entry(session_id)?;
        let mut session = entry.lock();
        f(&mut session)
    }

    /// Freeze a session into a terminal status.
    ///
    /// Idempotent: ending an already-terminal session returns its current
    /// state without re-deriving anything. The flag tells the caller whether
    /// this call performed the transition, so one-shot side effects (live
    /// notifications) fire exactly once. Passing a non-terminal status is a
    /// caller bug.
    pub fn end(
        &self,
        session_id: &str,
        terminal: SessionStatus,
    ) -> ProctorResult<(ProctoringSession, bool)> {
        if !terminal.is_terminal() {
            return Err(ProctorError::ValidationError(format!(
                "{} is not a terminal status",
                terminal
            )));
        }
        self.mutate(session_id, |session| {
            if session.is_terminal() {
                return Ok((session.clone(), false));
            }
            session.status = terminal;
            session.end_time = Some(Utc::now());
            session.updated_at = Utc::now();
            log::info!(
                "session ended: {} | score: {} | status: {}",
                session.id,
                session.violation_score,
                terminal
            );
            Ok((session.clone(), true))
        })
    }

    /// Transition between non-terminal statuses (ACTIVE <-> PAUSED).
    /// Terminal targets are routed through `end`; terminal sessions are frozen.
    pub fn update_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> ProctorResult<ProctoringSession> {
        if status.is_terminal() {
            return self.end(session_id, status).map(|(session, _)| session);
        }
        self.mutate(session_id, |session| {
            if session.is_terminal() {
                return Err(ProctorError::SessionTerminated {
                    session_id: session.id.clone(),
                    status: session.status,
                });
            }
            session.status = status;
            session.updated_at = Utc::now();
            Ok(session.clone())
        })
    }

    /// Evict sessions that have been terminal for longer than `max_age`.
    ///
    /// ACTIVE/PAUSED sessions are never evicted regardless of age; idle
    /// timeouts are the watchdog collaborator's concern, not the sweep's.
    /// Returns the evicted session ids.
    pub fn sweep(&self, max_age: Duration) -> Vec<String> {
        let cutoff = Utc::now() - max_age;
        let candidates: Vec<(String, SessionEntry)> = self
            .sessions
            .read()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.clone()))
            .collect();

        let mut evict = Vec::new();
        for (id, entry) in candidates {
            let session = entry.lock();
            if session.is_terminal() && session.end_time.map_or(false, |t| t < cutoff) {
                evict.push(id);
            }
        }

        if !evict.is_empty() {
            let mut map = self.sessions.write();
            for id in &evict {
                map.remove(id);
            }
            log::info!("swept {} expired session(s)", evict.len());
        }
        evict
    }

    // ------------------------------------------------------------------
    // Snapshot reads for dashboards
    // ------------------------------------------------------------------

    pub fn all_sessions(&self) -> Vec<ProctoringSession> {
        self.sessions
            .read()
            .values()
            .map(|entry| entry.lock().clone())
            .collect()
    }

    pub fn sessions_by_exam(&self, exam_id: &str) -> Vec<ProctoringSession> {
        self.all_sessions()
            .into_iter()
            .filter(|s| s.exam_id == exam_id)
            .collect()
    }

    pub fn sessions_by_student(&self, student_id: &str) -> Vec<ProctoringSession> {
        self.all_sessions()
            .into_iter()
            .filter(|s| s.student_id == student_id)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.sessions
            .read()
            .values()
            .filter(|entry| entry.lock().status == SessionStatus::Active)
            .count()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::session::types::SessionMetadata;

    fn session(id: &str) -> ProctoringSession {
        ProctoringSession::new(
            id.to_string(),
            "exam-1".to_string(),
            "student-1".to_string(),
            None,
            SessionMetadata::default(),
        )
    }

    #[test]
    fn test_create_rejects_duplicate_id() {
        let registry = SessionRegistry::new();
        registry.create(session("s1")).unwrap();
        let err = registry.create(session("s1")).unwrap_err();
        assert!(matches!(err, ProctorError::AlreadyExists(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let registry = SessionRegistry::new();
        assert!(matches!(
            registry.get("nope"),
            Err(ProctorError::NotFound(_))
        ));
    }

    #[test]
    fn test_end_is_idempotent() {
        let registry = SessionRegistry::new();
        registry.create(session("s1")).unwrap();

        let (first, transitioned) = registry.end("s1", SessionStatus::Completed).unwrap();
        let (again, repeated) = registry.end("s1", SessionStatus::Flagged).unwrap();

        // Second end keeps the original terminal state, no side effects
        assert!(transitioned);
        assert!(!repeated);
        assert_eq!(again.status, SessionStatus::Completed);
        assert_eq!(again.end_time, first.end_time);
    }

    #[test]
    fn test_end_rejects_non_terminal_status() {
        let registry = SessionRegistry::new();
        registry.create(session("s1")).unwrap();
        assert!(matches!(
            registry.end("s1", SessionStatus::Paused),
            Err(ProctorError::ValidationError(_))
        ));
    }

    #[test]
    fn test_update_status_frozen_after_terminal() {
        let registry = SessionRegistry::new();
        registry.create(session("s1")).unwrap();
        registry.end("s1", SessionStatus::Cancelled).unwrap();
        assert!(matches!(
            registry.update_status("s1", SessionStatus::Active),
            Err(ProctorError::SessionTerminated { .. })
        ));
    }

    #[test]
    fn test_sweep_only_evicts_old_terminal_sessions() {
        let registry = SessionRegistry::new();
        registry.create(session("active")).unwrap();
        registry.create(session("fresh-done")).unwrap();
        registry.create(session("old-done")).unwrap();

        registry.end("fresh-done", SessionStatus::Completed).unwrap();
        registry.end("old-done", SessionStatus::Completed).unwrap();
        // Backdate one terminal session past the retention window
        registry
            .mutate("old-done", |s| {
                s.end_time = Some(Utc::now() - Duration::hours(48));
                Ok(())
            })
            .unwrap();

        let evicted = registry.sweep(Duration::hours(24));
        assert_eq!(evicted, vec!["old-done".to_string()]);
        assert!(registry.get("active").is_ok());
        assert!(registry.get("fresh-done").is_ok());
        assert!(matches!(
            registry.get("old-done"),
            Err(ProctorError::NotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_mutation_serializes_per_session() {
        use crate::logic::scoring::{Severity, ViolationKind};
        use crate::logic::session::types::Violation;
        use std::sync::Arc;

        let registry = Arc::new(SessionRegistry::new());
        registry.create(session("s1")).unwrap();

        let mut handles = Vec::new();
        for t in 0..4 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    registry
                        .mutate("s1", |s| {
                            s.record(Violation {
                                id: format!("v-{}-{}", t, i),
                                session_id: "s1".to_string(),
                                kind: ViolationKind::TabSwitch,
                                points: 10,
                                severity: Severity::Medium,
                                details: serde_json::json!({}),
                                timestamp_ms: 1,
                                screenshot_ref: None,
                                acknowledged: false,
                                reviewer_note: None,
                                acknowledged_at: None,
                                created_at: Utc::now(),
                            });
                            Ok(())
                        })
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.get("s1").unwrap();
        assert_eq!(snapshot.total_violations, 200);
        assert_eq!(snapshot.violation_score, 2000);
        let sum: u32 = snapshot.violations.iter().map(|v| v.points).sum();
        assert_eq!(snapshot.violation_score, sum);
    }
}
