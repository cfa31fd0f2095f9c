//! Scoring Types
//!
//! Violation taxonomy and severity levels.
//! No logic here - only data structures.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::constants::{POINTS_CRITICAL, POINTS_HIGH, POINTS_MEDIUM};

// ============================================================================
// VIOLATION TAXONOMY
// ============================================================================

/// Kinds of suspicious activity reported by the detector layer.
///
/// The taxonomy is open: detectors may ship kinds this build does not know
/// about yet, which parse into `Unknown` and score zero (fail-open).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    // Tab & window
    TabSwitch,
    FullscreenExit,
    WindowMinimize,
    WindowResize,

    // Copy/paste & context menu
    CopyAttempt,
    PasteDetected,
    ContextMenuAttempt,

    // URL filtering
    BlockedDomainAccess,
    ExternalNavigation,

    // Face recognition
    FaceNotDetected,
    MultipleFaces,
    FaceTooSmall,
    FaceTooLarge,
    FaceTooClose,
    FaceNotCentered,
    FaceLookawaySustained,

    // Phone & device
    PhoneDetected,
    SuspiciousObject,
    DeviceChange,
    MultipleDevices,

    // Hand & posture
    HandDetectedNearFace,
    HandOnKeyboardExcessive,
    UnusualPosture,

    // Behavior
    ExcessiveKeystrokeSpeed,
    ClipboardAccess,
    AudioDetected,
    VoicePatternChange,

    // Keystroke pattern
    PossiblePasteDetected,
    RapidCompletion,
    AnswerPatternSuspicious,

    /// Unrecognized wire string, kept verbatim
    Unknown(String),
}

impl ViolationKind {
    pub fn as_str(&self) -> &str {
        match self {
            ViolationKind::TabSwitch => "TAB_SWITCH",
            ViolationKind::FullscreenExit => "FULLSCREEN_EXIT",
            ViolationKind::WindowMinimize => "WINDOW_MINIMIZE",
            ViolationKind::WindowResize => "WINDOW_RESIZE",
            ViolationKind::CopyAttempt => "COPY_ATTEMPT",
            ViolationKind::PasteDetected => "PASTE_DETECTED",
            ViolationKind::ContextMenuAttempt => "CONTEXT_MENU_ATTEMPT",
            ViolationKind::BlockedDomainAccess => "BLOCKED_DOMAIN_ACCESS",
            ViolationKind::ExternalNavigation => "EXTERNAL_NAVIGATION",
            ViolationKind::FaceNotDetected => "FACE_NOT_DETECTED",
            ViolationKind::MultipleFaces => "MULTIPLE_FACES",
            ViolationKind::FaceTooSmall => "FACE_TOO_SMALL",
            ViolationKind::FaceTooLarge => "FACE_TOO_LARGE",
            ViolationKind::FaceTooClose => "FACE_TOO_CLOSE",
            ViolationKind::FaceNotCentered => "FACE_NOT_CENTERED",
            ViolationKind::FaceLookawaySustained => "FACE_LOOKAWAY_SUSTAINED",
            ViolationKind::PhoneDetected => "PHONE_DETECTED",
            ViolationKind::SuspiciousObject => "SUSPICIOUS_OBJECT",
            ViolationKind::DeviceChange => "DEVICE_CHANGE",
            ViolationKind::MultipleDevices => "MULTIPLE_DEVICES",
            ViolationKind::HandDetectedNearFace => "HAND_DETECTED_NEAR_FACE",
            ViolationKind::HandOnKeyboardExcessive => "HAND_ON_KEYBOARD_EXCESSIVE",
            ViolationKind::UnusualPosture => "UNUSUAL_POSTURE",
            ViolationKind::ExcessiveKeystrokeSpeed => "EXCESSIVE_KEYSTROKE_SPEED",
            ViolationKind::ClipboardAccess => "CLIPBOARD_ACCESS",
            ViolationKind::AudioDetected => "AUDIO_DETECTED",
            ViolationKind::VoicePatternChange => "VOICE_PATTERN_CHANGE",
            ViolationKind::PossiblePasteDetected => "POSSIBLE_PASTE_DETECTED",
            ViolationKind::RapidCompletion => "RAPID_COMPLETION",
            ViolationKind::AnswerPatternSuspicious => "ANSWER_PATTERN_SUSPICIOUS",
            ViolationKind::Unknown(raw) => raw.as_str(),
        }
    }

    /// Total parse: never fails, unrecognized strings become `Unknown`
    pub fn parse(raw: &str) -> Self {
        match raw {
            "TAB_SWITCH" => ViolationKind::TabSwitch,
            "FULLSCREEN_EXIT" => ViolationKind::FullscreenExit,
            "WINDOW_MINIMIZE" => ViolationKind::WindowMinimize,
            "WINDOW_RESIZE" => ViolationKind::WindowResize,
            "COPY_ATTEMPT" => ViolationKind::CopyAttempt,
            "PASTE_DETECTED" => ViolationKind::PasteDetected,
            "CONTEXT_MENU_ATTEMPT" => ViolationKind::ContextMenuAttempt,
            "BLOCKED_DOMAIN_ACCESS" => ViolationKind::BlockedDomainAccess,
            "EXTERNAL_NAVIGATION" => ViolationKind::ExternalNavigation,
            "FACE_NOT_DETECTED" => ViolationKind::FaceNotDetected,
            "MULTIPLE_FACES" => ViolationKind::MultipleFaces,
            "FACE_TOO_SMALL" => ViolationKind::FaceTooSmall,
            "FACE_TOO_LARGE" => ViolationKind::FaceTooLarge,
            "FACE_TOO_CLOSE" => ViolationKind::FaceTooClose,
            "FACE_NOT_CENTERED" => ViolationKind::FaceNotCentered,
            "FACE_LOOKAWAY_SUSTAINED" => ViolationKind::FaceLookawaySustained,
            "PHONE_DETECTED" => ViolationKind::PhoneDetected,
            "SUSPICIOUS_OBJECT" => ViolationKind::SuspiciousObject,
            "DEVICE_CHANGE" => ViolationKind::DeviceChange,
            "MULTIPLE_DEVICES" => ViolationKind::MultipleDevices,
            "HAND_DETECTED_NEAR_FACE" => ViolationKind::HandDetectedNearFace,
            "HAND_ON_KEYBOARD_EXCESSIVE" => ViolationKind::HandOnKeyboardExcessive,
            "UNUSUAL_POSTURE" => ViolationKind::UnusualPosture,
            "EXCESSIVE_KEYSTROKE_SPEED" => ViolationKind::ExcessiveKeystrokeSpeed,
            "CLIPBOARD_ACCESS" => ViolationKind::ClipboardAccess,
            "AUDIO_DETECTED" => ViolationKind::AudioDetected,
            "VOICE_PATTERN_CHANGE" => ViolationKind::VoicePatternChange,
            "POSSIBLE_PASTE_DETECTED" => ViolationKind::PossiblePasteDetected,
            "RAPID_COMPLETION" => ViolationKind::RapidCompletion,
            "ANSWER_PATTERN_SUSPICIOUS" => ViolationKind::AnswerPatternSuspicious,
            other => ViolationKind::Unknown(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ViolationKind::Unknown(_))
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ViolationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ViolationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ViolationKind::parse(&raw))
    }
}

// ============================================================================
// SEVERITY LEVELS
// ============================================================================

/// Severity of a single violation, derived from its point weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Derive severity from a violation's point weight
    pub fn from_points(points: u32) -> Self {
        if points >= POINTS_CRITICAL {
            Severity::Critical
        } else if points >= POINTS_HIGH {
            Severity::High
        } else if points >= POINTS_MEDIUM {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
