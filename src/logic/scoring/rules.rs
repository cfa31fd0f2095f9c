//! Default Weight Table
//!
//! Point weights per violation kind. These are the platform defaults;
//! a `ScoringPolicy` may override any of them per exam.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::types::ViolationKind;

/// Default violation point weights
pub static DEFAULT_WEIGHTS: Lazy<HashMap<ViolationKind, u32>> = Lazy::new(|| {
    use ViolationKind::*;

    HashMap::from([
        // Tab & window violations
        (TabSwitch, 10),
        (FullscreenExit, 15),
        (WindowMinimize, 12),
        (WindowResize, 8),
        // Copy/paste violations
        (CopyAttempt, 8),
        (PasteDetected, 15),
        (ContextMenuAttempt, 5),
        // URL violations
        (BlockedDomainAccess, 10),
        (ExternalNavigation, 12),
        // Face violations
        (FaceNotDetected, 10),
        (MultipleFaces, 30),
        (FaceTooSmall, 8),
        (FaceTooLarge, 8),
        (FaceTooClose, 12),
        (FaceNotCentered, 8),
        (FaceLookawaySustained, 15),
        // Phone & device violations
        (PhoneDetected, 20),
        (SuspiciousObject, 15),
        (DeviceChange, 25),
        (MultipleDevices, 20),
        // Hand & posture violations
        (HandDetectedNearFace, 12),
        (HandOnKeyboardExcessive, 8),
        (UnusualPosture, 10),
        // Behavior violations
        (ExcessiveKeystrokeSpeed, 8),
        (ClipboardAccess, 15),
        (AudioDetected, 5),
        (VoicePatternChange, 10),
        // Keystroke pattern
        (PossiblePasteDetected, 12),
        (RapidCompletion, 10),
        (AnswerPatternSuspicious, 18),
    ])
});
