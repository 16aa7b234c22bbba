//! The reason→(kind, phase) classification table. This mapping is part
//! of the system contract (§4.1) — exhaustive for the reasons
//! Kubernetes emits for the signals this engine reasons about. Unknown
//! reasons classify as `Generic/Warning`, preserving the literal string.

use crate::event::{EventKind, EventPhase};

pub fn classify(reason: &str) -> (EventKind, EventPhase) {
    use EventKind::*;
    use EventPhase::*;
    match reason {
        "FailedScheduling" => (Scheduling, Failure),
        "Unschedulable" => (Scheduling, Failure),
        "Scheduled" => (Scheduling, Info),
        "FailedMount" => (Volume, Failure),
        "ProvisioningFailed" => (Volume, Failure),
        "VolumeFailedDelete" => (Volume, Failure),
        "FailedAttachVolume" => (Volume, Failure),
        "Failed" => (Image, Failure),
        "ErrImagePull" => (Image, Failure),
        "ImagePullBackOff" => (Image, Failure),
        "InspectFailed" => (Image, Failure),
        "Pulled" => (Image, Info),
        "Pulling" => (Image, Info),
        "BackOff" => (Lifecycle, Failure),
        "OOMKilled" => (Lifecycle, Failure),
        "Killing" => (Lifecycle, Info),
        "Started" => (Lifecycle, Info),
        "Created" => (Lifecycle, Info),
        "Unhealthy" => (Probe, Failure),
        "ProbeWarning" => (Probe, Warning),
        "FailedCreatePodSandBox" => (Network, Failure),
        "NetworkNotReady" => (Network, Failure),
        "Evicted" => (NodePressure, Failure),
        "NodeNotReady" => (NodePressure, Failure),
        "NodeHasDiskPressure" => (NodePressure, Failure),
        "NodeHasMemoryPressure" => (NodePressure, Failure),
        "NodeHasInsufficientResource" => (NodePressure, Failure),
        "FailedCreate" => (Owner, Failure),
        "FailedValidation" => (Admission, Failure),
        "ForbiddenBySecurityPolicy" => (Admission, Failure),
        _ => (Generic, Warning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_reasons_classify_per_contract_table() {
        assert_eq!(classify("FailedScheduling"), (EventKind::Scheduling, EventPhase::Failure));
        assert_eq!(classify("FailedMount"), (EventKind::Volume, EventPhase::Failure));
        assert_eq!(classify("ImagePullBackOff"), (EventKind::Image, EventPhase::Failure));
        assert_eq!(classify("BackOff"), (EventKind::Lifecycle, EventPhase::Failure));
        assert_eq!(classify("OOMKilled"), (EventKind::Lifecycle, EventPhase::Failure));
        assert_eq!(classify("Unhealthy"), (EventKind::Probe, EventPhase::Failure));
        assert_eq!(classify("FailedCreatePodSandBox"), (EventKind::Network, EventPhase::Failure));
        assert_eq!(classify("Evicted"), (EventKind::NodePressure, EventPhase::Failure));
        assert_eq!(classify("NodeNotReady"), (EventKind::NodePressure, EventPhase::Failure));
        assert_eq!(classify("FailedCreate"), (EventKind::Owner, EventPhase::Failure));
    }

    #[test]
    fn unknown_reason_falls_back_to_generic_warning() {
        assert_eq!(classify("SomeCustomControllerReason"), (EventKind::Generic, EventPhase::Warning));
    }
}
