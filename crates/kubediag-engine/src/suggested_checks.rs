//! The Suggested-Checks Library (§4.6): a static `causeKind -> checks`
//! table. Deterministic; the only dynamic value ever interpolated is the
//! involved object's name.

/// Checks for a given cause kind, with `{involvedObject}` substituted for
/// the object the cause is about. Unknown kinds yield an empty list.
pub fn checks_for(kind: &str, involved_object: &str) -> Vec<String> {
    let templates: &[&str] = match kind {
        "UnschedulableTaint" => &[
            "inspect node taints with `kubectl describe node <node>`",
            "check {involvedObject}'s tolerations against the cluster's taints",
        ],
        "UnschedulableResource" => &[
            "check cluster capacity with `kubectl describe nodes`",
            "review {involvedObject}'s resource requests against available node capacity",
        ],
        "UnschedulableGeneric" | "FailedSchedulingGeneric" | "PodPendingUnknownCause" => &[
            "inspect recent scheduling events with `kubectl describe pod {involvedObject}`",
        ],
        "SchedulingFlapping" => &[
            "check for a flapping node pool or autoscaler churn affecting {involvedObject}",
        ],
        "SchedulingPriorityPreemption" => &[
            "check {involvedObject}'s priorityClassName and whether lower-priority pods are being preempted",
        ],
        "NodeAffinityMismatch" => &[
            "review {involvedObject}'s node affinity/anti-affinity rules against available node labels",
        ],

        "ImagePullSecretMissing" => &[
            "verify {involvedObject} or its ServiceAccount has imagePullSecrets configured",
            "confirm the registry credentials referenced by the secret are still valid",
        ],
        "ImagePullBackOff" | "ErrImagePull" | "ImagePullGenericFailed" => &[
            "check the image reference and registry credentials for {involvedObject}",
        ],
        "ImageInspectFailed" => &[
            "check the container runtime logs on the node hosting {involvedObject}",
        ],
        "ImagePullAccessDenied" => &[
            "check registry authentication for {involvedObject}'s imagePullSecrets",
        ],
        "ImageNotFound" => &[
            "verify the image tag on {involvedObject} exists in the target registry",
        ],
        "ImageRegistryTimeout" => &[
            "check network connectivity from the node to the image registry",
        ],
        "ImageUpdatedThenCrashloop" => &[
            "diff the new image against the previous working image for {involvedObject}",
            "check application logs emitted right after the image pull",
        ],

        "PVCNotBound" | "PvcUnresolvedClaim" | "PvAbsentForBoundPvc" | "PvcPendingGeneric" => &[
            "check PVC status with `kubectl describe pvc` for {involvedObject}",
            "confirm a matching PersistentVolume or dynamic provisioner is available",
        ],
        "StorageClassMissing" => &[
            "verify the StorageClass referenced by {involvedObject}'s PVC exists",
        ],
        "FailedMount" | "FailedAttachVolume" => &[
            "check kubelet logs on the node hosting {involvedObject} for mount errors",
        ],
        "ProvisioningFailed" | "VolumeFailedDelete" => &[
            "check the volume provisioner's logs for {involvedObject}'s claim",
        ],
        "PVCPendingThenCrashloop" => &[
            "check PVC status with `kubectl describe pvc` for {involvedObject}",
            "confirm the container actually needs the volume to be bound before starting",
        ],

        "OOMKilled" | "OOMKilledUnconfirmed" => &[
            "review {involvedObject}'s memory limit against observed usage",
            "check for memory leaks in recent releases of the image running on {involvedObject}",
        ],
        "CrashLoopBackoff" | "CrashLoopBackoffMessageHint" | "RepeatedBackOffEarlyWarning" => &[
            "check container logs for {involvedObject}'s last crash",
            "inspect the container's last termination reason and exit code",
        ],
        "ContainerExitedWithError" => &[
            "check container logs for {involvedObject}'s last error exit",
        ],
        "ContainerRestartObserved" => &[
            "check whether {involvedObject}'s restart was triggered by a config or secret change",
        ],
        "RapidRestartEscalation" => &[
            "check container logs for {involvedObject}'s last several crashes",
            "look for a recent change (image, config, or resources) on {involvedObject}",
        ],

        "Unhealthy" | "ProbeWarning" | "RepeatedUnhealthyEarlyWarning" | "ProbeTimeoutMessage" | "ContainerStartupProbeFailed" => &[
            "verify the liveness/readiness probe configuration on {involvedObject}",
            "check whether the application inside {involvedObject} is slow to start or respond",
        ],
        "RepeatedProbeFailure" => &[
            "verify the liveness/readiness probe configuration on {involvedObject}",
            "check recent resource pressure that could be slowing {involvedObject}'s probe responses",
        ],

        "PodSandboxNetworkFailure" | "NetworkNotReady" | "CniPluginFailure" => &[
            "check the CNI plugin status on the node hosting {involvedObject}",
        ],
        "DnsResolutionFailure" => &[
            "check CoreDNS/kube-dns health and {involvedObject}'s DNS policy",
        ],
        "LoadBalancerNotReady" => &[
            "check the cloud provider's load balancer controller logs",
        ],

        "AdmissionWebhookDenied" | "AdmissionFailedValidation" | "AdmissionForbiddenBySecurityPolicy" => &[
            "review the admission webhook's rejection message for {involvedObject}",
            "check the webhook's configured failure policy and matching rules",
        ],
        "AdmissionQuotaExceeded" => &[
            "check the namespace's ResourceQuota against {involvedObject}'s requests",
        ],
        "PodSecurityStandardViolation" => &[
            "review {involvedObject}'s securityContext against the namespace's Pod Security Standard level",
        ],

        "NodeNotReadyEvicted" | "Evicted" | "NodeNotReady" => &[
            "check node conditions with `kubectl describe node` for the node that hosted {involvedObject}",
            "check node-level resource pressure (disk, memory, PID) around the eviction time",
        ],
        "NodeDiskPressure" => &[
            "check disk usage on the node hosting {involvedObject}",
        ],
        "NodeMemoryPressure" => &[
            "check memory usage on the node hosting {involvedObject}",
        ],
        "NodeInsufficientResource" => &[
            "check node allocatable resources against {involvedObject}'s requests",
        ],

        "OwnerReplicasNotReady" | "OwnerFailedCreate" | "StatefulSetRollingUpdateStuck" => &[
            "check the owning controller's status and recent events",
        ],

        _ => &[],
    };
    templates.iter().map(|t| t.replace("{involvedObject}", involved_object)).collect()
}

/// Advisory returned when no rule matches (§4.5: "a default advisory is
/// returned").
pub fn no_signal_advisory() -> Vec<String> {
    vec!["no diagnostic signal found; inspect pod status and recent events directly".to_string()]
}
