use thiserror::Error;
use tracing::debug;

use bundlescope_bundle::{BundleError, BundleFs, Layout, load_resources};
use bundlescope_types::PodLogRequest;

/// Annotation static pods (etcd, kube-apiserver, kube-controller-manager)
/// carry in place of a controller-assigned UID; their log directories are
/// keyed by this hash instead.
pub const CONFIG_HASH_ANNOTATION: &str = "kubernetes.io/config.hash";

/// Errors produced while serving pod logs from a bundle.
#[derive(Debug, Error)]
pub enum LogsError {
    /// No candidate log path exists in the bundle. Carries the full ordered
    /// candidate list that was tried, for operator diagnostics.
    #[error(
        "no logs found for container {container:?} of pod {namespace}/{pod}; tried: {}",
        .candidates.join(", ")
    )]
    NotFound {
        namespace: String,
        pod: String,
        container: String,
        candidates: Vec<String>,
    },

    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Pod metadata derived from the bundle while resolving log paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PodLogContext {
    pub uid: String,
    pub config_hash: String,
    pub restart_count: i32,
}

/// Derive the pod UID, config hash annotation, and the requested container's
/// restart count from the namespace's pod resource file at
/// `<cluster-resources>/pods/<namespace>.yaml`.
///
/// The resource list is scanned for the first item whose name equals the
/// pod's; first match wins. When no item matches, all fields stay empty/zero
/// and the UID/hash-keyed candidates degenerate to paths that simply do not
/// exist.
pub fn pod_log_context(
    fs: &dyn BundleFs,
    layout: &Layout,
    request: &PodLogRequest,
) -> Result<PodLogContext, BundleError> {
    let path = format!("{}/pods/{}.yaml", layout.cluster_resources, request.namespace);
    let list = load_resources(fs, &path)?;

    let Some(pod) = list.find_by_name(&request.pod) else {
        debug!(pod = %request.pod, path = %path, "pod not present in resource file");
        return Ok(PodLogContext::default());
    };

    Ok(PodLogContext {
        uid: pod.uid().to_string(),
        config_hash: pod
            .annotation(CONFIG_HASH_ANNOTATION)
            .unwrap_or("")
            .to_string(),
        restart_count: pod.container_restart_count(&request.container),
    })
}

/// Compute the ordered list of candidate log file paths for a request, most
/// likely first. The caller probes them in order against the bundle
/// filesystem and the first existing path wins.
pub fn log_candidates(
    layout: &Layout,
    request: &PodLogRequest,
    ctx: &PodLogContext,
) -> Vec<String> {
    let PodLogRequest {
        namespace,
        pod,
        container,
        ..
    } = request;

    if request.previous {
        let mut candidates = Vec::new();
        // A restart count of 1 would decrement to log index 0, which is the
        // current log, not the previous one.
        if ctx.restart_count > 1 {
            candidates.push(format!(
                "{}/{}_{}_{}/{}/{}.log",
                layout.pod_logs,
                namespace,
                pod,
                ctx.uid,
                container,
                ctx.restart_count - 1
            ));
        }
        candidates.push(format!(
            "{}/{}/{}/previous.log",
            layout.previous_pod_logs, namespace, pod
        ));
        return candidates;
    }

    vec![
        // pod-logs collector convention.
        format!("{}/{}/{}-{}.log", layout.pod_logs, namespace, pod, container),
        // cluster-resources collector convention for failing pods.
        format!(
            "{}/pods/logs/{}/{}/{}.log",
            layout.cluster_resources, namespace, pod, container
        ),
        // cluster-info dump convention.
        format!("{}/dump/{}/{}/logs.txt", layout.cluster_info, namespace, pod),
        // /var/log/pods convention, keyed by UID.
        format!(
            "{}/{}_{}_{}/{}/{}.log",
            layout.pod_logs, namespace, pod, ctx.uid, container, ctx.restart_count
        ),
        // Same convention keyed by the static-pod config hash annotation.
        format!(
            "{}/{}_{}_{}/{}/{}.log",
            layout.pod_logs, namespace, pod, ctx.config_hash, container, ctx.restart_count
        ),
    ]
}

/// Serve a container's raw log bytes from the bundle: derive the pod context,
/// probe the candidate paths in order, and read the first that exists.
pub fn fetch_pod_logs(
    fs: &dyn BundleFs,
    layout: &Layout,
    request: &PodLogRequest,
) -> Result<Vec<u8>, LogsError> {
    let ctx = pod_log_context(fs, layout, request)?;
    let candidates = log_candidates(layout, request, &ctx);

    for candidate in &candidates {
        if fs.exists(candidate) {
            debug!(path = %candidate, "serving logs");
            return Ok(fs.read(candidate)?);
        }
    }

    Err(LogsError::NotFound {
        namespace: request.namespace.clone(),
        pod: request.pod.clone(),
        container: request.container.clone(),
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlescope_bundle::MemoryFs;

    fn request(previous: bool) -> PodLogRequest {
        let request = PodLogRequest::new("default", "web-1", "app");
        if previous { request.previous() } else { request }
    }

    fn context(uid: &str, config_hash: &str, restart_count: i32) -> PodLogContext {
        PodLogContext {
            uid: uid.to_string(),
            config_hash: config_hash.to_string(),
            restart_count,
        }
    }

    #[test]
    fn test_current_log_candidate_order() {
        let candidates = log_candidates(
            &Layout::default(),
            &request(false),
            &context("abc", "", 2),
        );

        assert_eq!(
            candidates,
            vec![
                "k8s/pod-logs/default/web-1-app.log",
                "k8s/cluster-resources/pods/logs/default/web-1/app.log",
                "k8s/cluster-info/dump/default/web-1/logs.txt",
                "k8s/pod-logs/default_web-1_abc/app/2.log",
                "k8s/pod-logs/default_web-1_/app/2.log",
            ]
        );
    }

    #[test]
    fn test_previous_log_decrements_restart_count() {
        let candidates = log_candidates(
            &Layout::default(),
            &request(true),
            &context("abc", "", 3),
        );

        assert_eq!(
            candidates,
            vec![
                "k8s/pod-logs/default_web-1_abc/app/2.log",
                "k8s/previous-pod-logs/default/web-1/previous.log",
            ]
        );
    }

    #[test]
    fn test_previous_log_with_single_restart_skips_decrement() {
        // restartCount - 1 would be 0, the current log; only the
        // previous-pod-logs collector path remains.
        let candidates = log_candidates(
            &Layout::default(),
            &request(true),
            &context("abc", "", 1),
        );

        assert_eq!(
            candidates,
            vec!["k8s/previous-pod-logs/default/web-1/previous.log"]
        );
    }

    fn pods_yaml() -> &'static str {
        r#"
apiVersion: v1
kind: PodList
items:
  - apiVersion: v1
    kind: Pod
    metadata:
      name: web-1
      namespace: default
      uid: uid123
      annotations:
        kubernetes.io/config.hash: hash456
    status:
      containerStatuses:
        - name: app
          restartCount: 2
        - name: sidecar
          restartCount: 0
"#
    }

    #[test]
    fn test_pod_log_context_from_resource_file() {
        let fs =
            MemoryFs::new().with_file("k8s/cluster-resources/pods/default.yaml", pods_yaml());

        let ctx = pod_log_context(&fs, &Layout::default(), &request(false)).unwrap();
        assert_eq!(ctx, context("uid123", "hash456", 2));
    }

    #[test]
    fn test_pod_log_context_unknown_pod_stays_empty() {
        let fs =
            MemoryFs::new().with_file("k8s/cluster-resources/pods/default.yaml", pods_yaml());

        let other = PodLogRequest::new("default", "db-1", "app");
        let ctx = pod_log_context(&fs, &Layout::default(), &other).unwrap();
        assert_eq!(ctx, PodLogContext::default());
    }

    #[test]
    fn test_fetch_reads_first_existing_candidate() {
        let fs = MemoryFs::new()
            .with_file("k8s/cluster-resources/pods/default.yaml", pods_yaml())
            .with_file("k8s/pod-logs/default_web-1_uid123/app/2.log", "from uid dir\n")
            .with_file("k8s/cluster-info/dump/default/web-1/logs.txt", "from dump\n");

        // The cluster-info dump candidate outranks the UID-keyed one.
        let data = fetch_pod_logs(&fs, &Layout::default(), &request(false)).unwrap();
        assert_eq!(data, b"from dump\n");
    }

    #[test]
    fn test_fetch_missing_logs_reports_candidates() {
        let fs =
            MemoryFs::new().with_file("k8s/cluster-resources/pods/default.yaml", pods_yaml());

        let err = fetch_pod_logs(&fs, &Layout::default(), &request(false)).unwrap_err();
        match err {
            LogsError::NotFound {
                namespace,
                pod,
                container,
                candidates,
            } => {
                assert_eq!(namespace, "default");
                assert_eq!(pod, "web-1");
                assert_eq!(container, "app");
                assert_eq!(candidates.len(), 5);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_previous_logs() {
        let fs = MemoryFs::new()
            .with_file("k8s/cluster-resources/pods/default.yaml", pods_yaml())
            .with_file("k8s/pod-logs/default_web-1_uid123/app/1.log", "previous run\n");

        let data = fetch_pod_logs(&fs, &Layout::default(), &request(true)).unwrap();
        assert_eq!(data, b"previous run\n");
    }
}
