// Map Docker API container summaries onto WorkloadSummary.

use crate::models::{ContainerState, PortMapping, WorkloadSummary};
use bollard::models::ContainerSummary;

const SHORT_ID_LEN: usize = 12;

pub(crate) fn to_workload_summary(c: &ContainerSummary) -> WorkloadSummary {
    let full_id = c.id.as_deref().unwrap_or_default();
    let id: String = full_id.chars().take(SHORT_ID_LEN).collect();
    let name = c
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.clone());
    let state = c
        .state
        .as_ref()
        .map(|s| ContainerState::from_docker(&s.to_string()))
        .unwrap_or(ContainerState::Unknown);
    let ports = c
        .ports
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|p| PortMapping {
            ip: p.ip.clone(),
            private_port: p.private_port,
            public_port: p.public_port,
            protocol: p
                .typ
                .as_ref()
                .map(|t| t.to_string())
                .filter(|t| !t.is_empty()),
        })
        .collect();

    WorkloadSummary {
        id,
        name,
        image: c.image.clone().unwrap_or_default(),
        state,
        status_text: c.status.clone().unwrap_or_default(),
        created_at: c.created.unwrap_or(0),
        ports,
    }
}
