// Reduce a raw Docker stats response to WorkloadStats.

use crate::models::WorkloadStats;
use bollard::models::ContainerStatsResponse;

/// CPU percent needs both the current and the previous reading; missing parts count as 0.
pub(crate) fn to_workload_stats(s: &ContainerStatsResponse, id: &str) -> WorkloadStats {
    let total = |cpu: Option<&bollard::models::ContainerCpuStats>| {
        cpu.and_then(|c| c.cpu_usage.as_ref())
            .and_then(|u| u.total_usage)
            .unwrap_or(0)
    };
    let system = |cpu: Option<&bollard::models::ContainerCpuStats>| {
        cpu.and_then(|c| c.system_cpu_usage).unwrap_or(0)
    };
    let cpu = s.cpu_stats.as_ref();
    let precpu = s.precpu_stats.as_ref();

    let cpu_delta = total(cpu) as f64 - total(precpu) as f64;
    let system_delta = system(cpu) as f64 - system(precpu) as f64;
    let online_cpus = cpu.and_then(|c| c.online_cpus).unwrap_or(1);
    let cpu_percent = if system_delta > 0.0 && cpu_delta > 0.0 {
        cpu_delta / system_delta * online_cpus as f64 * 100.0
    } else {
        0.0
    };

    let memory_usage_bytes = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let memory_limit_bytes = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);
    let memory_percent = if memory_limit_bytes > 0 {
        memory_usage_bytes as f64 / memory_limit_bytes as f64 * 100.0
    } else {
        0.0
    };

    let (network_rx_bytes, network_tx_bytes) = s.networks.as_ref().map_or((0, 0), |n| {
        n.values().fold((0u64, 0u64), |(rx, tx), v| {
            (rx + v.rx_bytes.unwrap_or(0), tx + v.tx_bytes.unwrap_or(0))
        })
    });

    WorkloadStats {
        id: id.to_string(),
        cpu_percent,
        online_cpus,
        memory_usage_bytes,
        memory_limit_bytes,
        memory_percent,
        network_rx_bytes,
        network_tx_bytes,
        pids: s.pids_stats.as_ref().and_then(|p| p.current).unwrap_or(0),
    }
}
