// Docker workloads via bollard

mod stats;
mod summary;

use crate::models::{WorkloadStats, WorkloadSummary};
use crate::sources::WorkloadLister;
use async_trait::async_trait;
use bollard::Docker;
use bollard::errors::Error as DockerError;
use bollard::query_parameters::{ListContainersOptions, LogsOptions, StatsOptions};
use futures_util::StreamExt;
use tracing::instrument;

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl WorkloadLister for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "list"))]
    async fn list(&self) -> anyhow::Result<Vec<WorkloadSummary>> {
        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers.iter().map(summary::to_workload_summary).collect())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "logs"))]
    async fn logs(&self, id: &str, tail: usize) -> anyhow::Result<String> {
        let options = LogsOptions {
            follow: false,
            stdout: true,
            stderr: true,
            tail: tail.to_string(),
            ..Default::default()
        };
        let mut stream = self.docker.logs(id, Some(options));
        let mut out = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            out.push_str(&String::from_utf8_lossy(&chunk.into_bytes()));
        }
        Ok(out)
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "stats"))]
    async fn stats(&self, id: &str) -> anyhow::Result<Option<WorkloadStats>> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        match stream.next().await {
            Some(Ok(s)) => Ok(Some(stats::to_workload_stats(&s, id))),
            Some(Err(DockerError::DockerResponseServerError {
                status_code: 404, ..
            }))
            | None => Ok(None),
            Some(Err(e)) => Err(e.into()),
        }
    }
}
