// src/jobs/classify.rs

use tracing::{debug, warn};

use crate::errors::{JobrunnerError, Result};
use crate::jobs::model::{Job, JobId, JobKind, JobType, RawJob};

/// Jobs split by phase, each list in original file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPlan {
    pub prediction: Vec<Job>,
    pub aggregate: Vec<Job>,
}

/// Partition raw job records into prediction and aggregate jobs.
///
/// Fails on the first record whose `job_type` is not one of the known types;
/// nothing is partially classified in that case.
pub fn classify(jobs: &[RawJob]) -> Result<JobPlan> {
    let mut plan = JobPlan::default();

    for raw in jobs {
        let job_type = raw
            .job_type
            .parse::<JobType>()
            .map_err(|job_type| JobrunnerError::UnknownJobType {
                job_id: raw.job_id.clone(),
                job_type,
            })?;

        match job_type {
            JobType::Prediction => {
                if !raw.depends_on_job_ids.is_empty() {
                    warn!(
                        job_id = %raw.job_id,
                        deps = ?raw.depends_on_job_ids,
                        "prediction job declares dependencies; ignoring them"
                    );
                }
                plan.prediction.push(Job {
                    id: JobId::from(raw.job_id.as_str()),
                    command: raw.command.clone(),
                    kind: JobKind::Prediction,
                });
            }
            JobType::Aggregate => {
                let depends_on = raw
                    .depends_on_job_ids
                    .iter()
                    .map(|d| JobId::from(d.as_str()))
                    .collect();
                plan.aggregate.push(Job {
                    id: JobId::from(raw.job_id.as_str()),
                    command: raw.command.clone(),
                    kind: JobKind::Aggregate { depends_on },
                });
            }
        }
    }

    debug!(
        prediction = plan.prediction.len(),
        aggregate = plan.aggregate.len(),
        "classified jobs"
    );

    Ok(plan)
}
