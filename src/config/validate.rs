// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{JobrunnerError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = JobrunnerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.runner))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.worker_limit == Some(0) {
        return Err(JobrunnerError::InvalidWorkerLimit(0));
    }
    Ok(())
}
