use std::{
    fs::File,
    io::{stdin, BufRead, BufReader},
    path::PathBuf,
};

use plan_selection::{InsurancePlan, PlanSource};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to open {path}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read line {line}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid plan record on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Plans stored one JSON object per line, in a file or on stdin.
pub struct JsonLines {
    path: Option<PathBuf>,
}

impl JsonLines {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl PlanSource for JsonLines {
    type Error = InputError;

    fn plans(&self) -> Result<Vec<InsurancePlan>, Self::Error> {
        match &self.path {
            Some(path) => {
                let file = File::open(path).map_err(|source| InputError::Open {
                    path: path.display().to_string(),
                    source,
                })?;
                parse_plans(BufReader::new(file))
            }
            None => parse_plans(stdin().lock()),
        }
    }
}

/// Blank lines and lines starting with `#` are skipped. Line numbers in errors are 1-based.
pub fn parse_plans<R: BufRead>(reader: R) -> Result<Vec<InsurancePlan>, InputError> {
    let mut plans = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| InputError::Read {
            line: index + 1,
            source,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let plan = serde_json::from_str(line).map_err(|source| InputError::Parse {
            line: index + 1,
            source,
        })?;
        plans.push(plan);
    }
    tracing::debug!(plans = plans.len(), "read plans");
    Ok(plans)
}
