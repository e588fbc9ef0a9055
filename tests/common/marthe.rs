//! A mocked MARTHE run.
//!
//! Heads at P01 are `20 + log10(k)` at the end of the first step and half a
//! metre lower at the end of the second, where `k` is the permeability of
//! the upper left cell of the first layer.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use rmarthe::core_types::ProcessError;
use rmarthe::{MartheFileParser, MartheFilesPort, ProcessRunner, RunOutcome, RunRequest};

mock! {
    pub Runner {}

    #[async_trait]
    impl ProcessRunner for Runner {
        async fn run(&self, request: &RunRequest) -> Result<RunOutcome, ProcessError>;
    }
}

pub fn heads(k: f64) -> (f64, f64) {
    let h = 20.0 + k.log10();
    (h, h - 0.5)
}

fn simulate(workdir: &Path) -> Result<(), ProcessError> {
    let grids = MartheFileParser::new()
        .read_grids(&workdir.join("mona.permh"))
        .map_err(|e| ProcessError::Internal(e.to_string()))?;
    let (h1, h2) = heads(grids[0].values[[0, 0]]);
    let prn = format!("Date\tP01\n01/01/2010\t20.0\n31/01/2010\t{h1}\n28/02/2010\t{h2}\n");
    fs::write(workdir.join("historiq.prn"), prn)
        .map_err(|e| ProcessError::Internal(e.to_string()))
}

/// MARTHE expected to run `times` times on `mona.rma`.
pub fn marthe(times: usize) -> MockRunner {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|req| req.label == "marthe" && req.args == vec!["mona.rma".to_string()])
        .times(times)
        .returning(|req| {
            simulate(&req.workdir)?;
            Ok(RunOutcome {
                code: Some(0),
                duration: Duration::from_millis(5),
            })
        });
    runner
}
