//! Parallel batch validation
//!
//! Every input becomes a task in the injected `TaskStore` before any work
//! starts, then rayon validates the documents concurrently against one shared
//! validator.

use crate::output::{default_output_path, numbered_output_path, review_file, ReviewSettings};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use styleaudit_core::tasks::Uuid;
use styleaudit_core::{DocumentValidator, TaskRecord, TaskStatus, TaskStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub task_id: Uuid,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Issue count on success
    pub issues: Option<usize>,
    pub cached: bool,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// One job per input. Inputs sharing a stem get `_2`, `_3`, ... so no two
/// jobs write the same review file.
pub fn plan_jobs(inputs: &[PathBuf], output_dir: Option<&Path>) -> Vec<BatchJob> {
    let mut taken: HashSet<PathBuf> = HashSet::new();

    inputs
        .iter()
        .map(|input| {
            let mut output = default_output_path(input, output_dir);
            let mut n = 2;
            while !taken.insert(output.clone()) {
                output = numbered_output_path(input, output_dir, n);
                n += 1;
            }
            BatchJob {
                input: input.clone(),
                output,
            }
        })
        .collect()
}

/// Validate all jobs in parallel; outcomes come back in job order
pub fn run_batch(
    validator: &DocumentValidator,
    jobs: &[BatchJob],
    settings: &ReviewSettings,
    store: &dyn TaskStore,
) -> Vec<BatchOutcome> {
    let registered: Vec<(Uuid, &BatchJob)> = jobs
        .iter()
        .map(|job| {
            let size = fs::metadata(&job.input).ok().map(|m| m.len());
            let record = TaskRecord::new(job.input.display().to_string(), size);
            (store.insert(record), job)
        })
        .collect();

    log::info!("Registered {} review tasks", registered.len());

    registered
        .par_iter()
        .map(|(task_id, job)| {
            store.update_status(task_id, TaskStatus::Processing);

            match review_file(validator, &job.input, &job.output, settings) {
                Ok(outcome) => {
                    let issues = outcome.result.len();
                    let cached = outcome.cached;
                    store.complete(task_id, outcome.result);
                    BatchOutcome {
                        task_id: *task_id,
                        input: job.input.clone(),
                        output: job.output.clone(),
                        issues: Some(issues),
                        cached,
                        error: None,
                    }
                }
                Err(e) => {
                    let message = format!("{e:#}");
                    log::error!("{}: {}", job.input.display(), message);
                    store.fail(task_id, message.clone());
                    BatchOutcome {
                        task_id: *task_id,
                        input: job.input.clone(),
                        output: job.output.clone(),
                        issues: None,
                        cached: false,
                        error: Some(message),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use styleaudit_core::{AuditConfig, InMemoryTaskStore, RuleTable};

    const NUMBERED: &str = "<html><body>\
        <p class=MsoNormal><span style='font-family:黑体'>一、总则</span></p>\
        <p class=MsoNormal><span style='font-family:黑体'>三、附则</span></p>\
        </body></html>";

    #[test]
    fn test_plan_jobs_places_outputs_in_dir() {
        let inputs = vec![PathBuf::from("a/first.html"), PathBuf::from("b/second.htm")];
        let jobs = plan_jobs(&inputs, Some(Path::new("reviews")));
        assert_eq!(jobs[0].output, PathBuf::from("reviews/first_review.json"));
        assert_eq!(jobs[1].output, PathBuf::from("reviews/second_review.json"));
        assert_eq!(jobs[1].input, inputs[1]);
    }

    #[test]
    fn test_plan_jobs_keeps_same_stem_outputs_apart() {
        let inputs = vec![
            PathBuf::from("a/notice.html"),
            PathBuf::from("b/notice.html"),
            PathBuf::from("c/notice.htm"),
            PathBuf::from("notice_2.html"),
        ];
        let outputs: Vec<PathBuf> = plan_jobs(&inputs, Some(Path::new("out")))
            .into_iter()
            .map(|job| job.output)
            .collect();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/notice_review.json"),
                PathBuf::from("out/notice_2_review.json"),
                PathBuf::from("out/notice_3_review.json"),
                PathBuf::from("out/notice_2_2_review.json"),
            ]
        );

        let cwd_outputs: HashSet<PathBuf> = plan_jobs(&inputs[..2], None)
            .into_iter()
            .map(|job| job.output)
            .collect();
        assert_eq!(cwd_outputs.len(), 2);
    }

    #[test]
    fn test_same_stem_batch_keeps_both_reviews() {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("a").join("notice.html");
        let second = temp_dir.path().join("b").join("notice.html");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, NUMBERED).unwrap();
        fs::write(&second, "<html><body></body></html>").unwrap();

        let out_dir = temp_dir.path().join("out");
        let jobs = plan_jobs(&[first, second], Some(&out_dir));
        let validator = DocumentValidator::new(AuditConfig::default(), RuleTable::default()).unwrap();
        let outcomes = run_batch(&validator, &jobs, &ReviewSettings::default(), &InMemoryTaskStore::new());

        assert!(outcomes.iter().all(BatchOutcome::succeeded));
        assert_eq!(outcomes[0].issues, Some(1));
        assert_eq!(outcomes[1].issues, Some(0));

        let first_review = fs::read_to_string(out_dir.join("notice_review.json")).unwrap();
        let second_review = fs::read_to_string(out_dir.join("notice_2_review.json")).unwrap();
        assert!(first_review.contains("05-02"));
        assert!(!second_review.contains("05-02"));
    }

    #[test]
    fn test_batch_tracks_every_task() {
        let temp_dir = tempfile::tempdir().unwrap();
        let good = temp_dir.path().join("good.html");
        fs::write(&good, NUMBERED).unwrap();
        let missing = temp_dir.path().join("missing.html");

        let out_dir = temp_dir.path().join("out");
        let jobs = plan_jobs(&[good, missing], Some(&out_dir));
        let validator = DocumentValidator::new(AuditConfig::default(), RuleTable::default()).unwrap();
        let store = InMemoryTaskStore::new();

        let outcomes = run_batch(&validator, &jobs, &ReviewSettings::default(), &store);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].succeeded());
        assert_eq!(outcomes[0].issues, Some(1));
        assert!(out_dir.join("good_review.json").exists());

        assert!(!outcomes[1].succeeded());
        assert!(!out_dir.join("missing_review.json").exists());

        let good_task = store.get(&outcomes[0].task_id).unwrap();
        assert_eq!(good_task.status, TaskStatus::Success);
        assert!(good_task.size.is_some());
        assert_eq!(good_task.result.map(|r| r.len()), Some(1));

        let missing_task = store.get(&outcomes[1].task_id).unwrap();
        assert_eq!(missing_task.status, TaskStatus::Error);
        assert!(missing_task.size.is_none());
        assert!(missing_task.error.is_some());
    }
}
