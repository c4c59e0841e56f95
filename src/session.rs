//! Batch orchestration: named test cases over provider pairs
//!
//! A test case bundles a source/target provider pair with a normalizer and
//! an engine; a session runs many test cases. Each `compare()` is pure and
//! self-contained, so a batch may fan out across threads.

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::normalize::Normalizer;
use crate::provider::DataProvider;
use crate::recon::ReconEngine;
use crate::report::TestReport;

/// One named reconciliation: load both sides, normalize, compare
pub struct TestCase {
    name: String,
    source: Box<dyn DataProvider>,
    target: Box<dyn DataProvider>,
    normalizer: Normalizer,
    engine: ReconEngine,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        source: Box<dyn DataProvider>,
        target: Box<dyn DataProvider>,
        engine: ReconEngine,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            target,
            normalizer: Normalizer::new(),
            engine,
        }
    }

    /// Replace the default normalizer
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the comparison. Provider failures pass through unchanged;
    /// normalization and configuration errors carry the test name.
    pub fn run(&self) -> Result<TestReport> {
        let raw_source = self.source.load()?;
        let raw_target = self.target.load()?;

        let source = self
            .normalizer
            .normalize(&raw_source)
            .with_context(|| format!("Normalizing source for test {:?}", self.name))?;
        let target = self
            .normalizer
            .normalize(&raw_target)
            .with_context(|| format!("Normalizing target for test {:?}", self.name))?;

        let result = self
            .engine
            .compare(&source, &target)
            .with_context(|| format!("Comparing test {:?}", self.name))?;

        Ok(TestReport::new(self.name.clone(), result))
    }
}

/// An ordered batch of test cases
#[derive(Default)]
pub struct Session {
    tests: Vec<TestCase>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Run serially in insertion order; the first error aborts the batch.
    /// Callers wanting per-test isolation run cases individually.
    pub fn run_all(&self) -> Result<Vec<TestReport>> {
        self.tests.iter().map(TestCase::run).collect()
    }

    /// Run every test case on the rayon pool. Reports come back in
    /// insertion order; any error aborts the batch.
    pub fn run_all_parallel(&self) -> Result<Vec<TestReport>> {
        self.tests.par_iter().map(TestCase::run).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconConfig;
    use crate::model::{Dataset, Value};
    use crate::normalize::rules;

    struct StaticProvider(Dataset);

    impl DataProvider for StaticProvider {
        fn load(&self) -> Result<Dataset> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    impl DataProvider for FailingProvider {
        fn load(&self) -> Result<Dataset> {
            anyhow::bail!("connection refused")
        }
    }

    fn people(rows: Vec<Vec<Value>>) -> Box<dyn DataProvider> {
        Box::new(StaticProvider(
            Dataset::from_rows(vec!["ID".to_string(), "Name".to_string()], rows).unwrap(),
        ))
    }

    fn engine() -> ReconEngine {
        ReconEngine::new(ReconConfig::new(vec!["id".to_string()])).unwrap()
    }

    fn case(name: &str, src_name: &str, tgt_name: &str) -> TestCase {
        TestCase::new(
            name,
            people(vec![vec![Value::Int(1), Value::from(src_name)]]),
            people(vec![vec![Value::Int(1), Value::from(tgt_name)]]),
            engine(),
        )
    }

    #[test]
    fn test_run_normalizes_both_sides() {
        // raw headers "ID"/"Name" only match the key after generalization
        let report = case("case", "Alice", "alice")
            .with_normalizer(Normalizer::new().with_rule("name", rules::lower_case))
            .run()
            .unwrap();

        assert_eq!(report.name, "case");
        assert_eq!(report.result.diff_count, 0);
        assert!(report.result.is_clean());
    }

    #[test]
    fn test_provider_error_passes_through() {
        let test = TestCase::new(
            "down",
            Box::new(FailingProvider),
            people(vec![vec![Value::Int(1), Value::from("x")]]),
            engine(),
        );
        let err = test.run().unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_serial_and_parallel_agree() {
        let mut session = Session::new();
        session.add_test(case("a", "Alice", "Alice"));
        session.add_test(case("b", "Bob", "Bobby"));
        session.add_test(case("c", "Cara", "Cara"));
        assert_eq!(session.len(), 3);

        let serial = session.run_all().unwrap();
        let parallel = session.run_all_parallel().unwrap();

        let names = |reports: &[TestReport]| {
            reports.iter().map(|r| r.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&serial), vec!["a", "b", "c"]);
        assert_eq!(names(&serial), names(&parallel));
        for (s, p) in serial.iter().zip(&parallel) {
            assert_eq!(s.result.diff_count, p.result.diff_count);
        }
        assert_eq!(serial[1].result.diff_count, 1);
    }

    #[test]
    fn test_first_error_aborts_batch() {
        let mut session = Session::new();
        session.add_test(case("ok", "Alice", "Alice"));
        session.add_test(TestCase::new(
            "down",
            Box::new(FailingProvider),
            people(vec![vec![Value::Int(1), Value::from("x")]]),
            engine(),
        ));

        assert!(session.run_all().is_err());
        assert!(session.run_all_parallel().is_err());
    }
}
