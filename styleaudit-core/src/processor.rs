use crate::cache::{ReviewCacheKey, ReviewCacheValue};
use crate::config::AuditConfig;
use crate::error::Result;
use crate::preprocessors::{decode_markup, DocumentSource, HtmlPreprocessor, Preprocessor};
use crate::report::ReviewResult;
use crate::rule_table::RuleTable;
use crate::rules::{AuditContext, HeadingClassifier, RuleEngine};
use crate::storage::{calculate_config_hash, calculate_source_hash, NoOpStorage, ReviewStorage};
use crate::types::Document;
use std::path::Path;
use std::time::{Duration, Instant};

/// Simple profiler that collects timings for pipeline steps
#[derive(Debug, Clone, Default)]
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        log::debug!("{}: {}ms", step_name, elapsed.as_millis());
        self.timings.push((step_name.to_string(), elapsed));

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Bypass both cache lookup and cache store
    pub skip_cache: bool,
    /// Record per-stage timings
    pub profile: bool,
}

#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub result: ReviewResult,
    /// SHA-256 of the source bytes
    pub source_hash: String,
    /// Served from storage rather than recomputed
    pub cached: bool,
    pub profiler: StepProfiler,
}

/// Audits documents against one rule table and one configuration.
///
/// Immutable once built, so a single validator can be shared by any number
/// of threads; each call works on its own `Document` and issue list.
pub struct DocumentValidator {
    config: AuditConfig,
    rules: RuleTable,
    classifier: HeadingClassifier,
    engine: RuleEngine,
    preprocessor: Box<dyn Preprocessor>,
    storage: Box<dyn ReviewStorage>,
    config_hash: String,
}

impl DocumentValidator {
    /// Validator without result caching
    pub fn new(config: AuditConfig, rules: RuleTable) -> Result<Self> {
        Self::with_storage(config, rules, Box::new(NoOpStorage::new()))
    }

    /// Create DocumentValidator with injected result storage
    pub fn with_storage(
        config: AuditConfig,
        rules: RuleTable,
        storage: Box<dyn ReviewStorage>,
    ) -> Result<Self> {
        let classifier = HeadingClassifier::new(&config.heading_levels)?;
        let engine = RuleEngine::from_config(&config);
        let preprocessor = Box::new(HtmlPreprocessor::with_bold_detection(
            config.style.detect_bold,
        ));
        let config_hash = calculate_config_hash(&config)?;

        log::debug!(
            "Validator ready: {} heading levels, {} rules in table, checks {:?}",
            classifier.level_count(),
            rules.len(),
            engine.rule_names()
        );

        Ok(Self {
            config,
            rules,
            classifier,
            engine,
            preprocessor,
            storage,
            config_hash,
        })
    }

    /// Load the rule table (and optionally a config file) from disk
    pub fn from_paths(rules_path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => AuditConfig::load_from_file(path)?,
            None => AuditConfig::default(),
        };
        let rules = RuleTable::load(rules_path)?;
        Self::new(config, rules)
    }

    /// Swap the markup preprocessor
    pub fn with_preprocessor(mut self, preprocessor: Box<dyn Preprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn preprocessor(&self) -> &dyn Preprocessor {
        self.preprocessor.as_ref()
    }

    /// Parse without auditing (for inspecting what the checks will see)
    pub fn parse_document(&self, source: DocumentSource) -> Result<Document> {
        self.preprocessor.process_source(source)
    }

    /// Run every configured check over an already-parsed document
    pub fn audit(&self, document: &Document) -> ReviewResult {
        let classification = self.classifier.classify(document);
        let ctx = AuditContext {
            document,
            classification: &classification,
            rules: &self.rules,
            config: &self.config,
        };
        let issues = self.engine.run(&ctx);

        log::info!(
            "Audit complete: {} paragraphs, {} headings, {} issues",
            document.len(),
            classification.heading_count(),
            issues.len()
        );

        ReviewResult::new(issues)
    }

    /// Parse and audit in-memory markup. Never fails.
    pub fn validate_markup(&self, markup: &str) -> ReviewResult {
        let document = self.preprocessor.parse_markup(markup);
        self.audit(&document)
    }

    /// Parse and audit a document source, bypassing the result cache
    pub fn validate(&self, source: DocumentSource) -> Result<ReviewResult> {
        let options = ValidationOptions {
            skip_cache: true,
            profile: false,
        };
        Ok(self.validate_with_options(source, &options)?.result)
    }

    /// Full pipeline: read source, consult cache, parse, audit, store
    pub fn validate_with_options(
        &self,
        source: DocumentSource,
        options: &ValidationOptions,
    ) -> Result<ValidationOutcome> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(options.profile);
        let source_name = source.display_name();

        let bytes = profiler.time_step("1. Read Source", || source.into_bytes())?;
        let source_hash = calculate_source_hash(&bytes);
        let cache_key = ReviewCacheKey::new(
            source_hash.clone(),
            self.rules.content_hash().to_string(),
            self.config_hash.clone(),
        );

        if options.skip_cache {
            log::debug!("Skipping cache lookup for {}", source_name);
        } else if let Some(cached) =
            profiler.time_step("Cache Lookup", || self.storage.get_review(&cache_key))?
        {
            log::info!("Cache hit: found review for {}", source_name);
            return Ok(ValidationOutcome {
                result: cached.result,
                source_hash,
                cached: true,
                profiler,
            });
        }

        let document = profiler.time_step("2. Markup → Document", || {
            self.preprocessor.parse_markup(&decode_markup(&bytes))
        });
        log::debug!("{}: {} paragraphs parsed", source_name, document.len());

        let result = profiler.time_step("3. Audit", || self.audit(&document));

        if !options.skip_cache {
            profiler.time_step("Cache Storage", || {
                let processing_time = start_time.elapsed().as_millis() as u64;
                let cache_value = ReviewCacheValue::new(result.clone(), processing_time);
                self.storage.store_review(&cache_key, &cache_value)
            })?;
        }

        log::debug!(
            "Processed {} in {}ms",
            source_name,
            start_time.elapsed().as_millis()
        );

        Ok(ValidationOutcome {
            result,
            source_hash,
            cached: false,
            profiler,
        })
    }
}
