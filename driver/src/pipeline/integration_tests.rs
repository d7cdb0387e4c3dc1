//! End-to-end tests of request handling with stubbed collaborators.

#[cfg(test)]
mod tests {
    use crate::core::{Component, StageResult};
    use crate::errors::{ConfigError, DriverError};
    use crate::events::{CollectingStatusSink, StatusLine};
    use crate::pipeline::{Driver, RequestOutcome, DRIVER_VERSION};
    use crate::request::PlanningRequest;
    use crate::stages::{MockPlanValidator, MockSearchEngine, MockTranslator, RunMode};
    use crate::testing::{ScriptedComponent, ScriptedStep};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Arc;

    struct Scripted {
        translator: Arc<ScriptedComponent>,
        search: Arc<ScriptedComponent>,
        validator: Arc<ScriptedComponent>,
        sink: Arc<CollectingStatusSink>,
        driver: Driver,
    }

    fn scripted(
        translator: ScriptedComponent,
        search: ScriptedComponent,
        validator: ScriptedComponent,
        mode: RunMode,
        work_dir: &Path,
    ) -> Scripted {
        let translator = Arc::new(translator);
        let search = Arc::new(search);
        let validator = Arc::new(validator);
        let sink = Arc::new(CollectingStatusSink::new());
        let driver = Driver::builder()
            .translator(translator.clone())
            .search(search.clone())
            .validator(validator.clone())
            .mode(mode)
            .sink(sink.clone())
            .portfolio_dir(work_dir.join("portfolios"))
            .work_dir(work_dir)
            .build()
            .unwrap();
        Scripted {
            translator,
            search,
            validator,
            sink,
            driver,
        }
    }

    fn untouched_driver(sink: Arc<CollectingStatusSink>) -> Driver {
        let mut translator = MockTranslator::new();
        translator.expect_translate().never();
        let mut search = MockSearchEngine::new();
        search.expect_search().never();
        let mut validator = MockPlanValidator::new();
        validator.expect_validate().never();
        Driver::builder()
            .translator(Arc::new(translator))
            .search(Arc::new(search))
            .validator(Arc::new(validator))
            .sink(sink)
            .build()
            .unwrap()
    }

    fn sas_files(dir: &Path) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "sas"))
            .collect()
    }

    #[tokio::test]
    async fn test_full_pipeline_reports_last_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let sas = dir.path().join("output.sas");
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::new(),
            ScriptedComponent::reporting(StageResult::proceed(1)),
            RunMode::OneShot,
            dir.path(),
        );
        let request = PlanningRequest::new()
            .with_components(["translate", "search", "validate"])
            .with_sas_file(&sas);

        let outcome = h.driver.handle(request).await.unwrap();

        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(
            h.sink.rendered(),
            vec![
                "translate exit code: 0".to_string(),
                format!("Remove intermediate file {}", sas.display()),
                "search exit code: 0".to_string(),
                "validate exit code: 1".to_string(),
            ]
        );
        assert!(!sas.exists());
        let result = outcome.pipeline().unwrap();
        assert_eq!(
            result.executed(),
            vec![Component::Translate, Component::Search, Component::Validate]
        );
        assert!(!result.aborted());
    }

    #[tokio::test]
    async fn test_translate_failure_aborts_before_search() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(CollectingStatusSink::new());
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .times(1)
            .returning(|_| Ok(StageResult::halt(12)));
        let mut search = MockSearchEngine::new();
        search.expect_search().never();
        let mut validator = MockPlanValidator::new();
        validator.expect_validate().never();
        let driver = Driver::builder()
            .translator(Arc::new(translator))
            .search(Arc::new(search))
            .validator(Arc::new(validator))
            .sink(sink.clone())
            .build()
            .unwrap();
        let request = PlanningRequest::new()
            .with_components(["translate", "search", "validate"])
            .with_sas_file(dir.path().join("output.sas"));

        let outcome = driver.handle(request).await.unwrap();

        assert_eq!(outcome.exit_code(), 12);
        assert_eq!(
            sink.lines(),
            vec![
                StatusLine::StageExit {
                    component: Component::Translate,
                    exit_code: 12
                },
                StatusLine::Aborting {
                    component: Component::Translate
                },
            ]
        );
        assert_eq!(outcome.pipeline().unwrap().aborted_after, Some(Component::Translate));
    }

    #[tokio::test]
    async fn test_run_all_runs_translate_then_search() {
        let dir = tempfile::tempdir().unwrap();
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::reporting(StageResult::proceed(11)),
            ScriptedComponent::new(),
            RunMode::OneShot,
            dir.path(),
        );
        let request = PlanningRequest::run_all().with_sas_file(dir.path().join("output.sas"));

        let outcome = h.driver.handle(request).await.unwrap();

        assert_eq!(outcome.exit_code(), 11);
        assert_eq!(h.translator.call_count(), 1);
        assert_eq!(h.search.call_count(), 1);
        assert_eq!(h.validator.call_count(), 0);
        assert_eq!(h.sink.stage_exits(), 2);
    }

    #[tokio::test]
    async fn test_keep_sas_file_leaves_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let sas = dir.path().join("output.sas");
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::OneShot,
            dir.path(),
        );
        let request = PlanningRequest::run_all()
            .with_sas_file(&sas)
            .keeping_sas_file();

        let outcome = h.driver.handle(request).await.unwrap();

        assert_eq!(outcome.exit_code(), 0);
        assert!(sas.exists());
        assert_eq!(
            h.sink.rendered(),
            vec!["translate exit code: 0", "search exit code: 0"]
        );
    }

    #[tokio::test]
    async fn test_version_request_runs_no_stage() {
        let sink = Arc::new(CollectingStatusSink::new());
        let driver = untouched_driver(sink.clone());
        let mut request = PlanningRequest::run_all();
        request.version = true;

        let outcome = driver.handle(request).await.unwrap();

        assert_eq!(outcome, RequestOutcome::Version(DRIVER_VERSION.to_string()));
        assert_eq!(outcome.exit_code(), 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_show_aliases_runs_no_stage() {
        let sink = Arc::new(CollectingStatusSink::new());
        let driver = untouched_driver(sink.clone());
        let mut request = PlanningRequest::run_all();
        request.show_aliases = true;

        let outcome = driver.handle(request).await.unwrap();

        let RequestOutcome::Aliases(names) = outcome else {
            panic!("expected alias listing");
        };
        assert!(names.contains(&"lama-first".to_string()));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_removes_artifact_and_plans() {
        let dir = tempfile::tempdir().unwrap();
        let sas = dir.path().join("output.sas");
        let plan = dir.path().join("sas_plan");
        std::fs::write(&sas, "x").unwrap();
        std::fs::write(&plan, "(noop)\n; cost = 1 (unit cost)\n").unwrap();
        let driver = untouched_driver(Arc::new(CollectingStatusSink::new()));
        let mut request = PlanningRequest::run_all()
            .with_sas_file(&sas)
            .with_plan_file(&plan);
        request.cleanup = true;

        let outcome = driver.handle(request).await.unwrap();

        let RequestOutcome::Cleanup(report) = outcome else {
            panic!("expected cleanup report");
        };
        assert_eq!(report.removed.len(), 2);
        assert!(!sas.exists());
        assert!(!plan.exists());
    }

    #[tokio::test]
    async fn test_empty_components_fail_before_any_stage() {
        let sink = Arc::new(CollectingStatusSink::new());
        let driver = untouched_driver(sink.clone());

        let err = driver.handle(PlanningRequest::new()).await.unwrap_err();

        assert!(matches!(err, DriverError::Config(ConfigError::EmptyComponents)));
        assert_eq!(err.exit_code(), 36);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_component_fails_before_any_stage() {
        let sink = Arc::new(CollectingStatusSink::new());
        let driver = untouched_driver(sink.clone());
        let request = PlanningRequest::new().with_components(["translate", "plan"]);

        let err = driver.handle(request).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            DriverError::from(ConfigError::UnknownComponent("plan".to_string())).to_string()
        );
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_alias_is_a_config_error() {
        let driver = untouched_driver(Arc::new(CollectingStatusSink::new()));
        let request = PlanningRequest::run_all().with_alias("no-such-alias");

        let err = driver.handle(request).await.unwrap_err();

        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_alias_sets_search_options() {
        let dir = tempfile::tempdir().unwrap();
        let h = scripted(
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::OneShot,
            dir.path(),
        );
        let request = PlanningRequest::new()
            .with_components(["search"])
            .with_sas_file(dir.path().join("output.sas"))
            .keeping_sas_file()
            .with_alias("seq-opt-lmcut");

        h.driver.handle(request).await.unwrap();

        let seen = h.search.recorded_requests();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].search_options.is_empty());
        assert_eq!(seen[0].alias, None);
    }

    #[tokio::test]
    async fn test_service_mode_assigns_artifact_and_drops_portfolio() {
        let dir = tempfile::tempdir().unwrap();
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::Service,
            dir.path(),
        );
        let request = PlanningRequest::run_all().with_portfolio(dir.path().join("p.py"));

        let outcome = h.driver.handle(request).await.unwrap();

        assert_eq!(outcome.exit_code(), 0);
        let translated = h.translator.recorded_requests();
        let sas = translated[0].sas_file.clone().unwrap();
        assert!(sas.starts_with(dir.path()));
        assert!(!sas.exists());
        let searched = h.search.recorded_requests();
        assert_eq!(searched[0].portfolio, None);
        assert_eq!(h.driver.active_runs(), 0);
    }

    #[tokio::test]
    async fn test_lease_released_after_failed_run() {
        let dir = tempfile::tempdir().unwrap();
        let sas = dir.path().join("output.sas");
        let h = scripted(
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::OneShot,
            dir.path(),
        );
        // Search succeeds but there is no artifact to dispose of.
        let request = PlanningRequest::new()
            .with_components(["search"])
            .with_sas_file(&sas);

        assert!(h.driver.handle(request.clone()).await.is_err());
        assert_eq!(h.driver.active_runs(), 0);
        assert!(h.driver.handle(request.keeping_sas_file()).await.is_ok());
    }

    #[tokio::test]
    async fn test_service_assigned_artifact_removed_after_search_error() {
        let dir = tempfile::tempdir().unwrap();
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::new().then(ScriptedStep::Fail("boom".to_string())),
            ScriptedComponent::new(),
            RunMode::Service,
            dir.path(),
        );

        let err = h.driver.handle(PlanningRequest::run_all()).await.unwrap_err();

        assert!(matches!(err, DriverError::Internal(_)));
        assert_eq!(h.translator.call_count(), 1);
        assert!(sas_files(dir.path()).is_empty());
        assert_eq!(h.driver.active_runs(), 0);
    }

    #[tokio::test]
    async fn test_service_assigned_artifact_removed_after_translate_only_run() {
        let dir = tempfile::tempdir().unwrap();
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::Service,
            dir.path(),
        );
        let request = PlanningRequest::new().with_components(["translate"]);

        let outcome = h.driver.handle(request).await.unwrap();

        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(h.search.call_count(), 0);
        assert!(sas_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_service_assigned_artifact_removed_when_translate_halts() {
        let dir = tempfile::tempdir().unwrap();
        let h = scripted(
            ScriptedComponent::reporting(StageResult::halt(10)).writing_artifact(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::Service,
            dir.path(),
        );

        let outcome = h.driver.handle(PlanningRequest::run_all()).await.unwrap();

        assert_eq!(outcome.exit_code(), 10);
        assert!(sas_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_service_assigned_artifact_kept_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::Service,
            dir.path(),
        );
        let request = PlanningRequest::new()
            .with_components(["translate"])
            .keeping_sas_file();

        h.driver.handle(request).await.unwrap();

        assert_eq!(sas_files(dir.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_client_named_artifact_survives_translate_only_run() {
        let dir = tempfile::tempdir().unwrap();
        let sas = dir.path().join("client.sas");
        let h = scripted(
            ScriptedComponent::new().writing_artifact(),
            ScriptedComponent::new(),
            ScriptedComponent::new(),
            RunMode::Service,
            dir.path(),
        );
        let request = PlanningRequest::new()
            .with_components(["translate"])
            .with_sas_file(&sas);

        h.driver.handle(request).await.unwrap();

        assert!(sas.exists());
    }
}
