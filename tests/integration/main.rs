//! Integration tests for Rigger

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn rigger(temp: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("rigger");
        cmd.env("RIGGER_CONFIG", temp.join("settings.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        rigger(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("build and deploy"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        rigger(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rigger"));
    }

    #[test]
    fn list_without_dependencies() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("rigger.toml"), "name = \"app\"\n").unwrap();

        rigger(temp.path())
            .arg("-C")
            .arg(temp.path())
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn list_json_keeps_warnings_off_stdout() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("rigger.toml"),
            "[[dependencies]]\nsource = { path = \"missing\" }\n",
        )
        .unwrap();

        rigger(temp.path())
            .arg("-C")
            .arg(temp.path())
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::diff("[]\n"))
            .stderr(predicate::str::contains("[WARN]"))
            .stderr(predicate::str::contains("missing"));
    }

    #[test]
    fn missing_config_fails_with_hint() {
        let temp = TempDir::new().unwrap();
        rigger(temp.path())
            .arg("-C")
            .arg(temp.path())
            .arg("build")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn cycle_reported_unless_allowed() {
        let temp = TempDir::new().unwrap();
        for (name, dep) in [("app", "lib"), ("lib", "app")] {
            let dir = temp.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(
                dir.join("rigger.toml"),
                format!("[[dependencies]]\nsource = {{ path = \"../{}\" }}\n", dep),
            )
            .unwrap();
        }
        let app = temp.path().join("app");

        rigger(temp.path())
            .arg("-C")
            .arg(&app)
            .arg("build")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cyclic dependency detected"))
            .stderr(predicate::str::contains("--allow-cyclic"));

        rigger(temp.path())
            .arg("-C")
            .arg(&app)
            .args(["--allow-cyclic", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lib"));
    }

    #[test]
    fn build_runs_dependency_command_and_saves_state() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("db");
        let app = temp.path().join("app");
        fs::create_dir_all(&db).unwrap();
        fs::create_dir_all(&app).unwrap();
        fs::write(
            db.join("rigger.toml"),
            "name = \"db\"\n[build]\ncommand = \"echo $RIGGER_TAG >> ../builds.log\"\nimages = [\"db\"]\n",
        )
        .unwrap();
        fs::write(
            app.join("rigger.toml"),
            "[[dependencies]]\nsource = { path = \"../db\" }\n",
        )
        .unwrap();

        let build = || {
            rigger(temp.path())
                .arg("-C")
                .arg(&app)
                .arg("build")
                .assert()
                .success();
        };

        build();
        let log = fs::read_to_string(temp.path().join("builds.log")).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert_eq!(log.trim().len(), 7);

        let state = fs::read_to_string(db.join(".rigger").join("generated.json")).unwrap();
        assert!(state.contains("\"default\""));
        assert!(state.contains("path:"));

        // Unchanged sources: nothing to build
        build();
        let log = fs::read_to_string(temp.path().join("builds.log")).unwrap();
        assert_eq!(log.lines().count(), 1);
    }
}

mod manager_tests {
    use async_trait::async_trait;
    use rigger::config::{ConfigLoader, FileConfigLoader, LoadOptions};
    use rigger::dependency::{
        Dependency, DependencyResolver, GitSource, Resolution, SourceFetcher,
    };
    use rigger::hash::directory_hash;
    use rigger::orchestration::{
        BuildOptions, Builder, Collaborators, DeployOptions, Deployer, Manager,
    };
    use rigger::state::{MemoryStateStore, StateStore, DEFAULT_PROFILE};
    use rigger::{RiggerError, RiggerResult};
    use std::collections::{BTreeMap, HashSet};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records every call and fails or hangs for selected dependencies
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<String>>,
        failing: Mutex<HashSet<String>>,
        hanging: Mutex<HashSet<String>>,
    }

    impl FakeBackend {
        fn fail(&self, name: &str) {
            self.failing.lock().unwrap().insert(name.to_string());
        }

        fn heal(&self) {
            self.failing.lock().unwrap().clear();
        }

        fn hang(&self, name: &str) {
            self.hanging.lock().unwrap().insert(name.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn reset(&self) {
            self.calls.lock().unwrap().clear();
        }

        async fn call(&self, action: &str, dependency: &Dependency) -> RiggerResult<()> {
            let name = dependency.label().to_string();
            self.calls
                .lock()
                .unwrap()
                .push(format!("{} {}", action, name));

            let hang = self.hanging.lock().unwrap().contains(&name);
            if hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            let fail = self.failing.lock().unwrap().contains(&name);
            if fail {
                return Err(RiggerError::User(format!("{} of {} failed", action, name)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Builder for FakeBackend {
        async fn build(
            &self,
            dependency: &Dependency,
            _options: &BuildOptions,
        ) -> RiggerResult<BTreeMap<String, String>> {
            self.call("build", dependency).await?;
            let mut images = BTreeMap::new();
            images.insert(dependency.label().to_string(), "t1".to_string());
            Ok(images)
        }
    }

    #[async_trait]
    impl Deployer for FakeBackend {
        async fn deploy(
            &self,
            dependency: &Dependency,
            _options: &DeployOptions,
        ) -> RiggerResult<()> {
            self.call("deploy", dependency).await
        }

        async fn purge(&self, dependency: &Dependency, _verbose: bool) -> RiggerResult<()> {
            self.call("purge", dependency).await
        }
    }

    struct OfflineFetcher;

    #[async_trait]
    impl SourceFetcher for OfflineFetcher {
        async fn fetch(&self, source: &GitSource, _update: bool) -> RiggerResult<PathBuf> {
            Err(RiggerError::SourceFetch {
                source_ref: source.to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    struct Fixture {
        temp: TempDir,
        backend: Arc<FakeBackend>,
        store: Arc<MemoryStateStore>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                temp: TempDir::new().unwrap(),
                backend: Arc::new(FakeBackend::default()),
                store: Arc::new(MemoryStateStore::new()),
            }
        }

        fn dir(&self, name: &str) -> PathBuf {
            self.temp.path().join(name)
        }

        /// Write a project that depends on `deps` (sibling directories)
        fn project(&self, name: &str, deps: &[&str]) -> PathBuf {
            self.project_with(name, deps, "")
        }

        fn project_with(&self, name: &str, deps: &[&str], extra: &str) -> PathBuf {
            let dir = self.dir(name);
            fs::create_dir_all(&dir).unwrap();
            let mut toml = format!("name = \"{}\"\n", name);
            for dep in deps {
                toml.push_str(&format!(
                    "\n[[dependencies]]\nsource = {{ path = \"../{}\" }}\n{}",
                    dep, extra
                ));
            }
            fs::write(dir.join("rigger.toml"), toml).unwrap();
            fs::write(dir.join("main.txt"), format!("{} v1", name)).unwrap();
            dir
        }

        fn options(&self) -> LoadOptions {
            LoadOptions::new(self.dir(".checkouts"))
        }

        async fn manager(&self, root: &str, allow_cyclic: bool) -> Manager {
            let root = self.dir(root);
            let config = FileConfigLoader::new().load(&root, None).await.unwrap();
            let cached = self.store.load(&root).await.unwrap();

            Manager::new(
                root,
                config,
                cached,
                None,
                allow_cyclic,
                self.options(),
                Collaborators {
                    loader: Arc::new(FileConfigLoader::new()),
                    fetcher: Arc::new(OfflineFetcher),
                    builder: self.backend.clone(),
                    deployer: self.backend.clone(),
                    store: self.store.clone(),
                },
            )
        }

        fn stored_hash(&self, name: &str) -> Option<String> {
            let dir = self.dir(name);
            let id = format!("path:{}", dir.display());
            self.store
                .get(&dir)
                .and_then(|doc| doc.profiles.get(DEFAULT_PROFILE).cloned())
                .and_then(|cache| cache.dependencies.get(&id).cloned())
        }

        fn deployed(&self, name: &str) -> bool {
            let dir = self.dir(name);
            let id = format!("path:{}", dir.display());
            self.store
                .get(&dir)
                .and_then(|doc| doc.profiles.get(DEFAULT_PROFILE).cloned())
                .map(|cache| cache.deployments.contains_key(&id))
                .unwrap_or(false)
        }
    }

    #[tokio::test]
    async fn empty_declarations_are_noops() {
        let fx = Fixture::new();
        fx.project("app", &[]);
        let manager = fx.manager("app", false).await;

        manager.build_all(&BuildOptions::default()).await.unwrap();
        manager.deploy_all(&DeployOptions::default()).await.unwrap();
        manager.update_all().await.unwrap();
        manager.purge_all(false).await.unwrap();

        assert!(fx.backend.calls().is_empty());
        assert_eq!(fx.store.save_count(), 0);
    }

    #[tokio::test]
    async fn first_build_records_tree_hash() {
        let fx = Fixture::new();
        let db = fx.project("db", &[]);
        fx.project("app", &["db"]);

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();

        assert_eq!(fx.backend.calls(), vec!["build db"]);
        let expected = directory_hash(&db, &fx.options().excludes).unwrap();
        assert_eq!(fx.stored_hash("db"), Some(expected));

        let images = fx.store.get(&db).unwrap().profiles[DEFAULT_PROFILE]
            .images
            .clone();
        assert_eq!(images["db"].tag, "t1");
    }

    #[tokio::test]
    async fn unchanged_tree_is_not_rebuilt() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project("app", &["db"]);

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();
        fx.backend.reset();

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();
        assert!(fx.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn changed_tree_and_force_rebuild() {
        let fx = Fixture::new();
        let db = fx.project("db", &[]);
        fx.project("app", &["db"]);

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();
        let first = fx.stored_hash("db");

        fs::write(db.join("main.txt"), "db v2").unwrap();
        fx.backend.reset();
        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["build db"]);
        assert_ne!(fx.stored_hash("db"), first);

        fx.backend.reset();
        let forced = BuildOptions {
            force_build: true,
            ..Default::default()
        };
        fx.manager("app", false)
            .await
            .build_all(&forced)
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["build db"]);
    }

    #[tokio::test]
    async fn failed_build_does_not_advance_hash() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project("app", &["db"]);
        fx.backend.fail("db");

        let err = fx
            .manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RiggerError::Build { .. }));
        assert!(err.dependency().unwrap().ends_with("/db"));
        assert_eq!(fx.stored_hash("db"), None);

        fx.backend.heal();
        fx.backend.reset();
        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["build db"]);
        assert!(fx.stored_hash("db").is_some());
    }

    #[tokio::test]
    async fn dependencies_build_before_dependents() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project("cache", &[]);
        fx.project("api", &["db", "cache"]);
        fx.project("web", &["api"]);
        fx.project("app", &["web", "db"]);

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions {
                concurrency: 4,
                ..Default::default()
            })
            .await
            .unwrap();

        let calls = fx.backend.calls();
        let position = |name: &str| {
            calls
                .iter()
                .position(|c| c == &format!("build {}", name))
                .unwrap()
        };
        assert_eq!(calls.len(), 4);
        assert!(position("db") < position("api"));
        assert!(position("cache") < position("api"));
        assert!(position("api") < position("web"));
    }

    #[tokio::test]
    async fn abort_on_first_error_by_default() {
        let fx = Fixture::new();
        fx.project("a", &[]);
        fx.project("b", &[]);
        fx.project("app", &["a", "b"]);
        fx.backend.fail("a");

        let err = fx
            .manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RiggerError::Build { .. }));
        assert_eq!(fx.backend.calls(), vec!["build a"]);
    }

    #[tokio::test]
    async fn continue_on_error_keeps_unrelated_work() {
        let fx = Fixture::new();
        fx.project("a", &[]);
        fx.project("b", &[]);
        fx.project("c", &["a"]);
        fx.project("app", &["c", "b"]);
        fx.backend.fail("a");

        let err = fx
            .manager("app", false)
            .await
            .build_all(&BuildOptions {
                continue_on_error: true,
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(fx.backend.calls(), vec!["build a", "build b"]);
        match err {
            RiggerError::Multiple(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(matches!(errors[0], RiggerError::Build { .. }));
                assert!(matches!(errors[1], RiggerError::Blocked { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        // b's build was checkpointed despite the failure
        assert!(fx.stored_hash("b").is_some());
        assert!(fx.stored_hash("a").is_none());
        assert!(fx.stored_hash("c").is_none());
    }

    #[tokio::test]
    async fn skip_build_declaration_is_honored() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project_with("app", &["db"], "skip_build = true\n");

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions {
                force_build: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(fx.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn deploy_builds_first_then_skips_when_unchanged() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project("app", &["db"]);

        fx.manager("app", false)
            .await
            .deploy_all(&DeployOptions::default())
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["build db", "deploy db"]);
        assert!(fx.deployed("db"));

        fx.backend.reset();
        fx.manager("app", false)
            .await
            .deploy_all(&DeployOptions::default())
            .await
            .unwrap();
        assert!(fx.backend.calls().is_empty());

        // Redeploy without rebuilding
        fx.manager("app", false)
            .await
            .deploy_all(&DeployOptions {
                force_deploy: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["deploy db"]);
    }

    #[tokio::test]
    async fn deploy_with_skip_build() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project("app", &["db"]);

        fx.manager("app", false)
            .await
            .deploy_all(&DeployOptions {
                skip_build: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["deploy db"]);
        assert!(fx.stored_hash("db").is_none());
    }

    #[tokio::test]
    async fn failed_deploy_is_reported_and_not_recorded() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project("app", &["db"]);
        fx.backend.fail("db");

        let err = fx
            .manager("app", false)
            .await
            .deploy_all(&DeployOptions {
                skip_build: true,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RiggerError::Deploy { .. }));
        assert!(!fx.deployed("db"));
    }

    #[tokio::test]
    async fn purge_runs_in_reverse_and_continues_after_failure() {
        let fx = Fixture::new();
        fx.project("a", &[]);
        fx.project("b", &["a"]);
        fx.project("c", &[]);
        fx.project("app", &["b", "c"]);

        fx.manager("app", false)
            .await
            .deploy_all(&DeployOptions {
                skip_build: true,
                ..Default::default()
            })
            .await
            .unwrap();
        fx.backend.reset();
        fx.backend.fail("b");

        let err = fx
            .manager("app", false)
            .await
            .purge_all(false)
            .await
            .unwrap_err();

        assert_eq!(fx.backend.calls(), vec!["purge c", "purge b", "purge a"]);
        assert!(matches!(err, RiggerError::Purge { .. }));
        assert!(!fx.deployed("a"));
        assert!(fx.deployed("b"));
        assert!(!fx.deployed("c"));
    }

    #[tokio::test]
    async fn verbose_purge_downgrades_failures() {
        let fx = Fixture::new();
        fx.project("a", &[]);
        fx.project("b", &[]);
        fx.project("app", &["a", "b"]);
        fx.backend.fail("b");

        fx.manager("app", false)
            .await
            .purge_all(true)
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["purge b", "purge a"]);
    }

    #[tokio::test]
    async fn purge_skips_skip_deploy() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        fx.project_with("app", &["db"], "skip_deploy = true\n");

        fx.manager("app", false)
            .await
            .purge_all(false)
            .await
            .unwrap();
        assert!(fx.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn cycle_fails_without_opt_in() {
        let fx = Fixture::new();
        fx.project("a", &["b"]);
        fx.project("b", &["a"]);
        fx.project("app", &["a"]);

        let err = fx
            .manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_cycle());
        assert!(fx.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn allowed_cycle_resolves_each_identity_once() {
        let fx = Fixture::new();
        fx.project("a", &["b"]);
        fx.project("b", &["a"]);
        fx.project("app", &["a"]);

        let manager = fx.manager("app", true).await;
        let resolution = manager.list().await.unwrap();
        assert_eq!(resolution.len(), 2);

        manager.build_all(&BuildOptions::default()).await.unwrap();
        assert_eq!(fx.backend.calls(), vec!["build b", "build a"]);
    }

    #[tokio::test]
    async fn unresolvable_dependency_does_not_block_siblings() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        let app = fx.project("app", &["db"]);
        fs::write(
            app.join("rigger.toml"),
            "[[dependencies]]\nsource = { git = \"https://example.com/auth.git\" }\n\n\
             [[dependencies]]\nsource = { path = \"../db\" }\n",
        )
        .unwrap();

        let err = fx
            .manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RiggerError::SourceFetch { .. }));
        assert_eq!(fx.backend.calls(), vec!["build db"]);
    }

    #[tokio::test]
    async fn update_refreshes_without_building_or_recording() {
        let fx = Fixture::new();
        let db = fx.project("db", &[]);
        fx.project("app", &["db"]);

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();
        let built = fx.stored_hash("db");
        fs::write(db.join("main.txt"), "db v2").unwrap();
        fx.backend.reset();

        let manager = fx.manager("app", false).await;
        manager.update_all().await.unwrap();
        assert!(fx.backend.calls().is_empty());
        assert_eq!(fx.stored_hash("db"), built);

        let resolution = manager.list().await.unwrap();
        assert!(resolution.dependencies[0].is_stale().await);
    }

    #[tokio::test]
    async fn cancelled_operation_leaves_last_checkpoint() {
        let fx = Fixture::new();
        fx.project("a", &[]);
        fx.project("b", &[]);
        fx.project("app", &["a", "b"]);
        fx.backend.hang("b");

        let manager = fx.manager("app", false).await;
        let outcome = tokio::time::timeout(
            Duration::from_millis(200),
            manager.build_all(&BuildOptions::default()),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(fx.backend.calls(), vec!["build a", "build b"]);
        // a finished in memory, but nothing reached the store
        assert_eq!(fx.store.save_count(), 0);
        assert!(fx.stored_hash("a").is_none());
    }

    struct EmptyResolver;

    #[async_trait]
    impl DependencyResolver for EmptyResolver {
        async fn resolve(&self, _update: bool) -> RiggerResult<Resolution> {
            Ok(Resolution::default())
        }
    }

    #[tokio::test]
    async fn resolver_override_is_used() {
        let fx = Fixture::new();
        fx.project("db", &[]);
        let root = fx.project("app", &["db"]);
        let config = FileConfigLoader::new().load(&root, None).await.unwrap();

        let manager = Manager::new(
            &root,
            config,
            Default::default(),
            Some(Box::new(EmptyResolver)),
            false,
            fx.options(),
            Collaborators {
                loader: Arc::new(FileConfigLoader::new()),
                fetcher: Arc::new(OfflineFetcher),
                builder: fx.backend.clone(),
                deployer: fx.backend.clone(),
                store: fx.store.clone(),
            },
        );

        manager.build_all(&BuildOptions::default()).await.unwrap();
        assert!(fx.backend.calls().is_empty());
        assert!(manager.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_directory_two_profiles_are_distinct() {
        let fx = Fixture::new();
        let db = fx.project("db", &[]);
        fs::write(
            db.join("rigger.toml"),
            "name = \"db\"\n[profiles.dev.vars]\nMODE = \"dev\"\n",
        )
        .unwrap();
        let app = fx.project("app", &[]);
        fs::write(
            app.join("rigger.toml"),
            "[[dependencies]]\nsource = { path = \"../db\" }\n\n\
             [[dependencies]]\nsource = { path = \"../db\" }\nprofile = \"dev\"\n",
        )
        .unwrap();

        fx.manager("app", false)
            .await
            .build_all(&BuildOptions::default())
            .await
            .unwrap();
        assert_eq!(fx.backend.calls(), vec!["build db", "build db"]);

        let doc = fx.store.get(Path::new(&db)).unwrap();
        assert!(doc.profiles.contains_key(DEFAULT_PROFILE));
        assert!(doc.profiles.contains_key("dev"));
    }
}
