#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lockstep_core::{
    ArtifactUpdater, ExecError, ExecOptions, HostRules, NugetConfigRegistries, ProcessRunner,
    Registry, RestoreCommand, Settings, TokenSource, UpdateArtifact, UpdateArtifactsConfig,
    UpdateContext, UpdatedDependency,
};
use lockstep_fs::{FileSystem, LocalFileSystem, NormalizedPath};
use lockstep_test_utils::TestTree;
use tempfile::TempDir;

pub const TOKEN: &str = "fixed-token";

/// What the fake restore does when executed.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Write each `(path, content)` pair, as a real restore would
    Write(Vec<(NormalizedPath, String)>),
    Fail { code: i32, stderr: String },
    Transient(String),
    TimedOut,
}

/// A process runner that records its batches instead of spawning anything.
#[derive(Debug)]
pub struct FakeRunner {
    outcome: Outcome,
    batches: Mutex<Vec<Vec<String>>>,
    configs_seen: Mutex<Vec<bool>>,
}

impl FakeRunner {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            batches: Mutex::new(Vec::new()),
            configs_seen: Mutex::new(Vec::new()),
        })
    }

    pub fn succeeding() -> Arc<Self> {
        Self::new(Outcome::Write(Vec::new()))
    }

    /// Every executed batch, each command rendered as one line.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    /// Manifests passed to `restore` commands, in order, across all batches.
    pub fn restored(&self) -> Vec<String> {
        self.batches()
            .into_iter()
            .flatten()
            .filter_map(|line| {
                line.strip_prefix("dotnet restore ")
                    .and_then(|rest| rest.split(' ').next())
                    .map(str::to_string)
            })
            .collect()
    }

    /// Whether the temporary registry config existed while each batch ran.
    pub fn configs_seen(&self) -> Vec<bool> {
        self.configs_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn execute(&self, commands: &[RestoreCommand], _options: &ExecOptions) -> Result<(), ExecError> {
        self.batches
            .lock()
            .unwrap()
            .push(commands.iter().map(ToString::to_string).collect());

        let config_exists = commands
            .iter()
            .filter_map(|c| c.args.iter().position(|a| a.value() == "--configfile").map(|i| (c, i)))
            .all(|(c, i)| std::path::Path::new(c.args[i + 1].value()).exists());
        self.configs_seen.lock().unwrap().push(config_exists);

        match &self.outcome {
            Outcome::Write(files) => {
                for (path, content) in files {
                    LocalFileSystem::new().write_file(path, content).unwrap();
                }
                Ok(())
            }
            Outcome::Fail { code, stderr } => Err(ExecError::Failed {
                code: *code,
                stderr: stderr.clone(),
            }),
            Outcome::Transient(message) => Err(ExecError::Transient(message.clone())),
            Outcome::TimedOut => Err(ExecError::TimedOut(Duration::from_secs(1))),
        }
    }
}

#[derive(Debug)]
pub struct FixedToken;

impl TokenSource for FixedToken {
    fn token(&self) -> String {
        TOKEN.to_string()
    }
}

/// A source tree, a separate cache directory and the context over both.
pub struct Fixture {
    pub tree: TestTree,
    pub cache: TempDir,
    pub ctx: UpdateContext,
}

impl Fixture {
    pub fn new() -> Self {
        let tree = TestTree::new();
        let cache = TempDir::new().unwrap();
        let settings = Settings {
            cache_dir: Some(cache.path().to_path_buf()),
            ..Settings::default()
        };
        let ctx = settings.context(tree.root_path());
        Self { tree, cache, ctx }
    }

    pub fn updater(&self, runner: Arc<FakeRunner>) -> ArtifactUpdater {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFileSystem::new());
        let registries = NugetConfigRegistries::new(
            fs.clone(),
            vec![Registry::named("https://api.nuget.org/v3/index.json", "nuget.org")],
        );
        ArtifactUpdater::new(fs, runner, Arc::new(registries), Arc::new(HostRules::default()))
            .with_token_source(Arc::new(FixedToken))
    }

    /// Directory the temporary registry config is created in.
    pub fn temp_config_dir(&self) -> std::path::PathBuf {
        self.cache.path().join("nuget").join(TOKEN)
    }
}

/// A request changing `manifest` to `content` with the given deps.
pub fn request(manifest: &str, content: &str, deps: &[&str]) -> UpdateArtifact {
    UpdateArtifact {
        package_file_name: manifest.to_string(),
        new_package_file_content: content.to_string(),
        config: UpdateArtifactsConfig::default(),
        updated_deps: deps.iter().map(|d| UpdatedDependency::new(*d)).collect(),
    }
}
