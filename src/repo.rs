use std::fs::{self, File};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};
use crate::index::Index;
use crate::store::ObjectStore;

/// name of the metadata directory at the repository root
pub const VCS_DIR: &str = ".vcs";

/// a repository bound to a working-directory root
#[derive(Debug)]
pub struct Repo {
    root: PathBuf,
    config: Config,
}

/// result of [`Repo::init`]
#[derive(Debug)]
pub struct InitOutcome {
    pub repo: Repo,
    /// false when the layout was already present and nothing was touched
    pub created: bool,
    pub message: String,
}

impl Repo {
    /// initialize a repository rooted at `root`
    ///
    /// an already-initialized root is reported with `created = false` and left
    /// exactly as it was.
    pub fn init(root: &Path) -> Result<InitOutcome> {
        fs::create_dir_all(root).with_path(root)?;
        let root = fs::canonicalize(root).with_path(root)?;
        let vcs_dir = root.join(VCS_DIR);

        if vcs_dir.exists() {
            let repo = Self::open(&root)?;
            return Ok(InitOutcome {
                message: format!("repository already initialized at {}", vcs_dir.display()),
                repo,
                created: false,
            });
        }

        for dir in ["objects", "refs", "tmp"] {
            let path = vcs_dir.join(dir);
            fs::create_dir_all(&path).with_path(&path)?;
        }

        let repo = Self {
            root,
            config: Config::default(),
        };
        repo.config.save(&repo.config_path())?;
        Index::default().save(&repo)?;

        info!(path = %vcs_dir.display(), "initialized empty repository");

        Ok(InitOutcome {
            message: format!("initialized empty repository in {}", vcs_dir.display()),
            repo,
            created: true,
        })
    }

    /// create `parent/name` if needed, then initialize a repository there
    pub fn init_named(parent: &Path, name: &str) -> Result<InitOutcome> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(Error::InvalidPath(name.to_string()));
        }
        Self::init(&parent.join(name))
    }

    /// open an existing repository
    pub fn open(root: &Path) -> Result<Self> {
        if !root.join(VCS_DIR).is_dir() {
            return Err(Error::NoRepo(root.to_path_buf()));
        }
        let root = fs::canonicalize(root).with_path(root)?;
        let config = Config::load(&root.join(VCS_DIR).join("config.toml"))?;

        Ok(Self { root, config })
    }

    /// working-directory root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// save configuration changes
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path())
    }

    /// the object store of this repository
    pub fn store(&self) -> ObjectStore<'_> {
        ObjectStore::new(self)
    }

    /// path to the .vcs directory
    pub fn vcs_path(&self) -> PathBuf {
        self.root.join(VCS_DIR)
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.vcs_path().join("config.toml")
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.vcs_path().join("objects")
    }

    /// path to refs directory
    pub fn refs_path(&self) -> PathBuf {
        self.vcs_path().join("refs")
    }

    /// path to the head reference
    pub fn head_path(&self) -> PathBuf {
        self.refs_path().join("HEAD")
    }

    /// path to the staging index
    pub fn index_path(&self) -> PathBuf {
        self.vcs_path().join("index")
    }

    /// path to tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.vcs_path().join("tmp")
    }

    /// path to lock file
    pub fn lock_path(&self) -> PathBuf {
        self.vcs_path().join("lock")
    }

    /// acquire exclusive lock on repository
    /// returns a guard that releases the lock on drop
    pub fn lock(&self) -> Result<RepoLock> {
        self.try_lock()?.ok_or(Error::LockContention)
    }

    /// try to acquire exclusive lock, returning None if already locked
    pub fn try_lock(&self) -> Result<Option<RepoLock>> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(flock) => Ok(Some(RepoLock { flock })),
            Err((_, Errno::EWOULDBLOCK)) => Ok(None),
            Err((_, errno)) => Err(std::io::Error::from(errno)).with_path(lock_path),
        }
    }
}

/// guard that holds repository lock until dropped
pub struct RepoLock {
    #[allow(dead_code)]
    flock: Flock<File>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_repo_init() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("work");

        let outcome = Repo::init(&root).unwrap();
        assert!(outcome.created);

        let vcs = root.join(".vcs");
        assert!(vcs.join("objects").is_dir());
        assert!(vcs.join("refs").is_dir());
        assert!(vcs.join("tmp").is_dir());
        assert!(vcs.join("index").is_file());
        assert!(vcs.join("config.toml").is_file());
        assert!(!vcs.join("refs/HEAD").exists());
    }

    #[test]
    fn test_repo_reinit_is_noop() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("work");

        let first = Repo::init(&root).unwrap();
        assert!(first.created);

        // plant state that must survive
        let hash = first.repo.store().put(b"keep me").unwrap();
        fs::write(first.repo.head_path(), hash.to_hex()).unwrap();
        fs::write(first.repo.index_path(), "version = 1\n\n[entries]\n").unwrap();

        let second = Repo::init(&root).unwrap();
        assert!(!second.created);
        assert!(second.message.contains("already initialized"));

        assert_eq!(second.repo.store().get(&hash).unwrap(), b"keep me");
        assert_eq!(
            fs::read_to_string(second.repo.head_path()).unwrap(),
            hash.to_hex()
        );
        assert_eq!(
            fs::read_to_string(second.repo.index_path()).unwrap(),
            "version = 1\n\n[entries]\n"
        );
    }

    #[test]
    fn test_repo_init_named() {
        let dir = tempdir().unwrap();

        let outcome = Repo::init_named(dir.path(), "project").unwrap();
        assert!(outcome.created);
        assert!(dir.path().join("project/.vcs").is_dir());

        assert!(matches!(
            Repo::init_named(dir.path(), "../escape"),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_repo_open() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("work");

        Repo::init(&root).unwrap();
        let repo = Repo::open(&root).unwrap();

        assert_eq!(repo.root(), fs::canonicalize(&root).unwrap());
    }

    #[test]
    fn test_repo_open_not_found() {
        let dir = tempdir().unwrap();

        let result = Repo::open(dir.path());
        assert!(matches!(result, Err(Error::NoRepo(_))));
    }

    #[test]
    fn test_repo_paths() {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap().repo;
        let root = fs::canonicalize(dir.path()).unwrap();

        assert_eq!(repo.objects_path(), root.join(".vcs/objects"));
        assert_eq!(repo.head_path(), root.join(".vcs/refs/HEAD"));
        assert_eq!(repo.index_path(), root.join(".vcs/index"));
        assert_eq!(repo.tmp_path(), root.join(".vcs/tmp"));
    }

    #[test]
    fn test_repo_lock() {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap().repo;

        let lock = repo.lock().unwrap();

        // second acquisition is refused while the first is held
        assert!(repo.try_lock().unwrap().is_none());

        drop(lock);

        assert!(repo.try_lock().unwrap().is_some());
    }

    #[test]
    fn test_lock_reports_contention() {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap().repo;

        let _held = repo.lock().unwrap();
        assert!(matches!(repo.lock(), Err(Error::LockContention)));
    }

    #[test]
    fn test_lock_io_failure_is_not_contention() {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap().repo;

        // a directory in place of the lock file cannot be opened for writing
        fs::create_dir(repo.lock_path()).unwrap();

        match repo.lock() {
            Err(Error::Io { path, .. }) => assert_eq!(path, repo.lock_path()),
            other => panic!("expected io error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_config_modification() {
        let dir = tempdir().unwrap();
        let mut repo = Repo::init(dir.path()).unwrap().repo;

        repo.config_mut().ignore.push("*.log".to_string());
        repo.save_config().unwrap();

        let reopened = Repo::open(dir.path()).unwrap();
        assert_eq!(reopened.config().ignore, vec!["*.log".to_string()]);
    }
}
