use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{FileErr, FileResult};
use sea_spool_types::{SpoolErr, UnitBackend};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

/// Appended to the final name while a unit is being written.
pub const TEMP_SUFFIX: &str = "._";

/// Writes units as files in a directory.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    unit: Option<OpenFile>,
}

#[derive(Debug)]
struct OpenFile {
    target: PathBuf,
    temp: PathBuf,
    file: File,
}

impl FileBackend {
    /// The directory must already exist.
    pub fn new<P: Into<PathBuf>>(dir: P) -> FileResult<Self> {
        let dir = dir.into();
        match std::fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => Ok(Self { dir, unit: None }),
            Ok(_) => Err(SpoolErr::Config(format!(
                "{} is not a directory",
                dir.display()
            ))),
            Err(e) => Err(SpoolErr::Config(format!("{}: {e}", dir.display()))),
        }
    }

    /// A backend on the same directory with no open unit. The directory is not checked again.
    pub fn reopen(&self) -> Self {
        Self {
            dir: self.dir.clone(),
            unit: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of the open unit.
    pub fn current_target(&self) -> Option<&Path> {
        self.unit.as_ref().map(|u| u.target.as_path())
    }

    /// Path the open unit is being written to.
    pub fn current_temp(&self) -> Option<&Path> {
        self.unit.as_ref().map(|u| u.temp.as_path())
    }
}

/// `dir/name` -> `dir/name._`
pub fn temp_path(target: &Path) -> PathBuf {
    let mut path: OsString = target.as_os_str().to_owned();
    path.push(TEMP_SUFFIX);
    PathBuf::from(path)
}

impl UnitBackend for FileBackend {
    type Error = FileErr;

    async fn new_file(&mut self, name: &str) -> Result<(), FileErr> {
        if let Some(unit) = &self.unit {
            return Err(FileErr::AlreadyOpened(unit.target.clone()));
        }
        let target = self.dir.join(name);
        let temp = temp_path(&target);
        log::info!("Writing new file {}", temp.display());

        // a stale temp file can only be left behind by an abandoned attempt
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)
            .await
            .map_err(FileErr::IoError)?;
        self.unit = Some(OpenFile { target, temp, file });
        Ok(())
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), FileErr> {
        let unit = self.unit.as_mut().ok_or(FileErr::NotOpened)?;
        unit.file.write_all(bytes).await.map_err(FileErr::IoError)
    }

    async fn close_file(&mut self) -> Result<(), FileErr> {
        let OpenFile {
            target,
            temp,
            mut file,
        } = self.unit.take().ok_or(FileErr::NotOpened)?;
        file.flush().await.map_err(FileErr::IoError)?;
        std::mem::drop(file);

        tokio::fs::rename(&temp, &target)
            .await
            .map_err(FileErr::IoError)?;
        log::debug!("Renamed {} -> {}", temp.display(), target.display());
        Ok(())
    }
}
