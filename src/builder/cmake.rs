//! Builds an external CMake project with `cmake` and `make`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::util::fs::{ensure_dir, normalize_path};
use crate::util::process::{find_executable, ProcessBuilder};

/// CMake build adapter.
#[derive(Debug, Clone)]
pub struct CMakeBuilder {
    project: PathBuf,
    build_dir: PathBuf,
    cmake: String,
    make: String,
    options: Vec<String>,
    jobs: usize,
}

impl CMakeBuilder {
    /// Create a builder for `project`, building in `build_dir`.
    pub fn new(project: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        CMakeBuilder {
            project: project.into(),
            build_dir: build_dir.into(),
            cmake: "cmake".to_string(),
            make: "make".to_string(),
            options: Vec::new(),
            jobs: 1,
        }
    }

    /// Use a different cmake program.
    pub fn cmake(mut self, cmake: impl Into<String>) -> Self {
        self.cmake = cmake.into();
        self
    }

    /// Use a different native build program.
    pub fn make(mut self, make: impl Into<String>) -> Self {
        self.make = make.into();
        self
    }

    /// Add options passed to cmake ahead of the project path.
    pub fn options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options.extend(options.into_iter().map(|s| s.into()));
        self
    }

    /// Parallelism passed to `make -j`.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// One-line description of what [`CMakeBuilder::build`] runs.
    pub fn message(&self) -> String {
        let mut cmake = vec![self.cmake.clone()];
        cmake.extend(self.options.iter().cloned());
        cmake.push(self.project.display().to_string());

        format!(
            "cd {} && {} && {} -j {}",
            self.build_dir.display(),
            cmake.join(" "),
            self.make,
            self.jobs
        )
    }

    /// Configure and build, forwarding the tools' stdout to `sink` line by
    /// line.
    pub fn build(&self, sink: &mut dyn Write) -> Result<()> {
        if self.project.as_os_str().is_empty() {
            bail!("No path specified");
        }
        if !self.project.exists() {
            bail!("Path {} not found", self.project.display());
        }
        if find_executable(&self.cmake).is_none() {
            bail!(
                "CMake not found\n\
                 \n\
                 Install CMake and ensure it's in your PATH, or pass `--cmake`."
            );
        }

        ensure_dir(&self.build_dir)?;
        // cmake runs inside the build directory
        let project = normalize_path(&self.project);

        tracing::info!("{}", self.message());

        let status = ProcessBuilder::new(&self.cmake)
            .args(&self.options)
            .arg(&project)
            .cwd(&self.build_dir)
            .stream(sink)?;
        if !status.success() {
            bail!("cmake failed with exit code {:?}", status.code());
        }

        let status = ProcessBuilder::new(&self.make)
            .arg("-j")
            .arg(self.jobs.to_string())
            .cwd(&self.build_dir)
            .stream(sink)?;
        if !status.success() {
            bail!("{} failed with exit code {:?}", self.make, status.code());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_message() {
        let builder = CMakeBuilder::new("/src/asagi", "/build/asagi")
            .options(["-DCMAKE_BUILD_TYPE=Release", "-DNOMPI=ON"])
            .jobs(4);

        assert_eq!(
            builder.message(),
            "cd /build/asagi && cmake -DCMAKE_BUILD_TYPE=Release -DNOMPI=ON /src/asagi && make -j 4"
        );
    }

    #[test]
    fn test_message_without_options() {
        let builder = CMakeBuilder::new("proj", "build").make("gmake");
        assert_eq!(builder.message(), "cd build && cmake proj && gmake -j 1");
    }

    #[test]
    fn test_missing_project() {
        let tmp = TempDir::new().unwrap();
        let builder = CMakeBuilder::new(tmp.path().join("missing"), tmp.path().join("build"));

        let err = builder.build(&mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!tmp.path().join("build").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_streams_both_tools() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("proj");
        std::fs::create_dir_all(&project).unwrap();

        // `sh -c 'echo ...' <args>` stands in for cmake and make
        let builder = CMakeBuilder::new(&project, tmp.path().join("build"))
            .cmake("sh")
            .options(["-c", "echo configured"])
            .make("true");

        let mut out = Vec::new();
        builder.build(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "configured\n");
        assert!(tmp.path().join("build").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_configure_stops_build() {
        let tmp = TempDir::new().unwrap();
        let builder = CMakeBuilder::new(tmp.path(), tmp.path().join("build"))
            .cmake("sh")
            .options(["-c", "exit 2"]);

        let err = builder.build(&mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("cmake failed"));
    }
}
