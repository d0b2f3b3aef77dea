use std::path::Path;

pub const STDOUT_SUFFIX: &str = "stdout";
pub const STDERR_SUFFIX: &str = "stderr";
pub const EXIT_CODE_SUFFIX: &str = "exitcode";

/// Device-side locations for one run, all directly under the device directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePaths {
    pub dir: String,
    pub binary: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: String,
}

impl DevicePaths {
    /// Places the file name of the host-side `argv0` under `device_dir`.
    pub fn for_invocation(device_dir: &str, argv0: &str) -> Option<Self> {
        let name = Path::new(argv0).file_name()?.to_string_lossy().to_string();
        let dir = device_dir.trim_end_matches('/');
        let dir = if dir.is_empty() { "/" } else { dir };
        let binary = if dir == "/" {
            format!("/{name}")
        } else {
            format!("{dir}/{name}")
        };
        Some(Self {
            dir: dir.to_string(),
            stdout: artifact_path(&binary, STDOUT_SUFFIX),
            stderr: artifact_path(&binary, STDERR_SUFFIX),
            exit_code: artifact_path(&binary, EXIT_CODE_SUFFIX),
            binary,
        })
    }
}

pub fn artifact_path(binary: &str, suffix: &str) -> String {
    format!("{binary}.{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_binary_from_basename() {
        let paths = DevicePaths::for_invocation("/data/local/tmp/Output", "/build/asan/tests/use-after-free")
            .expect("paths");
        assert_eq!(paths.binary, "/data/local/tmp/Output/use-after-free");
        assert_eq!(paths.stdout, "/data/local/tmp/Output/use-after-free.stdout");
        assert_eq!(paths.stderr, "/data/local/tmp/Output/use-after-free.stderr");
        assert_eq!(paths.exit_code, "/data/local/tmp/Output/use-after-free.exitcode");
    }

    #[test]
    fn tolerates_trailing_slash_and_root() {
        let paths = DevicePaths::for_invocation("/data/local/tmp/", "t").expect("paths");
        assert_eq!(paths.dir, "/data/local/tmp");
        assert_eq!(paths.binary, "/data/local/tmp/t");

        let paths = DevicePaths::for_invocation("/", "./t").expect("paths");
        assert_eq!(paths.binary, "/t");
    }

    #[test]
    fn rejects_argv0_without_file_name() {
        assert!(DevicePaths::for_invocation("/data/local/tmp", "").is_none());
        assert!(DevicePaths::for_invocation("/data/local/tmp", "/").is_none());
        assert!(DevicePaths::for_invocation("/data/local/tmp", "..").is_none());
    }
}
