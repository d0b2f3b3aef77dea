use crate::app::adb::paths::DevicePaths;

/// Environment assignments placed in front of the remote binary.
///
/// `LD_LIBRARY_PATH` always comes first because the Android linker ignores RPATH.
/// Each allow-listed host variable follows in allow-list order as `NAME="value"`.
/// Values are wrapped in double quotes but not escaped.
pub fn build_device_env<I, K, V>(device_dir: &str, host_env: I, allowed: &[String]) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let host_env: Vec<(K, V)> = host_env.into_iter().collect();
    let mut assignments = vec![format!("LD_LIBRARY_PATH={device_dir}")];
    for key in allowed {
        if let Some((_, value)) = host_env.iter().find(|(name, _)| name.as_ref() == key.as_str()) {
            assignments.push(format!("{key}=\"{}\"", value.as_ref()));
        }
    }
    assignments.join(" ")
}

/// Joins forwarded arguments with single spaces.
///
/// Nothing is quoted: an argument containing spaces or shell metacharacters is
/// re-split by the device shell. Harnesses in the wild rely on that, so it stays.
pub fn join_device_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| arg.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct RemoteCommand<'a> {
    pub paths: &'a DevicePaths,
    pub env: String,
    pub wrapper: String,
    pub args: String,
}

impl RemoteCommand<'_> {
    /// `cd`, environment, wrapper, binary and args, then the three redirections.
    /// The trailing `echo $?` records the binary's status even when it fails.
    pub fn render(&self) -> String {
        format!(
            "cd {} && {} {}{} {} >{} 2>{} ; echo $? >{}",
            self.paths.dir,
            self.env,
            self.wrapper,
            self.paths.binary,
            self.args,
            self.paths.stdout,
            self.paths.stderr,
            self.paths.exit_code,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![
            "ASAN_OPTIONS".to_string(),
            "ASAN_ACTIVATION_OPTIONS".to_string(),
        ]
    }

    #[test]
    fn env_always_sets_library_path() {
        let env = build_device_env("/data/local/tmp/Output", Vec::<(String, String)>::new(), &allowed());
        assert_eq!(env, "LD_LIBRARY_PATH=/data/local/tmp/Output");
    }

    #[test]
    fn env_forwards_only_allow_listed_keys() {
        let host = vec![("FOO", "x"), ("ASAN_OPTIONS", "verbosity=1"), ("PATH", "/usr/bin")];
        let env = build_device_env("/data/local/tmp/Output", host, &allowed());
        assert_eq!(
            env,
            "LD_LIBRARY_PATH=/data/local/tmp/Output ASAN_OPTIONS=\"verbosity=1\""
        );
        assert!(!env.contains("FOO"));
        assert!(!env.contains("PATH=/usr/bin"));
    }

    #[test]
    fn env_follows_allow_list_order() {
        let host = vec![
            ("ASAN_ACTIVATION_OPTIONS", "allow_user_poisoning=0"),
            ("ASAN_OPTIONS", "detect_leaks=0:verbosity=1"),
        ];
        let env = build_device_env("/d", host, &allowed());
        assert_eq!(
            env,
            "LD_LIBRARY_PATH=/d ASAN_OPTIONS=\"detect_leaks=0:verbosity=1\" \
             ASAN_ACTIVATION_OPTIONS=\"allow_user_poisoning=0\""
        );
    }

    #[test]
    fn env_keys_match_exactly() {
        let host = vec![("ASAN_OPTIONS_EXTRA", "x"), ("asan_options", "y")];
        let env = build_device_env("/d", host, &allowed());
        assert_eq!(env, "LD_LIBRARY_PATH=/d");
    }

    #[test]
    fn args_are_joined_without_quoting() {
        assert_eq!(join_device_args(&["--gtest_filter=*Foo*", "a b", "$HOME"]), "--gtest_filter=*Foo* a b $HOME");
        assert_eq!(join_device_args::<&str>(&[]), "");
    }

    #[test]
    fn renders_in_fixed_order() {
        let paths = DevicePaths::for_invocation("/data/local/tmp/Output", "/host/t").expect("paths");
        let command = RemoteCommand {
            paths: &paths,
            env: "LD_LIBRARY_PATH=/data/local/tmp/Output".to_string(),
            wrapper: "asanwrapper ".to_string(),
            args: "--gtest_filter=*Foo*".to_string(),
        };
        assert_eq!(
            command.render(),
            "cd /data/local/tmp/Output && LD_LIBRARY_PATH=/data/local/tmp/Output \
             asanwrapper /data/local/tmp/Output/t --gtest_filter=*Foo* \
             >/data/local/tmp/Output/t.stdout 2>/data/local/tmp/Output/t.stderr ; \
             echo $? >/data/local/tmp/Output/t.exitcode"
        );
    }

    #[test]
    fn renders_without_wrapper_or_args() {
        let paths = DevicePaths::for_invocation("/d", "t").expect("paths");
        let command = RemoteCommand {
            paths: &paths,
            env: "LD_LIBRARY_PATH=/d".to_string(),
            wrapper: String::new(),
            args: String::new(),
        };
        assert_eq!(
            command.render(),
            "cd /d && LD_LIBRARY_PATH=/d /d/t  >/d/t.stdout 2>/d/t.stderr ; echo $? >/d/t.exitcode"
        );
    }
}
