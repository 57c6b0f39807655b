// Shared helpers for integration tests: fake highlighter executables.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Fake highlighter binaries, written once per test process.
pub struct FakeBins {
    /// Wraps stdin in a pygments-style div and echoes its arguments.
    pub echo: PathBuf,
    /// Reports an error on stderr and exits with status 3.
    pub failing: PathBuf,
    /// Never answers within a short timeout.
    pub slow: PathBuf,
    /// Writes far more than a pipe buffer to stderr, then succeeds.
    pub noisy: PathBuf,
}

const ECHO_SCRIPT: &str = r#"#!/bin/sh
printf '<div class="highlight" data-args="%s"><pre>' "$*"
cat
printf '</pre></div>\n'
"#;

const FAILING_SCRIPT: &str = r#"#!/bin/sh
cat >/dev/null
echo "bad lexer" >&2
exit 3
"#;

const SLOW_SCRIPT: &str = "#!/bin/sh\nexec sleep 5\n";

const NOISY_SCRIPT: &str = r#"#!/bin/sh
cat >/dev/null
head -c 200000 /dev/zero | tr '\0' 'w' >&2
printf '<div class="highlight"><pre>quiet output</pre></div>\n'
"#;

// Every script is written before any test spawns a process, which avoids
// ETXTBSY when another thread forks while a script is still open for writing.
pub fn fake_bins() -> &'static FakeBins {
    static BINS: OnceLock<FakeBins> = OnceLock::new();
    BINS.get_or_init(|| {
        let dir = Path::new(env!("CARGO_TARGET_TMPDIR"))
            .join(format!("slidedown-fake-bins-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("Failed to create fake bin dir");

        FakeBins {
            echo: write_script(&dir, "pygmentize", ECHO_SCRIPT),
            failing: write_script(&dir, "pygmentize-failing", FAILING_SCRIPT),
            slow: write_script(&dir, "pygmentize-slow", SLOW_SCRIPT),
            noisy: write_script(&dir, "pygmentize-noisy", NOISY_SCRIPT),
        }
    })
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("Failed to write fake highlighter");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake highlighter executable");
    path
}
