//! Shared fixtures: stub browser scripts and a wired adapter

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use illdb_core::domain::{BrowserCommand, ProfileRegistry};
use illdb_core::port::time_provider::SystemTimeProvider;
use illdb_core::StoreAdapter;
use illdb_infra_system::SubprocessRunner;

/// Stub browser keeping one file per bucket/key under its own directory
///
/// Argument layout: --bucket=B --host H --port P -u U -p PW <verb> <key> [value]
pub const STORE_SCRIPT: &str = r#"
bucket="${1#--bucket=}"
shift 9
verb="$1"
key="$2"
file="$STORE_DIR/$bucket-$key"
case "$verb" in
  set) printf '%s\n' "$3" > "$file"; echo OK ;;
  get)
    if [ -f "$file" ]; then cat "$file"; else echo "document not found" >&2; exit 255; fi ;;
  *) echo "unknown command $verb" >&2; exit 2 ;;
esac
"#;

/// Last argument on stdout, argument count on stderr
pub const ECHO_LAST_SCRIPT: &str = r#"
for arg; do last="$arg"; done
echo "$last"
echo "$#" >&2
"#;

/// Writes every argument space-joined on stdout
pub const ECHO_ALL_SCRIPT: &str = r#"echo "$*""#;

/// Writes a 2000 character line on stdout
pub const LONG_LINE_SCRIPT: &str = r#"head -c 2000 /dev/zero | tr '\0' x"#;

pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Write `body` to a script file; STORE_DIR is baked in as the fixture dir
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let contents = format!(
            "#!/bin/sh\nSTORE_DIR='{}'\n{}\n",
            self.dir.path().display(),
            body
        );
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn registry() -> Arc<ProfileRegistry> {
    Arc::new(ProfileRegistry::from_definitions([
        ("ILLDB_TEST_HOST", "127.0.0.1"),
        ("ILLDB_TEST_PORT", "3306"),
        ("ILLDB_TEST_USER", "root"),
        ("ILLDB_TEST_PWD", "1"),
    ]))
}

/// Adapter running `sh <script>` (run through sh so the file needs no exec bit)
pub fn adapter_for(script: &Path) -> StoreAdapter {
    let runner = Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider)));
    StoreAdapter::new(registry(), runner).with_command(BrowserCommand::new(
        "sh",
        vec![script.display().to_string()],
    ))
}

pub fn connected_adapter_for(script: &Path) -> StoreAdapter {
    let mut adapter = adapter_for(script);
    adapter.connect("test").unwrap();
    adapter
}
