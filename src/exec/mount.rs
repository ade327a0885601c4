// src/exec/mount.rs

use std::path::Path;

use tracing::{debug, warn};

use crate::fs::FileSystem;

use super::{CommandRequest, ProcessResult, ProcessRunner};

/// Run `mount` on the host.
///
/// Returns the exit code of `mount`, or one of the negative codes of
/// [`ProcessResult`]: `-1` crashed, `-2` failed to start, `-3` invalid
/// arguments (empty device or mount point, or a mount point that cannot be
/// created).
pub fn mount(
    runner: &dyn ProcessRunner,
    fs: &dyn FileSystem,
    device: &str,
    mount_point: &str,
    filesystem: Option<&str>,
    options: Option<&str>,
) -> i32 {
    if device.is_empty() || mount_point.is_empty() {
        warn!(device, mount_point, "mount called with empty device or mount point");
        return ProcessResult::INVALID_ARGUMENTS;
    }

    let target = Path::new(mount_point);
    if !fs.is_dir(target) {
        if let Err(e) = fs.create_dir_all(target) {
            warn!(mount_point, error = %e, "could not create mount point");
            return ProcessResult::INVALID_ARGUMENTS;
        }
        debug!(mount_point, "created mount point");
    }

    let mut argv = vec!["mount".to_string()];
    if let Some(filesystem) = filesystem.filter(|s| !s.is_empty()) {
        argv.push("-t".to_string());
        argv.push(filesystem.to_string());
    }
    if let Some(options) = options.filter(|s| !s.is_empty()) {
        argv.push("-o".to_string());
        argv.push(options.to_string());
    }
    argv.push(device.to_string());
    argv.push(mount_point.to_string());

    runner.run(&CommandRequest::host(argv), None).code
}
