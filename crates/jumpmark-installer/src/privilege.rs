/// Whether the process runs with root privileges.
#[cfg(unix)]
pub fn running_elevated() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
pub fn running_elevated() -> bool {
    false
}
