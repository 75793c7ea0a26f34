fn main() {
    // Best-effort: embed the git commit hash for `eds --version`.
    let mut hash = None;
    if let Ok(out) = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
    {
        if out.status.success() {
            let h = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if !h.is_empty() {
                println!("cargo:rustc-env=GIT_COMMIT_HASH={h}");
                hash = Some(h);
            }
        }
    }

    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let commit = hash.as_deref().unwrap_or("unknown commit");
    println!("cargo:rustc-env=EDS_LONG_VERSION={version} ({commit})");
}
