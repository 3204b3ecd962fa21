use std::process::Command;

fn main() {
    // Inject git commit hash so reports identify the exact battery revision
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();

    let git_hash = match output {
        Ok(output) if output.status.success() => {
            String::from_utf8(output.stdout).unwrap_or_else(|_| "unknown".to_string())
        }
        _ => "unknown".to_string(),
    };

    println!("cargo:rustc-env=GIT_HASH={}", git_hash.trim());

    // Lab pipelines may stamp their own version via VERSION
    let version = std::env::var("VERSION")
        .or_else(|_| std::env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "0.0.0".to_string());
    println!("cargo:rustc-env=LPA_CONFORMANCE_VERSION={}", version);

    // Only relink the vendor library when the binding is requested
    if std::env::var_os("CARGO_FEATURE_VENDOR_HAL").is_some() {
        if let Ok(dir) = std::env::var("LPA_HAL_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", dir);
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=VERSION");
    println!("cargo:rerun-if-env-changed=LPA_HAL_LIB_DIR");
}
