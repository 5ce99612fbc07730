use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=BUILD_FRONTEND");

    if env::var("BUILD_FRONTEND").as_deref() != Ok("1") {
        return;
    }

    println!("cargo:rerun-if-changed=frontend/src");
    println!("cargo:rerun-if-changed=frontend/public");
    println!("cargo:rerun-if-changed=frontend/package.json");

    let frontend_dir = Path::new("frontend");

    let status = Command::new("npm")
        .args(["run", "build"])
        .current_dir(frontend_dir)
        .status()
        .expect("failed to run `npm run build` in frontend/, is npm installed?");

    if !status.success() {
        panic!("frontend build failed");
    }
}
