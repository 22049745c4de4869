use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Каталог target/debug или target/release по OUT_DIR (target/<profile>/build/<crate>/out)
fn profile_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    let profile = env::var("PROFILE").ok()?;
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn copy_dir(from: &Path, to: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(to)?;
    let mut copied = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::copy(entry.path(), to.join(entry.file_name()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../migrations");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let Some(target_dir) = profile_dir() else {
        println!("cargo:warning=Could not find target profile directory, skipping copy");
        return;
    };

    // config.toml и migrations/ кладутся рядом с исполняемым файлом
    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        match fs::copy(&source_config, target_dir.join("config.toml")) {
            Ok(_) => println!("cargo:warning=Copied config.toml to {:?}", target_dir),
            Err(e) => panic!("Failed to copy config.toml: {}", e),
        }
    } else {
        println!(
            "cargo:warning=config.toml not found at {:?}, using default config",
            source_config
        );
    }

    let source_migrations = workspace_root.join("migrations");
    if source_migrations.is_dir() {
        if let Err(e) = copy_dir(&source_migrations, &target_dir.join("migrations")) {
            panic!("Failed to copy migrations: {}", e);
        }
    }
}
