// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

// Mirrors the derive definitions in src/cli.rs; keep the two in sync.

/// Source format assumed when the package has no usable marker
fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .value_name("native|quilt")
        .value_parser(["native", "quilt"])
        .help("Source format assumed when debian/source/format is missing or unknown")
}

fn build_cli() -> Command {
    Command::new("lingmo-pkgbuild")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build Debian binary packages from source trees")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(
            Command::new("build")
                .about("Build one package, or every package directory under DIR")
                .arg(
                    Arg::new("dir")
                        .required(true)
                        .help("Package source tree, or a directory containing several"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("FILE")
                        .help("TOML configuration file; flags override its values"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory for built packages [default: pkg_out]"),
                )
                .arg(
                    Arg::new("build_dir")
                        .short('b')
                        .long("build-dir")
                        .value_name("DIR")
                        .help("Scratch directory for staging [default: .build_deb_lingmo]"),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .value_name("N")
                        .help("Parallel jobs passed to the backend"),
                )
                .arg(
                    Arg::new("no_sign")
                        .long("no-sign")
                        .action(ArgAction::SetTrue)
                        .help("Do not sign the packages"),
                )
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .value_name("KEY")
                        .help("Signing key to use"),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("no_deps")
                        .long("no-deps")
                        .action(ArgAction::SetTrue)
                        .help("Skip build dependency installation (which requires root)"),
                )
                .arg(
                    Arg::new("clean")
                        .short('c')
                        .long("clean")
                        .action(ArgAction::SetTrue)
                        .help("Remove the build directory before and after building"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the package identity resolved from a source tree")
                .arg(
                    Arg::new("dir")
                        .required(true)
                        .help("Package source tree (containing debian/)"),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("clean").about("Remove the build directory").arg(
                Arg::new("build_dir")
                    .short('b')
                    .long("build-dir")
                    .value_name("DIR")
                    .default_value(".build_deb_lingmo")
                    .help("Scratch directory to remove"),
            ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell to generate completions for"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Man page goes to $OUT_DIR/man/lingmo-pkgbuild.1
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("lingmo-pkgbuild.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
