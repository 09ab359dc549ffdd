//! Runs the checks CI runs, so they can be reproduced locally with `cargo run -p ci`.
//!
//! Pass check names (`format`, `clippy`, `test`, `doc`, `features`) to run a subset.

use bitflags::bitflags;
use itertools::Itertools;
use xshell::{cmd, Shell};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Check: u32 {
        const FORMAT = 1 << 0;
        const CLIPPY = 1 << 1;
        const TEST = 1 << 2;
        const DOC = 1 << 3;
        const FEATURES = 1 << 4;
    }
}

const CLIPPY_FLAGS: [&str; 2] = ["-Dwarnings", "-Aclippy::type_complexity"];

/// Format features that must build on their own.
const FEATURE_SETS: [&str; 4] = ["ron", "json", "yaml", "toml"];

fn main() {
    let arguments = [
        ("format", Check::FORMAT),
        ("clippy", Check::CLIPPY),
        ("test", Check::TEST),
        ("doc", Check::DOC),
        ("features", Check::FEATURES),
    ];

    let what_to_run = match std::env::args().nth(1) {
        None => Check::all(),
        Some(_) => std::env::args()
            .skip(1)
            .map(|arg| {
                arguments
                    .iter()
                    .find(|(name, _)| *name == arg)
                    .map(|(_, check)| *check)
                    .unwrap_or_else(|| {
                        panic!(
                            "Unknown check {arg}, expected one of: {}",
                            arguments.iter().map(|(name, _)| name).join(", ")
                        )
                    })
            })
            .fold(Check::empty(), |acc, check| acc | check),
    };

    let sh = Shell::new().expect("Failed to create a shell");

    if what_to_run.contains(Check::FORMAT) {
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .expect("Please run `cargo fmt --all` to format your code.");
    }

    if what_to_run.contains(Check::CLIPPY) {
        let flags = CLIPPY_FLAGS;
        cmd!(
            sh,
            "cargo clippy --workspace --all-targets --all-features -- {flags...}"
        )
        .run()
        .expect("Please fix clippy errors in output above.");
    }

    if what_to_run.contains(Check::TEST) {
        cmd!(sh, "cargo test --workspace --lib --bins --tests")
            .run()
            .expect("Please fix failing tests in output above.");
    }

    if what_to_run.contains(Check::DOC) {
        cmd!(sh, "cargo test --workspace --doc")
            .run()
            .expect("Please fix failing doc tests in output above.");
        cmd!(sh, "cargo doc --workspace --no-deps --all-features")
            .env("RUSTDOCFLAGS", "-D warnings")
            .run()
            .expect("Please fix doc warnings in output above.");
    }

    if what_to_run.contains(Check::FEATURES) {
        for feature in FEATURE_SETS {
            cmd!(
                sh,
                "cargo check --lib --no-default-features --features {feature}"
            )
            .run()
            .unwrap_or_else(|_| panic!("The crate does not build with only `{feature}` enabled."));
        }
    }
}
