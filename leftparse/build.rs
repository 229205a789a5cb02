// build.rs - compile-time limits from config/<profile>.toml
use serde::Deserialize;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Profile {
    input: InputLimits,
    lexical: LexicalLimits,
    builder: BuilderLimits,
    oracle: OracleLimits,
    logging: LoggingLimits,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct InputLimits {
    max_input_size: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LexicalLimits {
    max_token_count: usize,
    max_atom_length: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BuilderLimits {
    max_build_depth: usize,
    max_derivation_length: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OracleLimits {
    max_output_length: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

/// One generated `pub const`: name, Rust type, value and the inclusive
/// range the value must fall in
struct Constant {
    name: &'static str,
    ty: &'static str,
    value: u64,
    range: (u64, u64),
}

impl Constant {
    fn new(name: &'static str, ty: &'static str, value: impl TryInto<u64>, range: (u64, u64)) -> Self {
        let value = value.try_into().unwrap_or(u64::MAX);
        Self { name, ty, value, range }
    }
}

impl Profile {
    fn modules(&self) -> Vec<(&'static str, Vec<Constant>)> {
        vec![
            ("input", vec![
                Constant::new("MAX_INPUT_SIZE", "u64", self.input.max_input_size, (1, 1_000_000_000)),
            ]),
            ("lexical", vec![
                Constant::new("MAX_TOKEN_COUNT", "usize", self.lexical.max_token_count, (1, 100_000_000)),
                Constant::new("MAX_ATOM_LENGTH", "usize", self.lexical.max_atom_length, (1, 1_048_576)),
            ]),
            ("builder", vec![
                Constant::new("MAX_BUILD_DEPTH", "usize", self.builder.max_build_depth, (1, 100_000)),
                Constant::new("MAX_DERIVATION_LENGTH", "usize", self.builder.max_derivation_length, (1, 100_000_000)),
            ]),
            ("oracle", vec![
                Constant::new("MAX_OUTPUT_LENGTH", "usize", self.oracle.max_output_length, (1, 100_000_000)),
            ]),
            ("logging", vec![
                Constant::new("LOG_BUFFER_SIZE", "usize", self.logging.log_buffer_size, (100, 100_000)),
                Constant::new("MAX_LOG_MESSAGE_LENGTH", "usize", self.logging.max_log_message_length, (16, 65_536)),
            ]),
        ]
    }

    fn check_relations(&self, profile: &str) {
        if self.oracle.max_output_length < self.builder.max_derivation_length {
            panic!("LIMITS: oracle.max_output_length must cover builder.max_derivation_length");
        }
        if profile == "production" && self.input.max_input_size > 50_000_000 {
            panic!("PRODUCTION: input.max_input_size above 50 MB");
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LEFTPARSE_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=LEFTPARSE_CONFIG_DIR");

    let profile = env::var("LEFTPARSE_BUILD_PROFILE").unwrap_or_else(|_| "development".into());
    let config_dir = env::var("LEFTPARSE_CONFIG_DIR").unwrap_or_else(|_| "config".into());
    let config_path = profile_path(&config_dir, &profile);
    println!("cargo:rerun-if-changed={}", config_path.display());

    let text = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Cannot read profile {}: {}", config_path.display(), e));
    let limits: Profile = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("Invalid profile {}: {}", config_path.display(), e));

    limits.check_relations(&profile);
    let generated = render(&limits.modules(), &profile);

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("constants.rs"), generated)
        .expect("constants.rs is writable");

    // Read back by config::build_info
    println!("cargo:rustc-env=LEFTPARSE_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=LEFTPARSE_CONFIG_DIR={}", config_dir);
}

/// Profiles live next to the workspace manifest, one directory above this crate
fn profile_path(config_dir: &str, profile: &str) -> PathBuf {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("crate lives inside the workspace");
    workspace_root.join(config_dir).join(format!("{profile}.toml"))
}

fn render(modules: &[(&'static str, Vec<Constant>)], profile: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Generated by build.rs from the `{profile}` profile. Do not edit.");
    out.push_str("pub mod compile_time {\n");
    for (module, constants) in modules {
        let _ = writeln!(out, "    pub mod {module} {{");
        for constant in constants {
            let (min, max) = constant.range;
            if !(min..=max).contains(&constant.value) {
                panic!(
                    "LIMITS: {module}.{} = {} is outside {min}..={max}",
                    constant.name.to_lowercase(),
                    constant.value
                );
            }
            let _ = writeln!(
                out,
                "        pub const {}: {} = {};",
                constant.name, constant.ty, constant.value
            );
        }
        out.push_str("    }\n");
    }
    out.push_str("}\n");
    out
}
