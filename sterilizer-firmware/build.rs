//! Build script for sterilizer-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates secrets.toml at compile time and bakes it into the binary

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    generate_secrets();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Network credentials and broker address
struct Secrets {
    ssid: String,
    password: String,
    broker: Ipv4Addr,
}

/// Validate secrets.toml and write `$OUT_DIR/secrets.rs`
fn generate_secrets() {
    println!("cargo:rerun-if-changed=secrets.toml");
    println!("cargo:rerun-if-changed=secrets.example.toml");

    let path = if Path::new("secrets.toml").exists() {
        Path::new("secrets.toml")
    } else {
        println!("cargo:warning=secrets.toml not found, using secrets.example.toml");
        Path::new("secrets.example.toml")
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read {:<42}║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                path.display(),
                e
            );
        }
    };

    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in {:<34}║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                path.display(),
                format_error_lines(&e.to_string())
            );
        }
    };

    let secrets = validate_secrets(&value);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let octets = secrets.broker.octets();
    let generated = format!(
        "/// Wi-Fi network name\n\
         pub const WIFI_SSID: &str = {:?};\n\
         /// Wi-Fi passphrase\n\
         pub const WIFI_PASSWORD: &str = {:?};\n\
         /// Broker IPv4 address\n\
         pub const BROKER_ADDR: [u8; 4] = [{}, {}, {}, {}];\n",
        secrets.ssid, secrets.password, octets[0], octets[1], octets[2], octets[3]
    );
    fs::write(out_dir.join("secrets.rs"), generated).unwrap();

    println!("cargo:warning={} validated successfully", path.display());
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check every required key, collecting all problems before failing
fn validate_secrets(config: &toml::Value) -> Secrets {
    let mut errors = Vec::new();

    let ssid = config
        .get("wifi")
        .and_then(|w| w.get("ssid"))
        .and_then(|v| v.as_str());
    match ssid {
        None => errors.push("Missing [wifi] ssid".to_string()),
        Some("") => errors.push("[wifi] ssid must not be empty".to_string()),
        Some(s) if s.len() > 32 => errors.push("[wifi] ssid longer than 32 bytes".to_string()),
        Some(_) => {}
    }

    let password = config
        .get("wifi")
        .and_then(|w| w.get("password"))
        .and_then(|v| v.as_str());
    match password {
        None => errors.push("Missing [wifi] password".to_string()),
        // WPA2 passphrases are 8 to 63 characters; empty means an open network
        Some(p) if !p.is_empty() && !(8..=63).contains(&p.len()) => {
            errors.push("[wifi] password must be 8-63 characters".to_string())
        }
        Some(_) => {}
    }

    let broker = config
        .get("mqtt")
        .and_then(|m| m.get("broker"))
        .and_then(|v| v.as_str());
    let broker = match broker.map(str::parse::<Ipv4Addr>) {
        None => {
            errors.push("Missing [mqtt] broker".to_string());
            None
        }
        Some(Err(_)) => {
            errors.push("[mqtt] broker must be an IPv4 address".to_string());
            None
        }
        Some(Ok(addr)) => Some(addr),
    };

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid secrets configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Secrets {
        ssid: ssid.unwrap_or_default().to_string(),
        password: password.unwrap_or_default().to_string(),
        broker: broker.unwrap_or(Ipv4Addr::UNSPECIFIED),
    }
}
