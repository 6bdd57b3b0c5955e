//! # stegcrypt Binary Entry Point
//!
//! Command-line front end for key generation, encryption, fingerprints and
//! LSB steganography.
//!
//! ## Usage
//!
//! ```bash
//! stegcrypt keygen --out-dir keys
//! stegcrypt public-key --private-key keys/private.pem
//! stegcrypt encrypt --public-key keys/public.pem "meet at noon" --json
//! stegcrypt decrypt --private-key keys/private.pem "<base64>" --expect-digest <hex>
//! stegcrypt embed --image cover.jpg --key hunter2 "hidden text"
//! stegcrypt extract --image stego_....png --key hunter2
//! stegcrypt --config stegcrypt.toml capacity --image cover.jpg
//! ```
//!
//! Exits with a non-zero status on any failure.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use stego_crypt::common::config::{load_config, AppConfig};
use stego_crypt::common::logging::init_logger;
use stego_crypt::crypto::cipher::public_key_from_private;
use stego_crypt::crypto::digest;
use stego_crypt::processing::steganography::capacity_of;
use stego_crypt::processing::upload::{is_allowed_file, stego_output_name};
use stego_crypt::report::{to_json, EncryptionReport, StegoReport};
use stego_crypt::CryptoCore;

/// Command-line arguments for the stegcrypt binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    ///
    /// Example: config/stegcrypt.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Log level override (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an RSA-2048 key pair as private.pem / public.pem
    Keygen {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the public key belonging to a private key
    PublicKey {
        #[arg(long)]
        private_key: PathBuf,
    },
    /// Encrypt a message (max 190 UTF-8 bytes) with a public key
    Encrypt {
        #[arg(long)]
        public_key: PathBuf,
        message: String,
        /// Print a JSON report including the message digest
        #[arg(long)]
        json: bool,
    },
    /// Decrypt a base64 ciphertext with a private key
    Decrypt {
        #[arg(long)]
        private_key: PathBuf,
        ciphertext: String,
        /// Check the recovered plaintext against this digest
        #[arg(long)]
        expect_digest: Option<String>,
    },
    /// Print the fingerprint of a text
    Digest { text: String },
    /// Check a text against a fingerprint
    Verify { text: String, digest: String },
    /// Hide a message in an image
    Embed {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        key: String,
        /// Output path (.png only); defaults to a generated name in the output directory
        #[arg(long)]
        output: Option<PathBuf>,
        message: String,
        #[arg(long)]
        json: bool,
    },
    /// Recover a message hidden in an image
    Extract {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        key: String,
    },
    /// Print how many bytes an image can carry
    Capacity {
        #[arg(long)]
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Configuration file is optional; every field has a default
    let config: AppConfig = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading config {}", path))?,
        None => AppConfig::default(),
    };

    // Initialize logging
    let level = args.log_level.as_deref().unwrap_or(config.logging.level.as_str());
    init_logger(level);

    let core = CryptoCore::new(&config.service, config.stego.traversal);

    match args.command {
        Command::Keygen { out_dir } => {
            let keys = core.generate_key_pair().await?;
            fs::create_dir_all(&out_dir)?;
            let private_path = out_dir.join("private.pem");
            let public_path = out_dir.join("public.pem");
            fs::write(&private_path, &keys.private_key_pem)?;
            fs::write(&public_path, &keys.public_key_pem)?;
            info!("Wrote {} and {}", private_path.display(), public_path.display());
            println!("{}", public_path.display());
        }
        Command::PublicKey { private_key } => {
            let private_key_pem = read_text(&private_key)?;
            print!("{}", public_key_from_private(&private_key_pem)?);
        }
        Command::Encrypt {
            public_key,
            message,
            json,
        } => {
            let public_key_pem = read_text(&public_key)?;
            let fingerprint = digest::digest(&message);
            let ciphertext = core.encrypt(message, public_key_pem).await?;

            if json {
                println!("{}", to_json(&EncryptionReport::new(ciphertext, fingerprint))?);
            } else {
                println!("{}", ciphertext);
                println!("digest: {}", fingerprint);
            }
        }
        Command::Decrypt {
            private_key,
            ciphertext,
            expect_digest,
        } => {
            let private_key_pem = read_text(&private_key)?;
            let plaintext = core.decrypt(ciphertext, private_key_pem).await?;
            println!("{}", plaintext);

            if let Some(expected) = expect_digest {
                let valid = digest::verify(&plaintext, &expected);
                println!("digest: {}", if valid { "valid" } else { "MISMATCH" });
                if !valid {
                    bail!("decrypted message does not match the expected digest");
                }
            }
        }
        Command::Digest { text } => {
            println!("{}", digest::digest(&text));
        }
        Command::Verify { text, digest: expected } => {
            if digest::verify(&text, &expected) {
                println!("valid");
            } else {
                bail!("digest mismatch");
            }
        }
        Command::Embed {
            image,
            key,
            output,
            message,
            json,
        } => {
            let original_name = check_input_image(&image, &config)?;
            let output = resolve_output(output, &config.stego.output_dir, &original_name)?;

            let image_data = fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            let available = capacity_of(&image_data)?;
            let message_len = message.len();

            let stego = core.embed(image_data, message, key).await?;
            fs::write(&output, stego).with_context(|| format!("writing {}", output.display()))?;

            if json {
                let report = StegoReport::new(
                    original_name,
                    output.display().to_string(),
                    message_len,
                    available,
                    config.stego.traversal,
                );
                println!("{}", to_json(&report)?);
            } else {
                println!("{}", output.display());
            }
        }
        Command::Extract { image, key } => {
            check_input_image(&image, &config)?;
            let image_data = fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            let message = core.extract(image_data, key).await?;
            println!("{}", message);
        }
        Command::Capacity { image } => {
            check_input_image(&image, &config)?;
            let image_data = fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            println!("{}", capacity_of(&image_data)?);
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Pick the stego output path and make sure it can be written.
///
/// The codec always produces PNG bytes, so only a `.png` path is accepted.
fn resolve_output(output: Option<PathBuf>, output_dir: &Path, original_name: &str) -> Result<PathBuf> {
    let output = match output {
        Some(path) => path,
        None => output_dir.join(stego_output_name(original_name)),
    };

    let output_ext = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !output_ext.eq_ignore_ascii_case("png") {
        bail!("output must be a .png file to preserve hidden data");
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(output)
}

/// Apply the extension policy and return the file name.
fn check_input_image(path: &Path, config: &AppConfig) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    if !is_allowed_file(&name, &config.stego.allowed_extensions) {
        bail!(
            "Invalid file type. Please upload one of: {}",
            config.stego.allowed_extensions.join(", ")
        );
    }
    Ok(name)
}
