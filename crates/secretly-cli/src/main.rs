//! secretly command-line tool
//!
//! Seals content into envelopes for a recipient public key, opens
//! envelopes with a private key, and inspects envelope headers.
//!
//! Data flows through stdin/stdout unless `--in`/`--out` are given;
//! logs always go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use secretly_crypto::{PrivateKey, PublicKey};
use secretly_envelope::limits::DEFAULT_MAX_ENVELOPE_SIZE;
use secretly_envelope::{open, seal, Envelope, OpenConfig, StaticKeyProvider};

/// Sealed, signed message envelopes over secp256k1
#[derive(Parser, Debug)]
#[command(name = "secretly")]
#[command(version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SECRETLY_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (plain, json)
    #[arg(long, global = true, env = "SECRETLY_LOG_FORMAT", default_value = "plain")]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt and sign content for a recipient
    Seal(SealArgs),
    /// Verify and decrypt an envelope
    Open(OpenArgs),
    /// Print envelope metadata as JSON without decrypting
    Inspect(InspectArgs),
}

#[derive(ClapArgs, Debug)]
struct SealArgs {
    /// Recipient public key (hex, SEC1)
    #[arg(long)]
    to: String,

    /// File holding the sender's hex private key
    #[arg(long)]
    signing_key: PathBuf,

    /// Content to seal (stdin if omitted)
    #[arg(long = "in")]
    input: Option<PathBuf>,

    /// Where to write the envelope (stdout if omitted)
    #[arg(long = "out")]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct OpenArgs {
    /// File holding the recipient's hex private key
    #[arg(long)]
    key: PathBuf,

    /// Reject envelopes not signed by this public key (hex)
    #[arg(long, conflicts_with = "allow_unsigned")]
    expect_sender: Option<String>,

    /// Accept envelopes that carry no signature
    #[arg(long)]
    allow_unsigned: bool,

    /// Largest envelope accepted, in bytes
    #[arg(long, env = "SECRETLY_MAX_ENVELOPE_SIZE", default_value_t = DEFAULT_MAX_ENVELOPE_SIZE)]
    max_envelope_size: usize,

    /// Envelope to open (stdin if omitted)
    #[arg(long = "in")]
    input: Option<PathBuf>,

    /// Where to write the content (stdout if omitted)
    #[arg(long = "out")]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct InspectArgs {
    /// Envelope to inspect (stdin if omitted)
    #[arg(long = "in")]
    input: Option<PathBuf>,
}

/// Byte lengths of each envelope field.
#[derive(Serialize, Debug)]
struct FieldSizes {
    payload: usize,
    wrapped_key: usize,
    iv: usize,
    mac: usize,
    signature: usize,
}

/// JSON report printed by `inspect`.
#[derive(Serialize, Debug)]
struct InspectReport {
    version: u8,
    signature_algorithm: String,
    cipher_algorithm: String,
    sizes: FieldSizes,
    content_hash: String,
    signed: bool,
    valid: bool,
    sender: Option<String>,
    error: Option<String>,
}

fn setup_logging(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    match log_format.to_lowercase().as_str() {
        "json" => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
        _ => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}

/// Load a hex-encoded private key from a file.
fn load_private_key(path: &Path) -> Result<PrivateKey> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file {}", path.display()))?;
    PrivateKey::from_hex(&text)
        .with_context(|| format!("Key file {} does not hold a valid private key", path.display()))
}

fn parse_public_key(hex: &str) -> Result<PublicKey> {
    PublicKey::from_hex(hex).context("Invalid public key")
}

fn build_open_config(args: &OpenArgs) -> Result<OpenConfig> {
    let mut builder = OpenConfig::builder().with_max_envelope_size(args.max_envelope_size);

    if args.allow_unsigned {
        builder = builder.allow_unsigned();
    }
    if let Some(hex) = &args.expect_sender {
        builder = builder.with_expected_sender(parse_public_key(hex)?);
    }

    let config = builder.build();
    config.validate().context("Invalid open configuration")?;
    Ok(config)
}

fn run_seal(args: &SealArgs) -> Result<()> {
    let recipient = parse_public_key(&args.to)?;
    let sender = load_private_key(&args.signing_key)?;
    let content = read_input(args.input.as_deref())?;

    let keys = StaticKeyProvider::new().with_signing_key(sender);
    let bytes = seal(&content, &recipient, &keys).context("Failed to seal envelope")?;

    info!(
        content_len = content.len(),
        envelope_len = bytes.len(),
        "Sealed envelope"
    );
    write_output(args.output.as_deref(), &bytes)
}

fn run_open(args: &OpenArgs) -> Result<()> {
    let config = build_open_config(args)?;
    let recipient = load_private_key(&args.key)?;
    let bytes = read_input(args.input.as_deref())?;

    let keys = StaticKeyProvider::new().with_decryption_key(recipient);
    let opened = match open(&bytes, &keys, &config) {
        Ok(opened) => opened,
        Err(e) => {
            warn!(code = e.code().code(), error = %e, "Rejected envelope");
            bail!("Failed to open envelope: {e}");
        }
    };

    match &opened.sender {
        Some(sender) => info!(
            sender = %sender,
            content_hash = %opened.content_hash,
            "Opened envelope"
        ),
        None => warn!(content_hash = %opened.content_hash, "Opened unsigned envelope"),
    }
    write_output(args.output.as_deref(), &opened.plaintext)
}

fn inspect(bytes: &[u8]) -> Result<InspectReport> {
    let envelope = Envelope::from_bytes(bytes).context("Failed to decode envelope")?;

    let (valid, sender, error) = match envelope.validate() {
        Ok(()) => (true, envelope.sender().ok().map(|pk| pk.to_hex()), None),
        Err(e) => {
            debug!(error = %e, "Envelope failed validation");
            (false, None, Some(e.to_string()))
        }
    };

    Ok(InspectReport {
        version: envelope.version(),
        signature_algorithm: envelope.signature_algorithm().to_string(),
        cipher_algorithm: envelope.cipher_algorithm().to_string(),
        sizes: FieldSizes {
            payload: envelope.payload().len(),
            wrapped_key: envelope.wrapped_key().len(),
            iv: envelope.iv().len(),
            mac: envelope.mac().len(),
            signature: envelope.signature().map_or(0, <[u8]>::len),
        },
        content_hash: envelope.content_hash().to_hex(),
        signed: envelope.is_signed(),
        valid,
        sender,
        error,
    })
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let bytes = read_input(args.input.as_deref())?;
    let report = inspect(&bytes)?;
    let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level, &args.log_format)?;
    debug!(version = env!("CARGO_PKG_VERSION"), "Starting secretly");

    match &args.command {
        Command::Seal(seal_args) => run_seal(seal_args),
        Command::Open(open_args) => run_open(open_args),
        Command::Inspect(inspect_args) => run_inspect(inspect_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_key(dir: &TempDir, name: &str, key: &PrivateKey) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, format!("0x{}\n", hex::encode(key.to_bytes()))).unwrap();
        path
    }

    fn open_args(dir: &TempDir, key: PathBuf, input: PathBuf) -> OpenArgs {
        OpenArgs {
            key,
            expect_sender: None,
            allow_unsigned: false,
            max_envelope_size: DEFAULT_MAX_ENVELOPE_SIZE,
            input: Some(input),
            output: Some(dir.path().join("opened.txt")),
        }
    }

    fn sealed_file(dir: &TempDir, sender: &PrivateKey, recipient: &PrivateKey) -> PathBuf {
        let content = dir.path().join("content.txt");
        fs::write(&content, b"over the command line").unwrap();
        let envelope = dir.path().join("envelope.bin");

        run_seal(&SealArgs {
            to: recipient.public_key().to_hex(),
            signing_key: write_key(dir, "sender.key", sender),
            input: Some(content),
            output: Some(envelope.clone()),
        })
        .unwrap();
        envelope
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "secretly",
            "--log-format",
            "json",
            "open",
            "--key",
            "k.hex",
            "--allow-unsigned",
        ])
        .unwrap();
        assert_eq!(args.log_format, "json");
        match args.command {
            Command::Open(open) => {
                assert!(open.allow_unsigned);
                assert_eq!(open.max_envelope_size, DEFAULT_MAX_ENVELOPE_SIZE);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_expect_sender_conflicts_with_allow_unsigned() {
        let result = Args::try_parse_from([
            "secretly",
            "open",
            "--key",
            "k.hex",
            "--allow-unsigned",
            "--expect-sender",
            "04ab",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_seal_then_open_files() {
        let dir = TempDir::new().unwrap();
        let sender = PrivateKey::generate();
        let recipient = PrivateKey::generate();
        let envelope = sealed_file(&dir, &sender, &recipient);

        let mut args = open_args(&dir, write_key(&dir, "recipient.key", &recipient), envelope);
        args.expect_sender = Some(sender.public_key().to_hex());
        run_open(&args).unwrap();

        let opened = fs::read(dir.path().join("opened.txt")).unwrap();
        assert_eq!(opened, b"over the command line");
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let dir = TempDir::new().unwrap();
        let envelope = sealed_file(&dir, &PrivateKey::generate(), &PrivateKey::generate());

        let stranger = write_key(&dir, "stranger.key", &PrivateKey::generate());
        assert!(run_open(&open_args(&dir, stranger, envelope)).is_err());
        assert!(!dir.path().join("opened.txt").exists());
    }

    #[test]
    fn test_open_with_unexpected_sender_fails() {
        let dir = TempDir::new().unwrap();
        let recipient = PrivateKey::generate();
        let envelope = sealed_file(&dir, &PrivateKey::generate(), &recipient);

        let mut args = open_args(&dir, write_key(&dir, "recipient.key", &recipient), envelope);
        args.expect_sender = Some(PrivateKey::generate().public_key().to_hex());
        assert!(run_open(&args).is_err());
    }

    #[test]
    fn test_bad_key_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.key");
        fs::write(&path, "not hex").unwrap();
        assert!(load_private_key(&path).is_err());
    }

    #[test]
    fn test_inspect_report() {
        let dir = TempDir::new().unwrap();
        let sender = PrivateKey::generate();
        let envelope = sealed_file(&dir, &sender, &PrivateKey::generate());

        let report = inspect(&fs::read(envelope).unwrap()).unwrap();
        assert_eq!(report.version, 1);
        assert_eq!(report.signature_algorithm, "secp256k1");
        assert_eq!(report.cipher_algorithm, "aes-128-ctr");
        assert_eq!(report.sizes.payload, b"over the command line".len());
        assert_eq!(report.sizes.iv, 16);
        assert_eq!(report.sizes.mac, 32);
        assert_eq!(report.sizes.signature, 65);
        assert!(report.signed);
        assert!(report.valid);
        assert_eq!(report.sender, Some(sender.public_key().to_hex()));
        assert!(report.error.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["content_hash"].as_str().map(str::len), Some(64));
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect(b"definitely not an envelope").is_err());
    }
}
