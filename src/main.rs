use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use zeroize::Zeroizing;

use ssl_pkey::error::error_codes;
use ssl_pkey::prelude::*;

#[derive(Parser)]
#[command(
    name = "ssl-pkey",
    about = "Create, check and remove RSA/EC private key files",
    long_about = "ssl-pkey - private key file provisioning

EXAMPLES:
  ssl-pkey exists /etc/ssl/private/foo.key
  ssl-pkey ensure --path /etc/ssl/private/foo.key --size 4096
  ssl-pkey ensure --path foo.key -a ec --curve prime239v1 --password-env KEY_PASS
  ssl-pkey ensure --config foo.json --absent
  ssl-pkey inspect foo.key --password-file /run/secrets/key_pass

Passphrases are only read from an environment variable or a file.",
    version,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a key file exists (exit 0 if present, 1 if absent)
    Exists { path: PathBuf },

    /// Generate a key file, replacing any existing file
    Create(SpecArgs),

    /// Delete a key file; fails if it does not exist
    #[command(aliases = &["rm"])]
    Destroy { path: PathBuf },

    /// Create the key file if missing, or remove it with --absent
    Ensure {
        #[command(flatten)]
        spec: SpecArgs,

        #[arg(long)]
        absent: bool,
    },

    /// Describe an existing key file
    Inspect {
        path: PathBuf,

        #[command(flatten)]
        password: PasswordArgs,
    },
}

#[derive(Args)]
struct SpecArgs {
    /// JSON option bundle; other flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    path: Option<PathBuf>,

    /// rsa or ec
    #[arg(short, long)]
    authentication: Option<Authentication>,

    /// RSA modulus length in bits
    #[arg(short, long)]
    size: Option<u32>,

    /// Named curve for EC keys
    #[arg(short, long)]
    curve: Option<String>,

    #[command(flatten)]
    password: PasswordArgs,

    /// Truncate and write the key file in place instead of renaming a temp file
    #[arg(long)]
    direct: bool,

    /// Permission bits for the key file, in octal
    #[arg(long, value_parser = parse_mode)]
    mode: Option<u32>,
}

#[derive(Args)]
struct PasswordArgs {
    /// Environment variable holding the passphrase
    #[arg(long, value_name = "VAR", conflicts_with = "password_file")]
    password_env: Option<String>,

    /// File whose first line is the passphrase
    #[arg(long, value_name = "FILE")]
    password_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            log::debug!("{:?}", e.technical_details());
            eprintln!("error: {}", e);
            eprintln!("{}", e.user_friendly_message());
            if let Some(hint) = e.suggested_remediation() {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_micros()
        .init();
}

fn run(command: Commands) -> KeyResult<ExitCode> {
    init()?;

    match command {
        Commands::Exists { path } => {
            let present = KeyProvisioner::new().exists(&path)?;
            println!("{}", if present { "present" } else { "absent" });
            Ok(if present {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Create(args) => {
            let (provisioner, spec) = args.resolve()?;
            provisioner.create(&spec)?;
            println!("created {}", spec.path().display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Destroy { path } => {
            KeyProvisioner::new().destroy(&path)?;
            println!("removed {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ensure { spec, absent } => {
            let (provisioner, spec) = spec.resolve()?;
            let ensure = if absent { Ensure::Absent } else { Ensure::Present };
            let change = provisioner.ensure(&spec, ensure)?;
            println!("{} {}", change, spec.path().display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { path, password } => {
            let password = password.load()?;
            let info = KeyProvisioner::new().inspect(&path, password.as_ref())?;
            println!("algorithm:   {}", info.algorithm);
            println!("bits:        {}", info.bits);
            if let Some(curve) = &info.curve {
                println!("curve:       {}", curve);
            }
            println!("encrypted:   {}", if info.encrypted { "yes" } else { "no" });
            println!("fingerprint: SHA256:{}", info.fingerprint);
            Ok(ExitCode::SUCCESS)
        }
    }
}

impl SpecArgs {
    fn resolve(self) -> KeyResult<(KeyProvisioner, KeySpec)> {
        let mut builder = match &self.config {
            Some(config) => KeySpecBuilder::from_json(&Zeroizing::new(read_text(config)?))?,
            None => KeySpecBuilder::new(),
        };

        if let Some(path) = self.path {
            builder = builder.path(path);
        }
        if let Some(authentication) = self.authentication {
            builder = builder.authentication(authentication);
        }
        if let Some(size) = self.size {
            builder = builder.size(size);
        }
        if let Some(curve) = self.curve {
            builder = builder.curve(curve);
        }
        if let Some(password) = self.password.load()? {
            builder = builder.password(password);
        }

        let mut options = ProvisionerOptions::default();
        if self.direct {
            options.write_strategy = WriteStrategy::Direct;
        }
        if let Some(mode) = self.mode {
            options.file_mode = mode;
        }

        Ok((KeyProvisioner::with_options(options), builder.build()?))
    }
}

impl PasswordArgs {
    fn load(&self) -> KeyResult<Option<Passphrase>> {
        if let Some(var) = &self.password_env {
            let value = std::env::var(var).map(Zeroizing::new).map_err(|_| {
                KeyError::invalid_parameter("password-env", "a set, UTF-8 environment variable", var)
            })?;
            return Ok(Some(Passphrase::new(value.as_str())));
        }

        if let Some(file) = &self.password_file {
            // Everything after the first line is discarded along with the buffer
            let raw = Zeroizing::new(read_text(file)?);
            return Ok(Some(Passphrase::new(raw.lines().next().unwrap_or(""))));
        }

        Ok(None)
    }
}

fn read_text(path: &Path) -> KeyResult<String> {
    fs::read_to_string(path)
        .map_err(|e| KeyError::io_error("read", path, &e, error_codes::KEY_READ_FAILED))
}

fn parse_mode(value: &str) -> Result<u32, String> {
    let digits = value.trim_start_matches("0o");
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(format!("'{}' is not an octal permission mode", value)),
    }
}
