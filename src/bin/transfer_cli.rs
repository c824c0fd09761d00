use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;

use transfer_otp::configure;
use transfer_otp::formatter::{format_account, format_rupiah};
use transfer_otp::logger::setup_logger;
use transfer_otp::simple_kv_storage::SledDb;
use transfer_otp::transfer::adapters::{AlwaysSettle, OtpDelivery, SimulatedSettlement};
use transfer_otp::transfer::{
    parse_grouped, FormPhase, SettingsStore, TransferError, TransferRequest, TransferSession,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Simulasi transfer bank dengan konfirmasi OTP",
    long_about = None
)]
struct Args {
    /// Starting balance when nothing is saved yet
    #[arg(long)]
    balance: Option<u64>,

    /// Daily limit when nothing is saved yet
    #[arg(long)]
    daily_limit: Option<u64>,

    /// sled directory for saved settings
    #[arg(long)]
    storage: Option<String>,

    /// Keep settings in memory only
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Check account, balance and limit before issuing the OTP
    #[arg(long, default_value_t = false)]
    upfront_checks: bool,

    /// Probability that a verified transfer settles (1.0 = always)
    #[arg(long)]
    success_rate: Option<f64>,
}

/// Prints the code as if it arrived by SMS
struct ConsoleDelivery;

impl OtpDelivery for ConsoleDelivery {
    fn deliver(&mut self, request: &TransferRequest, code: &str) {
        println!(
            "[SMS] Kode OTP transfer ke {}: {}",
            format_account(&request.target_account),
            code
        );
    }
}

const HELP: &str = "\
Perintah:
  submit <rekening> <nominal> [catatan...]
  otp <kode>
  resend
  back
  new
  reset
  limit <nominal>
  saldo <nominal>
  simpan
  status
  quit";

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    let config = configure::load_config().context("Failed to load config")?;

    if let Err(e) = setup_logger(&config) {
        eprintln!("Logger setup failed: {}", e);
    }

    let mut defaults = config.default_settings();
    if let Some(balance) = args.balance {
        defaults.balance = balance;
    }
    if let Some(limit) = args.daily_limit {
        defaults.daily_limit = limit;
    }
    defaults.upfront_checks |= args.upfront_checks;

    let store = if args.memory {
        SettingsStore::in_memory()
    } else {
        let path = args.storage.clone().unwrap_or(config.storage_path.clone());
        let db = SledDb::new(&path).with_context(|| format!("Failed to open storage at {}", path))?;
        log::info!("Settings storage: {}", path);
        SettingsStore::new(Box::new(db))
    };

    let session = TransferSession::with_store(defaults, store)?.with_delivery(ConsoleDelivery);
    let success_rate = args.success_rate.unwrap_or(config.settlement_success_rate);
    let mut session = if success_rate >= 1.0 {
        session.with_settlement(AlwaysSettle)
    } else {
        session.with_settlement(SimulatedSettlement::new(success_rate))
    };

    println!("{}", HELP);
    print_status(&session);

    let stdin = io::stdin();
    loop {
        print!("{}> ", session.phase());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        let result = match command {
            "submit" => submit(&mut session, &rest),
            "otp" => verify(&mut session, &rest),
            "resend" => session.resend_otp().map(|_| println!("Kode OTP baru telah dikirim.")),
            "back" => session.back(),
            "new" => session.new_transaction(),
            "reset" => {
                session.reset_form();
                Ok(())
            }
            "limit" => parse_arg(&rest).and_then(|n| session.set_daily_limit(n)),
            "saldo" => parse_arg(&rest).and_then(|n| session.set_balance(n)),
            "simpan" => session.save_settings().map(|_| println!("Pengaturan disimpan.")),
            "status" => {
                print_status(&session);
                Ok(())
            }
            "help" => {
                println!("{}", HELP);
                Ok(())
            }
            "quit" | "exit" => break,
            other => {
                println!("Perintah tidak dikenal: {}", other);
                continue;
            }
        };

        if let Err(e) = result {
            log::debug!("{} failed: {}", command, e.error_code());
            println!("✗ {}", e);
            if let TransferError::OtpMismatch { attempts_remaining } = e {
                println!("  Sisa percobaan: {}", attempts_remaining);
            }
        }
    }

    Ok(())
}

fn submit(session: &mut TransferSession, args: &[&str]) -> Result<(), TransferError> {
    let account = args.first().copied().unwrap_or_default();
    let amount = args.get(1).copied().unwrap_or_default();
    let notes = if args.len() > 2 { Some(args[2..].join(" ")) } else { None };

    session.submit_form(account, amount, notes.as_deref())?;
    println!(
        "Masukkan kode OTP (sisa percobaan: {}).",
        session.state().otp_attempts_remaining()
    );
    Ok(())
}

fn verify(session: &mut TransferSession, args: &[&str]) -> Result<(), TransferError> {
    let entered = args.first().copied().unwrap_or_default();
    let outcome = session.verify_otp(entered)?;
    println!("{} {}", if outcome.is_success() { "✓" } else { "✗" }, outcome.message());
    println!("Ketik `new` untuk transaksi baru.");
    Ok(())
}

fn parse_arg(args: &[&str]) -> Result<u64, TransferError> {
    let raw = args.first().copied().unwrap_or_default();
    parse_grouped(raw)
        .ok_or_else(|| TransferError::InvalidSettings(format!("bukan angka: {:?}", raw)))
}

fn print_status(session: &TransferSession) {
    let state = session.state();
    println!("Tahap        : {}", session.phase());
    println!("Saldo        : {}", format_rupiah(state.current_balance));
    println!("Limit harian : {}", format_rupiah(state.daily_limit));
    println!("Terpakai     : {}", format_rupiah(state.used_limit));
    println!("Sisa limit   : {}", format_rupiah(state.remaining_limit()));
    if session.phase() == FormPhase::AwaitingOtp {
        println!("Percobaan OTP: {}", state.otp_attempts_remaining());
    }
}
