//! simprof CLI
//!
//! Captures a SIM/USIM card filesystem into an on-disk profile, and
//! replays a stored profile onto a writable card. The card is reached
//! over a serial phoenix reader by default, an OsmocomBB socket with
//! `--osmocon`, or a PC/SC reader when built with the `pcsc` feature.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::{info, warn};

use simprof::apdu::CLA_UICC;
use simprof::card::provision;
use simprof::card::{create_directory, replay, walk, FailedFile, FileId, WalkError};
use simprof::DirectoryResult;
use simprof::profile::storage::ProfileStore;
use simprof::profile::Section;
use simprof::transport::osmocon::OsmoconSimLink;
use simprof::transport::serial::SerialSimLink;
use simprof::transport::SimTransport;
use simprof::{Profile, Selector};

#[derive(Parser)]
#[command(name = "simprof")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read and write SIM/USIM card filesystem profiles")]
struct Cli {
    /// Serial device of the card reader
    #[arg(short, long, default_value = "/dev/ttyUSB0", value_name = "DEV")]
    device: String,

    /// Baud rate of the serial device
    #[arg(short, long, default_value_t = 9600)]
    baudrate: u32,

    /// Connect through an OsmocomBB layer1 socket instead of serial
    #[arg(long, value_name = "SOCKET")]
    osmocon: Option<PathBuf>,

    /// Use PC/SC reader number N instead of serial
    #[cfg(feature = "pcsc")]
    #[arg(long, value_name = "N", conflicts_with = "osmocon")]
    pcsc_device: Option<usize>,

    /// Directory the profile is stored in
    #[arg(long, default_value = "./profile", value_name = "DIR")]
    profile_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture the card filesystem into the profile directory
    Read,
    /// Replay the stored profile onto a blank programmable card
    Write {
        /// Read every written file back and compare
        #[arg(long)]
        verify: bool,
    },
}

fn open_transport(cli: &Cli) -> Result<Box<dyn SimTransport>, Box<dyn Error>> {
    let cla = CLA_UICC;

    #[cfg(feature = "pcsc")]
    if let Some(index) = cli.pcsc_device {
        use simprof::transport::pcsc::PcscSimLink;
        return Ok(Box::new(PcscSimLink::open(index, cla)?));
    }

    if let Some(sock) = &cli.osmocon {
        info!("connecting to osmocon socket {}", sock.display());
        return Ok(Box::new(OsmoconSimLink::connect(sock, cla)?));
    }

    info!("opening {} at {} baud", cli.device, cli.baudrate);
    Ok(Box::new(SerialSimLink::open(&cli.device, cli.baudrate, cla)?))
}

/// The four sections, in capture and replay order.
fn section_plan() -> [(Section, Selector, &'static [FileId]); 4] {
    [
        (Section::Mf, Selector::Mf, provision::MF_FILES),
        (
            Section::Gsm,
            Selector::Path(vec![FileId::MF, FileId::DF_GSM]),
            provision::GSM_FILES,
        ),
        (
            Section::Telecom,
            Selector::Path(vec![FileId::MF, FileId::DF_TELECOM]),
            provision::TELECOM_FILES,
        ),
        (
            Section::Adf,
            Selector::Aid(provision::ADF_USIM_AID.to_vec()),
            provision::ADF_FILES,
        ),
    ]
}

fn report_failures(section: Section, failed: &[FailedFile]) {
    for f in failed {
        println!("  {}/{}: {}", section, f.id, f.error);
    }
}

fn capture_sections(
    tp: &mut dyn SimTransport,
    profile: &mut Profile,
) -> Result<(), WalkError> {
    for (section, selector, ids) in section_plan() {
        info!("reading section {section} ({} files)", ids.len());
        let mut result = DirectoryResult::default();
        match walk(tp, &selector, ids, &mut result) {
            Ok(()) => {
                println!(
                    "{}: {} read, {} failed",
                    section,
                    result.succeeded.len(),
                    result.failed.len()
                );
                report_failures(section, &result.failed);
                profile.set_section(section, &result.succeeded);
            }
            Err(WalkError::ParentSelectFailed { sw }) => {
                warn!("section {section} unreachable (sw {sw:04x}), skipping");
            }
            Err(e) => {
                // keep the files this section finished before the fault
                profile.set_section(section, &result.succeeded);
                return Err(e);
            }
        }
    }
    Ok(())
}

fn run_read(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut tp = open_transport(cli)?;
    let store = ProfileStore::new(&cli.profile_dir);

    let mut profile = Profile::default();
    let outcome = capture_sections(tp.as_mut(), &mut profile);

    // keep whatever was captured even when the session died mid-walk
    if !profile.is_empty() {
        store.save(&profile)?;
        println!("profile saved to {}", store.dir().display());
    }
    outcome.map_err(Into::into)
}

fn run_write(cli: &Cli, verify: bool) -> Result<(), Box<dyn Error>> {
    let store = ProfileStore::new(&cli.profile_dir);
    let profile = store.load()?;
    if profile.is_empty() {
        return Err(format!("no profile found in {}", store.dir().display()).into());
    }

    let mut tp = open_transport(cli)?;
    let directory_fci: [Option<&[u8]>; 4] = [
        None,
        Some(&provision::DF_GSM_FCI),
        Some(&provision::DF_TELECOM_FCI),
        Some(&provision::ADF_USIM_FCI),
    ];

    for ((section, selector, _), dir_fci) in section_plan().into_iter().zip(directory_fci) {
        let files = profile.descriptors(section)?;
        if files.is_empty() {
            continue;
        }

        if let Some(fci) = dir_fci {
            match create_directory(tp.as_mut(), &Selector::Mf, fci) {
                Ok(()) => {}
                Err(WalkError::Transport(e)) => return Err(e.into()),
                Err(e) => {
                    warn!("section {section}: {e}, skipping");
                    continue;
                }
            }
        }

        info!("writing section {section} ({} files)", files.len());
        match replay(tp.as_mut(), &selector, &files, verify) {
            Ok(report) => {
                println!(
                    "{}: {} written, {} failed",
                    section,
                    report.written.len(),
                    report.failed.len()
                );
                report_failures(section, &report.failed);
            }
            Err(WalkError::ParentSelectFailed { sw }) => {
                warn!("section {section} unreachable (sw {sw:04x}), skipping");
            }
            Err(e @ WalkError::Transport(_)) | Err(e @ WalkError::DirectoryCreateFailed { .. }) => {
                return Err(e.into())
            }
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Read => run_read(&cli),
        Commands::Write { verify } => run_write(&cli, verify),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
