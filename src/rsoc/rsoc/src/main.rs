extern crate clap;
use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{bounded, Receiver}; // Ctrl-C notification
use log::{error, info};
use std::io::Write;
use std::path::Path;

use rsoc_core::periph::UartPhy;
use rsoc_core::platform::Platform;
use rsoc_core::soc::{compose, Soc, SocConfig};
use rsoc_peripherals::loopback::LoopbackPhy;
use rsoc_peripherals::tcp::TcpUartPhy;

mod sim;
use sim::Simulator;

fn get_cli_config<'a>() -> clap::ArgMatches<'a> {
    let board_args = [
        clap::Arg::with_name("board")
            .long("board")
            .takes_value(true)
            .default_value("nereid")
            .help("Target board"),
        clap::Arg::with_name("device")
            .long("device")
            .takes_value(true)
            .help("FPGA device, defaults to the board's"),
        clap::Arg::with_name("revision")
            .long("revision")
            .takes_value(true)
            .help("Board revision, defaults to the board's"),
        clap::Arg::with_name("sys-clk-freq")
            .long("sys-clk-freq")
            .takes_value(true)
            .help("System clock frequency in Hz"),
        clap::Arg::with_name("no-pcie-uart")
            .long("no-pcie-uart")
            .help("Use the board serial port instead of the PCIe UART"),
    ];

    clap::App::new("rsoc")
        .version("0.1")
        .about("LiteX-style SoC generator and PCIe UART bridge simulator")
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            clap::SubCommand::with_name("build")
                .about("Compose the SoC and write csr.h, csr.csv and pin constraints")
                .args(&board_args)
                .arg(
                    clap::Arg::with_name("output-dir")
                        .long("output-dir")
                        .takes_value(true)
                        .default_value("build"),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name("sim")
                .about("Run the PCIe UART bridge and MSI controller cycle by cycle")
                .args(&board_args)
                .arg(
                    clap::Arg::with_name("tcp")
                        .long("tcp")
                        .takes_value(true)
                        .help("Attach the UART to a TCP socket, e.g. 127.0.0.1:19800"),
                )
                .arg(
                    clap::Arg::with_name("cycles")
                        .long("cycles")
                        .takes_value(true)
                        .help("Stop after this many cycles; runs until Ctrl-C otherwise"),
                )
                .arg(
                    clap::Arg::with_name("send")
                        .long("send")
                        .takes_value(true)
                        .default_value("Hello from the host\n")
                        .help("Bytes the host writes through the bridge"),
                ),
        )
        .get_matches()
}

fn compose_from_args(args: &clap::ArgMatches) -> Result<Soc> {
    let board_name = args.value_of("board").unwrap_or("nereid");
    let board = rsoc_boards::find(board_name)?;
    let platform = Platform::new(board, args.value_of("device"), args.value_of("revision"))?;

    let mut config = SocConfig::for_board(board);
    if args.is_present("no-pcie-uart") {
        config.with_pcie_uart = false;
    }
    if let Some(freq) = args.value_of("sys-clk-freq") {
        config.sys_clk_freq = freq
            .parse()
            .with_context(|| format!("invalid --sys-clk-freq {}", freq))?;
    }
    Ok(compose(platform, config)?)
}

fn build(args: &clap::ArgMatches) -> Result<()> {
    let soc = compose_from_args(args)?;

    // Render everything before touching the output directory
    let header = soc_export::csr_header(&soc);
    let csv = soc_export::csr_csv(&soc);
    let (format, pins) = soc_export::constraints(soc.platform());

    let out_dir = Path::new(args.value_of("output-dir").unwrap_or("build"));
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    let board = soc.platform().board().name;
    let files = [
        ("csr.h".to_string(), header),
        ("csr.csv".to_string(), csv),
        (format!("{}.{}", board, format.extension()), pins),
    ];
    for (name, text) in files.iter() {
        let path = out_dir.join(name);
        std::fs::write(&path, text).with_context(|| format!("cannot write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }
    info!(
        "{} on {} ({}), toolchain {}, programmer {}",
        soc.config().ident,
        soc.platform().part(),
        board,
        soc.platform().board().toolchain,
        soc.platform().board().programmer.as_str()
    );
    for cd in soc.crg().domains() {
        info!(
            "Clock domain {}: {} Hz{}",
            cd.name(),
            cd.freq_hz(),
            if cd.is_reset_less() { ", reset-less" } else { "" }
        );
    }
    Ok(())
}

fn sim(args: &clap::ArgMatches, stop: &Receiver<()>) -> Result<()> {
    let soc = compose_from_args(args)?;
    let cycles = match args.value_of("cycles") {
        Some(c) => Some(
            c.parse::<u64>()
                .with_context(|| format!("invalid --cycles {}", c))?,
        ),
        None => None,
    };

    let phy: Box<dyn UartPhy> = match args.value_of("tcp") {
        Some(addr) => Box::new(
            TcpUartPhy::new(addr).with_context(|| format!("cannot listen on {}", addr))?,
        ),
        None => Box::new(LoopbackPhy::new()),
    };

    let mut sim = Simulator::new(soc, phy)?;
    for &byte in args.value_of("send").unwrap_or("").as_bytes().iter() {
        if sim.host_mut().send(byte).is_err() {
            bail!("--send text does not fit the host queue");
        }
    }

    let stdout = std::io::stdout();
    loop {
        if !stop.is_empty() || cycles.map_or(false, |n| sim.cycle() >= n) {
            break;
        }
        sim.step()?;

        if let Some(first) = sim.host_mut().recv() {
            let mut out = stdout.lock();
            out.write_all(&[first])?;
            while let Some(byte) = sim.host_mut().recv() {
                out.write_all(&[byte])?;
            }
            out.flush()?;
        }
    }

    info!(
        "Simulation stopped after {} cycles, {} MSI messages",
        sim.cycle(),
        sim.msi_messages()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let (signal_sender, signal_receiver) = bounded(1);
    let handler_result = ctrlc::set_handler(move || {
        if signal_sender.is_full() {
            std::process::exit(-1); // Second Ctrl-C
        }
        let _ = signal_sender.send(());
    });
    if let Err(e) = handler_result {
        error!("Signal handler failed: {:?}", e);
        std::process::exit(1);
    }

    let matches = get_cli_config();
    let result = match matches.subcommand() {
        ("build", Some(args)) => build(args),
        ("sim", Some(args)) => sim(args, &signal_receiver),
        _ => Err(anyhow!("no subcommand given")),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
