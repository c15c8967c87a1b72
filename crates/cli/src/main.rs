//! GPIO demonstration driver.
//!
//! This binary wires three pins together and performs:
//! 1. **Setup:** Configures an input pin, an output pin, and an interrupt pin with pull and edge.
//! 2. **Wait:** Blocks in `poll(POLLPRI)` on the interrupt descriptor (optionally with a timeout).
//! 3. **React:** Acknowledges the edge, reports the input level, and toggles the output.

use std::os::fd::RawFd;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gpiomem_core::{Edge, Gpio, GpioConfig, GpioError, PullState};

#[derive(Parser, Debug)]
#[command(
    name = "gpio-demo",
    author,
    version,
    about = "Wait for an edge on one pin, then report an input and toggle an output",
    long_about = "Configures an input, an output, and an interrupt pin (BCM numbering), waits for the \
                  interrupt, prints the input level, and toggles the output.\n\nExamples:\n  \
                  gpio-demo\n  gpio-demo --interrupt 17 --pull up --edge falling --timeout-ms 5000\n  \
                  RUST_LOG=gpiomem_core=trace gpio-demo --config gpio.json"
)]
struct Cli {
    /// Pin read when the interrupt fires.
    #[arg(long, default_value_t = 23)]
    input: u32,

    /// Pin toggled when the interrupt fires.
    #[arg(long, default_value_t = 24)]
    output: u32,

    /// Pin exported for the edge interrupt.
    #[arg(long, default_value_t = 25)]
    interrupt: u32,

    /// Pull resistor for the interrupt pin.
    #[arg(long, value_enum, default_value_t = PullArg::Down)]
    pull: PullArg,

    /// Edge that triggers the interrupt.
    #[arg(long, value_enum, default_value_t = EdgeArg::Rising)]
    edge: EdgeArg,

    /// Register device file (overrides the config file).
    #[arg(long)]
    device: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Poll timeout in milliseconds; negative waits forever.
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    timeout_ms: i32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PullArg {
    None,
    Up,
    Down,
}

impl From<PullArg> for PullState {
    fn from(arg: PullArg) -> Self {
        match arg {
            PullArg::None => Self::None,
            PullArg::Up => Self::Up,
            PullArg::Down => Self::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EdgeArg {
    None,
    Rising,
    Falling,
    Both,
}

impl From<EdgeArg> for Edge {
    fn from(arg: EdgeArg) -> Self {
        match arg {
            EdgeArg::None => Self::None,
            EdgeArg::Rising => Self::Rising,
            EdgeArg::Falling => Self::Falling,
            EdgeArg::Both => Self::Both,
        }
    }
}

/// Outcome of waiting on the interrupt descriptor.
enum Wait {
    Edge,
    Timeout,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<GpioConfig, GpioError> {
    let mut config = match &cli.config {
        Some(path) => GpioConfig::from_file(path)?,
        None => GpioConfig::default(),
    };
    if let Some(device) = &cli.device {
        config.device_path.clone_from(device);
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    debug!(?config, "configuration loaded");

    let mut gpio = Gpio::from_config(&config)?;

    gpio.make_input(cli.input)
        .map_err(|e| format!("pin {} could not be made an input: {e}", cli.input))?;
    gpio.make_output(cli.output)
        .map_err(|e| format!("pin {} could not be made an output: {e}", cli.output))?;

    let fd = gpio
        .try_set_single_kernel_driver(cli.interrupt, cli.pull.into(), cli.edge.into())
        .map_err(|e| format!("could not set up an interrupt for pin {}: {e}", cli.interrupt))?;
    info!(pin = cli.interrupt, fd, "waiting for interrupt");

    match wait_priority(fd, cli.timeout_ms)? {
        Wait::Timeout => {
            println!("No interrupt on pin {} within {} ms", cli.interrupt, cli.timeout_ms);
        }
        Wait::Edge => {
            gpio.acknowledge(cli.interrupt)?;
            let level = if gpio.read_pin(cli.input)? { "high" } else { "low" };
            println!(
                "Interrupt occurred on pin {}! The value of the input pin is {level}!",
                cli.interrupt
            );
            let output = gpio.toggle_pin(cli.output)?;
            info!(pin = cli.output, level = output, "output toggled");
        }
    }
    Ok(())
}

/// Blocks until `fd` reports `POLLPRI` or the timeout expires.
///
/// A negative `timeout_ms` waits forever. Interrupted waits resume with the
/// time that is left.
fn wait_priority(fd: RawFd, timeout_ms: i32) -> std::io::Result<Wait> {
    let deadline = u64::try_from(timeout_ms)
        .ok()
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLPRI,
        revents: 0,
    };
    loop {
        let remaining = match deadline {
            None => -1,
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now()).as_millis();
                i32::try_from(left).unwrap_or(i32::MAX)
            }
        };
        // SAFETY: `pfd` is a single valid pollfd on the stack; nfds is 1.
        let rc = unsafe { libc::poll(&raw mut pfd, 1, remaining) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if rc == 0 {
            return Ok(Wait::Timeout);
        }
        if pfd.revents & libc::POLLPRI != 0 {
            return Ok(Wait::Edge);
        }
        if pfd.revents & libc::POLLNVAL != 0 {
            return Err(std::io::Error::from_raw_os_error(libc::EBADF));
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP) != 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                format!("value node reported poll events {:#x}", pfd.revents),
            ));
        }
    }
}
