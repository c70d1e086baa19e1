use gll_logger::gps::Gps;
use gll_logger::state::Position;
use gll_logger::udpstream::UdpStream;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "GLL Logger v0.1.0",
            about = "Position logger for NMEA-0183 GLL sentences.")]
struct Opt {
    /// Input filename
    #[structopt(short = "f", long = "file", name = "INPUT", parse(from_os_str))]
    input_file: Option<PathBuf>,

    /// Listen to port for incoming sentences [default: 10110]
    #[structopt(short, long, conflicts_with = "INPUT")]
    port: Option<u16>,

    /// Interval at which the position line is printed in milliseconds when listening for sentences
    #[structopt(short, long, default_value = "10")]
    interval: u128,

    /// Output filename
    #[structopt(short = "o", long = "output", name = "OUTPUT", parse(from_os_str))]
    output_file: Option<PathBuf>,

    /// Print a tally of rejected lines when the input is exhausted
    #[structopt(short, long)]
    summary: bool,
}

fn main() -> Result<()> {
    /**************************************************************************
     * Program arguments
     **************************************************************************/
    let opt = Opt::from_args();
    let in_stream: Box<dyn std::io::Read>;
    let out_stream: Box<dyn std::io::Write>;
    let reading_from_file: bool;
    let writing_to_file: bool;

    //Input args
    if let Some(f) = opt.input_file {
        in_stream = Box::new(
            File::open(&f).with_context(|| format!("unable to open {}", f.display()))?,
        );
        reading_from_file = true;
    } else {
        let port = match opt.port {
            Some(port) => port.to_string(),
            None => "10110".to_string(),
        };
        let address = format!("0.0.0.0:{}", port);
        in_stream = Box::new(
            UdpStream::open(address.clone())
                .with_context(|| format!("could not open UDP listener on {}", address))?,
        );
        reading_from_file = false;
    }

    //Output args
    if let Some(f) = opt.output_file {
        out_stream = Box::new(
            File::create(&f).with_context(|| format!("could not create file {}", f.display()))?,
        );
        writing_to_file = true;
    } else {
        out_stream = Box::new(std::io::stdout());
        writing_to_file = false;
    }

    /**************************************************************************
     * Main Program logic
     **************************************************************************/
    let reader = BufReader::new(in_stream);
    let mut writer = BufWriter::new(out_stream);

    let mut gps = Gps::new();
    let position = gps.position();

    //Write the headline
    writer
        .write_all(format!("{}\n", Position::headline()).as_bytes())
        .context("unable to write headline")?;

    //If we are writing to stdout flush immediately
    if !writing_to_file {
        writer.flush().context("unable to flush output")?;
    }

    //Start timer for the print out interval
    let mut time: Instant = Instant::now();
    for line in reader.lines() {
        //Rejected lines are dropped silently, the counters keep the tally
        if gps.handle_line(&line.context("error processing line")?).is_ok()
            && (time.elapsed().as_millis() >= opt.interval || reading_from_file)
        {
            writer
                .write_all(format!("{}\n", position.get()).as_bytes())
                .context("error writing output")?;
            if !writing_to_file {
                writer.flush().context("unable to flush output")?;
            }
            time = Instant::now();
        }
    }

    if opt.summary {
        writer
            .write_all(format!("{}\n", gps.counters()).as_bytes())
            .context("error writing summary")?;
    }
    writer.flush().context("unable to flush output")?;
    Ok(())
}
