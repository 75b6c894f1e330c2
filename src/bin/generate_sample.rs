//! Writes `sample_pressure.csv` and `sample_pressure.parquet` for trying the viewer.
//!
//! Usage: `generate_sample [OUT_DIR]`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

const SAMPLE_RATE_HZ: f64 = 100.0;
const N_SAMPLES: usize = 1_200;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Idle → exponential rise → noisy plateau → exponential decay → idle.
fn pulse(t: f64, level: f64, on: f64, off: f64, tau: f64) -> f64 {
    if t < on {
        0.0
    } else if t < off {
        level * (1.0 - (-(t - on) / tau).exp())
    } else {
        let at_off = level * (1.0 - (-(off - on) / tau).exp());
        at_off * (-(t - off) / tau).exp()
    }
}

struct Channels {
    time: Vec<f64>,
    p1: Vec<f64>,
    p2: Vec<f64>,
    t1: Vec<f64>,
}

fn generate(rng: &mut SimpleRng) -> Channels {
    let mut ch = Channels {
        time: Vec::with_capacity(N_SAMPLES),
        p1: Vec::with_capacity(N_SAMPLES),
        p2: Vec::with_capacity(N_SAMPLES),
        t1: Vec::with_capacity(N_SAMPLES),
    };
    for i in 0..N_SAMPLES {
        let t = i as f64 / SAMPLE_RATE_HZ;
        // Feed pressure leads the nozzle pressure slightly.
        let p1 = pulse(t, 520_000.0, 1.5, 9.5, 0.15) + rng.gauss(0.0, 2_000.0);
        let p2 = pulse(t, 480_000.0, 1.6, 9.6, 0.25) + rng.gauss(0.0, 6_000.0);
        let t1 = 293.15 + 0.8 * pulse(t, 60.0, 1.6, 9.6, 2.0) + rng.gauss(0.0, 0.05);
        ch.time.push((t * 1000.0).round() / 1000.0);
        ch.p1.push(p1.max(0.0));
        ch.p2.push(p2.max(0.0));
        ch.t1.push(t1);
    }
    ch
}

fn write_csv(path: &Path, ch: &Channels) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Time", "P1", "P2", "T1"])?;
    for i in 0..ch.time.len() {
        writer.write_record([
            ch.time[i].to_string(),
            format!("{:.1}", ch.p1[i]),
            format!("{:.1}", ch.p2[i]),
            format!("{:.3}", ch.t1[i]),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, ch: &Channels) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Time", DataType::Float64, false),
        Field::new("P1", DataType::Float64, false),
        Field::new("P2", DataType::Float64, false),
        Field::new("T1", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(ch.time.clone())),
            Arc::new(Float64Array::from(ch.p1.clone())),
            Arc::new(Float64Array::from(ch.p2.clone())),
            Arc::new(Float64Array::from(ch.t1.clone())),
        ],
    )
    .context("building record batch")?;

    log::debug!(
        "First rows:\n{}",
        pretty_format_batches(&[batch.slice(0, 5)]).context("formatting preview")?
    );

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let channels = generate(&mut SimpleRng::new(42));

    let csv_path = out_dir.join("sample_pressure.csv");
    write_csv(&csv_path, &channels)?;
    let parquet_path = out_dir.join("sample_pressure.parquet");
    write_parquet(&parquet_path, &channels)?;

    println!(
        "Wrote {} samples ({} s at {} Hz) to {} and {}",
        channels.time.len(),
        channels.time.len() as f64 / SAMPLE_RATE_HZ,
        SAMPLE_RATE_HZ,
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
